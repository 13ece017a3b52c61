//! MACD (Moving Average Convergence Divergence) indicator

use std::str::FromStr;

use crate::common::math;
use crate::models::indicators::MacdIndicator;

pub const MACD_FAST_PERIOD: u32 = 12;
pub const MACD_SLOW_PERIOD: u32 = 26;
pub const MACD_SIGNAL_PERIOD: u32 = 9;

/// Ratio used by the approximate signal line.
const APPROXIMATE_SIGNAL_RATIO: f64 = 0.8;

/// How the signal line is derived from the MACD line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MacdSignalLine {
    /// `signal = macd * 0.8`. Not the textbook signal line; the composite
    /// vote depends on its exact output, so this stays the default.
    #[default]
    Approximate,
    /// `signal = EMA(period)` of the rolling MACD series, or the MACD value
    /// itself while fewer than `period` MACD values exist.
    Ema { period: u32 },
}

impl FromStr for MacdSignalLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approx" | "approximate" => Ok(MacdSignalLine::Approximate),
            "ema" => Ok(MacdSignalLine::Ema {
                period: MACD_SIGNAL_PERIOD,
            }),
            other => Err(format!("unknown MACD signal mode '{}'", other)),
        }
    }
}

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = see [`MacdSignalLine`]
/// Histogram = MACD - Signal
pub fn calculate_macd(
    prices: &[f64],
    fast_period: u32,
    slow_period: u32,
    signal_line: MacdSignalLine,
) -> Option<MacdIndicator> {
    if fast_period == 0 || slow_period == 0 || prices.len() < slow_period as usize {
        return None;
    }

    let fast_ema = math::ema(prices, fast_period as usize)?;
    let slow_ema = math::ema(prices, slow_period as usize)?;
    let value = fast_ema - slow_ema;

    let signal = match signal_line {
        MacdSignalLine::Approximate => value * APPROXIMATE_SIGNAL_RATIO,
        // until the signal EMA has seeded the line sits on the MACD value
        MacdSignalLine::Ema { period } => {
            macd_series(prices, fast_period as usize, slow_period as usize)
                .and_then(|macd_values| math::ema(&macd_values, period as usize))
                .unwrap_or(value)
        }
    };

    Some(MacdIndicator {
        value,
        signal,
        histogram: value - signal,
    })
}

/// Calculate MACD with default periods (12, 26) and the approximate signal line
pub fn calculate_macd_default(prices: &[f64]) -> Option<MacdIndicator> {
    calculate_macd(
        prices,
        MACD_FAST_PERIOD,
        MACD_SLOW_PERIOD,
        MacdSignalLine::Approximate,
    )
}

/// MACD value for every sample from index `slow - 1` onward.
fn macd_series(prices: &[f64], fast: usize, slow: usize) -> Option<Vec<f64>> {
    let fast_values = math::ema_series(prices, fast)?;
    let slow_values = math::ema_series(prices, slow)?;

    // fast_values[0] belongs to sample fast-1, slow_values[0] to sample slow-1
    let offset = slow.checked_sub(fast)?;
    Some(
        slow_values
            .iter()
            .zip(fast_values.iter().skip(offset))
            .map(|(slow_ema, fast_ema)| fast_ema - slow_ema)
            .collect(),
    )
}

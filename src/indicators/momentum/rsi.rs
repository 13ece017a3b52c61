//! RSI (Relative Strength Index) indicator

use crate::models::indicators::RsiIndicator;

pub const RSI_DEFAULT_PERIOD: u32 = 14;

/// Calculate RSI with Wilder smoothing
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// The averages are seeded with the plain mean of the first `period` deltas,
/// then smoothed over every later delta. A zero average loss yields 100.
pub fn calculate_rsi(prices: &[f64], period: u32) -> Option<RsiIndicator> {
    let period_len = period as usize;
    if period_len == 0 || prices.len() < period_len + 1 {
        return None;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|pair| {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, change.abs())
            }
        })
        .unzip();

    let period_f = period as f64;
    let mut avg_gain = gains[..period_len].iter().sum::<f64>() / period_f;
    let mut avg_loss = losses[..period_len].iter().sum::<f64>() / period_f;

    for (gain, loss) in gains.iter().zip(losses.iter()).skip(period_len) {
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    if avg_loss == 0.0 {
        return Some(RsiIndicator {
            value: 100.0,
            period,
        });
    }

    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - (100.0 / (1.0 + rs));

    Some(RsiIndicator {
        value: rsi.clamp(0.0, 100.0),
        period,
    })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(prices: &[f64]) -> Option<RsiIndicator> {
    calculate_rsi(prices, RSI_DEFAULT_PERIOD)
}

//! Pure indicator pipeline: resample, compute indicators, compose the signal.

use tracing::debug;

use crate::indicators::momentum::{
    calculate_macd, calculate_rsi, MacdSignalLine, MACD_FAST_PERIOD, MACD_SLOW_PERIOD,
    RSI_DEFAULT_PERIOD,
};
use crate::indicators::trend::{calculate_sma, SMA_FAST_PERIOD, SMA_SLOW_PERIOD};
use crate::models::price::{PriceSeries, Timeframe};
use crate::models::signal::TechnicalSignal;
use crate::signals::votes::compose_signal;

/// Samples required after resampling before a direction is produced.
pub const MIN_SAMPLES: usize = SMA_SLOW_PERIOD as usize;

/// Stateless indicator engine. Each call is independent of every other.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEngine {
    signal_line: MacdSignalLine,
}

impl SignalEngine {
    pub fn new(signal_line: MacdSignalLine) -> Self {
        Self { signal_line }
    }

    pub fn signal_line(&self) -> MacdSignalLine {
        self.signal_line
    }

    /// Resample an hourly series to `timeframe` and evaluate it.
    pub fn analyze(&self, hourly: &PriceSeries, timeframe: Timeframe) -> TechnicalSignal {
        let series = hourly.resample(timeframe);
        debug!(
            hourly_samples = hourly.len(),
            samples = series.len(),
            timeframe = %timeframe,
            "Resampled price series"
        );
        self.evaluate(series.as_slice(), timeframe)
    }

    /// Evaluate an already resampled series.
    ///
    /// Below [`MIN_SAMPLES`] the moving averages, direction and strength stay
    /// null; RSI and MACD are still attached when their own minimum is met.
    pub fn evaluate(&self, prices: &[f64], timeframe: Timeframe) -> TechnicalSignal {
        let mut result = TechnicalSignal::empty(timeframe);

        result.rsi = calculate_rsi(prices, RSI_DEFAULT_PERIOD).map(|rsi| rsi.value);
        result.macd = calculate_macd(prices, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, self.signal_line);

        let ma50 = calculate_sma(prices, SMA_FAST_PERIOD).map(|sma| sma.value);
        let ma200 = calculate_sma(prices, SMA_SLOW_PERIOD).map(|sma| sma.value);

        let (Some(ma50), Some(ma200)) = (ma50, ma200) else {
            debug!(
                samples = prices.len(),
                required = MIN_SAMPLES,
                timeframe = %timeframe,
                "Insufficient data for moving averages"
            );
            return result;
        };

        let (direction, strength) =
            compose_signal(ma50, ma200, result.rsi, result.macd.map(|m| m.histogram));

        result.ma50 = Some(ma50);
        result.ma200 = Some(ma200);
        result.signal = Some(direction);
        result.strength = strength;
        result
    }
}

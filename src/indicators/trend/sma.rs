//! SMA (Simple Moving Average) indicator

use crate::common::math;
use crate::models::indicators::SmaIndicator;

/// Fast moving-average period used by the crossover vote.
pub const SMA_FAST_PERIOD: u32 = 50;
/// Slow moving-average period; also the minimum series length for a signal.
pub const SMA_SLOW_PERIOD: u32 = 200;

/// Calculate the SMA of the last `period` prices
pub fn calculate_sma(prices: &[f64], period: u32) -> Option<SmaIndicator> {
    let value = math::sma(prices, period as usize)?;

    Some(SmaIndicator { value, period })
}

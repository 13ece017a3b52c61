//! Moving-average primitives over plain price slices.

/// Simple moving average of the last `period` values.
///
/// Returns `None` when fewer than `period` values are available.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Smoothing factor `2 / (period + 1)` used by the EMA.
pub fn ema_multiplier(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Advance an EMA by one sample.
///
/// Equivalent to `price * k + previous * (1 - k)`; written in the
/// incremental form so a flat series stays exactly flat.
pub fn ema_from_previous(price: f64, previous: f64, period: usize) -> f64 {
    previous + ema_multiplier(period) * (price - previous)
}

/// Exponential moving average seeded with the SMA of the first `period` values.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period).and_then(|series| series.last().copied())
}

/// Every EMA value from the seed onward.
///
/// The first element is the seed (SMA of `values[..period]`), followed by one
/// value per remaining sample.
pub fn ema_series(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(seed);

    let mut current = seed;
    for &price in &values[period..] {
        current = ema_from_previous(price, current, period);
        series.push(current);
    }

    Some(series)
}

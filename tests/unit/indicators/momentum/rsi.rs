//! Unit tests for RSI indicator

use signalscope::indicators::momentum::{calculate_rsi, calculate_rsi_default};

#[test]
fn test_rsi_insufficient_data() {
    let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
    assert!(calculate_rsi_default(&prices).is_none());
}

#[test]
fn test_rsi_minimum_length() {
    let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
    let rsi = calculate_rsi_default(&prices).expect("15 samples are enough");
    assert_eq!(rsi.period, 14);
}

#[test]
fn test_rsi_no_losses_is_100() {
    let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
    assert_eq!(calculate_rsi_default(&prices).map(|r| r.value), Some(100.0));
}

#[test]
fn test_rsi_flat_series_is_100() {
    let prices = vec![250.0; 40];
    assert_eq!(calculate_rsi_default(&prices).map(|r| r.value), Some(100.0));
}

#[test]
fn test_rsi_no_gains_is_0() {
    let prices: Vec<f64> = (0..60).map(|i| 500.0 - i as f64).collect();
    let rsi = calculate_rsi_default(&prices).expect("rsi");
    assert!(rsi.value.abs() < 1e-9);
}

#[test]
fn test_rsi_wilder_smoothing() {
    // deltas +1, -1, +1 with period 2:
    // seed gain 0.5 / loss 0.5, then gain 0.75 / loss 0.25 -> RS 3 -> RSI 75
    let prices = [1.0, 2.0, 1.0, 2.0];
    let rsi = calculate_rsi(&prices, 2).expect("rsi");
    assert!((rsi.value - 75.0).abs() < 1e-9);
}

#[test]
fn test_rsi_stays_in_range() {
    let prices: Vec<f64> = (0..300)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 15.0 + (i % 7) as f64)
        .collect();

    for end in 15..prices.len() {
        let rsi = calculate_rsi_default(&prices[..end]).expect("rsi");
        assert!(
            (0.0..=100.0).contains(&rsi.value),
            "RSI out of range: {}",
            rsi.value
        );
    }
}

//! Unit tests for the moving-average primitives

use signalscope::common::math::{ema, ema_from_previous, ema_multiplier, ema_series, sma};

#[test]
fn test_sma_uses_last_period_values() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(sma(&values, 3), Some(4.0));
    assert_eq!(sma(&values, 5), Some(3.0));
}

#[test]
fn test_sma_insufficient_data() {
    assert_eq!(sma(&[1.0, 2.0], 3), None);
    assert_eq!(sma(&[], 1), None);
    assert_eq!(sma(&[1.0], 0), None);
}

#[test]
fn test_ema_multiplier() {
    assert!((ema_multiplier(12) - 2.0 / 13.0).abs() < 1e-15);
    assert!((ema_multiplier(1) - 1.0).abs() < 1e-15);
}

#[test]
fn test_ema_seeded_with_sma() {
    // seed = 2, k = 0.5 -> 3 -> 4
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(ema(&values, 3), Some(4.0));
    assert_eq!(ema_series(&values, 3), Some(vec![2.0, 3.0, 4.0]));
}

#[test]
fn test_ema_exact_length_returns_seed() {
    let values = [2.0, 4.0, 6.0];
    assert_eq!(ema(&values, 3), Some(4.0));
}

#[test]
fn test_ema_insufficient_data() {
    assert_eq!(ema(&[1.0, 2.0], 3), None);
    assert_eq!(ema_series(&[1.0, 2.0], 3), None);
}

#[test]
fn test_ema_from_previous_matches_weighted_form() {
    let k = ema_multiplier(10);
    let expected = 105.0 * k + 100.0 * (1.0 - k);
    assert!((ema_from_previous(105.0, 100.0, 10) - expected).abs() < 1e-12);
}

#[test]
fn test_ema_flat_series_stays_flat() {
    let values = vec![42.0; 100];
    assert_eq!(ema(&values, 26), Some(42.0));
}

//! Unit tests for signal engine

use signalscope::indicators::momentum::MacdSignalLine;
use signalscope::models::price::{PriceSeries, Timeframe};
use signalscope::models::signal::TechnicalSignal;
use signalscope::signals::engine::{SignalEngine, MIN_SAMPLES};

fn rising(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + i as f64).collect()
}

#[test]
fn test_evaluate_empty_series_is_all_null() {
    let signal = SignalEngine::default().evaluate(&[], Timeframe::OneHour);
    assert_eq!(signal, TechnicalSignal::empty(Timeframe::OneHour));
}

#[test]
fn test_evaluate_below_rsi_minimum_is_all_null() {
    let signal = SignalEngine::default().evaluate(&rising(14), Timeframe::OneHour);
    assert!(signal.is_empty());
}

#[test]
fn test_evaluate_short_series_attaches_oscillators_only() {
    let signal = SignalEngine::default().evaluate(&rising(30), Timeframe::OneHour);
    assert!(signal.rsi.is_some());
    assert!(signal.macd.is_some());
    assert!(signal.ma50.is_none());
    assert!(signal.ma200.is_none());
    assert!(signal.signal.is_none());
    assert!(signal.strength.is_none());
}

#[test]
fn test_evaluate_gate_at_min_samples() {
    let engine = SignalEngine::default();

    let below = engine.evaluate(&rising(MIN_SAMPLES - 1), Timeframe::OneHour);
    assert!(below.signal.is_none());
    assert!(below.ma50.is_none());

    let at = engine.evaluate(&rising(MIN_SAMPLES), Timeframe::OneHour);
    assert!(at.signal.is_some());
    assert!(at.ma50.is_some());
    assert!(at.ma200.is_some());
    assert!(at.rsi.is_some());
    assert!(at.macd.is_some());
}

#[test]
fn test_analyze_resamples_before_evaluating() {
    let hourly = PriceSeries::new(rising(240));
    let engine = SignalEngine::default();

    let one_hour = engine.analyze(&hourly, Timeframe::OneHour);
    assert_eq!(one_hour.timeframe, Timeframe::OneHour);
    assert!(one_hour.signal.is_some());

    // 240 hourly samples leave 60 after resampling, under the gate
    let four_hours = engine.analyze(&hourly, Timeframe::FourHours);
    assert_eq!(four_hours.timeframe, Timeframe::FourHours);
    assert!(four_hours.signal.is_none());
    assert!(four_hours.ma200.is_none());
    assert_eq!(four_hours.rsi, Some(100.0));
}

#[test]
fn test_engine_signal_line_is_configurable() {
    let engine = SignalEngine::new(MacdSignalLine::Ema { period: 9 });
    assert_eq!(engine.signal_line(), MacdSignalLine::Ema { period: 9 });

    let signal = engine.evaluate(&rising(240), Timeframe::OneHour);
    let macd = signal.macd.expect("macd");
    assert!((macd.signal - macd.value * 0.8).abs() > 1e-6);
}

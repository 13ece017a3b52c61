//! Unit tests for the engine entry point

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use signalscope::core::analyzer::TechnicalAnalyzer;
use signalscope::metrics::Metrics;
use signalscope::models::price::{PricePoint, Timeframe};
use signalscope::models::signal::{SignalDirection, SignalStrength, TechnicalSignal};
use signalscope::services::market_data::{PriceHistoryProvider, ProviderError, StaticPriceProvider};

fn hourly_points(prices: impl IntoIterator<Item = f64>) -> Vec<PricePoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    prices
        .into_iter()
        .enumerate()
        .map(|(i, price)| PricePoint::new(start + Duration::hours(i as i64), price))
        .collect()
}

/// Records every request and answers with a fixed result.
struct RecordingProvider {
    requests: Mutex<Vec<(String, u32)>>,
    response: Result<Vec<PricePoint>, ProviderError>,
}

impl RecordingProvider {
    fn new(response: Result<Vec<PricePoint>, ProviderError>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            response,
        }
    }

    fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceHistoryProvider for RecordingProvider {
    async fn get_historical_prices(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        self.requests.lock().unwrap().push((asset_id.to_string(), days));
        self.response.clone()
    }
}

#[tokio::test]
async fn test_compute_signal_rising_market() {
    let provider = Arc::new(StaticPriceProvider::new(hourly_points(
        (0..240).map(|i| 100.0 + i as f64),
    )));
    let analyzer = TechnicalAnalyzer::new(provider);

    let signal = analyzer.compute_signal("bitcoin", Timeframe::OneHour).await;

    assert_eq!(signal.signal, Some(SignalDirection::Buy));
    assert_eq!(signal.strength, Some(SignalStrength::Weak));
    assert_eq!(signal.timeframe, Timeframe::OneHour);
}

#[tokio::test]
async fn test_compute_signal_requests_lookback_for_timeframe() {
    let provider = Arc::new(RecordingProvider::new(Ok(hourly_points(vec![1.0; 10]))));
    let analyzer = TechnicalAnalyzer::new(provider.clone());

    analyzer.compute_signal("bitcoin", Timeframe::OneHour).await;
    analyzer.compute_signal("ethereum", Timeframe::FourHours).await;

    assert_eq!(
        provider.requests(),
        vec![("bitcoin".to_string(), 10), ("ethereum".to_string(), 40)]
    );
}

#[tokio::test]
async fn test_compute_signal_provider_failure_is_empty() {
    let provider = Arc::new(RecordingProvider::new(Err(ProviderError::RateLimited)));
    let metrics = Arc::new(Metrics::new().unwrap());
    let analyzer = TechnicalAnalyzer::new(provider).with_metrics(metrics.clone());

    let signal = analyzer.compute_signal("bitcoin", Timeframe::FourHours).await;

    assert_eq!(signal, TechnicalSignal::empty(Timeframe::FourHours));
    assert_eq!(metrics.price_failures_total.get(), 1);
}

#[tokio::test]
async fn test_compute_signal_blank_asset_skips_provider() {
    let provider = Arc::new(RecordingProvider::new(Ok(Vec::new())));
    let analyzer = TechnicalAnalyzer::new(provider.clone());

    let signal = analyzer.compute_signal("  ", Timeframe::OneHour).await;

    assert!(signal.is_empty());
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_compute_signal_records_direction_metric() {
    let provider = Arc::new(StaticPriceProvider::new(hourly_points(vec![100.0; 240])));
    let metrics = Arc::new(Metrics::new().unwrap());
    let analyzer = TechnicalAnalyzer::new(provider).with_metrics(metrics.clone());

    let signal = analyzer.compute_signal("tether", Timeframe::OneHour).await;

    assert_eq!(signal.signal, Some(SignalDirection::Sell));
    assert_eq!(
        metrics
            .signals_computed_total
            .with_label_values(&["SELL"])
            .get(),
        1
    );
}

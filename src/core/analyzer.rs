//! Engine entry point: acquire prices for an asset and compute its signal.

use std::sync::Arc;

use tracing::{info, warn};

use crate::metrics::Metrics;
use crate::models::price::{PriceSeries, Timeframe};
use crate::models::signal::TechnicalSignal;
use crate::services::market_data::{fetch_price_history, PriceHistoryProvider};
use crate::signals::engine::SignalEngine;

pub struct TechnicalAnalyzer {
    provider: Arc<dyn PriceHistoryProvider>,
    engine: SignalEngine,
    metrics: Option<Arc<Metrics>>,
}

impl TechnicalAnalyzer {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
        Self {
            provider,
            engine: SignalEngine::default(),
            metrics: None,
        }
    }

    pub fn with_engine(mut self, engine: SignalEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Compute the composite signal for `asset_id`.
    ///
    /// Never fails: provider errors and short histories produce a result with
    /// null fields instead.
    pub async fn compute_signal(&self, asset_id: &str, timeframe: Timeframe) -> TechnicalSignal {
        let asset_id = asset_id.trim();
        if asset_id.is_empty() {
            warn!("No asset id given for technical analysis");
            return TechnicalSignal::empty(timeframe);
        }

        let days = timeframe.lookback_days();
        let points = fetch_price_history(self.provider.as_ref(), asset_id, days).await;
        if points.is_empty() {
            if let Some(metrics) = &self.metrics {
                metrics.price_failures_total.inc();
            }
            warn!(asset_id = %asset_id, days = days, "No price history, returning empty signal");
            return TechnicalSignal::empty(timeframe);
        }

        let series = PriceSeries::from_points(&points);
        let signal = self.engine.analyze(&series, timeframe);

        info!(
            asset_id = %asset_id,
            timeframe = %timeframe,
            samples = series.len(),
            direction = ?signal.signal,
            strength = ?signal.strength,
            "Technical signal computed"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_signal(&signal);
        }

        signal
    }
}

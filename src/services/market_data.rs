//! Price-history provider interface consumed by the engine.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::price::PricePoint;

/// Why an acquisition attempt failed. Only [`ProviderError::RateLimited`] is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("upstream rate limit exceeded")]
    RateLimited,
    #[error("upstream returned HTTP {status}")]
    Http { status: u16 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited)
    }
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Hourly prices for `asset_id` over the last `days` days, oldest first.
    async fn get_historical_prices(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError>;
}

#[async_trait]
impl<P> PriceHistoryProvider for Arc<P>
where
    P: PriceHistoryProvider + ?Sized,
{
    async fn get_historical_prices(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        (**self).get_historical_prices(asset_id, days).await
    }
}

/// Fetch prices, degrading any failure to an empty series.
pub async fn fetch_price_history<P>(provider: &P, asset_id: &str, days: u32) -> Vec<PricePoint>
where
    P: PriceHistoryProvider + ?Sized,
{
    match provider.get_historical_prices(asset_id, days).await {
        Ok(points) => points,
        Err(e) => {
            warn!(asset_id = %asset_id, days = days, error = %e, "Price history unavailable");
            Vec::new()
        }
    }
}

/// Provider serving a fixed series regardless of the requested window.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceProvider {
    points: Vec<PricePoint>,
}

impl StaticPriceProvider {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }
}

#[async_trait]
impl PriceHistoryProvider for StaticPriceProvider {
    async fn get_historical_prices(
        &self,
        _asset_id: &str,
        _days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        Ok(self.points.clone())
    }
}

//! CoinGecko market-chart client with rate-limit aware retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{BackoffBuilder, Retryable};
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::metrics::Metrics;
use crate::models::price::PricePoint;
use crate::services::market_data::{PriceHistoryProvider, ProviderError};

/// Linear backoff: `base_delay * attempt` for attempts `1..=max_retries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearBackoffBuilder {
    base_delay: Duration,
    max_retries: usize,
}

impl LinearBackoffBuilder {
    pub fn new(base_delay: Duration, max_retries: usize) -> Self {
        Self {
            base_delay,
            max_retries,
        }
    }
}

impl BackoffBuilder for LinearBackoffBuilder {
    type Backoff = LinearBackoff;

    fn build(self) -> Self::Backoff {
        LinearBackoff {
            base_delay: self.base_delay,
            max_retries: self.max_retries,
            attempt: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base_delay: Duration,
    max_retries: usize,
    attempt: usize,
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        self.attempt += 1;
        Some(self.base_delay.saturating_mul(self.attempt as u32))
    }
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Option<Vec<(f64, f64)>>,
}

pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
    backoff: LinearBackoffBuilder,
    metrics: Option<Arc<Metrics>>,
}

impl CoinGeckoClient {
    /// Build a client with the retry and timeout settings from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self::with_client(config.coingecko_base_url.clone(), client)
            .with_retry(config.retry_base_delay, config.max_retries))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            backoff: LinearBackoffBuilder::new(
                Duration::from_millis(crate::config::DEFAULT_RETRY_BASE_DELAY_MS),
                crate::config::DEFAULT_MAX_RETRIES,
            ),
            metrics: None,
        }
    }

    pub fn with_retry(mut self, base_delay: Duration, max_retries: usize) -> Self {
        self.backoff = LinearBackoffBuilder::new(base_delay, max_retries);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn fetch_once(&self, asset_id: &str, days: u32) -> Result<Vec<PricePoint>, ProviderError> {
        if let Some(metrics) = &self.metrics {
            metrics.price_requests_total.inc();
        }

        let url = format!("{}/coins/{}/market_chart", self.base_url, asset_id);
        let days = days.to_string();
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "hourly"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(metrics) = &self.metrics {
                metrics.price_rate_limited_total.inc();
            }
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        parse_market_chart(&body)
    }
}

/// Decode a `market_chart` body into points, keeping upstream order.
///
/// A body without a `prices` array is an empty series, not an error.
pub fn parse_market_chart(body: &[u8]) -> Result<Vec<PricePoint>, ProviderError> {
    let chart: MarketChartResponse =
        serde_json::from_slice(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let points: Vec<PricePoint> = chart
        .prices
        .unwrap_or_default()
        .into_iter()
        .map(|(timestamp_ms, price)| {
            DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)
                .map(|timestamp| PricePoint::new(timestamp, price))
                .ok_or_else(|| {
                    ProviderError::Malformed(format!("timestamp out of range: {}", timestamp_ms))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if points.windows(2).any(|pair| pair[1].timestamp < pair[0].timestamp) {
        warn!(count = points.len(), "market_chart prices are not in ascending order");
    }
    Ok(points)
}

#[async_trait]
impl PriceHistoryProvider for CoinGeckoClient {
    async fn get_historical_prices(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let points = (|| self.fetch_once(asset_id, days))
            .retry(self.backoff)
            .sleep(tokio::time::sleep)
            .when(ProviderError::is_rate_limited)
            .notify(|err: &ProviderError, delay: Duration| {
                warn!(
                    asset_id = %asset_id,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "Price history rate limited, retrying"
                );
            })
            .await?;

        debug!(asset_id = %asset_id, days = days, count = points.len(), "Fetched price history");
        Ok(points)
    }
}

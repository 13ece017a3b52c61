//! TTL cache in front of a price-history provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::price::PricePoint;
use crate::services::market_data::{PriceHistoryProvider, ProviderError};

/// Width of the time bucket folded into the cache key.
pub const CACHE_BUCKET_SECS: i64 = 300;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub asset_id: String,
    pub days: u32,
    pub bucket: i64,
}

impl CacheKey {
    pub fn new(asset_id: &str, days: u32, now: DateTime<Utc>) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            days,
            bucket: now.timestamp().div_euclid(CACHE_BUCKET_SECS),
        }
    }
}

struct CacheEntry {
    points: Vec<PricePoint>,
    stored_at: Instant,
}

/// Caches successful, non-empty responses keyed by asset, window and
/// five-minute bucket. Entries also expire after `ttl`.
pub struct CachedPriceProvider<P> {
    inner: P,
    ttl: Duration,
    clock: Clock,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl<P: PriceHistoryProvider> CachedPriceProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            clock: Arc::new(Utc::now),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the wall clock used for bucketing.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl<P: PriceHistoryProvider> PriceHistoryProvider for CachedPriceProvider<P> {
    async fn get_historical_prices(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        let key = CacheKey::new(asset_id, days, (self.clock)());

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.stored_at.elapsed() < self.ttl {
                    debug!(asset_id = %asset_id, days = days, "Price history cache hit");
                    return Ok(entry.points.clone());
                }
            }
        }

        let points = self.inner.get_historical_prices(asset_id, days).await?;
        if points.is_empty() {
            return Ok(points);
        }

        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|cached_key, entry| {
            cached_key.bucket == key.bucket && entry.stored_at.elapsed() < ttl
        });
        entries.insert(
            key,
            CacheEntry {
                points: points.clone(),
                stored_at: Instant::now(),
            },
        );

        Ok(points)
    }
}

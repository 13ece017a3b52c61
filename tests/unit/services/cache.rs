//! Unit tests for the price-history cache

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use signalscope::models::price::PricePoint;
use signalscope::services::cache::{CacheKey, CachedPriceProvider};
use signalscope::services::market_data::{PriceHistoryProvider, ProviderError};

#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
    fail: bool,
    empty: bool,
}

#[async_trait]
impl PriceHistoryProvider for CountingProvider {
    async fn get_historical_prices(
        &self,
        _asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Http { status: 503 });
        }
        if self.empty {
            return Ok(Vec::new());
        }
        Ok(vec![PricePoint::new(Utc::now(), days as f64)])
    }
}

fn fixed_clock(seconds: Arc<AtomicI64>) -> impl Fn() -> DateTime<Utc> + Send + Sync + 'static {
    move || Utc.timestamp_opt(seconds.load(Ordering::SeqCst), 0).unwrap()
}

#[test]
fn test_cache_key_buckets_by_five_minutes() {
    let at = |secs| Utc.timestamp_opt(secs, 0).unwrap();
    assert_eq!(CacheKey::new("btc", 10, at(0)), CacheKey::new("btc", 10, at(299)));
    assert_ne!(CacheKey::new("btc", 10, at(299)), CacheKey::new("btc", 10, at(300)));
    assert_ne!(CacheKey::new("btc", 10, at(0)), CacheKey::new("btc", 40, at(0)));
}

#[tokio::test]
async fn test_cache_hit_skips_inner_provider() {
    let inner = Arc::new(CountingProvider::default());
    let cache = CachedPriceProvider::new(inner.clone(), Duration::from_secs(300))
        .with_clock(fixed_clock(Arc::new(AtomicI64::new(1_700_000_000))));

    let first = cache.get_historical_prices("bitcoin", 10).await.unwrap();
    let second = cache.get_historical_prices("bitcoin", 10).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_cache_separates_assets_and_windows() {
    let inner = Arc::new(CountingProvider::default());
    let cache = CachedPriceProvider::new(inner.clone(), Duration::from_secs(300))
        .with_clock(fixed_clock(Arc::new(AtomicI64::new(1_700_000_000))));

    cache.get_historical_prices("bitcoin", 10).await.unwrap();
    cache.get_historical_prices("bitcoin", 40).await.unwrap();
    cache.get_historical_prices("ethereum", 10).await.unwrap();

    assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_cache_new_bucket_refetches() {
    let seconds = Arc::new(AtomicI64::new(1_700_000_000));
    let inner = Arc::new(CountingProvider::default());
    let cache = CachedPriceProvider::new(inner.clone(), Duration::from_secs(3600))
        .with_clock(fixed_clock(seconds.clone()));

    cache.get_historical_prices("bitcoin", 10).await.unwrap();
    seconds.fetch_add(300, Ordering::SeqCst);
    cache.get_historical_prices("bitcoin", 10).await.unwrap();

    assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    // the stale bucket is evicted on insert
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_cache_entry_expires_after_ttl() {
    let inner = Arc::new(CountingProvider::default());
    let cache = CachedPriceProvider::new(inner.clone(), Duration::from_millis(20))
        .with_clock(fixed_clock(Arc::new(AtomicI64::new(1_700_000_000))));

    cache.get_historical_prices("bitcoin", 10).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    cache.get_historical_prices("bitcoin", 10).await.unwrap();

    assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_does_not_store_failures_or_empty_series() {
    let failing = Arc::new(CountingProvider {
        fail: true,
        ..Default::default()
    });
    let cache = CachedPriceProvider::new(failing.clone(), Duration::from_secs(300));
    assert!(cache.get_historical_prices("bitcoin", 10).await.is_err());
    assert!(cache.get_historical_prices("bitcoin", 10).await.is_err());
    assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty().await);

    let empty = Arc::new(CountingProvider {
        empty: true,
        ..Default::default()
    });
    let cache = CachedPriceProvider::new(empty.clone(), Duration::from_secs(300));
    assert!(cache.get_historical_prices("bitcoin", 10).await.unwrap().is_empty());
    assert!(cache.get_historical_prices("bitcoin", 10).await.unwrap().is_empty());
    assert_eq!(empty.calls.load(Ordering::SeqCst), 2);
}

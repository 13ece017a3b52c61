//! Acquisition layer: price history and block-indexed logs.

pub mod cache;
pub mod coingecko;
pub mod logs;
pub mod market_data;

pub use cache::CachedPriceProvider;
pub use coingecko::CoinGeckoClient;
pub use market_data::{fetch_price_history, PriceHistoryProvider, ProviderError, StaticPriceProvider};

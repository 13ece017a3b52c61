//! Compute a technical signal for one asset and print it as JSON.
//!
//! Usage: signalscope <asset_id> [1h|4h]

use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use signalscope::config::EngineConfig;
use signalscope::logging;
use signalscope::services::{CachedPriceProvider, CoinGeckoClient, PriceHistoryProvider};
use signalscope::{SignalEngine, TechnicalAnalyzer, Timeframe};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let mut args = env::args().skip(1);
    let asset_id = args
        .next()
        .ok_or("usage: signalscope <asset_id> [1h|4h]")?;
    let timeframe = match args.next() {
        Some(raw) => raw.parse::<Timeframe>()?,
        None => Timeframe::default(),
    };

    let config = EngineConfig::from_env()?;
    info!(environment = %config.environment, asset_id = %asset_id, timeframe = %timeframe, "Starting analysis");

    let client = CoinGeckoClient::from_config(&config)?;
    let provider: Arc<dyn PriceHistoryProvider> =
        Arc::new(CachedPriceProvider::new(client, config.cache_ttl));
    let analyzer = TechnicalAnalyzer::new(provider)
        .with_engine(SignalEngine::new(config.macd_signal_line));

    let signal = analyzer.compute_signal(&asset_id, timeframe).await;
    println!("{}", serde_json::to_string_pretty(&signal)?);

    Ok(())
}

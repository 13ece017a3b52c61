//! Signalscope API Server
//!
//! HTTP API exposing technical signals, recent logs, health and metrics.
//! The service is stateless apart from the price cache and can be
//! horizontally scaled.

use dotenvy::dotenv;
use signalscope::config::EngineConfig;
use signalscope::core::http::start_server;
use signalscope::logging;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = EngineConfig::from_env()?;
    logging::init_logging_for(&config.environment);

    info!("Starting Signalscope API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    if config.rpc_url.is_none() {
        info!("RPC_URL not set, /api/logs will answer 503");
    }

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        result = start_server(config) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server stopped");
                return Err(e);
            }
        }
    }

    info!("API server stopped");
    Ok(())
}

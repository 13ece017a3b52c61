//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::EngineConfig;
use crate::core::analyzer::TechnicalAnalyzer;
use crate::metrics::Metrics;
use crate::models::price::Timeframe;
use crate::models::signal::TechnicalSignal;
use crate::services::cache::CachedPriceProvider;
use crate::services::coingecko::CoinGeckoClient;
use crate::services::logs::{JsonRpcLogSource, LogFilter, LogRecord, WindowOptions, WindowedLogReader};
use crate::services::market_data::PriceHistoryProvider;
use crate::signals::engine::SignalEngine;

type ApiError = (StatusCode, Json<Value>);

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub analyzer: Arc<TechnicalAnalyzer>,
    pub log_reader: Option<Arc<WindowedLogReader>>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "signalscope"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

#[derive(Debug, Deserialize)]
struct SignalQuery {
    timeframe: Option<String>,
}

/// Compute the technical signal for an asset
async fn get_signal(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
    Query(params): Query<SignalQuery>,
) -> Result<Json<TechnicalSignal>, ApiError> {
    let timeframe = match params.timeframe.as_deref() {
        Some(raw) => raw
            .parse::<Timeframe>()
            .map_err(|e| bad_request(e.to_string()))?,
        None => Timeframe::default(),
    };

    Ok(Json(state.analyzer.compute_signal(&asset_id, timeframe).await))
}

#[derive(Debug, Deserialize)]
struct LogQuery {
    address: Option<String>,
    topic0: Option<String>,
    to_block: Option<u64>,
    chunk_size: Option<u64>,
    limit: Option<usize>,
    max_chunks: Option<usize>,
}

/// Most recent logs for an address, walked backward in block windows
async fn get_recent_logs(
    State(state): State<AppState>,
    Query(params): Query<LogQuery>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let reader = state.log_reader.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "no log source configured" })),
        )
    })?;

    let mut filter = LogFilter {
        address: params.address,
        topics: Vec::new(),
    };
    if let Some(raw) = params.topic0 {
        // comma-separated values match any of them
        let alternatives: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        filter = match alternatives.len() {
            0 => filter.with_topic(None),
            1 => filter.with_topic(alternatives.into_iter().next()),
            _ => filter.with_any_topic(alternatives),
        };
    }

    // callers may narrow the walk but never widen it past the configured bounds
    let defaults = reader.defaults();
    let options = WindowOptions {
        to_block: params.to_block.or(defaults.to_block),
        chunk_size: params
            .chunk_size
            .map_or(defaults.chunk_size, |size| size.min(defaults.chunk_size)),
        limit: params.limit.unwrap_or(defaults.limit),
        max_chunks: params
            .max_chunks
            .map_or(defaults.max_chunks, |chunks| chunks.min(defaults.max_chunks)),
    };

    Ok(Json(reader.fetch_recent(&filter, options).await))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals/{asset_id}", get(get_signal))
        .route("/api/logs", get(get_recent_logs))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire the price provider, analyzer and optional log reader from `config`
pub fn build_state(config: &EngineConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);

    let client = CoinGeckoClient::from_config(config)?.with_metrics(metrics.clone());
    let provider: Arc<dyn PriceHistoryProvider> = if config.cache_ttl > Duration::ZERO {
        Arc::new(CachedPriceProvider::new(client, config.cache_ttl))
    } else {
        Arc::new(client)
    };

    let analyzer = TechnicalAnalyzer::new(provider)
        .with_engine(SignalEngine::new(config.macd_signal_line))
        .with_metrics(metrics.clone());

    let log_reader = match &config.rpc_url {
        Some(url) => {
            let client = reqwest::Client::builder()
                .timeout(config.http_timeout)
                .build()?;
            let source = Arc::new(JsonRpcLogSource::with_client(url.clone(), client));
            let defaults = WindowOptions {
                chunk_size: config.log_chunk_size,
                max_chunks: config.log_max_chunks,
                ..WindowOptions::default()
            };
            Some(Arc::new(
                WindowedLogReader::new(source)
                    .with_defaults(defaults)
                    .with_metrics(metrics.clone()),
            ))
        }
        None => None,
    };

    Ok(AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time: Arc::new(Instant::now()),
        analyzer: Arc::new(analyzer),
        log_reader,
    })
}

pub async fn start_server(config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}

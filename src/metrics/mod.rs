//! Prometheus metrics for the engine, the acquisition layer and the HTTP surface.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::models::signal::TechnicalSignal;

pub struct Metrics {
    registry: Registry,
    pub signals_computed_total: IntCounterVec,
    pub price_requests_total: IntCounter,
    pub price_rate_limited_total: IntCounter,
    pub price_failures_total: IntCounter,
    pub log_windows_total: IntCounter,
    pub log_window_failures_total: IntCounter,
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let signals_computed_total = IntCounterVec::new(
            Opts::new("signals_computed_total", "Technical signals computed, by direction"),
            &["direction"],
        )?;
        let price_requests_total = IntCounter::new(
            "price_requests_total",
            "Price history requests sent upstream",
        )?;
        let price_rate_limited_total = IntCounter::new(
            "price_rate_limited_total",
            "Price history responses rejected with a rate limit",
        )?;
        let price_failures_total = IntCounter::new(
            "price_failures_total",
            "Price history acquisitions that degraded to an empty series",
        )?;
        let log_windows_total =
            IntCounter::new("log_windows_total", "Block windows queried for logs")?;
        let log_window_failures_total = IntCounter::new(
            "log_window_failures_total",
            "Block windows skipped after a failed log query",
        )?;
        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;

        registry.register(Box::new(signals_computed_total.clone()))?;
        registry.register(Box::new(price_requests_total.clone()))?;
        registry.register(Box::new(price_rate_limited_total.clone()))?;
        registry.register(Box::new(price_failures_total.clone()))?;
        registry.register(Box::new(log_windows_total.clone()))?;
        registry.register(Box::new(log_window_failures_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            signals_computed_total,
            price_requests_total,
            price_rate_limited_total,
            price_failures_total,
            log_windows_total,
            log_window_failures_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    pub fn record_signal(&self, signal: &TechnicalSignal) {
        let label = signal.signal.map(|d| d.as_str()).unwrap_or("NONE");
        self.signals_computed_total.with_label_values(&[label]).inc();
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

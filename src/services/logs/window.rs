//! Bounded backward pagination over a block-range-limited log source.
//!
//! Windows are walked newest to oldest, one request at a time, because each
//! window's upper bound is the previous window's lower bound minus one.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::metrics::Metrics;

use super::source::{LogFilter, LogRecord, LogSource};

pub const DEFAULT_CHUNK_SIZE: u64 = 2000;
pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_MAX_CHUNKS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    /// Newest block to include; the source's latest block when `None`.
    pub to_block: Option<u64>,
    pub chunk_size: u64,
    pub limit: usize,
    pub max_chunks: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            to_block: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            limit: DEFAULT_LIMIT,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }
}

impl WindowOptions {
    /// Copy with every bound raised to at least one.
    pub fn normalized(self) -> Self {
        Self {
            to_block: self.to_block,
            chunk_size: self.chunk_size.max(1),
            limit: self.limit.max(1),
            max_chunks: self.max_chunks.max(1),
        }
    }
}

/// Collect up to `options.limit` of the most recent matching records.
///
/// Failed windows are skipped without retry. The result is sorted by
/// `(block_number, log_index)` and holds the newest `limit` records.
pub async fn fetch_recent_logs<S>(
    source: &S,
    filter: &LogFilter,
    options: WindowOptions,
) -> Vec<LogRecord>
where
    S: LogSource + ?Sized,
{
    walk(source, filter, options, None).await
}

/// [`fetch_recent_logs`] bound to a source, with defaults and metrics.
pub struct WindowedLogReader {
    source: Arc<dyn LogSource>,
    defaults: WindowOptions,
    metrics: Option<Arc<Metrics>>,
}

impl WindowedLogReader {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            defaults: WindowOptions::default(),
            metrics: None,
        }
    }

    pub fn with_defaults(mut self, defaults: WindowOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn defaults(&self) -> WindowOptions {
        self.defaults
    }

    pub async fn fetch_recent(&self, filter: &LogFilter, options: WindowOptions) -> Vec<LogRecord> {
        walk(self.source.as_ref(), filter, options, self.metrics.as_deref()).await
    }
}

async fn walk<S>(
    source: &S,
    filter: &LogFilter,
    options: WindowOptions,
    metrics: Option<&Metrics>,
) -> Vec<LogRecord>
where
    S: LogSource + ?Sized,
{
    let options = options.normalized();

    let latest = match options.to_block {
        Some(block) => block,
        None => match source.latest_block().await {
            Ok(block) => block,
            Err(e) => {
                warn!(error = %e, "Could not resolve latest block, returning no logs");
                return Vec::new();
            }
        },
    };

    let mut collected: Vec<LogRecord> = Vec::new();
    let mut chunks_tried = 0usize;
    let mut next_to = Some(latest);

    while let Some(to) = next_to {
        if collected.len() >= options.limit || chunks_tried >= options.max_chunks {
            break;
        }

        let from = to.saturating_sub(options.chunk_size - 1);
        if let Some(metrics) = metrics {
            metrics.log_windows_total.inc();
        }

        match source.get_logs(filter, from, to).await {
            Ok(logs) => {
                debug!(from_block = from, to_block = to, count = logs.len(), "Log window fetched");
                collected.extend(logs);
            }
            Err(e) => {
                if let Some(metrics) = metrics {
                    metrics.log_window_failures_total.inc();
                }
                warn!(from_block = from, to_block = to, error = %e, "Log window failed, skipping");
            }
        }

        chunks_tried += 1;
        next_to = from.checked_sub(1);
    }

    collected.sort_by_key(LogRecord::position);
    let excess = collected.len().saturating_sub(options.limit);
    collected.drain(..excess);

    debug!(
        windows = chunks_tried,
        returned = collected.len(),
        "Windowed log walk finished"
    );
    collected
}

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LogSourceError {
    #[error("log source returned HTTP {status}")]
    Http { status: u16 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Filter for one topic position: an exact value or any of several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicFilter {
    Exact(String),
    AnyOf(Vec<String>),
}

impl TopicFilter {
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            TopicFilter::Exact(expected) => expected.eq_ignore_ascii_case(topic),
            TopicFilter::AnyOf(options) => options.iter().any(|o| o.eq_ignore_ascii_case(topic)),
        }
    }
}

/// Address and positional topic filter. `None` positions match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<Option<TopicFilter>>,
}

impl LogFilter {
    pub fn for_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            topics: Vec::new(),
        }
    }

    pub fn with_topic(mut self, topic: Option<String>) -> Self {
        self.topics.push(topic.map(TopicFilter::Exact));
        self
    }

    pub fn with_any_topic(mut self, topics: Vec<String>) -> Self {
        self.topics.push(Some(TopicFilter::AnyOf(topics)));
        self
    }

    /// Whether `record` passes the filter, compared the way a node does.
    pub fn matches(&self, record: &LogRecord) -> bool {
        let address_ok = self
            .address
            .as_ref()
            .map_or(true, |a| a.eq_ignore_ascii_case(&record.address));

        address_ok
            && self.topics.iter().enumerate().all(|(i, position)| match position {
                None => true,
                Some(filter) => record.topics.get(i).is_some_and(|t| filter.matches(t)),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub block_number: u64,
    pub log_index: u64,
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub transaction_hash: Option<String>,
}

impl LogRecord {
    /// Position of the record in chain order.
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

#[async_trait]
pub trait LogSource: Send + Sync {
    async fn latest_block(&self) -> Result<u64, LogSourceError>;

    /// Records matching `filter` in the inclusive block range `[from_block, to_block]`.
    async fn get_logs(
        &self,
        filter: &LogFilter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogRecord>, LogSourceError>;
}

#[async_trait]
impl<S> LogSource for Arc<S>
where
    S: LogSource + ?Sized,
{
    async fn latest_block(&self) -> Result<u64, LogSourceError> {
        (**self).latest_block().await
    }

    async fn get_logs(
        &self,
        filter: &LogFilter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogRecord>, LogSourceError> {
        (**self).get_logs(filter, from_block, to_block).await
    }
}

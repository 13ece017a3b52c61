//! Ethereum JSON-RPC log source over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::source::{LogFilter, LogRecord, LogSource, LogSourceError};

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLog {
    block_number: Option<String>,
    log_index: Option<String>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    data: String,
    transaction_hash: Option<String>,
}

pub struct JsonRpcLogSource {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcLogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<T>(&self, method: &str, params: Value) -> Result<T, LogSourceError>
    where
        T: DeserializeOwned + Send,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LogSourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LogSourceError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LogSourceError::Transport(e.to_string()))?;
        let parsed: RpcResponse<T> =
            serde_json::from_slice(&body).map_err(|e| LogSourceError::Malformed(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(LogSourceError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| LogSourceError::Malformed(format!("{} returned no result", method)))
    }
}

fn to_hex(block: u64) -> String {
    format!("0x{:x}", block)
}

pub fn parse_hex_u64(raw: &str) -> Result<u64, LogSourceError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| LogSourceError::Malformed(format!("invalid quantity '{}': {}", raw, e)))
}

fn filter_params(filter: &LogFilter, from_block: u64, to_block: u64) -> Value {
    let mut params = Map::new();
    if let Some(address) = &filter.address {
        params.insert("address".to_string(), json!(address));
    }
    if !filter.topics.is_empty() {
        params.insert("topics".to_string(), json!(filter.topics));
    }
    params.insert("fromBlock".to_string(), json!(to_hex(from_block)));
    params.insert("toBlock".to_string(), json!(to_hex(to_block)));
    json!([Value::Object(params)])
}

impl TryFrom<RawLog> for LogRecord {
    type Error = LogSourceError;

    fn try_from(raw: RawLog) -> Result<Self, Self::Error> {
        let block_number = raw
            .block_number
            .as_deref()
            .ok_or_else(|| LogSourceError::Malformed("log without blockNumber".to_string()))
            .and_then(parse_hex_u64)?;
        let log_index = raw
            .log_index
            .as_deref()
            .ok_or_else(|| LogSourceError::Malformed("log without logIndex".to_string()))
            .and_then(parse_hex_u64)?;

        Ok(LogRecord {
            block_number,
            log_index,
            address: raw.address,
            topics: raw.topics,
            data: raw.data,
            transaction_hash: raw.transaction_hash,
        })
    }
}

#[async_trait]
impl LogSource for JsonRpcLogSource {
    async fn latest_block(&self) -> Result<u64, LogSourceError> {
        let raw: String = self.call("eth_blockNumber", json!([])).await?;
        parse_hex_u64(&raw)
    }

    async fn get_logs(
        &self,
        filter: &LogFilter,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<LogRecord>, LogSourceError> {
        let raw: Vec<RawLog> = self
            .call("eth_getLogs", filter_params(filter, from_block, to_block))
            .await?;

        let total = raw.len();
        // pending logs carry no position and cannot be ordered
        let records: Vec<LogRecord> = raw
            .into_iter()
            .filter_map(|log| LogRecord::try_from(log).ok())
            .collect();

        debug!(
            from_block = from_block,
            to_block = to_block,
            received = total,
            kept = records.len(),
            "Fetched log window"
        );
        Ok(records)
    }
}

//! Environment-driven configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binaries through `dotenvy`.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::indicators::momentum::MacdSignalLine;

pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 2000;
pub const DEFAULT_MAX_RETRIES: usize = 2;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_LOG_CHUNK_SIZE: u64 = 2000;
pub const DEFAULT_LOG_MAX_CHUNKS: usize = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Deployment environment name, `sandbox` unless `ENVIRONMENT` says otherwise.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn is_production(environment: &str) -> bool {
    matches!(environment, "production" | "prod")
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub environment: String,
    pub port: u16,
    pub coingecko_base_url: String,
    pub retry_base_delay: Duration,
    pub max_retries: usize,
    pub http_timeout: Duration,
    /// Zero disables the price cache.
    pub cache_ttl: Duration,
    pub macd_signal_line: MacdSignalLine,
    pub rpc_url: Option<String>,
    pub log_chunk_size: u64,
    pub log_max_chunks: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: DEFAULT_PORT,
            coingecko_base_url: DEFAULT_COINGECKO_BASE_URL.to_string(),
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            macd_signal_line: MacdSignalLine::Approximate,
            rpc_url: None,
            log_chunk_size: DEFAULT_LOG_CHUNK_SIZE,
            log_max_chunks: DEFAULT_LOG_MAX_CHUNKS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            coingecko_base_url: get("COINGECKO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.coingecko_base_url),
            retry_base_delay: Duration::from_millis(parse_or(
                get("PRICE_RETRY_BASE_DELAY_MS"),
                "PRICE_RETRY_BASE_DELAY_MS",
                DEFAULT_RETRY_BASE_DELAY_MS,
            )?),
            max_retries: parse_or(get("PRICE_MAX_RETRIES"), "PRICE_MAX_RETRIES", defaults.max_retries)?,
            http_timeout: Duration::from_secs(parse_or(
                get("HTTP_TIMEOUT_SECS"),
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            cache_ttl: Duration::from_secs(parse_or(
                get("PRICE_CACHE_TTL_SECS"),
                "PRICE_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
            macd_signal_line: match get("MACD_SIGNAL_MODE") {
                Some(value) => value.parse().map_err(|reason| ConfigError::InvalidValue {
                    key: "MACD_SIGNAL_MODE",
                    value,
                    reason,
                })?,
                None => defaults.macd_signal_line,
            },
            rpc_url: get("RPC_URL"),
            log_chunk_size: parse_or(get("LOG_CHUNK_SIZE"), "LOG_CHUNK_SIZE", defaults.log_chunk_size)?,
            log_max_chunks: parse_or(get("LOG_MAX_CHUNKS"), "LOG_MAX_CHUNKS", defaults.log_max_chunks)?,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

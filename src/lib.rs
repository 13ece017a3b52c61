//! Technical-indicator signal engine.
//!
//! Hourly price history goes in; SMA50/SMA200, RSI14 and MACD(12,26) are
//! derived and reduced by majority vote into a single BUY/SELL signal with a
//! STRONG/WEAK grade. Acquisition (price history, windowed log retrieval)
//! degrades to empty results instead of failing.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use crate::core::analyzer::TechnicalAnalyzer;
pub use models::{SignalDirection, SignalStrength, TechnicalSignal, Timeframe};
pub use signals::engine::SignalEngine;

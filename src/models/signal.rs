//! The composite signal contract read by the presentation layer.

use serde::{Deserialize, Serialize};

use super::indicators::MacdIndicator;
use super::price::Timeframe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }
}

/// How many of the three indicator votes back the final direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalStrength {
    /// All three votes agree.
    Strong,
    /// Exactly two votes agree.
    Weak,
}

/// Result of one engine invocation.
///
/// Every field is always serialized; absent values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignal {
    pub signal: Option<SignalDirection>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdIndicator>,
    pub timeframe: Timeframe,
    pub strength: Option<SignalStrength>,
}

impl TechnicalSignal {
    /// The all-null result returned whenever nothing could be computed.
    pub fn empty(timeframe: Timeframe) -> Self {
        Self {
            signal: None,
            ma50: None,
            ma200: None,
            rsi: None,
            macd: None,
            timeframe,
            strength: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_none()
            && self.ma50.is_none()
            && self.ma200.is_none()
            && self.rsi.is_none()
            && self.macd.is_none()
            && self.strength.is_none()
    }
}

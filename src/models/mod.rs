//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod price;
pub mod signal;

pub use indicators::{MacdIndicator, RsiIndicator, SmaIndicator};
pub use price::{PricePoint, PriceSeries, Timeframe, TimeframeParseError};
pub use signal::{SignalDirection, SignalStrength, TechnicalSignal};

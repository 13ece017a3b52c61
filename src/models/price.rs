//! Price samples, series and the resampling timeframe.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Samples the engine needs after resampling: 200 for SMA200 plus headroom.
pub const LOOKBACK_SAMPLES: u32 = 240;

const HOURS_PER_DAY: u32 = 24;

/// A single hourly price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Resampling cadence applied to the hourly series before indicators run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "4h")]
    FourHours,
}

impl Timeframe {
    /// Number of hourly samples folded into one resampled sample.
    pub fn stride(self) -> usize {
        match self {
            Timeframe::OneHour => 1,
            Timeframe::FourHours => 4,
        }
    }

    /// Days of hourly history to request so that resampling still leaves
    /// [`LOOKBACK_SAMPLES`] samples.
    pub fn lookback_days(self) -> u32 {
        let hours = LOOKBACK_SAMPLES * self.stride() as u32;
        hours.div_ceil(HOURS_PER_DAY)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported timeframe '{0}', expected 1h or 4h")]
pub struct TimeframeParseError(pub String);

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1h" => Ok(Timeframe::OneHour),
            "4h" => Ok(Timeframe::FourHours),
            other => Err(TimeframeParseError(other.to_string())),
        }
    }
}

/// Chronologically ordered prices, oldest first.
///
/// Gaps in the source are not filled; they only shorten the series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    pub fn from_points(points: &[PricePoint]) -> Self {
        Self::new(points.iter().map(|p| p.price).collect())
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    /// Keep every `stride`-th sample starting from the oldest one.
    ///
    /// An input of `n` samples yields `ceil(n / stride)` samples.
    pub fn resample(&self, timeframe: Timeframe) -> PriceSeries {
        match timeframe {
            Timeframe::OneHour => self.clone(),
            Timeframe::FourHours => PriceSeries::new(
                self.prices
                    .iter()
                    .step_by(timeframe.stride())
                    .copied()
                    .collect(),
            ),
        }
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self::new(prices)
    }
}

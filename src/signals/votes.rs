//! Directional votes and the majority rule that combines them.

use crate::models::signal::{SignalDirection, SignalStrength};

/// RSI below this is oversold and votes BUY.
pub const RSI_OVERSOLD: f64 = 30.0;
/// RSI above this is overbought and votes SELL.
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// Agreeing votes needed to override the moving-average baseline.
const MAJORITY: usize = 2;
/// Agreeing votes for a STRONG grade.
const UNANIMOUS: usize = 3;

/// One indicator's opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
    Buy,
    Sell,
    Abstain,
}

impl Vote {
    /// Crossover vote. Never abstains: equal averages vote SELL.
    pub fn from_moving_averages(ma50: f64, ma200: f64) -> Self {
        Self::from(crossover_direction(ma50, ma200))
    }

    pub fn from_rsi(rsi: Option<f64>) -> Self {
        match rsi {
            Some(value) if value < RSI_OVERSOLD => Vote::Buy,
            Some(value) if value > RSI_OVERBOUGHT => Vote::Sell,
            _ => Vote::Abstain,
        }
    }

    /// A histogram of exactly zero abstains.
    pub fn from_macd_histogram(histogram: Option<f64>) -> Self {
        match histogram {
            Some(value) if value > 0.0 => Vote::Buy,
            Some(value) if value < 0.0 => Vote::Sell,
            _ => Vote::Abstain,
        }
    }

    pub fn direction(self) -> Option<SignalDirection> {
        match self {
            Vote::Buy => Some(SignalDirection::Buy),
            Vote::Sell => Some(SignalDirection::Sell),
            Vote::Abstain => None,
        }
    }
}

impl From<SignalDirection> for Vote {
    fn from(direction: SignalDirection) -> Self {
        match direction {
            SignalDirection::Buy => Vote::Buy,
            SignalDirection::Sell => Vote::Sell,
        }
    }
}

/// Count of BUY and SELL votes; abstentions count for neither side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub buy: usize,
    pub sell: usize,
}

impl VoteTally {
    pub fn from_votes(votes: &[Vote]) -> Self {
        votes.iter().fold(Self::default(), |mut tally, vote| {
            match vote {
                Vote::Buy => tally.buy += 1,
                Vote::Sell => tally.sell += 1,
                Vote::Abstain => {}
            }
            tally
        })
    }

    /// Reduce the tally to a direction and grade.
    ///
    /// A side with at least two votes wins. Otherwise `baseline` stands and no
    /// strength is assigned. With three voters at most one side can reach two.
    pub fn resolve(&self, baseline: SignalDirection) -> (SignalDirection, Option<SignalStrength>) {
        if self.buy >= MAJORITY {
            (SignalDirection::Buy, Self::grade(self.buy))
        } else if self.sell >= MAJORITY {
            (SignalDirection::Sell, Self::grade(self.sell))
        } else {
            (baseline, None)
        }
    }

    fn grade(count: usize) -> Option<SignalStrength> {
        if count >= UNANIMOUS {
            Some(SignalStrength::Strong)
        } else if count >= MAJORITY {
            Some(SignalStrength::Weak)
        } else {
            None
        }
    }
}

fn crossover_direction(ma50: f64, ma200: f64) -> SignalDirection {
    if ma50 > ma200 {
        SignalDirection::Buy
    } else {
        SignalDirection::Sell
    }
}

/// Combine the moving-average, RSI and MACD votes.
///
/// The moving-average vote is both a voter and the fallback direction.
pub fn compose_signal(
    ma50: f64,
    ma200: f64,
    rsi: Option<f64>,
    macd_histogram: Option<f64>,
) -> (SignalDirection, Option<SignalStrength>) {
    let baseline = crossover_direction(ma50, ma200);
    let votes = [
        Vote::from(baseline),
        Vote::from_rsi(rsi),
        Vote::from_macd_histogram(macd_histogram),
    ];

    VoteTally::from_votes(&votes).resolve(baseline)
}

//! Signal: a classified buy/sell opportunity produced fresh each step.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSide {
    Buy,
    Sell,
}

/// Structural pattern class, ordered by increasing reliance on
/// trend/momentum confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternClass {
    First,
    Second,
    Third,
}

impl PatternClass {
    pub const ALL: [PatternClass; 3] = [Self::First, Self::Second, Self::Third];
}

impl fmt::Display for PatternClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        };
        f.write_str(s)
    }
}

/// A signal is a value: it is consumed within the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub side: SignalSide,
    pub pattern: PatternClass,
    /// Structural price level the signal is anchored on (pivot or stroke edge).
    pub reference_level: f64,
}

impl Signal {
    pub fn new(side: SignalSide, pattern: PatternClass, reference_level: f64) -> Self {
        Self {
            side,
            pattern,
            reference_level,
        }
    }

    pub fn buy(pattern: PatternClass, reference_level: f64) -> Self {
        Self::new(SignalSide::Buy, pattern, reference_level)
    }

    pub fn sell(pattern: PatternClass, reference_level: f64) -> Self {
        Self::new(SignalSide::Sell, pattern, reference_level)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            SignalSide::Buy => "buy",
            SignalSide::Sell => "sell",
        };
        write!(f, "{}-type {side} @ {:.4}", self.pattern, self.reference_level)
    }
}

//! Position: an open trade owned by the ledger, created and closed by the
//! execution engine.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::{PatternClass, SignalSide};

/// Ledger-assigned position identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionId(pub u64);

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Long,
    Short,
}

impl From<SignalSide> for PositionSide {
    fn from(side: SignalSide) -> Self {
        match side {
            SignalSide::Buy => Self::Long,
            SignalSide::Sell => Self::Short,
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => f.write_str("long"),
            Self::Short => f.write_str("short"),
        }
    }
}

/// An open position.
///
/// Stop-loss obeys the ratchet invariant: it may tighten (towards price) but
/// never loosen. `take_profit_trigger` holds the favourable-move ratio at
/// which the stop moves to break-even; it is consumed when that happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub side: PositionSide,
    pub entry_price: f64,
    pub size: f64,
    pub entry_time: NaiveDateTime,
    pub pattern: PatternClass,
    pub stop_loss: f64,
    pub take_profit_trigger: Option<f64>,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Profit that closing at `exit_price` would realize.
    pub fn realized_profit(&self, exit_price: f64) -> f64 {
        match self.side {
            PositionSide::Long => (exit_price - self.entry_price) * self.size,
            PositionSide::Short => (self.entry_price - exit_price) * self.size,
        }
    }

    /// Favourable move from entry as a fraction of the entry price.
    pub fn profit_ratio(&self, price: f64) -> f64 {
        if self.entry_price <= 0.0 {
            return 0.0;
        }
        match self.side {
            PositionSide::Long => (price - self.entry_price) / self.entry_price,
            PositionSide::Short => (self.entry_price - price) / self.entry_price,
        }
    }

    /// True once `price` has reached or crossed the stop-loss.
    pub fn stop_crossed(&self, price: f64) -> bool {
        match self.side {
            PositionSide::Long => price <= self.stop_loss,
            PositionSide::Short => price >= self.stop_loss,
        }
    }

    /// Move the stop to `candidate` if that tightens it. Returns whether the stop moved.
    pub fn tighten_stop(&mut self, candidate: f64) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        let tighter = match self.side {
            PositionSide::Long => candidate > self.stop_loss,
            PositionSide::Short => candidate < self.stop_loss,
        };
        if tighter {
            self.stop_loss = candidate;
        }
        tighter
    }

    /// Trail the stop `distance` behind `price`.
    pub fn trail_stop(&mut self, price: f64, distance: f64) -> bool {
        let candidate = match self.side {
            PositionSide::Long => price - distance,
            PositionSide::Short => price + distance,
        };
        self.tighten_stop(candidate)
    }

    /// Move the stop to break-even once the profit ratio reaches the trigger.
    ///
    /// Fires at most once per position: the trigger is consumed on first use,
    /// so later calls are no-ops. Returns whether the trigger fired.
    pub fn apply_breakeven(&mut self, price: f64) -> bool {
        let Some(trigger) = self.take_profit_trigger else {
            return false;
        };
        if self.profit_ratio(price) < trigger {
            return false;
        }
        self.tighten_stop(self.entry_price);
        self.take_profit_trigger = None;
        true
    }
}

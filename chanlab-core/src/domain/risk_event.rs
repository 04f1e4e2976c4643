//! Risk events: signals the execution engine declined to act on.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bar_time;
use super::signal::Signal;

/// The gate that dropped a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskEventKind {
    /// Account drawdown at or beyond the configured limit.
    DrawdownLimit,
    /// Too many consecutive losing trades.
    LossStreak,
    /// Not enough candles to measure volatility.
    VolatilityUnavailable,
    /// A position on the same side is already open.
    SideOccupied,
    /// Capital is exhausted, so no position can be sized.
    InsufficientCapital,
    /// Stop-loss would sit on or beyond the entry price.
    InvalidStop,
}

impl fmt::Display for RiskEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DrawdownLimit => "drawdown limit",
            Self::LossStreak => "consecutive loss limit",
            Self::VolatilityUnavailable => "volatility unavailable",
            Self::SideOccupied => "side already occupied",
            Self::InsufficientCapital => "insufficient capital",
            Self::InvalidStop => "invalid stop distance",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEvent {
    #[serde(with = "bar_time::serde_format")]
    pub time: NaiveDateTime,
    pub kind: RiskEventKind,
    pub signal: Signal,
}

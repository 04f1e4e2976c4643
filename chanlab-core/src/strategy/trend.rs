//! Trend gate: coarse directional bias from the higher timeframe.
//!
//! Up requires three agreeing pieces of evidence: the latest stroke points up,
//! the MACD histogram is positive, and the close has broken above one of the
//! two most recent pivots. Down mirrors it. Anything else is neutral.
//!
//! The gate is a pure function of the current view. It is evaluated after
//! every higher-timeframe step and never carries a previous result forward.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::feed::FeedView;

/// Directional bias of the higher timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendState {
    Up,
    Down,
    #[default]
    Neutral,
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Neutral => f.write_str("neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendGate;

impl TrendGate {
    /// Strokes required before any bias is reported.
    pub const MIN_STROKES: usize = 3;
    /// Number of most recent pivots a breakout may be measured against.
    pub const PIVOT_LOOKBACK: usize = 2;

    pub fn evaluate(&self, view: &FeedView<'_>) -> TrendState {
        let strokes = view.strokes();
        if strokes.len() < Self::MIN_STROKES {
            return TrendState::Neutral;
        }
        let (Some(last), Some(sample), Some(close)) =
            (strokes.last(), view.latest_indicator(), view.latest_close())
        else {
            return TrendState::Neutral;
        };
        let pivots = view.recent_pivots(Self::PIVOT_LOOKBACK);

        if last.is_up() && sample.histogram > 0.0 && pivots.iter().any(|p| close > p.high) {
            TrendState::Up
        } else if last.is_down() && sample.histogram < 0.0 && pivots.iter().any(|p| close < p.low)
        {
            TrendState::Down
        } else {
            TrendState::Neutral
        }
    }
}

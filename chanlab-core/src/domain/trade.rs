//! TradeRecord: one closed position in the append-only trade history.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bar_time;
use super::position::{PositionId, PositionSide};
use super::signal::PatternClass;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Price crossed the (possibly trailed) stop-loss.
    StopLoss,
    /// A top fractal formed against a long, or a bottom fractal against a short.
    ReversalFractal,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopLoss => f.write_str("stop loss"),
            Self::ReversalFractal => f.write_str("reversal fractal exit"),
        }
    }
}

/// Trade type as logged: the order that closed the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    /// Sell that closed a long.
    Sell,
    /// Buy that closed a short.
    Buy,
}

impl From<PositionSide> for TradeKind {
    fn from(side: PositionSide) -> Self {
        match side {
            PositionSide::Long => Self::Sell,
            PositionSide::Short => Self::Buy,
        }
    }
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sell => f.write_str("sell"),
            Self::Buy => f.write_str("buy"),
        }
    }
}

/// A closed position: written exactly once, at close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Identification ──
    pub position_id: PositionId,
    pub kind: TradeKind,
    pub side: PositionSide,
    pub pattern: PatternClass,

    // ── Entry ──
    #[serde(with = "bar_time::serde_format")]
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit ──
    #[serde(with = "bar_time::serde_format")]
    pub time: NaiveDateTime,
    pub price: f64,
    pub reason: ExitReason,

    // ── Size and result ──
    pub size: f64,
    pub profit: f64,
    /// Ledger capital immediately after this close.
    pub equity_after: f64,
}

impl TradeRecord {
    /// Return on the trade as a fraction of entry notional.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 || self.size == 0.0 {
            return 0.0;
        }
        self.profit / (self.entry_price * self.size)
    }

    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_trade() -> TradeRecord {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        TradeRecord {
            position_id: PositionId(3),
            kind: TradeKind::Sell,
            side: PositionSide::Long,
            pattern: PatternClass::Second,
            entry_time: day.and_hms_opt(10, 0, 0).unwrap(),
            entry_price: 100.0,
            time: day.and_hms_opt(14, 0, 0).unwrap(),
            price: 110.0,
            reason: ExitReason::ReversalFractal,
            size: 50.0,
            profit: 500.0,
            equity_after: 100_500.0,
        }
    }

    #[test]
    fn return_pct_calculation() {
        assert!((sample_trade().return_pct() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn closing_side_maps_to_trade_kind() {
        assert_eq!(TradeKind::from(PositionSide::Long), TradeKind::Sell);
        assert_eq!(TradeKind::from(PositionSide::Short), TradeKind::Buy);
    }

    #[test]
    fn trade_json_keeps_reason_and_time() {
        let json = serde_json::to_string(&sample_trade()).unwrap();
        assert!(json.contains("\"reversal_fractal\""));
        assert!(json.contains("\"2024-01-05 14:00:00\""));
    }
}

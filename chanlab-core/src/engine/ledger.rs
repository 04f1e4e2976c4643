//! Account ledger: capital, open positions and the append-only trade history.
//!
//! Capital is realized equity only: it changes at `close()` and nowhere else,
//! by exactly the realized profit of the closed position. Drawdown is tracked
//! against the running peak of the equity samples fed to `update_drawdown()`,
//! seeded with the initial capital.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::bar_time;
use crate::domain::{
    ExitReason, Position, PositionId, PositionSide, RiskEvent, TradeKind, TradeRecord,
};

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("position {0} is not open")]
    PositionNotOpen(PositionId),

    #[error("cannot open {side} position: {existing} is already open on that side")]
    SideOccupied {
        side: PositionSide,
        existing: PositionId,
    },

    #[error("position {0} already exists")]
    DuplicatePosition(PositionId),

    #[error("invalid exit price {price} for position {id}")]
    InvalidExitPrice { id: PositionId, price: f64 },
}

/// One sample of the realized equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    #[serde(with = "bar_time::serde_format")]
    pub time: NaiveDateTime,
    pub equity: f64,
    /// Drawdown of this sample from the running peak (≤ 0).
    pub drawdown: f64,
}

/// End-of-run account figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub max_drawdown: f64,
    pub consecutive_loss: u32,
    pub trade_count: usize,
    pub open_positions: usize,
    pub risk_events: usize,
}

#[derive(Debug, Clone)]
pub struct AccountLedger {
    initial_capital: f64,
    capital: f64,
    peak: f64,
    drawdown: f64,
    consecutive_loss: u32,
    next_id: u64,
    open_positions: Vec<Position>,
    trade_history: Vec<TradeRecord>,
    equity_curve: Vec<EquityPoint>,
    risk_events: Vec<RiskEvent>,
}

impl AccountLedger {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            capital: initial_capital,
            peak: initial_capital,
            drawdown: 0.0,
            consecutive_loss: 0,
            next_id: 1,
            open_positions: Vec::new(),
            trade_history: Vec::new(),
            equity_curve: Vec::new(),
            risk_events: Vec::new(),
        }
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    /// Worst peak-to-sample drawdown seen so far (≤ 0).
    pub fn drawdown(&self) -> f64 {
        self.drawdown
    }

    pub fn consecutive_loss(&self) -> u32 {
        self.consecutive_loss
    }

    /// Open positions in the order they were opened.
    pub fn open_positions(&self) -> &[Position] {
        &self.open_positions
    }

    pub fn position(&self, id: PositionId) -> Option<&Position> {
        self.open_positions.iter().find(|p| p.id == id)
    }

    pub(crate) fn position_mut(&mut self, id: PositionId) -> Option<&mut Position> {
        self.open_positions.iter_mut().find(|p| p.id == id)
    }

    pub fn is_side_open(&self, side: PositionSide) -> bool {
        self.open_positions.iter().any(|p| p.side == side)
    }

    pub fn trade_history(&self) -> &[TradeRecord] {
        &self.trade_history
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    pub fn risk_events(&self) -> &[RiskEvent] {
        &self.risk_events
    }

    /// Reserve the identifier for the next position.
    pub fn next_position_id(&mut self) -> PositionId {
        let id = PositionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Store a new position. Capital is untouched and no trade is recorded.
    pub fn open(&mut self, position: Position) -> Result<(), LedgerError> {
        if self.position(position.id).is_some() {
            return Err(LedgerError::DuplicatePosition(position.id));
        }
        if let Some(existing) = self.open_positions.iter().find(|p| p.side == position.side) {
            return Err(LedgerError::SideOccupied {
                side: position.side,
                existing: existing.id,
            });
        }
        info!(
            id = %position.id,
            side = %position.side,
            pattern = %position.pattern,
            entry = position.entry_price,
            size = position.size,
            stop = position.stop_loss,
            "position opened"
        );
        self.open_positions.push(position);
        Ok(())
    }

    /// Close an open position at `exit_price`, returning the realized profit.
    pub fn close(
        &mut self,
        id: PositionId,
        exit_price: f64,
        time: NaiveDateTime,
        reason: ExitReason,
    ) -> Result<f64, LedgerError> {
        let index = self
            .open_positions
            .iter()
            .position(|p| p.id == id)
            .ok_or(LedgerError::PositionNotOpen(id))?;
        if !(exit_price.is_finite() && exit_price > 0.0) {
            return Err(LedgerError::InvalidExitPrice {
                id,
                price: exit_price,
            });
        }

        let position = self.open_positions.remove(index);
        let profit = position.realized_profit(exit_price);
        self.capital += profit;
        if profit < 0.0 {
            self.consecutive_loss += 1;
        } else {
            self.consecutive_loss = 0;
        }

        info!(
            id = %id,
            side = %position.side,
            exit = exit_price,
            profit,
            capital = self.capital,
            %reason,
            "position closed"
        );
        self.trade_history.push(TradeRecord {
            position_id: id,
            kind: TradeKind::from(position.side),
            side: position.side,
            pattern: position.pattern,
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            time,
            price: exit_price,
            reason,
            size: position.size,
            profit,
            equity_after: self.capital,
        });
        Ok(profit)
    }

    /// Fold an equity sample into the running peak and worst drawdown.
    /// Returns the drawdown of this sample.
    pub fn update_drawdown(&mut self, equity: f64) -> f64 {
        if equity > self.peak {
            self.peak = equity;
        }
        let sample = if self.peak > 0.0 {
            (equity - self.peak) / self.peak
        } else {
            0.0
        };
        if sample < self.drawdown {
            self.drawdown = sample;
        }
        sample
    }

    /// Update drawdown with the current capital and append it to the equity curve.
    pub fn record_equity(&mut self, time: NaiveDateTime) {
        let equity = self.capital;
        let drawdown = self.update_drawdown(equity);
        self.equity_curve.push(EquityPoint {
            time,
            equity,
            drawdown,
        });
    }

    pub fn record_risk_event(&mut self, event: RiskEvent) {
        debug!(
            kind = %event.kind,
            signal = %event.signal,
            time = %event.time,
            "signal dropped"
        );
        self.risk_events.push(event);
    }

    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            initial_capital: self.initial_capital,
            final_capital: self.capital,
            max_drawdown: self.drawdown,
            consecutive_loss: self.consecutive_loss,
            trade_count: self.trade_history.len(),
            open_positions: self.open_positions.len(),
            risk_events: self.risk_events.len(),
        }
    }
}

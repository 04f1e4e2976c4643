//! Risk-managed execution: turns signals into positions and manages them.
//!
//! Gates, in order (the first failure drops the signal and records a risk event):
//! 1. Account lockout: drawdown at or past `-max_drawdown`, or the loss streak
//!    at `max_consecutive_losses`.
//! 2. ATR over `atr_period` candles must be computable.
//! 3. No position already open on the signal's side.
//! 4. Capital must be positive to size anything.
//! 5. The stop (reference level ∓ ATR) must sit on the protective side of the
//!    entry, at a positive distance.
//!
//! Sizing risks `risk_per_trade` of capital between entry and stop, capped so
//! the notional never exceeds `max_position_fraction` of capital.

use tracing::{debug, info, warn};

use crate::domain::{
    ExitReason, Position, PositionId, PositionSide, RiskEvent, RiskEventKind, Signal,
};
use crate::feed::FeedView;
use crate::indicators::average_true_range;

use super::ledger::{AccountLedger, LedgerError};
use super::risk::{RiskParamError, RiskParams};

#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    params: RiskParams,
}

impl ExecutionEngine {
    pub fn new(params: RiskParams) -> Result<Self, RiskParamError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &RiskParams {
        &self.params
    }

    /// Account-level reason to refuse every new entry, if any.
    pub fn lockout(&self, ledger: &AccountLedger) -> Option<RiskEventKind> {
        if ledger.drawdown() <= -self.params.max_drawdown {
            Some(RiskEventKind::DrawdownLimit)
        } else if ledger.consecutive_loss() >= self.params.max_consecutive_losses {
            Some(RiskEventKind::LossStreak)
        } else {
            None
        }
    }

    /// Size for a position entered at `entry` with its stop at `stop`.
    ///
    /// `None` when the stop is not strictly on the losing side of the entry or
    /// no positive size results.
    pub fn size_position(
        &self,
        capital: f64,
        side: PositionSide,
        entry: f64,
        stop: f64,
    ) -> Option<f64> {
        let distance = match side {
            PositionSide::Long => entry - stop,
            PositionSide::Short => stop - entry,
        };
        if !(distance.is_finite() && distance > 0.0) || entry <= 0.0 {
            return None;
        }
        let risk_size = capital * self.params.risk_per_trade / distance;
        let notional_cap = capital * self.params.max_position_fraction / entry;
        let size = risk_size.min(notional_cap);
        (size.is_finite() && size > 0.0).then_some(size)
    }

    /// Try to open a position for `signal` at the latest close.
    ///
    /// Returns `Ok(None)` when a gate drops the signal.
    pub fn execute(
        &self,
        signal: &Signal,
        ledger: &mut AccountLedger,
        view: &FeedView<'_>,
    ) -> Result<Option<PositionId>, LedgerError> {
        let Some(candle) = view.latest_candle() else {
            return Ok(None);
        };
        let time = candle.time;
        let entry = candle.close;
        let reject = |ledger: &mut AccountLedger, kind: RiskEventKind| {
            ledger.record_risk_event(RiskEvent {
                time,
                kind,
                signal: *signal,
            });
            Ok::<_, LedgerError>(None)
        };

        if let Some(kind) = self.lockout(ledger) {
            warn!(
                %kind,
                drawdown = ledger.drawdown(),
                consecutive_loss = ledger.consecutive_loss(),
                "entries locked out"
            );
            return reject(ledger, kind);
        }

        let Some(atr) = average_true_range(view.candles(), self.params.atr_period) else {
            return reject(ledger, RiskEventKind::VolatilityUnavailable);
        };

        let side = PositionSide::from(signal.side);
        if ledger.is_side_open(side) {
            return reject(ledger, RiskEventKind::SideOccupied);
        }

        let stop = match side {
            PositionSide::Long => signal.reference_level - atr,
            PositionSide::Short => signal.reference_level + atr,
        };
        let capital = ledger.capital();
        if !(capital.is_finite() && capital > 0.0) {
            return reject(ledger, RiskEventKind::InsufficientCapital);
        }
        let Some(size) = self.size_position(capital, side, entry, stop) else {
            return reject(ledger, RiskEventKind::InvalidStop);
        };

        let id = ledger.next_position_id();
        ledger.open(Position {
            id,
            side,
            entry_price: entry,
            size,
            entry_time: time,
            pattern: signal.pattern,
            stop_loss: stop,
            take_profit_trigger: Some(self.params.breakeven_trigger),
        })?;
        debug!(%id, %signal, atr, "signal executed");
        Ok(Some(id))
    }

    /// Per-step management of every open position: stop-loss exits, ATR
    /// trailing and the one-shot move to break-even.
    ///
    /// Returns the ids closed by their stop this step.
    pub fn manage(
        &self,
        ledger: &mut AccountLedger,
        view: &FeedView<'_>,
    ) -> Result<Vec<PositionId>, LedgerError> {
        let Some(candle) = view.latest_candle() else {
            return Ok(Vec::new());
        };
        let (time, close) = (candle.time, candle.close);
        let trail_distance = average_true_range(view.candles(), self.params.atr_period)
            .map(|atr| atr * self.params.trail_atr_multiple);

        let snapshot: Vec<PositionId> = ledger.open_positions().iter().map(|p| p.id).collect();
        let mut stopped = Vec::new();
        for id in snapshot {
            let crossed = match ledger.position(id) {
                Some(p) => p.stop_crossed(close),
                None => continue,
            };
            if crossed {
                ledger.close(id, close, time, ExitReason::StopLoss)?;
                stopped.push(id);
                continue;
            }

            let Some(position) = ledger.position_mut(id) else {
                continue;
            };
            if let Some(distance) = trail_distance {
                if position.trail_stop(close, distance) {
                    debug!(%id, stop = position.stop_loss, "stop trailed");
                }
            }
            if position.apply_breakeven(close) {
                info!(%id, stop = position.stop_loss, "break-even reached");
            }
        }
        Ok(stopped)
    }
}

//! Strategy orchestrator: the two-phase driver.
//!
//! Phase 1 (trend): replay the higher-timeframe feed to exhaustion,
//! re-evaluating the trend gate after every step; the last value is kept.
//!
//! Phase 2 (execution): per lower-timeframe step, in this order:
//! 1. detect signals against the resolved trend
//! 2. execute each signal through the risk gates
//! 3. manage open positions (stop-loss, trailing, break-even)
//! 4. apply reversal-fractal exits
//! 5. record equity and update drawdown with the current capital
//!
//! The run ends when the execution feed is exhausted. Open positions are left
//! open. A feed or ledger error halts the run; everything the ledger committed
//! before the failure stays readable.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ExitReason, PositionId, Signal};
use crate::feed::{FeedError, StructuralFeed};
use crate::strategy::{ExitMonitor, SignalDetector, TrendGate, TrendState};

use super::execution::ExecutionEngine;
use super::ledger::{AccountLedger, AccountSummary, LedgerError};
use super::risk::{RiskParamError, RiskParams};

/// A structural feed the orchestrator can own.
pub type BoxedFeed = Box<dyn StructuralFeed + Send>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    RiskParams(#[from] RiskParamError),

    #[error("initial capital must be positive and finite, got {0}")]
    InvalidCapital(f64),

    #[error("execution feed advanced without a candle at step {step}")]
    EmptyFrame { step: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Trend,
    Execution,
    Finished,
}

/// What happened during one execution step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: usize,
    pub time: NaiveDateTime,
    pub signals: Vec<Signal>,
    pub opened: Vec<PositionId>,
    pub closed: Vec<(PositionId, ExitReason)>,
}

pub struct Orchestrator {
    trend_feed: BoxedFeed,
    execution_feed: BoxedFeed,
    gate: TrendGate,
    detector: SignalDetector,
    exits: ExitMonitor,
    engine: ExecutionEngine,
    ledger: AccountLedger,
    trend: TrendState,
    phase: Phase,
    trend_steps: usize,
    execution_steps: usize,
}

impl Orchestrator {
    pub fn new(
        trend_feed: BoxedFeed,
        execution_feed: BoxedFeed,
        initial_capital: f64,
        params: RiskParams,
    ) -> Result<Self, EngineError> {
        if !(initial_capital.is_finite() && initial_capital > 0.0) {
            return Err(EngineError::InvalidCapital(initial_capital));
        }
        Ok(Self {
            trend_feed,
            execution_feed,
            gate: TrendGate,
            detector: SignalDetector::new(),
            exits: ExitMonitor,
            engine: ExecutionEngine::new(params)?,
            ledger: AccountLedger::new(initial_capital),
            trend: TrendState::Neutral,
            phase: Phase::Trend,
            trend_steps: 0,
            execution_steps: 0,
        })
    }

    /// Replace the default (all rules) detector.
    pub fn with_detector(mut self, detector: SignalDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> AccountLedger {
        self.ledger
    }

    pub fn trend(&self) -> TrendState {
        self.trend
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn trend_steps(&self) -> usize {
        self.trend_steps
    }

    pub fn execution_steps(&self) -> usize {
        self.execution_steps
    }

    pub fn summary(&self) -> AccountSummary {
        self.ledger.summary()
    }

    /// Run the trend phase to completion and open the execution feed.
    ///
    /// A no-op returning the resolved trend once past the trend phase.
    pub fn resolve_trend(&mut self) -> Result<TrendState, EngineError> {
        if self.phase != Phase::Trend {
            return Ok(self.trend);
        }
        info!(feed = self.trend_feed.name(), "trend phase started");
        if let Err(e) = self.replay_trend() {
            self.trend_feed.close();
            return Err(self.halt(e));
        }
        self.trend_feed.close();
        info!(trend = %self.trend, steps = self.trend_steps, "trend resolved");

        if let Err(e) = self.execution_feed.open() {
            return Err(self.halt(e.into()));
        }
        self.phase = Phase::Execution;
        info!(feed = self.execution_feed.name(), "execution phase started");
        Ok(self.trend)
    }

    fn replay_trend(&mut self) -> Result<(), EngineError> {
        self.trend_feed.open()?;
        while self.trend_feed.advance()? {
            self.trend_steps += 1;
            self.trend = self.gate.evaluate(&self.trend_feed.view());
        }
        Ok(())
    }

    /// Advance one execution step. `Ok(None)` once the run is finished.
    pub fn step(&mut self) -> Result<Option<StepReport>, EngineError> {
        if self.phase == Phase::Trend {
            self.resolve_trend()?;
        }
        if self.phase == Phase::Finished {
            return Ok(None);
        }
        match self.execution_step() {
            Ok(Some(report)) => Ok(Some(report)),
            Ok(None) => {
                self.execution_feed.close();
                self.phase = Phase::Finished;
                let summary = self.ledger.summary();
                info!(
                    steps = self.execution_steps,
                    trades = summary.trade_count,
                    capital = summary.final_capital,
                    max_drawdown = summary.max_drawdown,
                    "run finished"
                );
                Ok(None)
            }
            Err(e) => {
                self.execution_feed.close();
                Err(self.halt(e))
            }
        }
    }

    fn execution_step(&mut self) -> Result<Option<StepReport>, EngineError> {
        if !self.execution_feed.advance()? {
            return Ok(None);
        }
        let step = self.execution_steps;
        self.execution_steps += 1;

        let view = self.execution_feed.view();
        let candle = view.latest_candle().ok_or(EngineError::EmptyFrame { step })?;
        let (time, close) = (candle.time, candle.close);

        let signals = self.detector.detect(&view, self.trend);
        let mut opened = Vec::new();
        for signal in &signals {
            debug!(%signal, %time, "signal detected");
            if let Some(id) = self.engine.execute(signal, &mut self.ledger, &view)? {
                opened.push(id);
            }
        }

        let mut closed: Vec<(PositionId, ExitReason)> = self
            .engine
            .manage(&mut self.ledger, &view)?
            .into_iter()
            .map(|id| (id, ExitReason::StopLoss))
            .collect();

        for (id, reason) in self.exits.check(&view, self.ledger.open_positions()) {
            self.ledger.close(id, close, time, reason)?;
            closed.push((id, reason));
        }

        self.ledger.record_equity(time);

        Ok(Some(StepReport {
            step,
            time,
            signals,
            opened,
            closed,
        }))
    }

    /// Drive both phases to completion.
    pub fn run(&mut self) -> Result<AccountSummary, EngineError> {
        self.resolve_trend()?;
        while self.step()?.is_some() {}
        Ok(self.summary())
    }

    fn halt(&mut self, error: EngineError) -> EngineError {
        warn!(%error, phase = ?self.phase, "run halted");
        self.phase = Phase::Finished;
        error
    }
}

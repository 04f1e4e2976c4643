//! Strategy runner: wires config, feeds, orchestrator and metrics.
//!
//! Two entry points:
//! - `run_strategy()`: takes already-constructed feeds. Used by tests and embedders.
//! - `run_from_tapes()`: opens JSON-lines structure tapes from disk. Used by the CLI.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use chanlab_core::domain::{Position, RiskEvent, TradeRecord};
use chanlab_core::engine::{BoxedFeed, EngineError, EquityPoint, Orchestrator};
use chanlab_core::feed::{FeedError, TapeFeed};

use crate::config::{ConfigError, StrategyConfig};
use crate::metrics::{RunContext, RunSummary};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open tape {path}: {source}")]
    Tape {
        path: String,
        #[source]
        source: FeedError,
    },

    #[error("run failed: {0}")]
    Engine(#[from] EngineError),

    /// The run started and then halted. `partial` holds everything the ledger
    /// committed before the failure.
    #[error("run halted after {} execution steps: {source}", .partial.summary.execution_steps)]
    Halted {
        #[source]
        source: EngineError,
        partial: Box<RunResult>,
    },
}

impl RunError {
    /// Results committed before a halt, if the run got that far.
    pub fn partial(&self) -> Option<&RunResult> {
        match self {
            Self::Halted { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Current schema version for persisted run results.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of a single strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config: StrategyConfig,
    pub summary: RunSummary,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub risk_events: Vec<RiskEvent>,
    /// Positions still open when the execution feed ran out.
    pub open_positions: Vec<Position>,
}

/// Run a validated strategy over the given feeds.
pub fn run_strategy(
    config: &StrategyConfig,
    trend_feed: BoxedFeed,
    execution_feed: BoxedFeed,
) -> Result<RunResult, RunError> {
    config.validate()?;
    let s = &config.strategy;
    info!(
        symbol = %s.symbol,
        trend = %s.trend_timeframe,
        execution = %s.execution_timeframe,
        capital = s.initial_capital,
        "starting run"
    );

    let mut orchestrator = Orchestrator::new(
        trend_feed,
        execution_feed,
        s.initial_capital,
        config.risk.clone(),
    )?;
    let outcome = orchestrator.run();
    let result = collect(config, &orchestrator);
    match outcome {
        Ok(_) => Ok(result),
        Err(source) => {
            warn!(
                trades = result.trades.len(),
                capital = result.summary.final_capital,
                "run halted, keeping partial results"
            );
            Err(RunError::Halted {
                source,
                partial: Box::new(result),
            })
        }
    }
}

fn collect(config: &StrategyConfig, orchestrator: &Orchestrator) -> RunResult {
    let s = &config.strategy;
    let ledger = orchestrator.ledger();
    let context = RunContext {
        symbol: &s.symbol,
        trend_timeframe: s.trend_timeframe,
        execution_timeframe: s.execution_timeframe,
        trend: orchestrator.trend(),
        trend_steps: orchestrator.trend_steps(),
        execution_steps: orchestrator.execution_steps(),
    };
    let summary = RunSummary::compute(&context, &orchestrator.summary(), ledger.trade_history());

    RunResult {
        schema_version: SCHEMA_VERSION,
        config: config.clone(),
        summary,
        trades: ledger.trade_history().to_vec(),
        equity_curve: ledger.equity_curve().to_vec(),
        risk_events: ledger.risk_events().to_vec(),
        open_positions: ledger.open_positions().to_vec(),
    }
}

/// Run a strategy from recorded structure tapes on disk.
pub fn run_from_tapes(
    config: &StrategyConfig,
    trend_tape: &Path,
    execution_tape: &Path,
) -> Result<RunResult, RunError> {
    let open = |path: &Path| {
        TapeFeed::from_path(path).map_err(|source| RunError::Tape {
            path: path.display().to_string(),
            source,
        })
    };
    let trend = open(trend_tape)?;
    let execution = open(execution_tape)?;
    run_strategy(config, Box::new(trend), Box::new(execution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanlab_core::domain::{Candle, IndicatorSample};
    use chanlab_core::feed::{ReplayFeed, TapeFrame};
    use chrono::{Duration, NaiveDate};

    fn config() -> StrategyConfig {
        StrategyConfig::from_toml(
            r#"
[strategy]
symbol = "ETH/USDT"
trend_timeframe = "1w"
execution_timeframe = "1d"
initial_capital = 5000.0
"#,
        )
        .unwrap()
    }

    fn flat(n: i64) -> Vec<TapeFrame> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|d| {
                TapeFrame::new(
                    Candle::new(base + Duration::days(d), 10.0, 10.5, 9.5, 10.0),
                    IndicatorSample::new(0.0, 0.0, 0.0),
                )
            })
            .collect()
    }

    #[test]
    fn quiet_run_produces_flat_summary() {
        let result = run_strategy(
            &config(),
            Box::new(ReplayFeed::new("trend", flat(4))),
            Box::new(ReplayFeed::new("execution", flat(30))),
        )
        .unwrap();
        assert_eq!(result.summary.symbol, "ETH/USDT");
        assert_eq!(result.summary.final_capital, 5000.0);
        assert_eq!(result.summary.execution_steps, 30);
        assert_eq!(result.summary.trend_steps, 4);
        assert_eq!(result.equity_curve.len(), 30);
        assert!(result.trades.is_empty());
    }

    #[test]
    fn missing_tape_is_reported_with_path() {
        let err = run_from_tapes(
            &config(),
            Path::new("/nonexistent/trend.jsonl"),
            Path::new("/nonexistent/exec.jsonl"),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Tape { .. }));
        assert!(err.to_string().contains("trend.jsonl"));
    }
}

//! Run summary metrics: pure functions over the ledger's trade history.

use std::collections::BTreeMap;

use chanlab_core::domain::{PatternClass, Timeframe, TradeRecord};
use chanlab_core::engine::AccountSummary;
use chanlab_core::strategy::TrendState;
use serde::{Deserialize, Serialize};

/// Aggregate figures for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub symbol: String,
    pub trend_timeframe: Timeframe,
    pub execution_timeframe: Timeframe,
    pub trend: TrendState,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub realized_profit: f64,
    /// Closed trades per pattern class ("first", "second", "third").
    pub trades_by_pattern: BTreeMap<String, usize>,
    pub open_positions: usize,
    pub risk_events: usize,
    pub trend_steps: usize,
    pub execution_steps: usize,
}

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(initial: f64, final_capital: f64) -> f64 {
    if initial <= 0.0 {
        return 0.0;
    }
    (final_capital - initial) / initial
}

/// Fraction of closed trades with positive profit.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Gross profits / gross losses.
///
/// Capped at 100.0 when there are winners but no losses.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades
        .iter()
        .filter(|t| t.profit > 0.0)
        .map(|t| t.profit)
        .sum();
    let gross_loss: f64 = trades
        .iter()
        .filter(|t| t.profit < 0.0)
        .map(|t| t.profit.abs())
        .sum();

    if gross_loss < 1e-10 {
        if gross_profit > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (gross_profit / gross_loss).min(100.0)
    }
}

pub fn realized_profit(trades: &[TradeRecord]) -> f64 {
    trades.iter().map(|t| t.profit).sum()
}

/// Closed trades counted per pattern class; every class appears, zero or not.
pub fn trades_by_pattern(trades: &[TradeRecord]) -> BTreeMap<String, usize> {
    PatternClass::ALL
        .iter()
        .map(|class| {
            let count = trades.iter().filter(|t| t.pattern == *class).count();
            (class.to_string(), count)
        })
        .collect()
}

/// Inputs that are not part of the ledger itself.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    pub symbol: &'a str,
    pub trend_timeframe: Timeframe,
    pub execution_timeframe: Timeframe,
    pub trend: TrendState,
    pub trend_steps: usize,
    pub execution_steps: usize,
}

impl RunSummary {
    pub fn compute(
        context: &RunContext<'_>,
        account: &AccountSummary,
        trades: &[TradeRecord],
    ) -> Self {
        Self {
            symbol: context.symbol.to_string(),
            trend_timeframe: context.trend_timeframe,
            execution_timeframe: context.execution_timeframe,
            trend: context.trend,
            initial_capital: account.initial_capital,
            final_capital: account.final_capital,
            total_return: total_return(account.initial_capital, account.final_capital),
            max_drawdown: account.max_drawdown,
            trade_count: trades.len(),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            realized_profit: realized_profit(trades),
            trades_by_pattern: trades_by_pattern(trades),
            open_positions: account.open_positions,
            risk_events: account.risk_events,
            trend_steps: context.trend_steps,
            execution_steps: context.execution_steps,
        }
    }
}

//! ChanLab Core: multi-timeframe, pattern-triggered strategy engine.
//!
//! This crate turns chan-theory structure (strokes, pivots, fractals and a MACD
//! oscillator, computed upstream) into trades under a risk budget:
//! - Domain types (candles, structure, signals, positions, trades, timeframes)
//! - Structural feed boundary with in-memory and JSON-lines replay
//! - Trend gate, first/second/third-type signal rules, reversal-fractal exits
//! - ATR-based sizing, stop placement, trailing and break-even management
//! - Account ledger with drawdown and loss-streak limits
//! - Two-phase orchestrator (resolve trend, then step execution)

pub mod domain;
pub mod engine;
pub mod feed;
pub mod indicators;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain and engine types are Send + Sync, so a
    /// finished run can be handed to another thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::Stroke>();
        require_sync::<domain::Stroke>();
        require_send::<domain::Pivot>();
        require_sync::<domain::Pivot>();
        require_send::<domain::Fractal>();
        require_sync::<domain::Fractal>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::RiskEvent>();
        require_sync::<domain::RiskEvent>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();

        // Engine types
        require_send::<engine::AccountLedger>();
        require_sync::<engine::AccountLedger>();
        require_send::<engine::AccountSummary>();
        require_sync::<engine::AccountSummary>();
        require_send::<engine::ExecutionEngine>();
        require_sync::<engine::ExecutionEngine>();
        require_send::<engine::Orchestrator>();

        // Feed state
        require_send::<feed::StructureState>();
        require_sync::<feed::StructureState>();
        require_send::<feed::ReplayFeed>();
    }
}

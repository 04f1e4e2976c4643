//! ChanLab Runner: strategy run wiring, summary metrics and artifacts.
//!
//! This crate builds on `chanlab-core` to provide:
//! - TOML strategy configuration with validated risk parameters
//! - Run entry points over in-memory feeds or recorded structure tapes
//! - Run summary metrics (return, drawdown, win rate, per-pattern counts)
//! - Artifact export (summary JSON, trades CSV/JSON, equity CSV)

pub mod config;
pub mod metrics;
pub mod reporting;
pub mod runner;

pub use config::{ConfigError, StrategyConfig, StrategySection};
pub use metrics::{RunContext, RunSummary};
pub use reporting::{ArtifactManager, ArtifactPaths};
pub use runner::{run_from_tapes, run_strategy, RunError, RunResult, SCHEMA_VERSION};

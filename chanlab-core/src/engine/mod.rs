//! Engine: risk-managed execution, the account ledger and the two-phase
//! orchestrator that drives them.

pub mod execution;
pub mod ledger;
pub mod orchestrator;
pub mod risk;

pub use execution::ExecutionEngine;
pub use ledger::{AccountLedger, AccountSummary, EquityPoint, LedgerError};
pub use orchestrator::{BoxedFeed, EngineError, Orchestrator, Phase, StepReport};
pub use risk::{RiskParamError, RiskParams};

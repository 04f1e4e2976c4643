//! Strategy layer: trend gate, signal detection and reversal exits.
//!
//! Everything here is a pure function of a [`FeedView`](crate::feed::FeedView);
//! acting on the results is the execution engine's job.

pub mod detector;
pub mod exit;
pub mod trend;

pub use detector::{SignalDetector, SignalRule};
pub use exit::ExitMonitor;
pub use trend::{TrendGate, TrendState};

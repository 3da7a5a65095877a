//! Orchestration: the retry loop wrapped around validation and solving
//!
//! Attempts run strictly one after another. Every recoverable failure
//! (no informative vectors, rank shortfall, verification mismatch) costs one
//! attempt from the budget; everything else aborts the run.

mod config;
mod retry;
mod state;

pub use config::{NoiseConfig, SolverConfig};
pub use retry::{AttemptRecord, Outcome, RetryOrchestrator, RunReport, Verdict};
pub use state::{Phase, State};

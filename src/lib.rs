//! Simon Core: classical post-processing for Simon's problem
//!
//! Recovers a hidden n-bit vector `s` from noisy, redundant measurement
//! vectors `y` that satisfy `y · s = 0 (mod 2)`: GF(2) row reduction and
//! nullspace extraction, measurement validation, and a retry state machine
//! around an external oracle.

pub mod error;
pub mod gf2;
pub mod measurement;
pub mod oracle;
pub mod orchestrator;
pub mod scenario;

pub use error::{Result, SimonError};
pub use gf2::{BitVector, Gf2Matrix, NullspaceSolver, ReductionResult, Solution};
pub use measurement::{BitOrder, Measurement, MeasurementBatch, MeasurementValidator, ValidatedSet};
pub use oracle::{BitFlipNoise, NoiseModel, OracleExecutor, OrthogonalSampler, ScriptedOracle};
pub use orchestrator::{
    AttemptRecord, NoiseConfig, Outcome, Phase, RetryOrchestrator, RunReport, SolverConfig, Verdict,
};

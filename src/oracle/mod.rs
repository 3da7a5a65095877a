//! Oracle collaborators: where measurement batches come from
//!
//! The solver never looks inside these: an executor hands over a batch of
//! observed constraint vectors, and an optional noise model may corrupt it
//! before validation.

mod noise;
mod sampler;
mod scripted;

pub use noise::{BitFlipNoise, NoiseModel};
pub use sampler::OrthogonalSampler;
pub use scripted::ScriptedOracle;

use crate::error::Result;
use crate::measurement::MeasurementBatch;

/// Produces a fresh batch of constraint vectors per invocation
pub trait OracleExecutor {
    fn execute(&mut self, width: usize, hidden: u64, shots: usize) -> Result<MeasurementBatch>;
}

impl<T: OracleExecutor + ?Sized> OracleExecutor for Box<T> {
    fn execute(&mut self, width: usize, hidden: u64, shots: usize) -> Result<MeasurementBatch> {
        (**self).execute(width, hidden, shots)
    }
}

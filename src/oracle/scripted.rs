//! Scripted oracle: replays fixed batches

use crate::error::{Result, SimonError};
use crate::measurement::MeasurementBatch;
use crate::oracle::OracleExecutor;

/// Returns its batches in order; the last one repeats forever
#[derive(Debug, Clone)]
pub struct ScriptedOracle {
    batches: Vec<MeasurementBatch>,
    invocations: usize,
}

impl ScriptedOracle {
    pub fn new(batches: Vec<MeasurementBatch>) -> Self {
        Self {
            batches,
            invocations: 0,
        }
    }

    /// Oracle that always answers with the same batch
    pub fn repeating(batch: MeasurementBatch) -> Self {
        Self::new(vec![batch])
    }

    pub fn invocations(&self) -> usize {
        self.invocations
    }
}

impl OracleExecutor for ScriptedOracle {
    fn execute(&mut self, width: usize, _hidden: u64, _shots: usize) -> Result<MeasurementBatch> {
        let idx = self.invocations.min(self.batches.len().saturating_sub(1));
        let batch = self
            .batches
            .get(idx)
            .cloned()
            .ok_or_else(|| SimonError::Oracle("script has no batches".into()))?;
        self.invocations += 1;
        if batch.width() != width {
            return Err(SimonError::DimensionMismatch {
                left: width,
                right: batch.width(),
            });
        }
        Ok(batch)
    }
}

//! Orthogonal sampler: classical stand-in for an ideal Simon run
//!
//! An ideal run measures each y with y·s = 0 with equal probability, so
//! drawing uniformly from the orthogonal complement of `s` reproduces the
//! observable distribution without any circuit.

use crate::error::Result;
use crate::gf2::BitVector;
use crate::measurement::MeasurementBatch;
use crate::oracle::OracleExecutor;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct OrthogonalSampler {
    rng: StdRng,
}

impl OrthogonalSampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    fn draw(&mut self, width: usize, hidden: &BitVector) -> Result<BitVector> {
        let mask = if width == 64 { u64::MAX } else { (1u64 << width) - 1 };
        // at least half of all vectors qualify, so this terminates quickly
        loop {
            let y = BitVector::from_u64(self.rng.gen::<u64>() & mask, width)?;
            if !y.dot(hidden)? {
                return Ok(y);
            }
        }
    }
}

impl OracleExecutor for OrthogonalSampler {
    fn execute(&mut self, width: usize, hidden: u64, shots: usize) -> Result<MeasurementBatch> {
        let s = BitVector::from_u64(hidden, width)?;
        let mut batch = MeasurementBatch::new(width)?;
        for _ in 0..shots {
            let y = self.draw(width, &s)?;
            batch.record(y, 1)?;
        }
        debug!(
            "Sampled {} shot(s) orthogonal to s={}: {} distinct",
            shots,
            s,
            batch.distinct()
        );
        Ok(batch)
    }
}

//! Measurement noise: seedable single-bit flips

use crate::error::{Result, SimonError};
use crate::measurement::MeasurementBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Corrupts a measurement batch; output is just another untrusted batch
pub trait NoiseModel {
    fn corrupt(&mut self, batch: &MeasurementBatch, flip_probability: f64) -> Result<MeasurementBatch>;
}

/// Flips one uniformly chosen bit of each distinct observed vector with
/// probability p. Collided results merge their counts.
pub struct BitFlipNoise {
    rng: StdRng,
}

impl BitFlipNoise {
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
}

impl NoiseModel for BitFlipNoise {
    fn corrupt(&mut self, batch: &MeasurementBatch, flip_probability: f64) -> Result<MeasurementBatch> {
        if !(0.0..=1.0).contains(&flip_probability) {
            return Err(SimonError::InvalidConfig(format!(
                "flip probability {} outside [0, 1]",
                flip_probability
            )));
        }

        let width = batch.width();
        let mut noisy = MeasurementBatch::new(width)?;
        for m in batch.entries() {
            let vector = if self.rng.gen_bool(flip_probability) {
                m.vector.flip(self.rng.gen_range(0..width))?
            } else {
                m.vector
            };
            noisy.record(vector, m.count)?;
        }
        Ok(noisy)
    }
}

//! Demonstration scenarios
//!
//! The six reference cases: trivial and ideal success, a dependency
//! failure, an uninformative batch, a redundant but successful run, and a
//! noisy hardware run that needs retries.

use crate::error::Result;
use crate::gf2::BitVector;
use crate::measurement::MeasurementBatch;
use crate::oracle::{OracleExecutor, OrthogonalSampler, ScriptedOracle};
use crate::orchestrator::{NoiseConfig, RetryOrchestrator, RunReport, SolverConfig};
use serde::Serialize;

/// Where a scenario's measurements come from
#[derive(Debug, Clone, Serialize)]
pub enum Source {
    /// Fresh samples orthogonal to the hidden vector on every attempt
    Sampled { shots: usize },
    /// The same hand-written batch on every attempt
    Fixed(Vec<&'static str>),
}

/// What a correct implementation is expected to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expectation {
    Recovers,
    Retry,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: u8,
    pub description: &'static str,
    pub width: usize,
    pub hidden: u64,
    pub source: Source,
    pub noise_probability: Option<f64>,
    pub max_attempts: u32,
    pub expectation: Expectation,
}

impl Scenario {
    pub fn hidden_vector(&self) -> Result<BitVector> {
        BitVector::from_u64(self.hidden, self.width)
    }

    pub fn config(&self, seed: u64) -> SolverConfig {
        let shots = match &self.source {
            Source::Sampled { shots } => *shots,
            Source::Fixed(strings) => strings.len(),
        };
        SolverConfig {
            width: self.width,
            shots,
            max_attempts: self.max_attempts,
            noise: self.noise_probability.map(|probability| NoiseConfig {
                probability,
                seed: Some(seed.wrapping_add(self.id as u64)),
            }),
            measurement_limit: None,
        }
    }

    /// Run through the orchestrator, verifying against the hidden vector
    pub fn run(&self, seed: u64) -> Result<RunReport> {
        let oracle: Box<dyn OracleExecutor> = match &self.source {
            Source::Sampled { .. } => Box::new(OrthogonalSampler::seeded(seed)),
            Source::Fixed(strings) => Box::new(ScriptedOracle::repeating(
                MeasurementBatch::from_bitstrings(self.width, strings)?,
            )),
        };
        RetryOrchestrator::new(self.config(seed), oracle, self.hidden)?
            .with_expected(self.hidden_vector()?)?
            .run()
    }
}

pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario {
            id: 1,
            description: "Trivial success",
            width: 4,
            hidden: 0b0000,
            source: Source::Sampled { shots: 1024 },
            noise_probability: None,
            max_attempts: 3,
            expectation: Expectation::Recovers,
        },
        Scenario {
            id: 2,
            description: "Ideal success",
            width: 4,
            hidden: 0b1101,
            source: Source::Sampled { shots: 1024 },
            noise_probability: None,
            max_attempts: 3,
            expectation: Expectation::Recovers,
        },
        Scenario {
            id: 3,
            description: "Failure (dependency)",
            width: 4,
            hidden: 0b1101,
            source: Source::Fixed(vec!["0110", "0110"]),
            noise_probability: None,
            max_attempts: 1,
            expectation: Expectation::Retry,
        },
        Scenario {
            id: 4,
            description: "Failure (uninformative y)",
            width: 4,
            hidden: 0b1101,
            source: Source::Fixed(vec!["0000", "0000", "0000"]),
            noise_probability: None,
            max_attempts: 1,
            expectation: Expectation::Retry,
        },
        Scenario {
            id: 5,
            description: "Realistic success",
            width: 4,
            hidden: 0b1101,
            source: Source::Sampled { shots: 2048 },
            noise_probability: None,
            max_attempts: 3,
            expectation: Expectation::Recovers,
        },
        Scenario {
            id: 6,
            description: "Hardware failure (noisy run)",
            width: 4,
            hidden: 0b1101,
            source: Source::Sampled { shots: 1024 },
            noise_probability: Some(0.4),
            max_attempts: 3,
            expectation: Expectation::Retry,
        },
    ]
}

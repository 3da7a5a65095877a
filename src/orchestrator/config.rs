//! Solver configuration: plain scalars, no environment or file lookup

use crate::error::{Result, SimonError};
use crate::gf2::MAX_WIDTH;
use serde::{Deserialize, Serialize};

/// Simulated hardware noise applied to every collected batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Probability that a distinct observed vector gets one bit flipped
    pub probability: f64,
    /// Seed for the flip RNG; `None` draws from OS entropy
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Problem bit-width n
    pub width: usize,
    /// Oracle shots per attempt
    pub shots: usize,
    /// Maximum number of collect/validate/solve attempts
    pub max_attempts: u32,
    pub noise: Option<NoiseConfig>,
    /// Keep only the first k distinct observations of each batch
    pub measurement_limit: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            width: 4,
            shots: 1024,
            max_attempts: 3,
            noise: None,
            measurement_limit: None,
        }
    }
}

impl SolverConfig {
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.width > MAX_WIDTH {
            return Err(SimonError::InvalidConfig(format!(
                "width {} outside 1..={}",
                self.width, MAX_WIDTH
            )));
        }
        if self.shots == 0 {
            return Err(SimonError::InvalidConfig("shots must be positive".into()));
        }
        if self.max_attempts == 0 {
            return Err(SimonError::InvalidConfig("max_attempts must be positive".into()));
        }
        if let Some(noise) = &self.noise {
            if !(0.0..=1.0).contains(&noise.probability) {
                return Err(SimonError::InvalidConfig(format!(
                    "noise probability {} outside [0, 1]",
                    noise.probability
                )));
            }
        }
        if self.measurement_limit == Some(0) {
            return Err(SimonError::InvalidConfig("measurement_limit must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = vec![
            SolverConfig { width: 0, ..SolverConfig::default() },
            SolverConfig { width: 65, ..SolverConfig::default() },
            SolverConfig { shots: 0, ..SolverConfig::default() },
            SolverConfig { max_attempts: 0, ..SolverConfig::default() },
            SolverConfig { measurement_limit: Some(0), ..SolverConfig::default() },
            SolverConfig {
                noise: Some(NoiseConfig { probability: 1.2, seed: None }),
                ..SolverConfig::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(SimonError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SolverConfig {
            noise: Some(NoiseConfig { probability: 0.4, seed: Some(9) }),
            ..SolverConfig::with_width(5)
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

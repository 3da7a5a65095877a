//! Error taxonomy for the solver, validator and retry loop

use crate::gf2::BitVector;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, SimonError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SimonError {
    /// Operands of differing bit-width were combined
    #[error("dimension mismatch: {left}-bit vs {right}-bit operand")]
    DimensionMismatch { left: usize, right: usize },

    #[error("bit index {index} out of range for width {width}")]
    IndexOutOfRange { index: usize, width: usize },

    #[error("invalid bit width {0} (supported: 1..=64)")]
    InvalidWidth(usize),

    #[error("invalid bit symbol '{0}' (expected '0' or '1')")]
    InvalidSymbol(char),

    #[error("value {value} does not fit in {width} bits")]
    ValueOutOfRange { value: u64, width: usize },

    #[error("all measurements uninformative (y = 0...0)")]
    NoInformativeMeasurements,

    #[error("insufficient independent vectors (rank={rank}, need {needed})")]
    InsufficientIndependentVectors { rank: usize, needed: usize },

    #[error("verification mismatch: recovered s={recovered}, expected s={expected}")]
    VerificationMismatch {
        recovered: BitVector,
        expected: BitVector,
    },

    #[error("attempts exhausted after {attempts} attempt(s); last failure: {last}")]
    AttemptsExhausted {
        attempts: u32,
        last: Box<SimonError>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("oracle failure: {0}")]
    Oracle(String),
}

impl SimonError {
    /// Whether collecting a fresh batch of measurements can change the outcome
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SimonError::NoInformativeMeasurements
                | SimonError::InsufficientIndependentVectors { .. }
                | SimonError::VerificationMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(SimonError::NoInformativeMeasurements.is_recoverable());
        assert!(SimonError::InsufficientIndependentVectors { rank: 1, needed: 3 }.is_recoverable());
        assert!(!SimonError::DimensionMismatch { left: 3, right: 4 }.is_recoverable());
        assert!(!SimonError::Oracle("backend down".into()).is_recoverable());

        let exhausted = SimonError::AttemptsExhausted {
            attempts: 3,
            last: Box::new(SimonError::NoInformativeMeasurements),
        };
        assert!(!exhausted.is_recoverable());
    }

    #[test]
    fn test_messages_carry_detail() {
        let e = SimonError::InsufficientIndependentVectors { rank: 1, needed: 3 };
        assert_eq!(e.to_string(), "insufficient independent vectors (rank=1, need 3)");

        let e = SimonError::AttemptsExhausted {
            attempts: 3,
            last: Box::new(SimonError::NoInformativeMeasurements),
        };
        assert!(e.to_string().contains("after 3 attempt(s)"));
        assert!(e.to_string().contains("uninformative"));
    }
}

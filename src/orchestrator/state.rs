//! Retry state machine states
//!
//! Collecting -> Validating -> Solving -> Verifying -> Success
//! Any recoverable failure goes to Retrying (budget left) or Exhausted.
//! Retrying -> Collecting. Success and Exhausted are terminal.

use crate::error::SimonError;
use crate::gf2::BitVector;
use crate::measurement::{MeasurementBatch, ValidatedSet};
use serde::{Deserialize, Serialize};

/// State names without payload, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Collecting,
    Validating,
    Solving,
    Verifying,
    Retrying,
    Success,
    Exhausted,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Success | Phase::Exhausted)
    }
}

/// A state together with the data the next transition consumes
#[derive(Debug, Clone)]
pub enum State {
    Collecting,
    Validating(MeasurementBatch),
    Solving(ValidatedSet),
    Verifying(BitVector),
    Retrying(SimonError),
    Success(BitVector),
    Exhausted(SimonError),
}

impl State {
    pub fn phase(&self) -> Phase {
        match self {
            State::Collecting => Phase::Collecting,
            State::Validating(_) => Phase::Validating,
            State::Solving(_) => Phase::Solving,
            State::Verifying(_) => Phase::Verifying,
            State::Retrying(_) => Phase::Retrying,
            State::Success(_) => Phase::Success,
            State::Exhausted(_) => Phase::Exhausted,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }
}

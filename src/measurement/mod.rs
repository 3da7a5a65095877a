//! Measurements: raw observed constraint vectors and their validation
//!
//! Every batch is untrusted: it may contain repeats, the uninformative
//! all-zero vector, or bit-flipped corruptions. The validator turns a batch
//! into a cleaned set with enough rank to solve, or says why it cannot.

mod batch;
mod validator;

pub use batch::{BitOrder, Measurement, MeasurementBatch};
pub use validator::{MeasurementValidator, ValidatedSet};

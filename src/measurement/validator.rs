//! Measurement validation: dedup, strip y = 0, check rank >= n-1

use crate::error::{Result, SimonError};
use crate::gf2::{BitVector, Gf2Matrix, ReductionResult};
use crate::measurement::MeasurementBatch;
use log::debug;
use serde::{Deserialize, Serialize};

/// Cleaned measurement set that passed the rank threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSet {
    /// Distinct non-zero vectors in first-observed order
    pub vectors: Vec<BitVector>,
    pub reduction: ReductionResult,
    /// Observations dropped as repeats of an already-seen vector
    pub duplicates_removed: u64,
    /// Observations of the all-zero vector
    pub zeros_removed: u64,
}

impl ValidatedSet {
    pub fn rank(&self) -> usize {
        self.reduction.rank
    }
}

pub struct MeasurementValidator;

impl MeasurementValidator {
    /// Distinct, non-zero vectors of a batch
    pub fn clean(batch: &MeasurementBatch) -> Vec<BitVector> {
        batch.vectors().filter(|v| !v.is_zero()).copied().collect()
    }

    pub fn validate(batch: &MeasurementBatch) -> Result<ValidatedSet> {
        let n = batch.width();
        let needed = n - 1;
        let duplicates_removed = batch.total_shots() - batch.distinct() as u64;
        let zeros_removed = batch
            .entries()
            .iter()
            .filter(|m| m.vector.is_zero())
            .map(|m| m.count)
            .sum();

        let vectors = Self::clean(batch);
        debug!(
            "Validating {} observation(s): {} distinct, {} informative",
            batch.total_shots(),
            batch.distinct(),
            vectors.len()
        );
        if vectors.is_empty() {
            return Err(SimonError::NoInformativeMeasurements);
        }

        let reduction = Gf2Matrix::from_rows(n, vectors.iter().copied())?.reduce()?;
        debug!("Rank {}/{} needed", reduction.rank, needed);
        if reduction.rank < needed {
            return Err(SimonError::InsufficientIndependentVectors {
                rank: reduction.rank,
                needed,
            });
        }

        Ok(ValidatedSet {
            vectors,
            reduction,
            duplicates_removed,
            zeros_removed,
        })
    }

    /// Validate a raw multiset of vectors, one observation each
    pub fn validate_vectors(width: usize, vectors: &[BitVector]) -> Result<ValidatedSet> {
        let mut batch = MeasurementBatch::new(width)?;
        for v in vectors {
            batch.record(*v, 1)?;
        }
        Self::validate(&batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(strings: &[&str]) -> MeasurementBatch {
        MeasurementBatch::from_bitstrings(strings[0].len(), strings).unwrap()
    }

    #[test]
    fn test_dependency_failure() {
        let err = MeasurementValidator::validate(&batch(&["0110", "0110"])).unwrap_err();
        assert_eq!(err, SimonError::InsufficientIndependentVectors { rank: 1, needed: 3 });
    }

    #[test]
    fn test_uninformative_failure() {
        let err = MeasurementValidator::validate(&batch(&["0000", "0000", "0000"])).unwrap_err();
        assert_eq!(err, SimonError::NoInformativeMeasurements);
    }

    #[test]
    fn test_redundant_batch_passes() {
        let set = MeasurementValidator::validate(&batch(&[
            "0000", "0010", "0111", "0010", "1001", "0101", "1011", "0000",
        ]))
        .unwrap();
        assert_eq!(set.rank(), 3);
        assert_eq!(set.duplicates_removed, 2);
        assert_eq!(set.zeros_removed, 2);
        let cleaned: Vec<String> = set.vectors.iter().map(|v| v.to_string()).collect();
        assert_eq!(cleaned, vec!["0010", "0111", "1001", "0101", "1011"]);
    }

    #[test]
    fn test_validate_vectors_dedups_raw_input() {
        let v = |s: &str| BitVector::from_bits(s).unwrap();
        let set = MeasurementValidator::validate_vectors(
            4,
            &[v("0010"), v("0010"), v("0111"), v("1001"), v("0000")],
        )
        .unwrap();
        assert_eq!(set.vectors.len(), 3);
        assert_eq!(set.duplicates_removed, 1);
        assert_eq!(set.zeros_removed, 1);
    }

    #[test]
    fn test_empty_batch_is_uninformative() {
        let empty = MeasurementBatch::new(4).unwrap();
        assert_eq!(
            MeasurementValidator::validate(&empty).unwrap_err(),
            SimonError::NoInformativeMeasurements
        );
    }
}

//! Nullspace extraction by back-substitution
//!
//! Policy: the first free column is forced to 1 and every other free
//! column to 0. When rank == n-1 there is exactly one non-zero nullspace
//! vector and this policy finds it. With more freedom the output is still
//! deterministic but not necessarily the hidden vector, so `solve` reports
//! insufficiency instead.

use crate::error::Result;
use crate::gf2::{BitVector, ReductionResult};
use serde::{Deserialize, Serialize};

/// Outcome of solving `A·s = 0`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Solution {
    /// Unique non-zero nullspace vector
    Found(BitVector),
    /// rank == n: only s = 0 satisfies every constraint
    TrivialOnly,
    /// Fewer than n-1 independent constraints
    Insufficient { rank: usize, needed: usize },
}

impl Solution {
    /// The value this solution stands for; `TrivialOnly` collapses to zero
    pub fn candidate(&self, width: usize) -> Result<Option<BitVector>> {
        match self {
            Solution::Found(s) => Ok(Some(*s)),
            Solution::TrivialOnly => Ok(Some(BitVector::zero(width)?)),
            Solution::Insufficient { .. } => Ok(None),
        }
    }
}

pub struct NullspaceSolver;

impl NullspaceSolver {
    /// Classify the reduction and extract `s` when it is determined
    pub fn solve(reduction: &ReductionResult) -> Result<Solution> {
        let n = reduction.width();
        let needed = n - 1;

        if reduction.rank == n {
            return Ok(Solution::TrivialOnly);
        }
        if reduction.rank < needed {
            return Ok(Solution::Insufficient {
                rank: reduction.rank,
                needed,
            });
        }
        match Self::first_free_vector(reduction)? {
            Some(s) => Ok(Solution::Found(s)),
            None => Ok(Solution::TrivialOnly),
        }
    }

    /// Back-substitute with the first free column set to 1.
    /// Returns `None` when every column has a pivot.
    pub fn first_free_vector(reduction: &ReductionResult) -> Result<Option<BitVector>> {
        let n = reduction.width();
        let Some(&free) = reduction.free_columns().first() else {
            return Ok(None);
        };

        let mut s = BitVector::zero(n)?.with_bit(free, true)?;
        let rows = reduction.reduced_rows.rows();

        for i in (0..reduction.rank).rev() {
            let row = &rows[i];
            let p = reduction.pivot_columns[i];
            let mut rhs = false;
            for j in (p + 1)..n {
                rhs ^= row.bit(j)? & s.bit(j)?;
            }
            s = s.with_bit(p, rhs)?;
        }

        Ok(Some(s))
    }
}

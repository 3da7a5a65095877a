//! GF(2) matrix and forward elimination
//!
//! Rows are BitVectors of a common width n. Reduction scans columns
//! 0..n-1, always picking the topmost eligible row as pivot, so the result
//! depends only on the input order.

use crate::error::{Result, SimonError};
use crate::gf2::BitVector;
use serde::{Deserialize, Serialize};

/// Ordered collection of equal-width rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gf2Matrix {
    width: usize,
    rows: Vec<BitVector>,
}

/// Output of forward elimination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionResult {
    /// Dimension of the row space
    pub rank: usize,
    /// Pivot column of each of the first `rank` rows, strictly increasing
    pub pivot_columns: Vec<usize>,
    /// Rows in row-echelon form; rows past `rank` are zero
    pub reduced_rows: Gf2Matrix,
}

impl Gf2Matrix {
    /// Empty matrix with `width` columns
    pub fn new(width: usize) -> Result<Self> {
        BitVector::zero(width)?;
        Ok(Self {
            width,
            rows: Vec::new(),
        })
    }

    pub fn from_rows(width: usize, rows: impl IntoIterator<Item = BitVector>) -> Result<Self> {
        let mut m = Self::new(width)?;
        for row in rows {
            m.push(row)?;
        }
        Ok(m)
    }

    pub fn push(&mut self, row: BitVector) -> Result<()> {
        if row.width() != self.width {
            return Err(SimonError::DimensionMismatch {
                left: self.width,
                right: row.width(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[BitVector] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Forward elimination to row-echelon form, consuming the working copy
    pub fn reduce(mut self) -> Result<ReductionResult> {
        let n = self.width;
        let r = self.rows.len();
        let mut pivot_row = 0;
        let mut pivot_columns = Vec::new();

        for col in 0..n {
            if pivot_row == r {
                break;
            }
            let mut found = None;
            for row in pivot_row..r {
                if self.rows[row].bit(col)? {
                    found = Some(row);
                    break;
                }
            }
            let Some(pivot) = found else {
                continue;
            };

            self.rows.swap(pivot, pivot_row);
            let pivot_vec = self.rows[pivot_row];
            for row in (pivot_row + 1)..r {
                if self.rows[row].bit(col)? {
                    self.rows[row] = self.rows[row].xor(&pivot_vec)?;
                }
            }
            pivot_columns.push(col);
            pivot_row += 1;
        }

        Ok(ReductionResult {
            rank: pivot_row,
            pivot_columns,
            reduced_rows: self,
        })
    }

    /// Rank of the row space; the matrix itself is left untouched
    pub fn rank(&self) -> Result<usize> {
        Ok(self.clone().reduce()?.rank)
    }

    /// True when every row is orthogonal to `s` over GF(2)
    pub fn annihilates(&self, s: &BitVector) -> Result<bool> {
        for row in &self.rows {
            if row.dot(s)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl ReductionResult {
    pub fn width(&self) -> usize {
        self.reduced_rows.width()
    }

    /// Columns without a pivot, in increasing order
    pub fn free_columns(&self) -> Vec<usize> {
        (0..self.width())
            .filter(|c| !self.pivot_columns.contains(c))
            .collect()
    }

    pub fn nullity(&self) -> usize {
        self.width() - self.rank
    }
}

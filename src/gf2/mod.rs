//! GF(2) linear algebra: bit vectors, row reduction, nullspace extraction
//!
//! Addition is XOR and multiplication is AND. Everything here is pure and
//! deterministic: the same rows in the same order always give the same
//! reduction and the same solution.

mod bitvec;
mod matrix;
mod nullspace;

pub use bitvec::{BitVector, MAX_WIDTH};
pub use matrix::{Gf2Matrix, ReductionResult};
pub use nullspace::{NullspaceSolver, Solution};

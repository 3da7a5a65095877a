//! Fixed-width binary vector over GF(2)
//!
//! Bit 0 is the most significant bit, so `BitVector::from_bits("1101")`
//! and `BitVector::from_u64(0b1101, 4)` are the same vector.

use crate::error::{Result, SimonError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported width (one machine word)
pub const MAX_WIDTH: usize = 64;

/// An immutable n-bit vector, n in 1..=64
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BitVector {
    width: usize,
    bits: u64,
}

impl BitVector {
    /// The all-zero vector of the given width
    pub fn zero(width: usize) -> Result<Self> {
        Self::check_width(width)?;
        Ok(Self { width, bits: 0 })
    }

    /// Build from an integer, most significant bit first
    pub fn from_u64(value: u64, width: usize) -> Result<Self> {
        Self::check_width(width)?;
        if width < MAX_WIDTH && value >> width != 0 {
            return Err(SimonError::ValueOutOfRange { value, width });
        }
        Ok(Self { width, bits: value })
    }

    /// Parse a string of '0'/'1' symbols; the width is the string length
    pub fn from_bits(symbols: &str) -> Result<Self> {
        let width = symbols.chars().count();
        Self::check_width(width)?;
        let mut bits = 0u64;
        for ch in symbols.chars() {
            let bit = match ch {
                '0' => 0,
                '1' => 1,
                other => return Err(SimonError::InvalidSymbol(other)),
            };
            bits = (bits << 1) | bit;
        }
        Ok(Self { width, bits })
    }

    fn check_width(width: usize) -> Result<()> {
        if width == 0 || width > MAX_WIDTH {
            return Err(SimonError::InvalidWidth(width));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn to_u64(&self) -> u64 {
        self.bits
    }

    pub fn is_zero(&self) -> bool {
        self.bits == 0
    }

    /// Read bit `index` (0 = most significant)
    pub fn bit(&self, index: usize) -> Result<bool> {
        if index >= self.width {
            return Err(SimonError::IndexOutOfRange {
                index,
                width: self.width,
            });
        }
        Ok((self.bits >> (self.width - 1 - index)) & 1 == 1)
    }

    /// Copy of this vector with bit `index` set to `value`
    pub fn with_bit(&self, index: usize, value: bool) -> Result<Self> {
        if index >= self.width {
            return Err(SimonError::IndexOutOfRange {
                index,
                width: self.width,
            });
        }
        let mask = 1u64 << (self.width - 1 - index);
        let bits = if value { self.bits | mask } else { self.bits & !mask };
        Ok(Self { width: self.width, bits })
    }

    /// Copy of this vector with bit `index` inverted
    pub fn flip(&self, index: usize) -> Result<Self> {
        let current = self.bit(index)?;
        self.with_bit(index, !current)
    }

    /// GF(2) addition
    pub fn xor(&self, other: &Self) -> Result<Self> {
        self.check_same_width(other)?;
        Ok(Self {
            width: self.width,
            bits: self.bits ^ other.bits,
        })
    }

    /// GF(2) dot product: parity of the AND of both vectors
    pub fn dot(&self, other: &Self) -> Result<bool> {
        self.check_same_width(other)?;
        Ok((self.bits & other.bits).count_ones() % 2 == 1)
    }

    pub fn count_ones(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Bit string with bit 0 first
    pub fn to_bit_string(&self) -> String {
        format!("{:0width$b}", self.bits, width = self.width)
    }

    fn check_same_width(&self, other: &Self) -> Result<()> {
        if self.width != other.width {
            return Err(SimonError::DimensionMismatch {
                left: self.width,
                right: other.width,
            });
        }
        Ok(())
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

impl From<BitVector> for String {
    fn from(v: BitVector) -> Self {
        v.to_bit_string()
    }
}

impl TryFrom<String> for BitVector {
    type Error = SimonError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_bits(&s)
    }
}

impl std::str::FromStr for BitVector {
    type Err = SimonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bits(s)
    }
}

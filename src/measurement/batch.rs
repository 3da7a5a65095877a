//! Measurement batches: the multiset of observed constraint vectors
//!
//! A batch keeps one entry per distinct vector in first-observed order,
//! with the number of times it was sampled.

use crate::error::{Result, SimonError};
use crate::gf2::BitVector;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Character order of raw bitstrings handed over by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitOrder {
    /// First character is bit 0 (most significant)
    MsbFirst,
    /// First character is bit n-1; simulator count maps usually look like this
    LsbFirst,
}

/// A distinct observed vector and how often it was seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub vector: BitVector,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementBatch {
    width: usize,
    entries: Vec<Measurement>,
}

impl MeasurementBatch {
    pub fn new(width: usize) -> Result<Self> {
        BitVector::zero(width)?;
        Ok(Self {
            width,
            entries: Vec::new(),
        })
    }

    /// Build from `(bitstring, count)` pairs, e.g. a backend's count map
    pub fn from_counts<I, S>(width: usize, counts: I, order: BitOrder) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut batch = Self::new(width)?;
        for (raw, count) in counts {
            let raw = raw.as_ref();
            let vector = match order {
                BitOrder::MsbFirst => BitVector::from_bits(raw)?,
                BitOrder::LsbFirst => BitVector::from_bits(&raw.chars().rev().collect::<String>())?,
            };
            batch.record(vector, count)?;
        }
        Ok(batch)
    }

    /// One observation per MSB-first bitstring
    pub fn from_bitstrings(width: usize, strings: &[&str]) -> Result<Self> {
        Self::from_counts(width, strings.iter().map(|s| (*s, 1)), BitOrder::MsbFirst)
    }

    /// Add `count` observations of `vector`, merging with an existing entry
    pub fn record(&mut self, vector: BitVector, count: u64) -> Result<()> {
        if vector.width() != self.width {
            return Err(SimonError::DimensionMismatch {
                left: self.width,
                right: vector.width(),
            });
        }
        if count == 0 {
            return Ok(());
        }
        match self.entries.iter_mut().find(|m| m.vector == vector) {
            Some(existing) => existing.count += count,
            None => self.entries.push(Measurement { vector, count }),
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn entries(&self) -> &[Measurement] {
        &self.entries
    }

    pub fn vectors(&self) -> impl Iterator<Item = &BitVector> {
        self.entries.iter().map(|m| &m.vector)
    }

    /// Number of distinct vectors
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Total number of observations, duplicates included
    pub fn total_shots(&self) -> u64 {
        self.entries.iter().map(|m| m.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the first `limit` distinct observations
    pub fn truncated(&self, limit: usize) -> Self {
        Self {
            width: self.width,
            entries: self.entries.iter().take(limit).copied().collect(),
        }
    }

    /// SHA-256 over the width and every (vector, count) entry, in order
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.width as u64).to_le_bytes());
        for m in &self.entries {
            hasher.update(m.vector.to_u64().to_le_bytes());
            hasher.update(m.count.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

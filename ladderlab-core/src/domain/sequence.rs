//! The immutable outcome stream consumed by every simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DatasetHash, Symbol};
use crate::error::SimError;

/// Ordered outcome stream, materialized once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSequence(Vec<Symbol>);

impl RawSequence {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Content hash of the canonical `B`/`R`/`0` string form.
    ///
    /// Two runs reporting the same hash consumed byte-identical streams.
    pub fn dataset_hash(&self) -> DatasetHash {
        let mut hasher = blake3::Hasher::new();
        let mut buf = [0u8; 4];
        for s in &self.0 {
            hasher.update(s.as_char().encode_utf8(&mut buf).as_bytes());
        }
        DatasetHash::from_hash(&hasher.finalize().to_hex())
    }

    pub fn stats(&self) -> SequenceStats {
        SequenceStats::compute(&self.0)
    }
}

impl From<Vec<Symbol>> for RawSequence {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }
}

impl FromStr for RawSequence {
    type Err = SimError;

    /// Parse a compact `B`/`R`/`0` string. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| {
                Symbol::from_char(c).ok_or_else(|| SimError::InvalidSequence {
                    reason: format!("unexpected character '{c}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for RawSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.0 {
            write!(f, "{}", s.as_char())?;
        }
        Ok(())
    }
}

/// Which color dominates a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tendency {
    Red,
    Black,
    Balanced,
}

/// Composition summary of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStats {
    pub total: usize,
    pub blacks: usize,
    pub reds: usize,
    pub wildcards: usize,
    pub pct_black: f64,
    pub pct_red: f64,
    pub pct_wildcard: f64,
    /// Absolute difference between red and black counts.
    pub red_black_imbalance: usize,
    pub tendency: Tendency,
}

impl SequenceStats {
    pub fn compute(symbols: &[Symbol]) -> Self {
        let mut blacks = 0;
        let mut reds = 0;
        let mut wildcards = 0;
        for s in symbols {
            match s {
                Symbol::Black => blacks += 1,
                Symbol::Red => reds += 1,
                Symbol::Wildcard => wildcards += 1,
            }
        }
        let total = symbols.len();
        let pct = |n: usize| {
            if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            }
        };
        let tendency = match reds.cmp(&blacks) {
            std::cmp::Ordering::Greater => Tendency::Red,
            std::cmp::Ordering::Less => Tendency::Black,
            std::cmp::Ordering::Equal => Tendency::Balanced,
        };
        Self {
            total,
            blacks,
            reds,
            wildcards,
            pct_black: pct(blacks),
            pct_red: pct(reds),
            pct_wildcard: pct(wildcards),
            red_black_imbalance: reds.abs_diff(blacks),
            tendency,
        }
    }
}

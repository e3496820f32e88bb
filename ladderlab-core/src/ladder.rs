//! Staking ladder, a bounded martingale of at most three levels.

use serde::{Deserialize, Serialize};

use crate::domain::Pattern;
use crate::error::SimError;

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Amount staked at this rung.
    pub stake: f64,
    /// Total staked from the first rung through this one.
    pub cumulative_stake: f64,
    /// Net profit of an operation that wins at this rung.
    pub net_profit: f64,
}

/// Number of levels defined. Longer patterns are silently capped here.
pub const MAX_LEVELS: usize = 3;

/// The fixed level catalogue, indexed 1..=3 by rung.
pub const LEVEL_CATALOGUE: [Level; MAX_LEVELS] = [
    Level { stake: 1.00, cumulative_stake: 1.00, net_profit: 1.00 },
    Level { stake: 3.00, cumulative_stake: 4.00, net_profit: 2.00 },
    Level { stake: 7.00, cumulative_stake: 11.00, net_profit: 3.00 },
];

/// `min(3, max(1, floor(len / 2)))`.
pub fn depth_for_pattern_len(len: usize) -> usize {
    (len / 2).max(1).min(MAX_LEVELS)
}

/// Active prefix of the level catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ladder {
    depth: usize,
}

impl Ladder {
    pub fn for_pattern(pattern: &Pattern) -> Self {
        Self {
            depth: depth_for_pattern_len(pattern.len()),
        }
    }

    /// Explicit depth. Zero is rejected; anything above three is capped.
    pub fn with_depth(depth: usize) -> Result<Self, SimError> {
        if depth == 0 {
            return Err(SimError::Configuration(
                "ladder level count must be at least 1".into(),
            ));
        }
        Ok(Self {
            depth: depth.min(MAX_LEVELS),
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn levels(&self) -> &'static [Level] {
        &LEVEL_CATALOGUE[..self.depth]
    }

    /// Total staked by an operation that loses every rung.
    pub fn full_cost(&self) -> f64 {
        self.levels()[self.depth - 1].cumulative_stake
    }
}

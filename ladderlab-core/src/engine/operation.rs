//! Single ladder traversal.
//!
//! States: Running → {Won, Lost, Incomplete}. At each rung, if the window is
//! exhausted the operation is Incomplete; otherwise one symbol is consumed and
//! the rung's stake is added to the investment. Red wins at that rung; Black
//! and Wildcard both lose the rung and move to the next. Falling off the last
//! rung is a loss of everything staked.

use serde::{Deserialize, Serialize};

use crate::domain::Symbol;
use crate::ladder::Ladder;

/// Terminal state of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OperationOutcome {
    /// Won at `level` (1-based) for the rung's net profit.
    Won { level: usize, net_profit: f64 },
    /// Every rung lost; `total_stake` is the full amount staked.
    Lost { total_stake: f64 },
    /// The window ran out mid-ladder.
    Incomplete,
}

impl OperationOutcome {
    /// Won and Lost are completed operations; Incomplete is not.
    pub fn is_completed(&self) -> bool {
        !matches!(self, OperationOutcome::Incomplete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub outcome: OperationOutcome,
    /// Stake placed, including the partial stake of an Incomplete operation.
    pub invested: f64,
    /// Symbols consumed from the window.
    pub consumed: usize,
}

/// Run one operation starting at `cursor` in `window`.
pub fn run_operation(window: &[Symbol], cursor: usize, ladder: &Ladder) -> OperationResult {
    let mut invested = 0.0;
    let mut pos = cursor;

    for (rung, level) in ladder.levels().iter().enumerate() {
        let Some(&symbol) = window.get(pos) else {
            return OperationResult {
                outcome: OperationOutcome::Incomplete,
                invested,
                consumed: pos - cursor,
            };
        };
        pos += 1;
        invested += level.stake;

        if symbol == Symbol::Red {
            return OperationResult {
                outcome: OperationOutcome::Won {
                    level: rung + 1,
                    net_profit: level.net_profit,
                },
                invested,
                consumed: pos - cursor,
            };
        }
    }

    OperationResult {
        outcome: OperationOutcome::Lost {
            total_stake: invested,
        },
        invested,
        consumed: pos - cursor,
    }
}

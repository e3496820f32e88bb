//! Staking simulation: operations, activations, and whole-stream strategies.
//!
//! Everything here reads the raw sequence through shared slices and never
//! mutates it; a [`StrategySimulator`] is deterministic given its sequence,
//! pattern, mode, and configuration.

pub mod activation;
pub mod operation;
pub mod strategy;

use serde::{Deserialize, Serialize};

pub use activation::{run_activation, ActivationResult};
pub use operation::{run_operation, OperationOutcome, OperationResult};
pub use strategy::{AggregateResult, ResultFlag, StrategyComparison, StrategySimulator};

/// How many operations an activation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Confidence scorer decides, between 1 and `max_operations`.
    Adaptive,
    /// Always `max_operations`.
    Fixed,
}

impl StrategyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyMode::Adaptive => "adaptive",
            StrategyMode::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Triggers plus activations over a whole stream, in either mode.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::activation::{run_activation, ActivationResult};
use super::StrategyMode;
use crate::confidence::ConfidenceConfig;
use crate::domain::{Pattern, RawSequence};
use crate::error::SimError;
use crate::ladder::Ladder;
use crate::scan::scan_triggers;

/// Why a result carries no simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultFlag {
    EmptyPattern,
    InvalidPattern(String),
}

/// Per-pattern, per-mode totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub pattern: String,
    pub mode: StrategyMode,
    pub ladder_depth: usize,
    /// Every trigger found, including those whose activation was skipped.
    pub trigger_count: usize,
    pub activations_run: usize,
    pub activations_skipped: usize,
    pub total_investment: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    pub balance: f64,
    /// `balance / total_investment * 100`, or 0 with no investment.
    pub roi: f64,
    pub winning_activations: usize,
    pub losing_activations: usize,
    pub operations_won: usize,
    pub operations_lost: usize,
    pub incomplete_operations: usize,
    pub flag: Option<ResultFlag>,
}

impl AggregateResult {
    /// Zero-valued result for a pattern that could not be simulated.
    pub fn flagged(pattern: &str, mode: StrategyMode, flag: ResultFlag) -> Self {
        let mut result = Self::zero(pattern.to_string(), mode, 0);
        result.flag = Some(flag);
        result
    }

    fn zero(pattern: String, mode: StrategyMode, ladder_depth: usize) -> Self {
        Self {
            pattern,
            mode,
            ladder_depth,
            trigger_count: 0,
            activations_run: 0,
            activations_skipped: 0,
            total_investment: 0.0,
            total_profit: 0.0,
            total_loss: 0.0,
            balance: 0.0,
            roi: 0.0,
            winning_activations: 0,
            losing_activations: 0,
            operations_won: 0,
            operations_lost: 0,
            incomplete_operations: 0,
            flag: None,
        }
    }

    /// Fold activation results into totals.
    pub fn from_activations(
        pattern: &Pattern,
        mode: StrategyMode,
        ladder: &Ladder,
        trigger_count: usize,
        activations: &[ActivationResult],
    ) -> Self {
        let mut agg = Self::zero(pattern.to_string(), mode, ladder.depth());
        agg.trigger_count = trigger_count;
        agg.activations_run = activations.len();
        agg.activations_skipped = trigger_count - activations.len();

        for a in activations {
            agg.total_investment += a.invested;
            agg.total_profit += a.profit;
            agg.total_loss += a.loss;
            agg.operations_won += a.operations_won;
            agg.operations_lost += a.operations_lost;
            if a.ended_incomplete {
                agg.incomplete_operations += 1;
            }
            if a.is_winning() {
                agg.winning_activations += 1;
            } else {
                agg.losing_activations += 1;
            }
        }

        agg.balance = agg.total_profit - agg.total_loss;
        agg.roi = if agg.total_investment > 0.0 {
            agg.balance / agg.total_investment * 100.0
        } else {
            0.0
        };
        agg
    }

    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }

    /// Completed operations that won, as a percentage.
    pub fn operation_success_rate(&self) -> f64 {
        let total = self.operations_won + self.operations_lost;
        if total == 0 {
            0.0
        } else {
            self.operations_won as f64 / total as f64 * 100.0
        }
    }
}

/// Both modes for one pattern over the same triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub pattern: String,
    pub trigger_count: usize,
    pub adaptive: AggregateResult,
    pub fixed: AggregateResult,
}

impl StrategyComparison {
    pub fn result(&self, mode: StrategyMode) -> &AggregateResult {
        match mode {
            StrategyMode::Adaptive => &self.adaptive,
            StrategyMode::Fixed => &self.fixed,
        }
    }

    /// Adaptive ROI minus fixed ROI, in percentage points.
    pub fn adaptive_edge(&self) -> f64 {
        self.adaptive.roi - self.fixed.roi
    }
}

/// Runs patterns over one immutable sequence.
///
/// Holds only shared references and configuration, so it can be shared
/// across threads and queried for many patterns in any order.
#[derive(Debug, Clone)]
pub struct StrategySimulator<'a> {
    sequence: &'a RawSequence,
    max_operations: usize,
    confidence: ConfidenceConfig,
}

impl<'a> StrategySimulator<'a> {
    /// `max_operations` must be at least 1.
    pub fn new(sequence: &'a RawSequence, max_operations: usize) -> Result<Self, SimError> {
        if max_operations == 0 {
            return Err(SimError::Configuration(
                "max_operations must be at least 1".into(),
            ));
        }
        Ok(Self {
            sequence,
            max_operations,
            confidence: ConfidenceConfig::default(),
        })
    }

    pub fn with_confidence(mut self, confidence: ConfidenceConfig) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn max_operations(&self) -> usize {
        self.max_operations
    }

    pub fn sequence(&self) -> &RawSequence {
        self.sequence
    }

    /// Every non-skipped activation for `pattern` in `mode`.
    pub fn activations(&self, pattern: &Pattern, mode: StrategyMode) -> Vec<ActivationResult> {
        let triggers = scan_triggers(self.sequence.symbols(), pattern);
        self.activations_for(pattern, mode, &triggers)
    }

    fn activations_for(
        &self,
        pattern: &Pattern,
        mode: StrategyMode,
        triggers: &[usize],
    ) -> Vec<ActivationResult> {
        let ladder = Ladder::for_pattern(pattern);
        triggers
            .iter()
            .filter_map(|&trigger| {
                run_activation(
                    self.sequence.symbols(),
                    trigger,
                    pattern,
                    &ladder,
                    self.max_operations,
                    mode,
                    &self.confidence,
                )
            })
            .collect()
    }

    fn aggregate(&self, pattern: &Pattern, mode: StrategyMode, triggers: &[usize]) -> AggregateResult {
        let activations = self.activations_for(pattern, mode, triggers);
        let agg = AggregateResult::from_activations(
            pattern,
            mode,
            &Ladder::for_pattern(pattern),
            triggers.len(),
            &activations,
        );
        debug!(
            pattern = %pattern,
            ?mode,
            triggers = agg.trigger_count,
            skipped = agg.activations_skipped,
            balance = agg.balance,
            roi = agg.roi,
            "strategy simulated"
        );
        agg
    }

    pub fn simulate(&self, pattern: &Pattern, mode: StrategyMode) -> AggregateResult {
        let triggers = scan_triggers(self.sequence.symbols(), pattern);
        self.aggregate(pattern, mode, &triggers)
    }

    /// Scan once and simulate both modes.
    pub fn compare(&self, pattern: &Pattern) -> StrategyComparison {
        let triggers = scan_triggers(self.sequence.symbols(), pattern);
        StrategyComparison {
            pattern: pattern.to_string(),
            trigger_count: triggers.len(),
            adaptive: self.aggregate(pattern, StrategyMode::Adaptive, &triggers),
            fixed: self.aggregate(pattern, StrategyMode::Fixed, &triggers),
        }
    }

    /// Compare a pattern given as text. Empty or malformed text yields flagged
    /// zero-valued results instead of an error.
    pub fn compare_text(&self, text: &str) -> StrategyComparison {
        match text.parse::<Pattern>() {
            Ok(pattern) => self.compare(&pattern),
            Err(err) => {
                let flag = if text.trim().is_empty() {
                    ResultFlag::EmptyPattern
                } else {
                    ResultFlag::InvalidPattern(err.to_string())
                };
                StrategyComparison {
                    pattern: text.to_string(),
                    trigger_count: 0,
                    adaptive: AggregateResult::flagged(text, StrategyMode::Adaptive, flag.clone()),
                    fixed: AggregateResult::flagged(text, StrategyMode::Fixed, flag),
                }
            }
        }
    }
}

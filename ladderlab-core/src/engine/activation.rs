//! One activation: the sequential run of operations after a trigger.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::operation::{run_operation, OperationOutcome};
use super::StrategyMode;
use crate::confidence::{decide_operations, ConfidenceConfig};
use crate::domain::{Pattern, Symbol};
use crate::ladder::Ladder;

/// Per-activation totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationResult {
    /// Raw index where the activation's window starts.
    pub trigger: usize,
    /// Symbols available to this activation.
    pub window_len: usize,
    /// Completed operations the activation aimed for.
    pub operations_planned: usize,
    pub operations_won: usize,
    pub operations_lost: usize,
    /// True if the last operation ran out of symbols mid-ladder.
    pub ended_incomplete: bool,
    /// Includes the partial stake of an Incomplete operation.
    pub invested: f64,
    pub profit: f64,
    pub loss: f64,
}

impl ActivationResult {
    /// Winning iff more operations won than lost. Ties are losing.
    pub fn is_winning(&self) -> bool {
        self.operations_won > self.operations_lost
    }

    pub fn balance(&self) -> f64 {
        self.profit - self.loss
    }
}

/// Run one activation starting at `trigger`.
///
/// The window holds at most `max_operations * ladder.depth()` symbols. If
/// fewer than `max_operations` symbols remain in the stream the activation is
/// skipped and `None` is returned.
pub fn run_activation(
    raw: &[Symbol],
    trigger: usize,
    pattern: &Pattern,
    ladder: &Ladder,
    max_operations: usize,
    mode: StrategyMode,
    confidence: &ConfidenceConfig,
) -> Option<ActivationResult> {
    let remaining = raw.len().saturating_sub(trigger);
    if remaining < max_operations {
        trace!(trigger, remaining, max_operations, "activation skipped");
        return None;
    }
    let wanted = max_operations * ladder.depth();
    let window = &raw[trigger..trigger + wanted.min(remaining)];

    let operations_planned = match mode {
        StrategyMode::Fixed => max_operations,
        StrategyMode::Adaptive => decide_operations(pattern, window, max_operations, confidence),
    };

    let mut result = ActivationResult {
        trigger,
        window_len: window.len(),
        operations_planned,
        operations_won: 0,
        operations_lost: 0,
        ended_incomplete: false,
        invested: 0.0,
        profit: 0.0,
        loss: 0.0,
    };

    let mut cursor = 0;
    let mut completed = 0;
    while completed < operations_planned && cursor < window.len() {
        let op = run_operation(window, cursor, ladder);
        cursor += op.consumed;
        // Partial stake of an Incomplete operation is still counted here,
        // with no matching profit or loss entry.
        result.invested += op.invested;

        match op.outcome {
            OperationOutcome::Won { net_profit, .. } => {
                completed += 1;
                result.operations_won += 1;
                result.profit += net_profit;
            }
            OperationOutcome::Lost { total_stake } => {
                completed += 1;
                result.operations_lost += 1;
                result.loss += total_stake;
            }
            OperationOutcome::Incomplete => {
                result.ended_incomplete = true;
                break;
            }
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawSequence;

    fn raw(s: &str) -> Vec<Symbol> {
        s.parse::<RawSequence>().unwrap().symbols().to_vec()
    }

    fn p(s: &str) -> Pattern {
        s.parse().unwrap()
    }

    fn fixed(raw: &[Symbol], trigger: usize, pattern: &str, max_ops: usize) -> Option<ActivationResult> {
        let pattern = p(pattern);
        let ladder = Ladder::for_pattern(&pattern);
        run_activation(
            raw,
            trigger,
            &pattern,
            &ladder,
            max_ops,
            StrategyMode::Fixed,
            &ConfidenceConfig::default(),
        )
    }

    #[test]
    fn skipped_when_fewer_symbols_than_max_operations() {
        let s = raw("RRRB");
        assert!(fixed(&s, 2, "RR", 3).is_none());
        assert!(fixed(&s, 4, "RR", 1).is_none());
        assert!(fixed(&s, 2, "RR", 2).is_some());
    }

    #[test]
    fn fixed_mode_runs_all_operations() {
        // Ladder depth 3 (pattern length 6); window = 2 * 3 = 6 symbols.
        let s = raw("RBRBRBRBBBR");
        let r = fixed(&s, 6, "RBRBRB", 2).unwrap();
        assert_eq!(r.window_len, 5);
        // "RBBBR": op1 wins at level 1, op2 loses BBB.
        assert_eq!(r.operations_won, 1);
        assert_eq!(r.operations_lost, 1);
        assert_eq!(r.invested, 12.0);
        assert_eq!(r.profit, 1.0);
        assert_eq!(r.loss, 11.0);
        assert!(!r.ended_incomplete);
        assert!(!r.is_winning(), "ties are losing");
    }

    #[test]
    fn stops_after_planned_operations() {
        // Pattern "RR" -> one-level ladder; max 2 ops -> window of 2.
        let s = raw("RRRRRRRR");
        let r = fixed(&s, 2, "RR", 2).unwrap();
        assert_eq!(r.window_len, 2);
        assert_eq!(r.operations_won, 2);
        assert_eq!(r.profit, 2.0);
        assert!(r.is_winning());
    }

    #[test]
    fn incomplete_operation_keeps_partial_stake() {
        // Depth 3 ladder, max 2 ops, 4 symbols remain after trigger 6.
        let s = raw("RBRBRBBBBB");
        let r = fixed(&s, 6, "RBRBRB", 2).unwrap();
        assert_eq!(r.window_len, 4);
        // op1: BBB lost (11.00); op2: B then window exhausted (1.00 partial)
        assert_eq!(r.operations_lost, 1);
        assert_eq!(r.operations_won, 0);
        assert!(r.ended_incomplete);
        assert_eq!(r.loss, 11.0);
        assert_eq!(r.invested, 12.0);
        assert_eq!(r.balance(), -11.0);
    }

    #[test]
    fn adaptive_with_short_window_runs_one_operation() {
        let pattern = p("RR");
        let ladder = Ladder::for_pattern(&pattern);
        let s = raw("RRRRRRRR");
        let r = run_activation(
            &s,
            2,
            &pattern,
            &ladder,
            5,
            StrategyMode::Adaptive,
            &ConfidenceConfig::default(),
        )
        .unwrap();
        assert_eq!(r.window_len, 5);
        assert_eq!(r.operations_planned, 1);
        assert_eq!(r.operations_won, 1);
        assert_eq!(r.invested, 1.0);
    }
}

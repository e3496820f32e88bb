//! Property tests for simulation invariants.
//!
//! Uses proptest to verify:
//! 1. Trigger monotonicity: positions strictly increase and matches never overlap
//! 2. Ladder sizing: depth = min(3, max(1, len / 2))
//! 3. Operation bounds: no win without Red, never more than `depth` symbols consumed
//! 4. Confidence floor: futures shorter than 10 always give one operation
//! 5. Confidence ceiling: all-Red pattern + all-Red future reaches the top tier
//! 6. Idempotence: re-running a strategy gives an identical result

use ladderlab_core::confidence::{decide_operations, ConfidenceConfig};
use ladderlab_core::domain::{Pattern, RawSequence, Symbol};
use ladderlab_core::engine::{run_operation, OperationOutcome, StrategyMode, StrategySimulator};
use ladderlab_core::ladder::Ladder;
use ladderlab_core::scan::scan_triggers;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        10 => Just(Symbol::Black),
        10 => Just(Symbol::Red),
        1 => Just(Symbol::Wildcard),
    ]
}

fn arb_color() -> impl Strategy<Value = Symbol> {
    prop_oneof![Just(Symbol::Black), Just(Symbol::Red)]
}

fn arb_sequence(max_len: usize) -> impl Strategy<Value = Vec<Symbol>> {
    prop::collection::vec(arb_symbol(), 0..max_len)
}

fn arb_pattern() -> impl Strategy<Value = Pattern> {
    prop::collection::vec(arb_color(), 1..9).prop_map(|v| Pattern::new(v).unwrap())
}

// ── 1. Trigger monotonicity ──────────────────────────────────────────

proptest! {
    #[test]
    fn triggers_strictly_increase_without_overlap(
        raw in arb_sequence(400),
        pattern in arb_pattern(),
    ) {
        let triggers = scan_triggers(&raw, &pattern);
        let len = pattern.len();
        let mut prev_end = 0usize;
        for &t in &triggers {
            prop_assert!(t >= len);
            let start = t - len;
            prop_assert!(start >= prev_end, "match at {start} overlaps previous end {prev_end}");
            prop_assert_eq!(&raw[start..t], pattern.symbols());
            prev_end = t;
        }
    }
}

// ── 2. Ladder sizing ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn ladder_depth_from_length(pattern in arb_pattern()) {
        let expected = (pattern.len() / 2).max(1).min(3);
        prop_assert_eq!(Ladder::for_pattern(&pattern).depth(), expected);
    }
}

// ── 3. Operation bounds ──────────────────────────────────────────────

proptest! {
    #[test]
    fn operation_wins_only_on_red(
        window in arb_sequence(12),
        depth in 1usize..=3,
        cursor in 0usize..12,
    ) {
        let ladder = Ladder::with_depth(depth).unwrap();
        let r = run_operation(&window, cursor, &ladder);
        prop_assert!(r.consumed <= depth);

        let consumed = &window[cursor.min(window.len())..cursor.min(window.len()) + r.consumed];
        match r.outcome {
            OperationOutcome::Won { level, .. } => {
                prop_assert_eq!(level, r.consumed);
                prop_assert_eq!(consumed[r.consumed - 1], Symbol::Red);
                prop_assert!(consumed[..r.consumed - 1].iter().all(|&s| s != Symbol::Red));
            }
            OperationOutcome::Lost { total_stake } => {
                prop_assert_eq!(r.consumed, depth);
                prop_assert!(consumed.iter().all(|&s| s != Symbol::Red));
                prop_assert_eq!(total_stake, ladder.full_cost());
            }
            OperationOutcome::Incomplete => {
                prop_assert!(r.consumed < depth);
                prop_assert!(consumed.iter().all(|&s| s != Symbol::Red));
            }
        }
    }
}

// ── 4/5. Confidence bounds ───────────────────────────────────────────

proptest! {
    #[test]
    fn short_future_gives_one_operation(
        future in arb_sequence(10),
        pattern in arb_pattern(),
        max_ops in 1usize..=20,
    ) {
        let ops = decide_operations(&pattern, &future, max_ops, &ConfidenceConfig::default());
        prop_assert_eq!(ops, 1);
    }

    #[test]
    fn all_red_reaches_top_tier(
        pattern_len in 1usize..9,
        future_len in 15usize..80,
        max_ops in 1usize..=20,
    ) {
        let pattern = Pattern::new(vec![Symbol::Red; pattern_len]).unwrap();
        let future = vec![Symbol::Red; future_len];
        let ops = decide_operations(&pattern, &future, max_ops, &ConfidenceConfig::default());
        let top = ((max_ops as f64 * 0.85).floor() as usize).max(1);
        prop_assert!(ops >= top);
        prop_assert!(ops <= max_ops);
    }

    #[test]
    fn decision_within_bounds(
        future in arb_sequence(80),
        pattern in arb_pattern(),
        max_ops in 1usize..=20,
    ) {
        let ops = decide_operations(&pattern, &future, max_ops, &ConfidenceConfig::default());
        prop_assert!(ops >= 1 && ops <= max_ops);
    }
}

// ── 6. Idempotence and accounting identities ─────────────────────────

proptest! {
    #[test]
    fn strategy_is_idempotent(
        raw in arb_sequence(600),
        pattern in arb_pattern(),
        max_ops in 1usize..=10,
        adaptive in any::<bool>(),
    ) {
        let seq = RawSequence::new(raw);
        let sim = StrategySimulator::new(&seq, max_ops).unwrap();
        let mode = if adaptive { StrategyMode::Adaptive } else { StrategyMode::Fixed };
        let first = sim.simulate(&pattern, mode);
        let second = sim.simulate(&pattern, mode);
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.activations_run + first.activations_skipped, first.trigger_count);
        prop_assert_eq!(first.winning_activations + first.losing_activations, first.activations_run);
        prop_assert!((first.balance - (first.total_profit - first.total_loss)).abs() < 1e-9);
        prop_assert!(first.total_investment + 1e-9 >= first.total_loss);
    }

    #[test]
    fn activations_stay_inside_their_window(
        raw in arb_sequence(400),
        pattern in arb_pattern(),
        max_ops in 1usize..=10,
    ) {
        let seq = RawSequence::new(raw);
        let sim = StrategySimulator::new(&seq, max_ops).unwrap();
        let depth = Ladder::for_pattern(&pattern).depth();
        for a in sim.activations(&pattern, StrategyMode::Fixed) {
            prop_assert!(a.window_len <= max_ops * depth);
            prop_assert!(a.window_len >= max_ops);
            prop_assert!(a.trigger + a.window_len <= seq.len());
            prop_assert!(a.operations_won + a.operations_lost <= a.operations_planned);
        }
    }
}

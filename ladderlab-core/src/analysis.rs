//! Historical analysis of an outcome sequence.
//!
//! Streaks and alternation are measured on the wildcard-free view, and
//! pattern occurrences come from the wildcard-tolerant locator. This path
//! never feeds the staking simulation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::longest_runs;
use crate::domain::{Pattern, RawSequence};
use crate::scan::{filter_wildcards, locate_pattern};

/// Sequences shorter than this are not analyzed.
pub const MIN_ANALYSIS_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryAnalysis {
    pub total_raw: usize,
    pub total_filtered: usize,
    pub wildcards_removed: usize,
    pub longest_red_streak: usize,
    pub longest_black_streak: usize,
    /// Share of adjacent filtered pairs that switch color, as a percentage.
    pub alternation_pct: f64,
    /// Occurrence count per pattern, only for patterns found at least once.
    pub pattern_occurrences: BTreeMap<String, usize>,
}

/// Analyze `sequence`, counting occurrences of each of `patterns`.
///
/// Returns `None` for sequences shorter than [`MIN_ANALYSIS_LEN`].
pub fn analyze_history(sequence: &RawSequence, patterns: &[Pattern]) -> Option<HistoryAnalysis> {
    if sequence.len() < MIN_ANALYSIS_LEN {
        return None;
    }

    let view = filter_wildcards(sequence.symbols());
    let (longest_red_streak, longest_black_streak) = longest_runs(&view.symbols);

    let switches = view.symbols.windows(2).filter(|w| w[0] != w[1]).count();
    let alternation_pct = if view.len() > 1 {
        switches as f64 / (view.len() - 1) as f64 * 100.0
    } else {
        0.0
    };

    let pattern_occurrences = patterns
        .iter()
        .filter_map(|p| {
            let hits = locate_pattern(sequence.symbols(), p).len();
            (hits > 0).then(|| (p.to_string(), hits))
        })
        .collect();

    Some(HistoryAnalysis {
        total_raw: sequence.len(),
        total_filtered: view.len(),
        wildcards_removed: sequence.len() - view.len(),
        longest_red_streak,
        longest_black_streak,
        alternation_pct,
        pattern_occurrences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_sequences_are_not_analyzed() {
        let s: RawSequence = "RB".repeat(24).parse().unwrap();
        assert!(analyze_history(&s, &[]).is_none());
    }

    #[test]
    fn alternating_sequence() {
        let s: RawSequence = "RB".repeat(25).parse().unwrap();
        let a = analyze_history(&s, &["RB".parse().unwrap(), "RR".parse().unwrap()]).unwrap();
        assert_eq!(a.total_raw, 50);
        assert_eq!(a.wildcards_removed, 0);
        assert_eq!(a.longest_red_streak, 1);
        assert_eq!(a.alternation_pct, 100.0);
        assert_eq!(a.pattern_occurrences.get("RB"), Some(&25));
        assert!(!a.pattern_occurrences.contains_key("RR"));
    }

    #[test]
    fn wildcards_are_removed_before_streaks() {
        let mut text = "R0R0R0R0".to_string();
        text.push_str(&"B".repeat(46));
        let s: RawSequence = text.parse().unwrap();
        let a = analyze_history(&s, &["RRRR".parse().unwrap()]).unwrap();
        assert_eq!(a.wildcards_removed, 4);
        assert_eq!(a.total_filtered, 50);
        assert_eq!(a.longest_red_streak, 4);
        assert_eq!(a.longest_black_streak, 46);
        // RRRR only exists across wildcards: the locator still finds it.
        assert_eq!(a.pattern_occurrences.get("RRRR"), Some(&1));
    }
}

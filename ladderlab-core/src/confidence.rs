//! Confidence scoring: how many operations to run after a trigger.
//!
//! The score blends a prior from the pattern's composition with Red-share
//! trends over three prefix windows of the (wildcard-free) future, plus streak
//! bonuses and penalties from the short window. The score then selects a tier,
//! and the tier's fraction of `max_operations` (floored, minimum 1) is the
//! number of operations to run.
//!
//! Every constant lives in [`ConfidenceConfig`]; `ConfidenceConfig::default()`
//! is the production table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Pattern, Symbol};
use crate::scan::filter_wildcards;

/// Composition class of the triggering pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternClass {
    AllRed,
    AllBlack,
    Balanced,
    Alternating,
    RedLeaning,
    BlackLeaning,
}

impl PatternClass {
    /// Classify in priority order: all-Red, all-Black, balanced (|R-B| <= 1),
    /// strict alternation, Red-leaning, Black-leaning.
    ///
    /// Any strict alternation is already balanced, so `Alternating` is only
    /// reachable if the balance rule is removed from the table.
    pub fn of(pattern: &Pattern) -> Self {
        let len = pattern.len();
        let reds = pattern.count_red();
        let blacks = pattern.count_black();
        if reds == len {
            PatternClass::AllRed
        } else if blacks == len {
            PatternClass::AllBlack
        } else if reds.abs_diff(blacks) <= 1 {
            PatternClass::Balanced
        } else if pattern.is_strict_alternation() {
            PatternClass::Alternating
        } else if reds > blacks {
            PatternClass::RedLeaning
        } else {
            PatternClass::BlackLeaning
        }
    }
}

/// Prior weight per pattern class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternWeights {
    pub all_red: f64,
    pub all_black: f64,
    pub balanced: f64,
    pub alternating: f64,
    pub red_leaning: f64,
    pub black_leaning: f64,
}

impl PatternWeights {
    pub fn weight(&self, class: PatternClass) -> f64 {
        match class {
            PatternClass::AllRed => self.all_red,
            PatternClass::AllBlack => self.all_black,
            PatternClass::Balanced => self.balanced,
            PatternClass::Alternating => self.alternating,
            PatternClass::RedLeaning => self.red_leaning,
            PatternClass::BlackLeaning => self.black_leaning,
        }
    }
}

/// Trend contribution for one window.
///
/// Above `upper`: `+ weight * (trend - 0.5) * 2`. Below `lower`:
/// `- weight * (0.5 - trend) * 2`. In between: nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBand {
    pub window: usize,
    pub weight: f64,
    pub upper: f64,
    pub lower: f64,
}

impl TrendBand {
    pub fn contribution(&self, trend: f64) -> f64 {
        if trend > self.upper {
            self.weight * (trend - 0.5) * 2.0
        } else if trend < self.lower {
            -(self.weight * (0.5 - trend) * 2.0)
        } else {
            0.0
        }
    }
}

/// Streak bonuses (Red) and penalties (Black) measured in the short window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRules {
    pub red_first: usize,
    pub red_second: usize,
    pub red_bonus: f64,
    pub black_first: usize,
    pub black_second: usize,
    pub black_penalty: f64,
}

impl StreakRules {
    /// Apply each bonus and penalty to `score` in turn.
    pub fn apply(&self, mut score: f64, longest_red: usize, longest_black: usize) -> f64 {
        if longest_red >= self.red_first {
            score += self.red_bonus;
        }
        if longest_red >= self.red_second {
            score += self.red_bonus;
        }
        if longest_black >= self.black_first {
            score -= self.black_penalty;
        }
        if longest_black >= self.black_second {
            score -= self.black_penalty;
        }
        score
    }
}

/// Named confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    MediumHigh,
    Medium,
    Low,
    VeryLow,
}

/// One row of the score → fraction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub min_score: f64,
    pub fraction: f64,
    pub tier: ConfidenceTier,
}

/// The complete constant table driving the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Futures shorter than this get exactly one operation.
    pub min_future: usize,
    /// Multiplier applied to the pattern prior.
    pub prior_share: f64,
    pub weights: PatternWeights,
    pub short: TrendBand,
    pub medium: TrendBand,
    pub long: TrendBand,
    pub streaks: StreakRules,
    /// Checked in order; the first rule with `score >= min_score` wins.
    pub tiers: Vec<TierRule>,
    /// Fraction used when no tier rule matches.
    pub floor_fraction: f64,
    /// Small-run override: when `max_operations <= small_max_operations` and
    /// `score >= small_min_score`, run at least `floor(max_ops * small_fraction)`.
    pub small_max_operations: usize,
    pub small_min_score: f64,
    pub small_fraction: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            min_future: 10,
            prior_share: 0.25,
            weights: PatternWeights {
                all_red: 0.85,
                all_black: 0.15,
                balanced: 0.55,
                alternating: 0.50,
                red_leaning: 0.75,
                black_leaning: 0.25,
            },
            short: TrendBand {
                window: 15,
                weight: 0.5,
                upper: 0.65,
                lower: 0.35,
            },
            medium: TrendBand {
                window: 30,
                weight: 0.2,
                upper: 0.6,
                lower: 0.4,
            },
            long: TrendBand {
                window: 50,
                weight: 0.05,
                upper: 0.55,
                lower: 0.45,
            },
            streaks: StreakRules {
                red_first: 4,
                red_second: 6,
                red_bonus: 0.1,
                black_first: 3,
                black_second: 5,
                black_penalty: 0.15,
            },
            tiers: vec![
                TierRule { min_score: 0.7, fraction: 0.85, tier: ConfidenceTier::High },
                TierRule { min_score: 0.4, fraction: 0.65, tier: ConfidenceTier::MediumHigh },
                TierRule { min_score: 0.1, fraction: 0.45, tier: ConfidenceTier::Medium },
                TierRule { min_score: -0.1, fraction: 0.30, tier: ConfidenceTier::Low },
            ],
            floor_fraction: 0.15,
            small_max_operations: 3,
            small_min_score: 0.0,
            small_fraction: 0.8,
        }
    }
}

impl ConfidenceConfig {
    /// Resolve a score to its tier and fraction.
    pub fn tier_for(&self, score: f64) -> (ConfidenceTier, f64) {
        self.tiers
            .iter()
            .find(|rule| score >= rule.min_score)
            .map(|rule| (rule.tier, rule.fraction))
            .unwrap_or((ConfidenceTier::VeryLow, self.floor_fraction))
    }
}

/// Red-share trends over the three prefix windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

/// Full breakdown of one confidence decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub class: PatternClass,
    pub trends: Trends,
    pub longest_red: usize,
    pub longest_black: usize,
    pub score: f64,
    pub tier: ConfidenceTier,
    pub operations: usize,
}

fn red_share(window: &[Symbol]) -> f64 {
    let reds = window.iter().filter(|&&s| s == Symbol::Red).count();
    reds as f64 / window.len() as f64
}

/// Longest consecutive Red and Black runs in a wildcard-free window.
pub fn longest_runs(window: &[Symbol]) -> (usize, usize) {
    let mut max_red = 0;
    let mut max_black = 0;
    let mut cur_red = 0;
    let mut cur_black = 0;
    for &s in window {
        if s == Symbol::Red {
            cur_red += 1;
            if cur_black > 0 {
                max_black = max_black.max(cur_black);
                cur_black = 0;
            }
        } else {
            cur_black += 1;
            if cur_red > 0 {
                max_red = max_red.max(cur_red);
                cur_red = 0;
            }
        }
    }
    (max_red.max(cur_red), max_black.max(cur_black))
}

/// Red-share over nested prefix windows of the filtered future.
///
/// A window that is empty gets 0.5; a window no larger than the previous one
/// inherits the previous trend.
pub fn window_trends(filtered: &[Symbol], config: &ConfidenceConfig) -> Trends {
    let short_len = config.short.window.min(filtered.len());
    let medium_len = config.medium.window.min(filtered.len());
    let long_len = config.long.window.min(filtered.len());

    let short = if short_len > 0 {
        red_share(&filtered[..short_len])
    } else {
        0.5
    };
    let medium = if medium_len > short_len {
        red_share(&filtered[..medium_len])
    } else {
        short
    };
    let long = if long_len > medium_len {
        red_share(&filtered[..long_len])
    } else {
        medium
    };
    Trends { short, medium, long }
}

/// Score a trigger and translate the score into an operation count.
///
/// Returns `None` when `future` is shorter than `config.min_future`; callers
/// then run a single operation.
pub fn assess(
    pattern: &Pattern,
    future: &[Symbol],
    max_operations: usize,
    config: &ConfidenceConfig,
) -> Option<ConfidenceAssessment> {
    if future.len() < config.min_future {
        return None;
    }

    let class = PatternClass::of(pattern);
    let view = filter_wildcards(future);
    let trends = window_trends(&view.symbols, config);
    let short_len = config.short.window.min(view.len());
    let (longest_red, longest_black) = longest_runs(&view.symbols[..short_len]);

    let mut score = 0.0;
    score += config.weights.weight(class) * config.prior_share;
    score += config.short.contribution(trends.short);
    score += config.medium.contribution(trends.medium);
    score += config.long.contribution(trends.long);
    score = config.streaks.apply(score, longest_red, longest_black);

    let (tier, fraction) = config.tier_for(score);
    let mut operations = floor_fraction(max_operations, fraction).max(1);

    if max_operations <= config.small_max_operations && score >= config.small_min_score {
        operations = operations.max(floor_fraction(max_operations, config.small_fraction));
    }

    debug!(
        pattern = %pattern,
        ?class,
        trend_short = trends.short,
        trend_medium = trends.medium,
        trend_long = trends.long,
        longest_red,
        longest_black,
        score,
        ?tier,
        operations,
        max_operations,
        "confidence decision"
    );

    Some(ConfidenceAssessment {
        class,
        trends,
        longest_red,
        longest_black,
        score,
        tier,
        operations,
    })
}

/// Operation count in `[1, max_operations]` for this trigger.
pub fn decide_operations(
    pattern: &Pattern,
    future: &[Symbol],
    max_operations: usize,
    config: &ConfidenceConfig,
) -> usize {
    assess(pattern, future, max_operations, config)
        .map(|a| a.operations)
        .unwrap_or(1)
}

fn floor_fraction(max_operations: usize, fraction: f64) -> usize {
    (max_operations as f64 * fraction).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawSequence;

    fn p(s: &str) -> Pattern {
        s.parse().unwrap()
    }

    fn seq(s: &str) -> Vec<Symbol> {
        s.parse::<RawSequence>().unwrap().symbols().to_vec()
    }

    #[test]
    fn default_table_constants() {
        let c = ConfidenceConfig::default();
        assert_eq!(c.min_future, 10);
        assert_eq!(c.weights.all_red, 0.85);
        assert_eq!(c.weights.all_black, 0.15);
        assert_eq!(c.weights.balanced, 0.55);
        assert_eq!(c.weights.alternating, 0.50);
        assert_eq!(c.weights.red_leaning, 0.75);
        assert_eq!(c.weights.black_leaning, 0.25);
        assert_eq!((c.short.window, c.medium.window, c.long.window), (15, 30, 50));
        assert_eq!(c.tier_for(0.7), (ConfidenceTier::High, 0.85));
        assert_eq!(c.tier_for(0.69), (ConfidenceTier::MediumHigh, 0.65));
        assert_eq!(c.tier_for(0.4), (ConfidenceTier::MediumHigh, 0.65));
        assert_eq!(c.tier_for(0.1), (ConfidenceTier::Medium, 0.45));
        assert_eq!(c.tier_for(-0.1), (ConfidenceTier::Low, 0.30));
        assert_eq!(c.tier_for(-0.11), (ConfidenceTier::VeryLow, 0.15));
    }

    #[test]
    fn classify_patterns() {
        assert_eq!(PatternClass::of(&p("RRRR")), PatternClass::AllRed);
        assert_eq!(PatternClass::of(&p("BBB")), PatternClass::AllBlack);
        assert_eq!(PatternClass::of(&p("RBRB")), PatternClass::Balanced);
        assert_eq!(PatternClass::of(&p("RRB")), PatternClass::Balanced);
        assert_eq!(PatternClass::of(&p("RRRB")), PatternClass::RedLeaning);
        assert_eq!(PatternClass::of(&p("BBRBB")), PatternClass::BlackLeaning);
    }

    #[test]
    fn trend_band_contribution() {
        let band = ConfidenceConfig::default().short;
        assert_eq!(band.contribution(0.5), 0.0);
        assert_eq!(band.contribution(0.65), 0.0);
        assert!((band.contribution(1.0) - 0.5).abs() < 1e-12);
        assert!((band.contribution(0.0) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn streak_adjustments_stack() {
        let rules = ConfidenceConfig::default().streaks;
        assert_eq!(rules.apply(0.0, 3, 2), 0.0);
        assert!((rules.apply(0.0, 4, 0) - 0.1).abs() < 1e-12);
        assert!((rules.apply(0.0, 6, 0) - 0.2).abs() < 1e-12);
        assert!((rules.apply(0.0, 0, 3) + 0.15).abs() < 1e-12);
        assert!((rules.apply(1.0, 0, 5) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn longest_runs_finalizes_at_end() {
        assert_eq!(longest_runs(&seq("RRBBBRRRR")), (4, 3));
        assert_eq!(longest_runs(&seq("BBRR")), (2, 2));
        assert_eq!(longest_runs(&[]), (0, 0));
    }

    #[test]
    fn trends_inherit_when_window_does_not_grow() {
        let c = ConfidenceConfig::default();
        let t = window_trends(&seq("RRRRRRRRRRBBBBB"), &c);
        assert!((t.short - 10.0 / 15.0).abs() < 1e-12);
        assert_eq!(t.medium, t.short);
        assert_eq!(t.long, t.short);
        let empty = window_trends(&[], &c);
        assert_eq!(empty, Trends { short: 0.5, medium: 0.5, long: 0.5 });
    }

    #[test]
    fn trends_use_longer_windows_when_available() {
        let c = ConfidenceConfig::default();
        // 15 reds then 15 blacks: short = 1.0, medium = 0.5
        let mut s = "R".repeat(15);
        s.push_str(&"B".repeat(15));
        let t = window_trends(&seq(&s), &c);
        assert_eq!(t.short, 1.0);
        assert_eq!(t.medium, 0.5);
        assert_eq!(t.long, 0.5);
    }

    #[test]
    fn short_future_runs_one_operation() {
        let c = ConfidenceConfig::default();
        let future = seq("RRRRRRRRR");
        assert!(assess(&p("RR"), &future, 10, &c).is_none());
        assert_eq!(decide_operations(&p("RR"), &future, 10, &c), 1);
    }

    #[test]
    fn all_red_future_hits_top_tier() {
        let c = ConfidenceConfig::default();
        let future = seq(&"R".repeat(20));
        let a = assess(&p("RRRR"), &future, 10, &c).unwrap();
        // 0.2125 prior + 0.5 + 0.2 + 0.05 + 0.2 streak
        assert!((a.score - 1.1625).abs() < 1e-9);
        assert_eq!(a.tier, ConfidenceTier::High);
        assert_eq!(a.operations, 8);
    }

    #[test]
    fn all_black_future_hits_bottom_tier() {
        let c = ConfidenceConfig::default();
        let future = seq(&"B".repeat(20));
        let a = assess(&p("BBBB"), &future, 10, &c).unwrap();
        assert_eq!(a.tier, ConfidenceTier::VeryLow);
        assert_eq!(a.operations, 1);
    }

    #[test]
    fn wildcards_are_ignored_in_trends() {
        let c = ConfidenceConfig::default();
        let future = seq("R0R0R0R0R0R0R0R0R0R0");
        let a = assess(&p("RB"), &future, 5, &c).unwrap();
        assert_eq!(a.trends.short, 1.0);
        assert_eq!(a.longest_red, 10);
    }

    #[test]
    fn small_max_operations_override() {
        let c = ConfidenceConfig::default();
        // Balanced pattern, neutral future: score = 0.1375 -> Medium (0.45).
        // floor(3 * 0.45) = 1, override lifts it to floor(3 * 0.8) = 2.
        let future = seq("RBRBRBRBRBRBRBRB");
        let a = assess(&p("RB"), &future, 3, &c).unwrap();
        assert!(a.score >= 0.0);
        assert_eq!(a.operations, 2);

        let big = assess(&p("RB"), &future, 10, &c).unwrap();
        assert_eq!(big.operations, 4);
    }

    #[test]
    fn override_skipped_for_negative_scores() {
        let c = ConfidenceConfig::default();
        let future = seq(&"B".repeat(12));
        let a = assess(&p("BB"), &future, 3, &c).unwrap();
        assert!(a.score < 0.0);
        assert_eq!(a.operations, 1);
    }

    #[test]
    fn result_stays_within_bounds() {
        let c = ConfidenceConfig::default();
        let future = seq(&"R".repeat(30));
        for max_ops in 1..=12 {
            let ops = decide_operations(&p("RRR"), &future, max_ops, &c);
            assert!(ops >= 1 && ops <= max_ops, "max_ops {max_ops} -> {ops}");
        }
    }
}

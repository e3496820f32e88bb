//! Adaptive-vs-fixed comparison across independent synthetic streams.
//!
//! Each replicate draws its own sequence from a sub-seed of the master seed,
//! so the set of streams depends only on `(master_seed, index)` and not on
//! how rayon schedules the work.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ladderlab_core::engine::{StrategyComparison, StrategySimulator};
use ladderlab_core::outcome::OutcomeSource;
use ladderlab_core::rng::RngHierarchy;

use crate::config::{ConfigError, SessionConfig};
use crate::runner::{resolve_seed, SessionError, SCHEMA_VERSION};

const REPLICATE_LABEL: &str = "replicate";

/// One replicate's stream and per-pattern comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicateRun {
    pub index: usize,
    pub dataset_hash: String,
    pub comparisons: Vec<StrategyComparison>,
}

/// Per-pattern tally over all replicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTally {
    pub pattern: String,
    pub adaptive_wins: usize,
    pub fixed_wins: usize,
    pub ties: usize,
    pub mean_adaptive_roi: f64,
    pub mean_fixed_roi: f64,
}

impl PatternTally {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            adaptive_wins: 0,
            fixed_wins: 0,
            ties: 0,
            mean_adaptive_roi: 0.0,
            mean_fixed_roi: 0.0,
        }
    }

    pub fn samples(&self) -> usize {
        self.adaptive_wins + self.fixed_wins + self.ties
    }

    /// Share of samples where adaptive ROI beat fixed ROI, in percent.
    pub fn adaptive_win_rate(&self) -> f64 {
        match self.samples() {
            0 => 0.0,
            n => self.adaptive_wins as f64 / n as f64 * 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicateReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub master_seed: u64,
    pub replicates: usize,
    pub rounds: usize,
    pub max_operations: usize,
    pub patterns: Vec<PatternTally>,
    /// Pooled over every (replicate, pattern) pair that could be simulated.
    pub overall: PatternTally,
    pub runs: Vec<ReplicateRun>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Simulate `patterns` in both modes over `replicates` fresh streams.
pub fn run_replicates(
    config: &SessionConfig,
    replicates: usize,
    patterns: &[String],
) -> Result<ReplicateReport, SessionError> {
    config.validate()?;
    if replicates == 0 {
        return Err(ConfigError::Invalid("replicates must be greater than zero".into()).into());
    }
    if patterns.is_empty() {
        return Err(SessionError::NoPatterns);
    }

    let master_seed = resolve_seed(config);
    let hierarchy = RngHierarchy::new(master_seed);
    info!(
        replicates,
        rounds = config.rounds,
        patterns = patterns.len(),
        master_seed,
        "running replicates"
    );

    let runs = (0..replicates)
        .into_par_iter()
        .map(|index| -> Result<ReplicateRun, SessionError> {
            let rng = hierarchy.rng_for(REPLICATE_LABEL, index as u64);
            let sequence = OutcomeSource::new(rng).generate(config.rounds);
            let simulator = StrategySimulator::new(&sequence, config.max_operations)?;
            let comparisons: Vec<StrategyComparison> =
                patterns.iter().map(|p| simulator.compare_text(p)).collect();
            debug!(index, "replicate done");
            Ok(ReplicateRun {
                index,
                dataset_hash: sequence.dataset_hash().to_string(),
                comparisons,
            })
        })
        .collect::<Result<Vec<_>, SessionError>>()?;

    let mut tallies: Vec<PatternTally> = patterns.iter().map(|p| PatternTally::new(p)).collect();
    let mut overall = PatternTally::new("*");
    for run in &runs {
        for (tally, comparison) in tallies.iter_mut().zip(&run.comparisons) {
            record(tally, comparison);
            record(&mut overall, comparison);
        }
    }
    for tally in tallies.iter_mut().chain(std::iter::once(&mut overall)) {
        finalize_means(tally);
    }

    info!(
        adaptive_win_rate = overall.adaptive_win_rate(),
        mean_adaptive_roi = overall.mean_adaptive_roi,
        mean_fixed_roi = overall.mean_fixed_roi,
        "replicates complete"
    );

    Ok(ReplicateReport {
        schema_version: SCHEMA_VERSION,
        master_seed,
        replicates,
        rounds: config.rounds,
        max_operations: config.max_operations,
        patterns: tallies,
        overall,
        runs,
    })
}

/// Accumulate ROI sums into the mean fields; [`finalize_means`] divides.
fn record(tally: &mut PatternTally, comparison: &StrategyComparison) {
    if comparison.adaptive.is_flagged() {
        return;
    }
    let edge = comparison.adaptive_edge();
    if edge > 0.0 {
        tally.adaptive_wins += 1;
    } else if edge < 0.0 {
        tally.fixed_wins += 1;
    } else {
        tally.ties += 1;
    }
    tally.mean_adaptive_roi += comparison.adaptive.roi;
    tally.mean_fixed_roi += comparison.fixed.roi;
}

fn finalize_means(tally: &mut PatternTally) {
    let n = tally.samples();
    if n > 0 {
        tally.mean_adaptive_roi /= n as f64;
        tally.mean_fixed_roi /= n as f64;
    }
}

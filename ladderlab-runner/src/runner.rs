//! Session runner: wires together config, loaders, simulator, and bankroll.
//!
//! Two entry points:
//! - `run_session()`: resolves the sequence and patterns from a `SessionConfig`.
//!   Used by the CLI.
//! - `run_session_on()`: takes a prepared sequence and pattern list. Used by
//!   tests and by callers that already hold the data.
//!
//! Patterns are simulated in parallel against the same immutable sequence;
//! the bankroll is then folded sequentially in pattern order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use ladderlab_core::domain::{RawSequence, SequenceStats};
use ladderlab_core::engine::{StrategyComparison, StrategyMode, StrategySimulator};
use ladderlab_core::outcome::OutcomeSource;
use ladderlab_core::rng::RngHierarchy;
use ladderlab_core::SimError;

use crate::bankroll::{Bankroll, BankrollEntry, BankrollSummary};
use crate::config::{ConfigError, SessionConfig};
use crate::data_loader::{load_history, load_patterns, LoadError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimError),
    #[error("no patterns configured (set `patterns` or `patterns_file`)")]
    NoPatterns,
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// RNG label for the session's synthetic stream.
const SEQUENCE_LABEL: &str = "sequence";

/// Where the simulated stream came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceSource {
    Synthetic { seed: u64, rounds: usize },
    History { path: String },
}

/// One pattern's comparison plus what it did to the bankroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub comparison: StrategyComparison,
    /// `None` when the pattern had no triggers or was skipped for low balance.
    pub bankroll: Option<BankrollEntry>,
}

/// Totals across every pattern, measured in the bankroll mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: StrategyMode,
    pub patterns_tested: usize,
    pub flagged_patterns: usize,
    pub profitable_patterns: usize,
    pub total_triggers: usize,
    pub total_activations: usize,
    pub operations_won: usize,
    pub operations_lost: usize,
    pub incomplete_operations: usize,
    /// Won over completed operations, in percent.
    pub operation_success_rate: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    /// Patterns where adaptive ROI beat fixed ROI, and the reverse.
    pub adaptive_better: usize,
    pub fixed_better: usize,
    pub adaptive_balance: f64,
    pub fixed_balance: f64,
}

impl SessionSummary {
    pub fn from_comparisons(mode: StrategyMode, comparisons: &[StrategyComparison]) -> Self {
        let mut s = Self {
            mode,
            patterns_tested: comparisons.len(),
            flagged_patterns: 0,
            profitable_patterns: 0,
            total_triggers: 0,
            total_activations: 0,
            operations_won: 0,
            operations_lost: 0,
            incomplete_operations: 0,
            operation_success_rate: 0.0,
            total_profit: 0.0,
            total_loss: 0.0,
            adaptive_better: 0,
            fixed_better: 0,
            adaptive_balance: 0.0,
            fixed_balance: 0.0,
        };

        for c in comparisons {
            let r = c.result(mode);
            if r.is_flagged() {
                s.flagged_patterns += 1;
                continue;
            }
            if r.balance > 0.0 {
                s.profitable_patterns += 1;
            }
            s.total_triggers += r.trigger_count;
            s.total_activations += r.activations_run;
            s.operations_won += r.operations_won;
            s.operations_lost += r.operations_lost;
            s.incomplete_operations += r.incomplete_operations;
            s.total_profit += r.total_profit;
            s.total_loss += r.total_loss;
            s.adaptive_balance += c.adaptive.balance;
            s.fixed_balance += c.fixed.balance;

            let edge = c.adaptive_edge();
            if edge > 0.0 {
                s.adaptive_better += 1;
            } else if edge < 0.0 {
                s.fixed_better += 1;
            }
        }

        let completed = s.operations_won + s.operations_lost;
        if completed > 0 {
            s.operation_success_rate = s.operations_won as f64 / completed as f64 * 100.0;
        }
        s
    }
}

/// Complete result of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub created_at: String,
    pub config: SessionConfig,
    pub source: SequenceSource,
    pub dataset_hash: String,
    pub sequence_stats: SequenceStats,
    pub patterns: Vec<PatternReport>,
    pub summary: SessionSummary,
    pub bankroll: BankrollSummary,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Generate the synthetic stream for `seed`.
pub fn synthetic_sequence(seed: u64, rounds: usize) -> RawSequence {
    let rng = RngHierarchy::new(seed).rng_for(SEQUENCE_LABEL, 0);
    OutcomeSource::new(rng).generate(rounds)
}

/// The configured seed, or a fresh random one (logged so the run can be repeated).
pub fn resolve_seed(config: &SessionConfig) -> u64 {
    match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!(seed, "no seed configured, drew a random one");
            seed
        }
    }
}

/// Load the history file or generate a synthetic stream.
pub fn prepare_sequence(
    config: &SessionConfig,
) -> Result<(RawSequence, SequenceSource), SessionError> {
    if let Some(path) = &config.history_file {
        let sequence = load_history(path)?;
        return Ok((
            sequence,
            SequenceSource::History {
                path: path.display().to_string(),
            },
        ));
    }
    let seed = resolve_seed(config);
    let sequence = synthetic_sequence(seed, config.rounds);
    Ok((
        sequence,
        SequenceSource::Synthetic {
            seed,
            rounds: config.rounds,
        },
    ))
}

/// Inline patterns followed by those from `patterns_file`.
pub fn resolve_patterns(config: &SessionConfig) -> Result<Vec<String>, SessionError> {
    let mut patterns = config.patterns.clone();
    if let Some(path) = &config.patterns_file {
        patterns.extend(load_patterns(path)?);
    }
    if patterns.is_empty() {
        return Err(SessionError::NoPatterns);
    }
    Ok(patterns)
}

/// Run a session from a `SessionConfig`, loading whatever it points at.
pub fn run_session(config: &SessionConfig) -> Result<SessionReport, SessionError> {
    config.validate()?;
    let patterns = resolve_patterns(config)?;
    let (sequence, source) = prepare_sequence(config)?;
    run_session_on(config, &sequence, source, &patterns)
}

/// Run a session over an already prepared sequence.
pub fn run_session_on(
    config: &SessionConfig,
    sequence: &RawSequence,
    source: SequenceSource,
    patterns: &[String],
) -> Result<SessionReport, SessionError> {
    let simulator = StrategySimulator::new(sequence, config.max_operations)?;
    let dataset_hash = sequence.dataset_hash();
    info!(
        rounds = sequence.len(),
        patterns = patterns.len(),
        max_operations = config.max_operations,
        dataset = %dataset_hash.short(),
        "starting session"
    );

    let comparisons: Vec<StrategyComparison> = patterns
        .par_iter()
        .map(|p| simulator.compare_text(p))
        .collect();

    let mode = config.bankroll_mode;
    let mut bankroll = Bankroll::new(config.initial_bankroll, config.operating_minimum);
    let patterns: Vec<PatternReport> = comparisons
        .iter()
        .map(|c| PatternReport {
            comparison: c.clone(),
            bankroll: bankroll.apply(c.result(mode)).cloned(),
        })
        .collect();

    let summary = SessionSummary::from_comparisons(mode, &comparisons);
    let bankroll = bankroll.finish();
    info!(
        final_balance = bankroll.final_balance,
        roi = bankroll.roi,
        risk = ?bankroll.risk,
        alerts = bankroll.alerts.len(),
        "session complete"
    );

    Ok(SessionReport {
        schema_version: SCHEMA_VERSION,
        created_at: chrono::Utc::now().to_rfc3339(),
        config: config.clone(),
        source,
        dataset_hash: dataset_hash.to_string(),
        sequence_stats: sequence.stats(),
        patterns,
        summary,
        bankroll,
    })
}

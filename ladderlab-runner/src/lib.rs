//! LadderLab Runner — session orchestration around the core simulator.
//!
//! This crate builds on `ladderlab-core` to provide:
//! - TOML session configuration with named presets
//! - Pattern file and result history loading
//! - Parallel per-pattern simulation with a sequential bankroll loop
//! - Adaptive-vs-fixed comparison across seeded replicate streams
//! - JSON, CSV, and Markdown artifacts

pub mod bankroll;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod replicates;
pub mod runner;

pub use bankroll::{
    Bankroll, BankrollAlert, BankrollEntry, BankrollSummary, EvaluationGrade, RiskGrade,
};
pub use config::{ConfigError, Preset, SessionConfig};
pub use data_loader::{load_history, load_patterns, LoadError};
pub use replicates::{run_replicates, PatternTally, ReplicateReport, ReplicateRun};
pub use runner::{
    run_session, run_session_on, synthetic_sequence, PatternReport, SequenceSource,
    SessionError, SessionReport, SessionSummary,
};

//! Serializable session configuration.
//!
//! A session is fully described by a [`SessionConfig`]: how long a synthetic
//! stream to generate (or which history file to replay), the operation cap per
//! activation, the seed, the bankroll rules, and where the patterns come from.
//! Configs load from TOML; every field has a default.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use ladderlab_core::engine::StrategyMode;

/// Upper bound on operations per activation.
pub const MAX_OPERATIONS_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("unknown preset '{0}'. Valid: optimal, max_advantage, quick")]
    UnknownPreset(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Synthetic stream length. Ignored when `history_file` is set.
    pub rounds: usize,
    /// Operation cap per activation.
    pub max_operations: usize,
    /// Master seed; a random one is drawn (and logged) when absent.
    pub seed: Option<u64>,
    /// Starting balance of the bankroll loop.
    pub initial_bankroll: f64,
    /// Patterns are skipped while the balance is below this; defaults to the
    /// cost of one full three-level ladder.
    pub operating_minimum: f64,
    /// Which mode's balance is applied to the bankroll.
    pub bankroll_mode: StrategyMode,
    /// Inline patterns, evaluated before those from `patterns_file`.
    pub patterns: Vec<String>,
    pub patterns_file: Option<PathBuf>,
    /// Replay recorded results instead of generating a stream.
    pub history_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Preset::Optimal.to_config()
    }
}

impl SessionConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_file.is_none() && self.rounds == 0 {
            return Err(ConfigError::Invalid("rounds must be greater than zero".into()));
        }
        if self.max_operations == 0 || self.max_operations > MAX_OPERATIONS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_operations must be between 1 and {MAX_OPERATIONS_LIMIT}, got {}",
                self.max_operations
            )));
        }
        if self.initial_bankroll.is_nan() || self.initial_bankroll <= 0.0 {
            return Err(ConfigError::Invalid("initial bankroll must be positive".into()));
        }
        if self.operating_minimum < 0.0 {
            return Err(ConfigError::Invalid("operating minimum cannot be negative".into()));
        }
        if self.max_operations <= 3 {
            warn!(
                max_operations = self.max_operations,
                "three or fewer operations per activation tends to underperform the fixed strategy"
            );
        }
        Ok(())
    }
}

/// Named starting points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// 1000 rounds, 5 operations.
    Optimal,
    /// 500 rounds, 10 operations.
    MaxAdvantage,
    /// 100 rounds, 10 operations.
    Quick,
}

impl Preset {
    pub fn to_config(self) -> SessionConfig {
        let (rounds, max_operations) = match self {
            Preset::Optimal => (1000, 5),
            Preset::MaxAdvantage => (500, 10),
            Preset::Quick => (100, 10),
        };
        SessionConfig {
            rounds,
            max_operations,
            seed: None,
            initial_bankroll: 200.0,
            operating_minimum: 11.0,
            bankroll_mode: StrategyMode::Adaptive,
            patterns: Vec::new(),
            patterns_file: None,
            history_file: None,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimal" => Ok(Preset::Optimal),
            "max_advantage" => Ok(Preset::MaxAdvantage),
            "quick" => Ok(Preset::Quick),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

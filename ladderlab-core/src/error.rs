//! Core error taxonomy.
//!
//! Degenerate-but-valid inputs (no triggers, zero investment, too few symbols
//! after a trigger) are not errors; they produce zero-valued results.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid sequence: {reason}")]
    InvalidSequence { reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

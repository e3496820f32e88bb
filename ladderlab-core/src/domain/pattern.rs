//! The two-color target sequence that triggers an activation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Symbol;
use crate::error::SimError;

/// Ordered, non-empty sequence of `Black`/`Red` symbols.
///
/// Construction goes through [`Pattern::new`] or [`str::parse`], both of which
/// reject wildcards and empty input, so a `Pattern` value never contains a
/// wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern(Vec<Symbol>);

impl Pattern {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, SimError> {
        if symbols.is_empty() {
            return Err(SimError::InvalidPattern {
                pattern: String::new(),
                reason: "pattern is empty".into(),
            });
        }
        if symbols.iter().any(|s| s.is_wildcard()) {
            return Err(SimError::InvalidPattern {
                pattern: symbols.iter().map(|s| s.as_char()).collect(),
                reason: "patterns may only contain B and R".into(),
            });
        }
        Ok(Self(symbols))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count_red(&self) -> usize {
        self.0.iter().filter(|&&s| s == Symbol::Red).count()
    }

    pub fn count_black(&self) -> usize {
        self.0.iter().filter(|&&s| s == Symbol::Black).count()
    }

    /// True if the pattern is `RBRB...` or `BRBR...` with an even length.
    pub fn is_strict_alternation(&self) -> bool {
        let half = self.len() / 2;
        if half == 0 || self.len() % 2 != 0 {
            return false;
        }
        let starts_with = self.0[0];
        self.0.chunks(2).all(|pair| {
            pair.len() == 2 && pair[0] == starts_with && pair[1] != starts_with
        })
    }
}

impl FromStr for Pattern {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SimError::InvalidPattern {
                pattern: s.to_string(),
                reason: "pattern is empty".into(),
            });
        }
        let mut symbols = Vec::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            match Symbol::from_char(c) {
                Some(Symbol::Wildcard) | None => {
                    return Err(SimError::InvalidPattern {
                        pattern: s.to_string(),
                        reason: format!("unexpected character '{c}'; patterns may only contain B and R"),
                    })
                }
                Some(sym) => symbols.push(sym),
            }
        }
        Self::new(symbols)
    }
}

impl TryFrom<String> for Pattern {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pattern> for String {
    fn from(p: Pattern) -> Self {
        p.to_string()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.0 {
            write!(f, "{}", s.as_char())?;
        }
        Ok(())
    }
}

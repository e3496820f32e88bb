//! One outcome of the wheel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single outcome: one of the two colors or the rare wildcard.
///
/// The wildcard is invisible to wildcard-tolerant pattern detection but always
/// counts as a lost bet on the staking ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Black,
    Red,
    Wildcard,
}

impl Symbol {
    /// Canonical single-character form: `B`, `R`, or `0`.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Black => 'B',
            Symbol::Red => 'R',
            Symbol::Wildcard => '0',
        }
    }

    /// Parse the canonical single-character form (case-insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(Symbol::Black),
            'R' => Some(Symbol::Red),
            '0' => Some(Symbol::Wildcard),
            _ => None,
        }
    }

    /// Parse a token as found in historical result files.
    ///
    /// Accepts the single-character form as well as the spelled-out color
    /// names `RED`, `BLACK`, and `GREEN` (the wheel's zero).
    pub fn from_token(token: &str) -> Option<Self> {
        let upper = token.trim().to_ascii_uppercase();
        match upper.as_str() {
            "R" | "RED" => Some(Symbol::Red),
            "B" | "BLACK" => Some(Symbol::Black),
            "0" | "GREEN" => Some(Symbol::Wildcard),
            _ => None,
        }
    }

    pub fn is_wildcard(self) -> bool {
        self == Symbol::Wildcard
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

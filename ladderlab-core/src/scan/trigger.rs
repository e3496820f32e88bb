//! Literal trigger scanner (simulation path).

use super::find_from;
use crate::domain::{Pattern, Symbol};

/// Find non-overlapping literal occurrences of `pattern` in the raw stream.
///
/// A wildcard never matches a pattern symbol, so any wildcard inside a
/// would-be match breaks it. Each entry is the 0-based raw index immediately
/// after the match; entries are strictly increasing.
pub fn scan_triggers(raw: &[Symbol], pattern: &Pattern) -> Vec<usize> {
    let needle = pattern.symbols();
    let mut triggers = Vec::new();
    let mut start = 0;
    while let Some(pos) = find_from(raw, needle, start) {
        let end = pos + needle.len();
        triggers.push(end);
        start = end;
    }
    triggers
}

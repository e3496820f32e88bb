//! Wildcard-tolerant pattern locator (analysis path).

use super::{filter_wildcards, find_from};
use crate::domain::{Pattern, Symbol};

/// Find non-overlapping occurrences of `pattern`, ignoring wildcards.
///
/// Each entry is the 1-indexed raw position of the match's last symbol.
pub fn locate_pattern(raw: &[Symbol], pattern: &Pattern) -> Vec<usize> {
    let view = filter_wildcards(raw);
    let needle = pattern.symbols();
    let mut positions = Vec::new();
    let mut start = 0;
    while let Some(pos) = find_from(&view.symbols, needle, start) {
        let last = view.raw_index[pos + needle.len() - 1];
        positions.push(last + 1);
        start = pos + needle.len();
    }
    positions
}

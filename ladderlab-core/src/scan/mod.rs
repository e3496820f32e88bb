//! Pattern scanning over outcome streams.
//!
//! Two deliberately distinct match semantics live here:
//! - [`locate_pattern`] works on the wildcard-free view, so a match may span
//!   raw positions holding wildcards. Used by historical analysis.
//! - [`scan_triggers`] matches literally against the raw stream, where a
//!   wildcard breaks any match. This is the only trigger source for staking.
//!
//! Both scans are non-overlapping: after a match the search resumes at the
//! match end.

pub mod filter;
pub mod locator;
pub mod trigger;

pub use filter::{filter_wildcards, FilteredView};
pub use locator::locate_pattern;
pub use trigger::scan_triggers;

/// Index of the first occurrence of `needle` in `haystack` at or after `start`.
pub(crate) fn find_from<T: PartialEq>(haystack: &[T], needle: &[T], start: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let last_start = haystack.len() - needle.len();
    (start..=last_start).find(|&i| haystack[i..i + needle.len()] == *needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_from_respects_start() {
        let hay = [1, 2, 1, 2, 1];
        assert_eq!(find_from(&hay, &[1, 2], 0), Some(0));
        assert_eq!(find_from(&hay, &[1, 2], 1), Some(2));
        assert_eq!(find_from(&hay, &[1, 2], 3), None);
        assert_eq!(find_from(&hay, &[1, 2], 10), None);
    }

    #[test]
    fn find_from_degenerate_needles() {
        let hay = [1, 2];
        assert_eq!(find_from(&hay, &[], 0), None);
        assert_eq!(find_from(&hay, &[1, 2, 3], 0), None);
    }
}

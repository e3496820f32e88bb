//! Projects a raw stream onto its two-color view.

use crate::domain::Symbol;

/// Wildcard-free projection of a raw slice, with the back-mapping from
/// filtered index to raw index. Derived per query, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilteredView {
    pub symbols: Vec<Symbol>,
    pub raw_index: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Drop every wildcard, preserving the relative order of the colors.
pub fn filter_wildcards(raw: &[Symbol]) -> FilteredView {
    let mut view = FilteredView {
        symbols: Vec::with_capacity(raw.len()),
        raw_index: Vec::with_capacity(raw.len()),
    };
    for (i, &s) in raw.iter().enumerate() {
        if !s.is_wildcard() {
            view.symbols.push(s);
            view.raw_index.push(i);
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawSequence;

    #[test]
    fn removes_wildcards_and_maps_back() {
        let raw: RawSequence = "R0B00R".parse().unwrap();
        let view = filter_wildcards(raw.symbols());
        assert_eq!(view.symbols, vec![Symbol::Red, Symbol::Black, Symbol::Red]);
        assert_eq!(view.raw_index, vec![0, 2, 5]);
    }

    #[test]
    fn all_wildcards_gives_empty_view() {
        let raw: RawSequence = "000".parse().unwrap();
        assert!(filter_wildcards(raw.symbols()).is_empty());
    }

    #[test]
    fn no_wildcards_is_identity() {
        let raw: RawSequence = "RBRB".parse().unwrap();
        let view = filter_wildcards(raw.symbols());
        assert_eq!(view.symbols, raw.symbols());
        assert_eq!(view.raw_index, vec![0, 1, 2, 3]);
    }
}

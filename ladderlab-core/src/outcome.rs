//! Draws symbols from the fixed three-way distribution.
//!
//! Black 48.5%, Red 48.5%, Wildcard 3.0%. A single uniform draw over `[0, 1)`
//! is partitioned at [`BLACK_CUTOFF`] and [`RED_CUTOFF`].

use rand::Rng;

use crate::domain::{RawSequence, Symbol};

/// Upper bound (exclusive) of the Black band.
pub const BLACK_CUTOFF: f64 = 0.485;

/// Upper bound (exclusive) of the Red band; everything above is Wildcard.
pub const RED_CUTOFF: f64 = 0.970;

/// Map one uniform draw in `[0, 1)` onto a symbol.
pub fn symbol_for_draw(u: f64) -> Symbol {
    if u < BLACK_CUTOFF {
        Symbol::Black
    } else if u < RED_CUTOFF {
        Symbol::Red
    } else {
        Symbol::Wildcard
    }
}

/// Lazy, non-restartable stream of symbols backed by a random generator.
pub struct OutcomeSource<R: Rng> {
    rng: R,
}

impl<R: Rng> OutcomeSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn draw(&mut self) -> Symbol {
        symbol_for_draw(self.rng.gen::<f64>())
    }

    /// Materialize the first `rounds` symbols into an immutable sequence.
    pub fn generate(&mut self, rounds: usize) -> RawSequence {
        RawSequence::new(self.by_ref().take(rounds).collect())
    }
}

impl<R: Rng> Iterator for OutcomeSource<R> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        Some(self.draw())
    }
}

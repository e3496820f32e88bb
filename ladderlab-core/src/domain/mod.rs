//! Domain types for LadderLab

pub mod ids;
pub mod pattern;
pub mod sequence;
pub mod symbol;

pub use ids::DatasetHash;
pub use pattern::Pattern;
pub use sequence::{RawSequence, SequenceStats, Tendency};
pub use symbol::Symbol;

//! LadderLab Core — outcome stream, pattern scanning, confidence scoring, and
//! staking ladder simulation.
//!
//! This crate contains the simulation heart:
//! - Domain types (symbols, patterns, raw sequences)
//! - Seeded outcome generation with a deterministic RNG hierarchy
//! - Wildcard filtering, wildcard-tolerant pattern location, literal trigger scanning
//! - Multi-window confidence scoring over an explicit constant table
//! - Ladder-based operations, activations, and whole-stream strategy simulation
//! - Historical sequence analysis
//!
//! Everything is synchronous and pure over an immutable [`domain::RawSequence`].

pub mod analysis;
pub mod confidence;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ladder;
pub mod outcome;
pub mod rng;
pub mod scan;

pub use error::SimError;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: public result and config types are Send + Sync so a
    /// driver can evaluate patterns or replicates on worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Symbol>();
        require_sync::<domain::Symbol>();
        require_send::<domain::Pattern>();
        require_sync::<domain::Pattern>();
        require_send::<domain::RawSequence>();
        require_sync::<domain::RawSequence>();

        require_send::<confidence::ConfidenceConfig>();
        require_sync::<confidence::ConfidenceConfig>();
        require_send::<ladder::Ladder>();
        require_sync::<ladder::Ladder>();

        require_send::<engine::AggregateResult>();
        require_sync::<engine::AggregateResult>();
        require_send::<engine::StrategyComparison>();
        require_sync::<engine::StrategyComparison>();
        require_send::<engine::StrategySimulator<'static>>();
        require_sync::<engine::StrategySimulator<'static>>();

        require_send::<rng::RngHierarchy>();
        require_sync::<rng::RngHierarchy>();
        require_send::<analysis::HistoryAnalysis>();
        require_sync::<analysis::HistoryAnalysis>();
    }

    #[test]
    fn simulator_shares_sequence_read_only() {
        // Two simulators over one sequence see identical results.
        let seq: domain::RawSequence = "BRRBRRBRRB0RRBRRBRR".parse().unwrap();
        let a = engine::StrategySimulator::new(&seq, 2).unwrap();
        let b = engine::StrategySimulator::new(&seq, 2).unwrap();
        let pattern: domain::Pattern = "RR".parse().unwrap();
        assert_eq!(a.compare(&pattern), b.compare(&pattern));
    }
}

//! Criterion benchmarks for LadderLab hot paths.
//!
//! Benchmarks:
//! 1. Trigger scanning over a long synthetic stream
//! 2. Confidence scoring of a single trigger
//! 3. Full strategy comparison (both modes) per pattern

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ladderlab_core::confidence::{assess, ConfidenceConfig};
use ladderlab_core::domain::{Pattern, RawSequence};
use ladderlab_core::engine::StrategySimulator;
use ladderlab_core::outcome::OutcomeSource;
use ladderlab_core::rng::RngHierarchy;
use ladderlab_core::scan::scan_triggers;

fn make_sequence(rounds: usize) -> RawSequence {
    let mut rng = RngHierarchy::new(42).rng_for("bench", 0);
    OutcomeSource::new(&mut rng).generate(rounds)
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_triggers");
    let pattern: Pattern = "RBRBRB".parse().unwrap();
    for rounds in [1_000usize, 10_000, 100_000] {
        let seq = make_sequence(rounds);
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &seq, |b, seq| {
            b.iter(|| scan_triggers(black_box(seq.symbols()), black_box(&pattern)))
        });
    }
    group.finish();
}

fn bench_confidence(c: &mut Criterion) {
    let seq = make_sequence(60);
    let pattern: Pattern = "RRBRRB".parse().unwrap();
    let config = ConfidenceConfig::default();
    c.bench_function("confidence_assess", |b| {
        b.iter(|| assess(black_box(&pattern), black_box(seq.symbols()), 10, &config))
    });
}

fn bench_compare(c: &mut Criterion) {
    let seq = make_sequence(10_000);
    let sim = StrategySimulator::new(&seq, 5).unwrap();
    let patterns: Vec<Pattern> = ["RR", "RBRB", "BBBBBB", "RRBBRR"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    c.bench_function("strategy_compare_4_patterns", |b| {
        b.iter(|| {
            for p in &patterns {
                black_box(sim.compare(p));
            }
        })
    });
}

criterion_group!(benches, bench_scan, bench_confidence, bench_compare);
criterion_main!(benches);

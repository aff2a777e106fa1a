//! End-to-end analysis benchmarks.
//!
//! Measures a single-species run and a run across every registered species,
//! which fans out over profiles when the `parallel` feature is enabled.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use corridor_benches::{
    error::BenchSetupError,
    params::AnalysisBenchParams,
    source::{SyntheticFleetConfig, generate_fleet},
};
use corridor_core::{AnalyzerBuilder, SpeciesKind};

/// Seed used for all synthetic fleets in this benchmark.
const SEED: u64 = 7;

/// Fleet sizes to benchmark.
const GARDEN_COUNTS: &[usize] = &[100, 500, 2_000];

/// Side of the square every fleet is scattered over.
const EXTENT_KM: f64 = 15.0;

fn analyze_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let analyzer = AnalyzerBuilder::new().build()?;
    let mut group = c.benchmark_group("analyze");
    group.sample_size(20);

    for &garden_count in GARDEN_COUNTS {
        let gardens = generate_fleet(&SyntheticFleetConfig {
            garden_count,
            extent_km: EXTENT_KM,
            seed: SEED,
        })?;
        let params = AnalysisBenchParams { garden_count };

        group.bench_with_input(
            BenchmarkId::new("single_species", params),
            &gardens,
            |b, fleet| {
                b.iter(|| analyzer.run(fleet, SpeciesKind::Bee));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("all_species", params),
            &gardens,
            |b, fleet| {
                b.iter(|| analyzer.run_all(fleet));
            },
        );
    }

    group.finish();
    Ok(())
}

fn analyze(c: &mut Criterion) {
    if let Err(err) = analyze_impl(c) {
        panic!("analyze benchmark setup failed: {err}");
    }
}

criterion_group!(benches, analyze);
criterion_main!(benches);

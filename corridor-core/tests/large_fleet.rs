//! Fleets above the automatic grid switch and the parallel sharding cutoff.

use corridor_core::{
    AnalyzerBuilder, Connection, GRID_THRESHOLD, Garden, GraphSettings, PairStrategy,
    SpeciesKind, SpeciesProfile, build_graph,
};
use corridor_test_support::{fixtures::meridian_row, tracing::RecordingLayer};
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

const FLEET_SIZE: usize = 2_100;
const ROW_SPACING_KM: f64 = 0.12;

/// Every garden links to its four nearest neighbours on each side: 0.48 km is
/// in range and 0.60 km is not.
const ROW_EDGES: usize = 4 * FLEET_SIZE - (4 + 3 + 2 + 1);

#[fixture]
fn row() -> Vec<Garden> {
    meridian_row(FLEET_SIZE, ROW_SPACING_KM)
}

/// A 46 by 46 lattice around 40°N with deterministic sub-cell offsets, so
/// pairs straddle grid cell borders in every direction.
#[fixture]
fn lattice() -> Vec<Garden> {
    let side = 46_usize;
    (0..side * side)
        .map(|index| {
            let (row, col) = (index / side, index % side);
            let jitter_lat = ((index * 7_919) % 97) as f64 / 97.0 * 0.15;
            let jitter_lng = ((index * 104_729) % 89) as f64 / 89.0 * 0.15;
            Garden::new(
                format!("lattice-{index}"),
                40.0 + (row as f64 * 0.35 + jitter_lat) / 111.0,
                -111.0 + (col as f64 * 0.35 + jitter_lng) / 85.0,
                (index % 101) as f64,
                "",
            )
            .expect("lattice gardens are valid")
        })
        .collect()
}

fn edges_with(gardens: &[Garden], pairing: PairStrategy) -> Vec<Connection> {
    let settings = GraphSettings {
        pairing,
        ..GraphSettings::default()
    };
    build_graph(
        gardens,
        &SpeciesProfile::default_for(SpeciesKind::All),
        &settings,
    )
}

fn assert_fleet_is_large(gardens: &[Garden]) {
    assert!(gardens.len() > GRID_THRESHOLD);
    #[cfg(feature = "parallel")]
    assert!(gardens.len() >= corridor_core::PARALLEL_THRESHOLD);
}

#[rstest]
fn row_edges_agree_across_strategies(row: Vec<Garden>) {
    assert_fleet_is_large(&row);
    let brute_force = edges_with(&row, PairStrategy::BruteForce);
    assert_eq!(brute_force.len(), ROW_EDGES);
    assert_eq!(edges_with(&row, PairStrategy::Auto), brute_force);
    assert_eq!(edges_with(&row, PairStrategy::Grid), brute_force);
}

#[rstest]
fn lattice_edges_agree_across_strategies(lattice: Vec<Garden>) {
    assert_fleet_is_large(&lattice);
    let brute_force = edges_with(&lattice, PairStrategy::BruteForce);
    assert!(!brute_force.is_empty());
    assert_eq!(edges_with(&lattice, PairStrategy::Auto), brute_force);
    assert_eq!(edges_with(&lattice, PairStrategy::Grid), brute_force);
}

#[rstest]
#[case::auto(PairStrategy::Auto, "grid")]
#[case::forced_brute_force(PairStrategy::BruteForce, "brute_force")]
fn auto_switches_to_grid_above_threshold(
    row: Vec<Garden>,
    #[case] pairing: PairStrategy,
    #[case] expected_plan: &str,
) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let edges = tracing::subscriber::with_default(subscriber, || edges_with(&row, pairing));

    assert_eq!(edges.len(), ROW_EDGES);
    let span = layer
        .span("core.build_graph")
        .expect("core.build_graph span recorded");
    assert_eq!(span.field("plan"), Some(expected_plan));
    assert_eq!(span.field("gardens"), Some("2100"));
    assert_eq!(span.field("edges"), Some("8390"));
}

#[rstest]
fn large_row_forms_one_healthy_cluster(row: Vec<Garden>) {
    let analysis = AnalyzerBuilder::new()
        .build()
        .expect("defaults are valid")
        .run(&row, SpeciesKind::All)
        .expect("row is valid");
    let stats = analysis.statistics();
    assert_eq!(stats.total_gardens, FLEET_SIZE);
    assert_eq!(stats.total_edges, ROW_EDGES);
    assert_eq!(stats.isolated_gardens, 0);
    assert_eq!(stats.network_health, 100);
    assert_eq!(stats.corridor_clusters, 1);
    assert_eq!(stats.largest_cluster, FLEET_SIZE);
    assert!(analysis.gap_zones().is_empty());
}

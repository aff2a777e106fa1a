//! Probes for the planar distance approximation and its limits.

use corridor_core::{
    AnalyzerBuilder, Coordinates, DistanceModel, Garden, SpeciesKind, SpeciesProfile,
    haversine_km,
};
use rstest::rstest;

fn point(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).expect("valid coordinates")
}

#[rstest]
#[case::north_south(0.01, 0.0)]
#[case::east_west(0.0, 0.01)]
#[case::diagonal(0.01, 0.01)]
fn planar_default_tracks_haversine_near_forty_degrees(#[case] dlat: f64, #[case] dlng: f64) {
    let a = point(40.0, -111.0);
    let b = point(40.0 + dlat, -111.0 + dlng);
    let planar = DistanceModel::default().distance_km(a, b);
    let geodesic = haversine_km(a, b);
    assert!(
        (planar - geodesic).abs() / geodesic < 0.01,
        "planar {planar} vs haversine {geodesic}"
    );
}

#[test]
fn default_scale_underestimates_east_west_distance_at_equator() {
    let a = point(0.0, 10.0);
    let b = point(0.0, 10.01);
    let planar = DistanceModel::default().distance_km(a, b);
    let geodesic = haversine_km(a, b);
    assert!((planar - 0.85).abs() < 1e-9);
    assert!((geodesic - 1.112).abs() < 1e-3);
    assert!(planar < geodesic * 0.8);

    let local = DistanceModel::planar_for_latitude(0.0).expect("equator is a valid reference");
    assert!((local.distance_km(a, b) - geodesic).abs() / geodesic < 0.002);
}

#[test]
fn scale_mismatch_changes_connectivity_at_equator() {
    let gardens = vec![
        Garden::new("west", 0.0, 10.0, 50.0, "").expect("valid garden"),
        Garden::new("east", 0.0, 10.01, 50.0, "").expect("valid garden"),
    ];
    let one_km = SpeciesProfile::default_for(SpeciesKind::Butterfly)
        .with_max_range_km(1.0)
        .expect("positive range");

    let planar = AnalyzerBuilder::new()
        .with_profile(one_km.clone())
        .build()
        .expect("valid configuration")
        .run(&gardens, SpeciesKind::Butterfly)
        .expect("valid input");
    assert_eq!(planar.edges().len(), 1, "0.85 km under the default scale");

    let geodesic = AnalyzerBuilder::new()
        .with_profile(one_km)
        .with_distance_model(DistanceModel::Haversine)
        .build()
        .expect("valid configuration")
        .run(&gardens, SpeciesKind::Butterfly)
        .expect("valid input");
    assert!(geodesic.edges().is_empty(), "1.11 km on the sphere");
}

#[rstest]
#[case(35.0, true)]
#[case(-45.0, true)]
#[case(55.0, false)]
#[case(0.0, false)]
fn default_scale_reference_band(#[case] latitude: f64, #[case] covered: bool) {
    assert_eq!(DistanceModel::default().covers_latitude(latitude), covered);
    assert!(DistanceModel::Haversine.covers_latitude(latitude));
}

//! Gap-zone search: where a new garden would reconnect an isolated one.
//!
//! The search is a bounded greedy heuristic anchored on isolated gardens. For
//! each one it looks for gardens just beyond flight range and proposes the
//! mean of the midpoints between the isolated garden and its nearest such
//! neighbours. Using midpoints rather than the neighbours' centroid keeps the
//! proposal inside the gap instead of inside the neighbouring cluster.

use std::sync::Arc;

use serde::Serialize;
use tracing::{Span, field, instrument};

use crate::{
    classify::Classifications,
    distance::DistanceModel,
    error::ConfigError,
    garden::{Coordinates, Garden},
    species::SpeciesProfile,
};

/// Tunable bounds of the gap search window.
///
/// # Examples
/// ```
/// use corridor_core::GapSearch;
///
/// let search = GapSearch::default();
/// assert_eq!(search.search_multiplier(), 3.0);
/// assert_eq!(search.max_neighbours(), 3);
/// assert!(GapSearch::new(1.0, 3).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapSearch {
    search_multiplier: f64,
    max_neighbours: usize,
}

impl Default for GapSearch {
    fn default() -> Self {
        Self {
            search_multiplier: Self::DEFAULT_SEARCH_MULTIPLIER,
            max_neighbours: Self::DEFAULT_MAX_NEIGHBOURS,
        }
    }
}

impl GapSearch {
    /// Default outer bound of the search window, in multiples of the range.
    pub const DEFAULT_SEARCH_MULTIPLIER: f64 = 3.0;
    /// Default cap on neighbours contributing to one gap zone.
    pub const DEFAULT_MAX_NEIGHBOURS: usize = 3;

    /// Builds a search window.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] when the multiplier is not a
    /// finite number above 1 (the window would be empty) or when
    /// `max_neighbours` is zero.
    pub fn new(search_multiplier: f64, max_neighbours: usize) -> Result<Self, ConfigError> {
        if !search_multiplier.is_finite() || search_multiplier <= 1.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "search_multiplier",
                reason: format!("{search_multiplier} must be finite and greater than 1").into(),
            });
        }
        if max_neighbours == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_neighbours",
                reason: Arc::from("must be at least 1"),
            });
        }
        Ok(Self {
            search_multiplier,
            max_neighbours,
        })
    }

    /// Returns the outer bound of the window in multiples of the range.
    #[must_use]
    pub const fn search_multiplier(&self) -> f64 {
        self.search_multiplier
    }

    /// Returns the neighbour cap.
    #[must_use]
    pub const fn max_neighbours(&self) -> usize {
        self.max_neighbours
    }
}

/// A proposed location for a new garden.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapZone {
    #[serde(flatten)]
    coordinates: Coordinates,
    priority: usize,
    potential_connections: usize,
    contributing_garden_ids: Vec<Arc<str>>,
}

impl GapZone {
    /// Returns the proposed location.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Returns the number of out-of-range neighbours that shaped the proposal.
    #[must_use]
    pub const fn priority(&self) -> usize {
        self.priority
    }

    /// Returns the number of gardens a new garden here could join up.
    #[must_use]
    pub const fn potential_connections(&self) -> usize {
        self.potential_connections
    }

    /// Returns the isolated garden id followed by its contributing neighbours,
    /// nearest first.
    #[must_use]
    pub fn contributing_garden_ids(&self) -> &[Arc<str>] {
        &self.contributing_garden_ids
    }

    /// Returns the id of the isolated garden this zone serves.
    #[must_use]
    pub fn isolated_garden_id(&self) -> &str {
        // Zones are only built with the isolated id in first position.
        &self.contributing_garden_ids[0]
    }
}

/// Proposes gap zones for the isolated gardens of a run.
///
/// Isolated gardens with no other garden strictly between the flight range and
/// `search_multiplier` times the range produce no zone.
///
/// # Examples
/// ```
/// use corridor_core::{
///     DEFAULT_HUB_THRESHOLD, DistanceModel, GapSearch, Garden, GraphSettings, SpeciesKind,
///     SpeciesProfile, build_graph, classify, find_gaps,
/// };
///
/// let gardens = vec![
///     Garden::new("a", 40.0, -111.0, 50.0, "")?,
///     Garden::new("b", 40.008, -111.0, 50.0, "")?,
/// ];
/// let profile = SpeciesProfile::default_for(SpeciesKind::All);
/// let edges = build_graph(&gardens, &profile, &GraphSettings::default());
/// let nodes = classify(&gardens, &edges, DEFAULT_HUB_THRESHOLD);
/// let zones = find_gaps(&gardens, &nodes, &profile, &DistanceModel::default(), &GapSearch::default());
/// assert_eq!(zones.len(), 2);
/// assert!((zones[0].coordinates().latitude() - 40.004).abs() < 1e-9);
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[instrument(
    name = "core.find_gaps",
    skip_all,
    fields(
        gardens = gardens.len(),
        species = %profile.kind(),
        isolated = field::Empty,
        zones = field::Empty,
    ),
)]
pub fn find_gaps(
    gardens: &[Garden],
    classifications: &Classifications,
    profile: &SpeciesProfile,
    distance: &DistanceModel,
    search: &GapSearch,
) -> Vec<GapZone> {
    let range_km = profile.max_range_km();
    let outer_km = range_km * search.search_multiplier();

    let isolated: Vec<usize> = gardens
        .iter()
        .enumerate()
        .filter(|(_, garden)| {
            classifications
                .get(garden.id())
                .is_some_and(|node| node.is_isolated())
        })
        .map(|(index, _)| index)
        .collect();

    let zones: Vec<GapZone> = isolated
        .iter()
        .filter_map(|&anchor| {
            let origin = gardens[anchor].coordinates();
            let mut window: Vec<(f64, usize)> = gardens
                .iter()
                .enumerate()
                .filter(|&(other, _)| other != anchor)
                .map(|(other, garden)| (distance.distance_km(origin, garden.coordinates()), other))
                .filter(|&(km, _)| km > range_km && km < outer_km)
                .collect();
            window.sort_unstable_by(|left, right| {
                left.0.total_cmp(&right.0).then(left.1.cmp(&right.1))
            });
            window.truncate(search.max_neighbours());

            let coordinates = Coordinates::centroid(
                window
                    .iter()
                    .map(|&(_, other)| origin.midpoint(&gardens[other].coordinates())),
            )?;
            let priority = window.len();
            let contributing_garden_ids = std::iter::once(anchor)
                .chain(window.iter().map(|&(_, other)| other))
                .map(|index| gardens[index].shared_id())
                .collect();
            Some(GapZone {
                coordinates,
                priority,
                potential_connections: priority + 1,
                contributing_garden_ids,
            })
        })
        .collect();

    let span = Span::current();
    span.record("isolated", isolated.len());
    span.record("zones", zones.len());
    zones
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{DEFAULT_HUB_THRESHOLD, GraphSettings, SpeciesKind, build_graph, classify};

    fn garden(id: &str, latitude: f64, longitude: f64) -> Garden {
        Garden::new(id, latitude, longitude, 50.0, "").expect("valid test garden")
    }

    fn zones_for(gardens: &[Garden], search: GapSearch) -> Vec<GapZone> {
        let profile = SpeciesProfile::default_for(SpeciesKind::All);
        let edges = build_graph(gardens, &profile, &GraphSettings::default());
        let nodes = classify(gardens, &edges, DEFAULT_HUB_THRESHOLD);
        find_gaps(gardens, &nodes, &profile, &DistanceModel::default(), &search)
    }

    #[test]
    fn neighbours_are_capped_and_nearest_first() {
        // Four gardens due north at 0.6, 0.7, 0.8 and 0.9 km, all mutually
        // within range of each other but out of range of the anchor.
        let gardens = vec![
            garden("anchor", 40.0, -111.0),
            garden("n4", 40.0 + 0.9 / 111.0, -111.0),
            garden("n1", 40.0 + 0.6 / 111.0, -111.0),
            garden("n3", 40.0 + 0.8 / 111.0, -111.0),
            garden("n2", 40.0 + 0.7 / 111.0, -111.0),
        ];
        let zones = zones_for(&gardens, GapSearch::default());
        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        assert_eq!(zone.isolated_garden_id(), "anchor");
        let ids: Vec<&str> = zone.contributing_garden_ids().iter().map(|id| &**id).collect();
        assert_eq!(ids, ["anchor", "n1", "n2", "n3"]);
        assert_eq!(zone.priority(), 3);
        assert_eq!(zone.potential_connections(), 4);
        let expected_lat = 40.0 + (0.6 + 0.7 + 0.8) / 111.0 / 2.0 / 3.0;
        assert!((zone.coordinates().latitude() - expected_lat).abs() < 1e-12);
        assert!((zone.coordinates().longitude() + 111.0).abs() < 1e-12);
    }

    // Ranges are exact fractions of the pair distance and the multiplier is 2,
    // so both window bounds can be hit without rounding.
    #[rstest]
    #[case::at_range(1.0, 0)]
    #[case::inside_window(1.5, 2)]
    #[case::at_outer_bound(2.0, 0)]
    #[case::beyond_window(4.0, 0)]
    fn window_bounds_are_exclusive(#[case] divisor: f64, #[case] expected: usize) {
        let gardens = vec![garden("a", 40.0, -111.0), garden("b", 40.007, -111.0)];
        let model = DistanceModel::default();
        let pair_km = model.distance_km(gardens[0].coordinates(), gardens[1].coordinates());
        let profile = SpeciesProfile::default_for(SpeciesKind::All)
            .with_max_range_km(pair_km / divisor)
            .expect("positive range");
        let edges = build_graph(&gardens, &profile, &GraphSettings::default());
        let nodes = classify(&gardens, &edges, DEFAULT_HUB_THRESHOLD);
        let search = GapSearch::new(2.0, 3).expect("valid search");
        let zones = find_gaps(&gardens, &nodes, &profile, &model, &search);
        assert_eq!(zones.len(), expected, "divisor {divisor}");
    }

    #[test]
    fn wider_multiplier_reaches_farther_neighbours() {
        let gardens = vec![garden("a", 40.0, -111.0), garden("b", 40.0 + 2.0 / 111.0, -111.0)];
        assert!(zones_for(&gardens, GapSearch::default()).is_empty());
        let wide = GapSearch::new(5.0, 3).expect("valid search");
        let zones = zones_for(&gardens, wide);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].isolated_garden_id(), "b");
    }

    #[test]
    fn connected_gardens_never_anchor_zones() {
        let gardens = vec![
            garden("a", 40.0, -111.0),
            garden("b", 40.001, -111.0),
            garden("c", 40.0 + 1.0 / 111.0, -111.0),
        ];
        let zones = zones_for(&gardens, GapSearch::default());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].isolated_garden_id(), "c");
    }

    #[rstest]
    #[case(f64::NAN, 3)]
    #[case(0.5, 3)]
    #[case(3.0, 0)]
    fn invalid_search_is_rejected(#[case] multiplier: f64, #[case] max_neighbours: usize) {
        let err = GapSearch::new(multiplier, max_neighbours).expect_err("invalid search");
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }
}

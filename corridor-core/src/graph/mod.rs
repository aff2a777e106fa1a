//! Corridor graph construction.
//!
//! Every unordered garden pair within the active flight range becomes exactly
//! one [`Connection`]. Pairs are enumerated either exhaustively or through a
//! uniform grid that discards pairs beyond range before measuring them; both
//! paths yield the same edges in the same order.

mod grid;
mod strength;

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{Span, debug, field, instrument, warn};

use crate::{distance::DistanceModel, garden::Garden, species::SpeciesProfile};

use self::grid::GridIndex;
pub use self::strength::StrengthModel;

/// Garden count above which [`PairStrategy::Auto`] switches to the grid.
pub const GRID_THRESHOLD: usize = 1_000;

/// Garden count at which pair generation is sharded across worker threads.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 2_048;

/// An undirected corridor between two gardens within flight range.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    from_id: Arc<str>,
    to_id: Arc<str>,
    distance_km: f64,
    strength: f64,
    #[serde(skip)]
    from_index: usize,
    #[serde(skip)]
    to_index: usize,
}

impl Connection {
    /// Returns the id of the endpoint that appears first in the input.
    #[must_use]
    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    /// Returns the id of the endpoint that appears second in the input.
    #[must_use]
    pub fn to_id(&self) -> &str {
        &self.to_id
    }

    /// Returns the estimated corridor length.
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Returns the corridor strength in `[0, 1]`.
    #[must_use]
    pub const fn strength(&self) -> f64 {
        self.strength
    }

    /// Returns the input positions of both endpoints, smaller first.
    #[must_use]
    pub const fn endpoints(&self) -> (usize, usize) {
        (self.from_index, self.to_index)
    }

    /// Reports whether `id` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, id: &str) -> bool {
        &*self.from_id == id || &*self.to_id == id
    }
}

/// How candidate pairs are enumerated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PairStrategy {
    /// Use the grid for planar models above [`GRID_THRESHOLD`] gardens.
    #[default]
    Auto,
    /// Measure every unordered pair.
    BruteForce,
    /// Measure only pairs in neighbouring grid cells.
    Grid,
}

impl PairStrategy {
    /// Returns a stable label for logs and summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::BruteForce => "brute_force",
            Self::Grid => "grid",
        }
    }
}

/// Geometry and scoring inputs shared by graph construction and gap search.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphSettings {
    /// Distance estimator.
    pub distance: DistanceModel,
    /// Edge strength weighting.
    pub strength: StrengthModel,
    /// Pair enumeration strategy.
    pub pairing: PairStrategy,
}

enum Plan {
    BruteForce,
    Grid((f64, f64)),
}

impl GraphSettings {
    fn plan(&self, gardens: usize, range_km: f64) -> Plan {
        let wants_grid = match self.pairing {
            PairStrategy::BruteForce => false,
            PairStrategy::Grid => true,
            PairStrategy::Auto => gardens > GRID_THRESHOLD,
        };
        if !wants_grid {
            return Plan::BruteForce;
        }
        match self.distance.search_extent_degrees(range_km) {
            Some(extent) => Plan::Grid(extent),
            None => {
                if self.pairing == PairStrategy::Grid {
                    warn!(
                        model = self.distance.label(),
                        "grid pairing needs a planar distance model, measuring every pair"
                    );
                }
                Plan::BruteForce
            }
        }
    }

    fn connect(
        &self,
        gardens: &[Garden],
        from: usize,
        to: usize,
        range_km: f64,
    ) -> Option<Connection> {
        let (left, right) = (&gardens[from], &gardens[to]);
        let distance_km = self
            .distance
            .distance_km(left.coordinates(), right.coordinates());
        (distance_km <= range_km).then(|| Connection {
            from_id: left.shared_id(),
            to_id: right.shared_id(),
            distance_km,
            strength: self.strength.score(
                distance_km,
                range_km,
                left.quality_score(),
                right.quality_score(),
            ),
            from_index: from,
            to_index: to,
        })
    }
}

/// Builds the corridor graph for `profile`.
///
/// Edges are sorted by the input positions of their endpoints. An empty or
/// single-garden input yields no edges.
///
/// # Examples
/// ```
/// use corridor_core::{Garden, GraphSettings, SpeciesKind, SpeciesProfile, build_graph};
///
/// let gardens = vec![
///     Garden::new("a", 40.0, -111.0, 50.0, "")?,
///     Garden::new("b", 40.001, -111.001, 50.0, "")?,
///     Garden::new("c", 41.0, -112.0, 50.0, "")?,
/// ];
/// let profile = SpeciesProfile::default_for(SpeciesKind::All);
/// let edges = build_graph(&gardens, &profile, &GraphSettings::default());
/// assert_eq!(edges.len(), 1);
/// assert_eq!((edges[0].from_id(), edges[0].to_id()), ("a", "b"));
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[instrument(
    name = "core.build_graph",
    skip_all,
    fields(
        gardens = gardens.len(),
        species = %profile.kind(),
        range_km = profile.max_range_km(),
        plan = field::Empty,
        edges = field::Empty,
    ),
)]
pub fn build_graph(
    gardens: &[Garden],
    profile: &SpeciesProfile,
    settings: &GraphSettings,
) -> Vec<Connection> {
    let range_km = profile.max_range_km();
    let span = Span::current();
    let mut edges = match settings.plan(gardens.len(), range_km) {
        Plan::BruteForce => {
            span.record("plan", "brute_force");
            brute_force_edges(gardens, settings, range_km)
        }
        Plan::Grid(extent) => {
            span.record("plan", "grid");
            let index = GridIndex::new(gardens, extent);
            debug!(cells = index.occupied_cells(), "garden grid built");
            grid_edges(gardens, settings, range_km, &index)
        }
    };
    edges.sort_unstable_by_key(Connection::endpoints);
    span.record("edges", edges.len());
    edges
}

fn brute_force_edges(gardens: &[Garden], settings: &GraphSettings, range_km: f64) -> Vec<Connection> {
    let count = gardens.len();
    let pairs_from = |from: usize| {
        (from + 1..count).filter_map(move |to| settings.connect(gardens, from, to, range_km))
    };

    #[cfg(feature = "parallel")]
    if count >= PARALLEL_THRESHOLD {
        return (0..count).into_par_iter().flat_map_iter(pairs_from).collect();
    }

    (0..count).flat_map(pairs_from).collect()
}

fn grid_edges(
    gardens: &[Garden],
    settings: &GraphSettings,
    range_km: f64,
    index: &GridIndex,
) -> Vec<Connection> {
    let count = gardens.len();
    let pairs_from = |from: usize| {
        index
            .candidates(from)
            .filter_map(move |to| settings.connect(gardens, from, to, range_km))
    };

    #[cfg(feature = "parallel")]
    if count >= PARALLEL_THRESHOLD {
        return (0..count).into_par_iter().flat_map_iter(pairs_from).collect();
    }

    (0..count).flat_map(pairs_from).collect()
}

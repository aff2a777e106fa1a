//! Network-wide statistics for one analysis run.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{
    classify::{Classifications, NodeRole},
    garden::Garden,
    graph::Connection,
    union_find::DisjointSet,
};

/// Headline numbers describing a corridor network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatistics {
    /// Number of gardens in the run.
    pub total_gardens: usize,
    /// Gardens with at least one corridor.
    pub connected_gardens: usize,
    /// Gardens at or above the hub threshold.
    pub hub_gardens: usize,
    /// Gardens without corridors.
    pub isolated_gardens: usize,
    /// Number of corridors.
    pub total_edges: usize,
    /// Mean corridors per garden.
    pub average_degree: f64,
    /// Percentage of connected gardens, rounded to the nearest integer.
    pub network_health: u8,
    /// Connected components containing at least one corridor.
    pub corridor_clusters: usize,
    /// Garden count of the biggest corridor cluster, or 0.
    pub largest_cluster: usize,
}

/// Summarises classifications and edges into [`NetworkStatistics`].
///
/// All ratios are zero for an empty input.
///
/// # Examples
/// ```
/// use corridor_core::{Classifications, NetworkStatistics, aggregate};
///
/// let stats = aggregate(&[], &Classifications::default(), &[]);
/// assert_eq!(stats, NetworkStatistics::default());
/// ```
#[must_use]
pub fn aggregate(
    gardens: &[Garden],
    classifications: &Classifications,
    edges: &[Connection],
) -> NetworkStatistics {
    let total_gardens = gardens.len();
    let isolated_gardens = classifications.count(NodeRole::Isolated);
    let hub_gardens = classifications.count(NodeRole::Hub);
    let connected_gardens = classifications.len() - isolated_gardens;
    let total_edges = edges.len();

    let (average_degree, network_health) = if total_gardens == 0 {
        (0.0, 0)
    } else {
        let n = total_gardens as f64;
        let health = (connected_gardens as f64 / n * 100.0).round().clamp(0.0, 100.0);
        // Clamped to [0, 100] above.
        (2.0 * total_edges as f64 / n, health as u8)
    };

    let (corridor_clusters, largest_cluster) = clusters(gardens, edges);

    NetworkStatistics {
        total_gardens,
        connected_gardens,
        hub_gardens,
        isolated_gardens,
        total_edges,
        average_degree,
        network_health,
        corridor_clusters,
        largest_cluster,
    }
}

fn clusters(gardens: &[Garden], edges: &[Connection]) -> (usize, usize) {
    let positions: HashMap<&str, usize> = gardens
        .iter()
        .enumerate()
        .map(|(index, garden)| (garden.id(), index))
        .collect();
    let mut forest = DisjointSet::new(gardens.len());
    let mut touched = Vec::with_capacity(edges.len() * 2);
    for edge in edges {
        if let (Some(&from), Some(&to)) = (positions.get(edge.from_id()), positions.get(edge.to_id()))
        {
            forest.union(from, to);
            touched.extend([from, to]);
        }
    }

    let mut roots = HashSet::new();
    let mut largest = 0;
    for node in touched {
        if roots.insert(forest.find(node)) {
            largest = largest.max(forest.size_of(node));
        }
    }
    (roots.len(), largest)
}

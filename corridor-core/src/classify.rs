//! Per-garden connectivity roles.

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tracing::debug;

use crate::{garden::Garden, graph::Connection};

/// Default degree at which a garden counts as a hub.
pub const DEFAULT_HUB_THRESHOLD: usize = 3;

/// Connectivity role derived from a garden's degree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// No corridors.
    Isolated,
    /// Between one corridor and one fewer than the hub threshold.
    Connected,
    /// At least the hub threshold of corridors.
    Hub,
}

/// Degree and accumulated strength for one garden.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClassification {
    garden_id: Arc<str>,
    connectivity_score: f64,
    connection_count: usize,
    is_isolated: bool,
    is_hub: bool,
}

impl NodeClassification {
    /// Returns the garden this classification belongs to.
    #[must_use]
    pub fn garden_id(&self) -> &str {
        &self.garden_id
    }

    /// Returns the sum of incident corridor strengths.
    #[must_use]
    pub const fn connectivity_score(&self) -> f64 {
        self.connectivity_score
    }

    /// Returns the number of incident corridors.
    #[must_use]
    pub const fn connection_count(&self) -> usize {
        self.connection_count
    }

    /// Reports whether the garden has no corridors.
    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        self.is_isolated
    }

    /// Reports whether the garden reached the hub threshold.
    #[must_use]
    pub const fn is_hub(&self) -> bool {
        self.is_hub
    }

    /// Returns the role implied by the isolated and hub flags.
    #[must_use]
    pub const fn role(&self) -> NodeRole {
        if self.is_isolated {
            NodeRole::Isolated
        } else if self.is_hub {
            NodeRole::Hub
        } else {
            NodeRole::Connected
        }
    }
}

/// Classifications for every garden of a run, in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Classifications {
    nodes: Vec<NodeClassification>,
    #[serde(skip)]
    by_id: HashMap<Arc<str>, usize>,
}

impl Classifications {
    /// Looks up the classification of `garden_id`.
    #[must_use]
    pub fn get(&self, garden_id: &str) -> Option<&NodeClassification> {
        self.by_id
            .get(garden_id)
            .and_then(|&position| self.nodes.get(position))
    }

    /// Returns the classification at input position `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&NodeClassification> {
        self.nodes.get(index)
    }

    /// Iterates in input order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeClassification> {
        self.nodes.iter()
    }

    /// Returns the number of classified gardens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether no gardens were classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counts gardens with the given role.
    #[must_use]
    pub fn count(&self, role: NodeRole) -> usize {
        self.nodes.iter().filter(|node| node.role() == role).count()
    }
}

/// Aggregates degree and strength per garden and labels each one.
///
/// Gardens without edges are still classified (as isolated). Edges naming an
/// id absent from `gardens` are skipped.
///
/// # Examples
/// ```
/// use corridor_core::{
///     DEFAULT_HUB_THRESHOLD, Garden, GraphSettings, NodeRole, SpeciesKind, SpeciesProfile,
///     build_graph, classify,
/// };
///
/// let gardens = vec![
///     Garden::new("a", 40.0, -111.0, 50.0, "")?,
///     Garden::new("b", 40.001, -111.001, 50.0, "")?,
///     Garden::new("c", 41.0, -112.0, 50.0, "")?,
/// ];
/// let edges = build_graph(
///     &gardens,
///     &SpeciesProfile::default_for(SpeciesKind::All),
///     &GraphSettings::default(),
/// );
/// let nodes = classify(&gardens, &edges, DEFAULT_HUB_THRESHOLD);
/// assert_eq!(nodes.get("a").map(|n| n.role()), Some(NodeRole::Connected));
/// assert_eq!(nodes.get("c").map(|n| n.role()), Some(NodeRole::Isolated));
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[must_use]
pub fn classify(gardens: &[Garden], edges: &[Connection], hub_threshold: usize) -> Classifications {
    let by_id: HashMap<Arc<str>, usize> = gardens
        .iter()
        .enumerate()
        .map(|(index, garden)| (garden.shared_id(), index))
        .collect();
    let mut scores = vec![0.0_f64; gardens.len()];
    let mut counts = vec![0_usize; gardens.len()];

    for edge in edges {
        let (Some(&from), Some(&to)) = (by_id.get(edge.from_id()), by_id.get(edge.to_id())) else {
            debug!(
                from = edge.from_id(),
                to = edge.to_id(),
                "skipping corridor with unknown endpoint"
            );
            continue;
        };
        for endpoint in [from, to] {
            scores[endpoint] += edge.strength();
            counts[endpoint] += 1;
        }
    }

    let nodes = gardens
        .iter()
        .zip(scores.into_iter().zip(counts))
        .map(|(garden, (connectivity_score, connection_count))| NodeClassification {
            garden_id: garden.shared_id(),
            connectivity_score,
            connection_count,
            is_isolated: connection_count == 0,
            // A zero threshold must not mark isolated gardens as hubs.
            is_hub: connection_count > 0 && connection_count >= hub_threshold,
        })
        .collect();

    Classifications { nodes, by_id }
}

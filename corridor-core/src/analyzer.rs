//! Analysis orchestration.
//!
//! Provides the [`Analyzer`] entry point that runs graph construction,
//! classification, gap search and aggregation over one garden snapshot.

use std::{collections::HashMap, num::NonZeroUsize, sync::Arc};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{Span, field, info, instrument, warn};

use crate::{
    Result,
    classify::{Classifications, classify},
    error::AnalysisError,
    gaps::{GapSearch, GapZone, find_gaps},
    garden::Garden,
    graph::{Connection, GraphSettings, build_graph},
    species::{SpeciesKind, SpeciesProfile, SpeciesRegistry},
    stats::{NetworkStatistics, aggregate},
};

/// The output of one analysis run for one species.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAnalysis {
    species: SpeciesKind,
    max_range_km: f64,
    distance_model: &'static str,
    edges: Vec<Connection>,
    classifications: Classifications,
    gap_zones: Vec<GapZone>,
    statistics: NetworkStatistics,
}

impl NetworkAnalysis {
    /// Returns the species the run was scoped to.
    #[must_use]
    pub const fn species(&self) -> SpeciesKind {
        self.species
    }

    /// Returns the flight range used for the run.
    #[must_use]
    pub const fn max_range_km(&self) -> f64 {
        self.max_range_km
    }

    /// Returns the label of the distance model used for the run.
    #[must_use]
    pub const fn distance_model(&self) -> &'static str {
        self.distance_model
    }

    /// Returns the corridors, ordered by endpoint input positions.
    #[must_use]
    pub fn edges(&self) -> &[Connection] {
        &self.edges
    }

    /// Returns per-garden classifications in input order.
    #[must_use]
    pub fn classifications(&self) -> &Classifications {
        &self.classifications
    }

    /// Returns proposed gap zones in isolated-garden input order.
    #[must_use]
    pub fn gap_zones(&self) -> &[GapZone] {
        &self.gap_zones
    }

    /// Returns the headline statistics.
    #[must_use]
    pub const fn statistics(&self) -> &NetworkStatistics {
        &self.statistics
    }
}

/// Entry point for running the corridor analysis pipeline.
///
/// # Examples
/// ```
/// use corridor_core::{AnalyzerBuilder, Garden, SpeciesKind};
///
/// let analyzer = AnalyzerBuilder::new().build()?;
/// let gardens = vec![
///     Garden::new("g1", 40.0, -111.0, 60.0, "gold")?,
///     Garden::new("g2", 40.001, -111.001, 40.0, "silver")?,
/// ];
/// let analysis = analyzer.run(&gardens, SpeciesKind::All)?;
/// assert_eq!(analysis.edges().len(), 1);
/// assert_eq!(analysis.statistics().network_health, 100);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Analyzer {
    registry: SpeciesRegistry,
    settings: GraphSettings,
    gap_search: GapSearch,
    hub_threshold: NonZeroUsize,
}

impl Analyzer {
    pub(crate) fn new(
        registry: SpeciesRegistry,
        settings: GraphSettings,
        gap_search: GapSearch,
        hub_threshold: NonZeroUsize,
    ) -> Self {
        Self {
            registry,
            settings,
            gap_search,
            hub_threshold,
        }
    }

    /// Returns the species profiles this analyzer runs with.
    #[must_use]
    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    /// Returns the graph construction settings.
    #[must_use]
    pub const fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Returns the gap search window.
    #[must_use]
    pub const fn gap_search(&self) -> &GapSearch {
        &self.gap_search
    }

    /// Returns the degree at which a garden counts as a hub.
    #[must_use]
    pub const fn hub_threshold(&self) -> NonZeroUsize {
        self.hub_threshold
    }

    /// Runs the full pipeline for one species.
    ///
    /// An empty garden list yields an analysis with no edges, no zones and
    /// zeroed statistics.
    ///
    /// # Errors
    /// Returns [`AnalysisError::DuplicateGardenId`] when two gardens share an
    /// identifier.
    #[instrument(
        name = "core.analyze",
        err,
        skip_all,
        fields(
            gardens = gardens.len(),
            species = %species,
            edges = field::Empty,
            network_health = field::Empty,
        ),
    )]
    pub fn run(&self, gardens: &[Garden], species: SpeciesKind) -> Result<NetworkAnalysis> {
        self.check_input(gardens)?;
        let analysis = self.analyze_profile(gardens, self.registry.profile(species));
        let span = Span::current();
        span.record("edges", analysis.edges.len());
        span.record("network_health", analysis.statistics.network_health);
        Ok(analysis)
    }

    /// Runs the full pipeline once per registered species, in registry order.
    ///
    /// # Errors
    /// Returns [`AnalysisError::DuplicateGardenId`] when two gardens share an
    /// identifier.
    #[instrument(name = "core.analyze_all", err, skip_all, fields(gardens = gardens.len()))]
    pub fn run_all(&self, gardens: &[Garden]) -> Result<Vec<NetworkAnalysis>> {
        self.check_input(gardens)?;
        let profiles: Vec<&SpeciesProfile> = self.registry.iter().collect();
        let parent = Span::current();

        #[cfg(feature = "parallel")]
        let analyses = profiles
            .into_par_iter()
            .map(|profile| parent.in_scope(|| self.analyze_profile(gardens, profile)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let analyses = profiles
            .into_iter()
            .map(|profile| parent.in_scope(|| self.analyze_profile(gardens, profile)))
            .collect();

        Ok(analyses)
    }

    fn check_input(&self, gardens: &[Garden]) -> Result<()> {
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(gardens.len());
        for (position, garden) in gardens.iter().enumerate() {
            if let Some(&first) = seen.get(garden.id()) {
                return Err(AnalysisError::DuplicateGardenId {
                    id: Arc::from(garden.id()),
                    first,
                    second: position,
                });
            }
            seen.insert(garden.id(), position);
        }

        let out_of_band = gardens
            .iter()
            .filter(|garden| {
                !self
                    .settings
                    .distance
                    .covers_latitude(garden.coordinates().latitude())
            })
            .count();
        if out_of_band > 0 {
            warn!(
                out_of_band,
                model = self.settings.distance.label(),
                "gardens lie outside the distance model's reference band, distances are approximate"
            );
        }
        Ok(())
    }

    fn analyze_profile(&self, gardens: &[Garden], profile: &SpeciesProfile) -> NetworkAnalysis {
        let edges = build_graph(gardens, profile, &self.settings);
        let classifications = classify(gardens, &edges, self.hub_threshold.get());
        let gap_zones = find_gaps(
            gardens,
            &classifications,
            profile,
            &self.settings.distance,
            &self.gap_search,
        );
        let statistics = aggregate(gardens, &classifications, &edges);
        info!(
            species = %profile.kind(),
            edges = statistics.total_edges,
            hubs = statistics.hub_gardens,
            gap_zones = gap_zones.len(),
            network_health = statistics.network_health,
            "analysis completed"
        );
        NetworkAnalysis {
            species: profile.kind(),
            max_range_km: profile.max_range_km(),
            distance_model: self.settings.distance.label(),
            edges,
            classifications,
            gap_zones,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::builder::AnalyzerBuilder;

    #[fixture]
    fn analyzer() -> Analyzer {
        AnalyzerBuilder::new().build().expect("default configuration is valid")
    }

    fn garden(id: &str, latitude: f64, longitude: f64) -> Garden {
        Garden::new(id, latitude, longitude, 50.0, "").expect("valid test garden")
    }

    #[rstest]
    fn duplicate_ids_are_rejected(analyzer: Analyzer) {
        let gardens = vec![
            garden("a", 40.0, -111.0),
            garden("b", 40.1, -111.0),
            garden("a", 40.2, -111.0),
        ];
        let err = analyzer
            .run(&gardens, SpeciesKind::Bee)
            .expect_err("duplicate id must fail");
        assert_eq!(
            err,
            AnalysisError::DuplicateGardenId {
                id: Arc::from("a"),
                first: 0,
                second: 2,
            }
        );
        assert!(analyzer.run_all(&gardens).is_err());
    }

    #[rstest]
    fn empty_input_yields_zeroed_analysis(analyzer: Analyzer) {
        let analysis = analyzer
            .run(&[], SpeciesKind::Moth)
            .expect("empty input is valid");
        assert!(analysis.edges().is_empty());
        assert!(analysis.gap_zones().is_empty());
        assert!(analysis.classifications().is_empty());
        assert_eq!(*analysis.statistics(), NetworkStatistics::default());
        assert_eq!(analysis.max_range_km(), 0.5);
    }

    #[rstest]
    fn run_all_covers_every_species_in_order(analyzer: Analyzer) {
        // 0.6 km apart: only butterflies and hummingbirds bridge the gap.
        let gardens = vec![garden("a", 40.0, -111.0), garden("b", 40.0 + 0.6 / 111.0, -111.0)];
        let analyses = analyzer.run_all(&gardens).expect("valid input");
        let kinds: Vec<SpeciesKind> = analyses.iter().map(NetworkAnalysis::species).collect();
        assert_eq!(kinds, SpeciesKind::ALL);
        let edge_counts: Vec<usize> = analyses.iter().map(|a| a.edges().len()).collect();
        assert_eq!(edge_counts, [0, 0, 1, 1, 0]);
    }

    #[rstest]
    fn analysis_serializes_camel_case(analyzer: Analyzer) {
        let gardens = vec![garden("a", 40.0, -111.0), garden("b", 40.001, -111.0)];
        let analysis = analyzer.run(&gardens, SpeciesKind::All).expect("valid input");
        let value = serde_json::to_value(&analysis).expect("serialize");
        assert_eq!(value["species"], "all");
        assert_eq!(value["maxRangeKm"], 0.5);
        assert_eq!(value["distanceModel"], "planar");
        assert_eq!(value["statistics"]["networkHealth"], 100);
        assert_eq!(value["classifications"][0]["gardenId"], "a");
        assert_eq!(value["gapZones"].as_array().map(Vec::len), Some(0));
    }
}

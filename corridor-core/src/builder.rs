//! Builder for configuring [`Analyzer`] instances.
//!
//! Every tuning knob is collected here and validated once in
//! [`AnalyzerBuilder::build`], so an [`Analyzer`] can never hold a degenerate
//! configuration.

use std::num::NonZeroUsize;

use crate::{
    analyzer::Analyzer,
    classify::DEFAULT_HUB_THRESHOLD,
    distance::DistanceModel,
    error::ConfigError,
    gaps::GapSearch,
    graph::{GraphSettings, PairStrategy, StrengthModel},
    species::{SpeciesProfile, SpeciesRegistry},
};

/// Configures and constructs [`Analyzer`] instances.
///
/// # Examples
/// ```
/// use corridor_core::{AnalyzerBuilder, DistanceModel, PairStrategy, SpeciesKind};
///
/// let analyzer = AnalyzerBuilder::new()
///     .with_distance_model(DistanceModel::Haversine)
///     .with_pair_strategy(PairStrategy::BruteForce)
///     .with_hub_threshold(4)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(analyzer.hub_threshold().get(), 4);
/// assert_eq!(analyzer.registry().profile(SpeciesKind::Bee).max_range_km(), 0.3);
/// ```
#[derive(Clone, Debug)]
pub struct AnalyzerBuilder {
    registry: SpeciesRegistry,
    overrides: Vec<SpeciesProfile>,
    settings: GraphSettings,
    gap_search: GapSearch,
    hub_threshold: usize,
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self {
            registry: SpeciesRegistry::default(),
            overrides: Vec::new(),
            settings: GraphSettings::default(),
            gap_search: GapSearch::default(),
            hub_threshold: DEFAULT_HUB_THRESHOLD,
        }
    }
}

impl AnalyzerBuilder {
    /// Creates a builder populated with the default profiles and models.
    ///
    /// # Examples
    /// ```
    /// use corridor_core::{AnalyzerBuilder, DEFAULT_HUB_THRESHOLD};
    ///
    /// let builder = AnalyzerBuilder::new();
    /// assert_eq!(builder.hub_threshold(), DEFAULT_HUB_THRESHOLD);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole species registry and discards earlier overrides.
    #[must_use]
    pub fn with_registry(mut self, registry: SpeciesRegistry) -> Self {
        self.registry = registry;
        self.overrides.clear();
        self
    }

    /// Replaces the profile of `profile.kind()`.
    ///
    /// # Examples
    /// ```
    /// use corridor_core::{AnalyzerBuilder, SpeciesKind, SpeciesProfile};
    ///
    /// let wide_bee = SpeciesProfile::default_for(SpeciesKind::Bee).with_max_range_km(0.6)?;
    /// let analyzer = AnalyzerBuilder::new().with_profile(wide_bee).build()?;
    /// assert_eq!(analyzer.registry().profile(SpeciesKind::Bee).max_range_km(), 0.6);
    /// # Ok::<(), corridor_core::ConfigError>(())
    /// ```
    #[must_use]
    pub fn with_profile(mut self, profile: SpeciesProfile) -> Self {
        self.overrides.push(profile);
        self
    }

    /// Sets the distance estimator.
    #[must_use]
    pub fn with_distance_model(mut self, model: DistanceModel) -> Self {
        self.settings.distance = model;
        self
    }

    /// Sets the corridor strength weighting.
    #[must_use]
    pub fn with_strength(mut self, strength: StrengthModel) -> Self {
        self.settings.strength = strength;
        self
    }

    /// Sets the gap search window.
    #[must_use]
    pub fn with_gap_search(mut self, search: GapSearch) -> Self {
        self.gap_search = search;
        self
    }

    /// Sets the degree at which a garden counts as a hub.
    #[must_use]
    pub fn with_hub_threshold(mut self, threshold: usize) -> Self {
        self.hub_threshold = threshold;
        self
    }

    /// Sets the candidate pair enumeration strategy.
    #[must_use]
    pub fn with_pair_strategy(mut self, strategy: PairStrategy) -> Self {
        self.settings.pairing = strategy;
        self
    }

    /// Returns the configured hub threshold.
    #[must_use]
    pub fn hub_threshold(&self) -> usize {
        self.hub_threshold
    }

    /// Validates the configuration and constructs an [`Analyzer`].
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] for a zero hub threshold and
    /// the errors of [`SpeciesRegistry::with_profile`] while applying
    /// overrides.
    ///
    /// # Examples
    /// ```
    /// use corridor_core::{AnalyzerBuilder, ConfigError};
    ///
    /// let err = AnalyzerBuilder::new().with_hub_threshold(0).build().unwrap_err();
    /// assert!(matches!(err, ConfigError::InvalidParameter { parameter: "hub_threshold", .. }));
    /// ```
    pub fn build(self) -> Result<Analyzer, ConfigError> {
        let hub_threshold =
            NonZeroUsize::new(self.hub_threshold).ok_or(ConfigError::InvalidParameter {
                parameter: "hub_threshold",
                reason: "must be at least 1".into(),
            })?;
        let registry = self
            .overrides
            .into_iter()
            .try_fold(self.registry, |registry, profile| {
                registry.with_profile(profile)
            })?;

        Ok(Analyzer::new(
            registry,
            self.settings,
            self.gap_search,
            hub_threshold,
        ))
    }
}

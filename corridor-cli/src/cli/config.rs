//! TOML configuration files for the `analyze` and `species` commands.
//!
//! Every key is optional. Omitted keys keep the library defaults, and
//! `[species.<kind>]` tables patch individual fields of the default profile
//! for that kind.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use corridor_core::{
    AnalyzerBuilder, ConfigError, CorridorStyle, DEFAULT_HUB_THRESHOLD, DEFAULT_LAT_KM_PER_DEGREE,
    DEFAULT_LNG_KM_PER_DEGREE, DistanceModel, GapSearch, PlanarScale, SpeciesKind, SpeciesProfile,
    StrengthModel,
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::commands::CliError;

/// Parsed configuration file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// `[distance]` table.
    pub distance: DistanceSection,
    /// `[strength]` table.
    pub strength: StrengthSection,
    /// `[gaps]` table.
    pub gaps: GapSection,
    /// `[classification]` table.
    pub classification: ClassificationSection,
    /// `[species.<kind>]` tables keyed by species name.
    pub species: BTreeMap<String, SpeciesSection>,
}

/// Distance estimator selection.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    /// Fixed kilometres-per-degree factors.
    #[default]
    Planar,
    /// Great-circle distance.
    Haversine,
}

/// `[distance]` keys.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DistanceSection {
    /// Estimator to use.
    pub model: ModelName,
    /// Kilometres per degree of latitude.
    pub lat_km_per_degree: Option<f64>,
    /// Kilometres per degree of longitude.
    pub lng_km_per_degree: Option<f64>,
    /// Latitude from which the longitude factor is derived.
    pub reference_latitude: Option<f64>,
}

/// `[strength]` keys.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StrengthSection {
    /// Weight of the proximity term.
    pub proximity_weight: Option<f64>,
    /// Weight of the quality term.
    pub quality_weight: Option<f64>,
    /// Quality score mapped to a quality term of 1.
    pub quality_scale: Option<f64>,
}

/// `[gaps]` keys.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GapSection {
    /// Outer bound of the search window in multiples of the range.
    pub search_multiplier: Option<f64>,
    /// Neighbour cap per gap zone.
    pub max_neighbours: Option<usize>,
}

/// `[classification]` keys.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationSection {
    /// Degree at which a garden counts as a hub.
    pub hub_threshold: Option<usize>,
}

/// `[species.<kind>]` keys.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SpeciesSection {
    /// Flight range in kilometres.
    pub max_range_km: Option<f64>,
    /// Renderer line weight.
    pub display_weight: Option<f64>,
    /// Renderer colour.
    pub color: Option<String>,
    /// Renderer label.
    pub label: Option<String>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] when the file cannot be read and
    /// [`CliError::Toml`] when it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies the file to a fresh [`AnalyzerBuilder`].
    ///
    /// # Errors
    /// Returns [`ConfigError`] for unknown species names, out-of-domain
    /// values and conflicting distance keys, and
    /// [`ConfigError::DuplicateProfile`] when two tables name the same kind in
    /// different cases.
    ///
    /// # Examples
    /// ```
    /// use corridor_cli::cli::FileConfig;
    /// use corridor_core::SpeciesKind;
    ///
    /// let config: FileConfig = toml::from_str("[species.bee]\nmax_range_km = 0.4\n")?;
    /// let analyzer = config.into_builder()?.build()?;
    /// assert_eq!(analyzer.registry().profile(SpeciesKind::Bee).max_range_km(), 0.4);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn into_builder(self) -> Result<AnalyzerBuilder, ConfigError> {
        let mut builder = AnalyzerBuilder::new()
            .with_distance_model(self.distance.into_model()?)
            .with_strength(self.strength.into_model()?)
            .with_gap_search(self.gaps.into_search()?)
            .with_hub_threshold(
                self.classification
                    .hub_threshold
                    .unwrap_or(DEFAULT_HUB_THRESHOLD),
            );
        let mut seen = BTreeSet::new();
        for (name, section) in self.species {
            let kind: SpeciesKind = name.parse()?;
            if !seen.insert(kind) {
                return Err(ConfigError::DuplicateProfile { species: kind });
            }
            builder = builder.with_profile(section.apply(SpeciesProfile::default_for(kind))?);
        }
        Ok(builder)
    }
}

impl DistanceSection {
    fn into_model(self) -> Result<DistanceModel, ConfigError> {
        let has_scale = self.lat_km_per_degree.is_some()
            || self.lng_km_per_degree.is_some()
            || self.reference_latitude.is_some();
        match self.model {
            ModelName::Haversine => {
                if has_scale {
                    warn!("planar scale keys are ignored by the haversine model");
                }
                Ok(DistanceModel::Haversine)
            }
            ModelName::Planar => match (self.reference_latitude, self.lng_km_per_degree) {
                (Some(_), Some(_)) => Err(ConfigError::InvalidParameter {
                    parameter: "reference_latitude",
                    reason: "cannot be combined with lng_km_per_degree".into(),
                }),
                (Some(latitude), None) => {
                    if self.lat_km_per_degree.is_some() {
                        return Err(ConfigError::InvalidParameter {
                            parameter: "reference_latitude",
                            reason: "derives both factors and cannot be combined with \
                                     lat_km_per_degree"
                                .into(),
                        });
                    }
                    DistanceModel::planar_for_latitude(latitude)
                }
                (None, lng) => PlanarScale::new(
                    self.lat_km_per_degree.unwrap_or(DEFAULT_LAT_KM_PER_DEGREE),
                    lng.unwrap_or(DEFAULT_LNG_KM_PER_DEGREE),
                )
                .map(DistanceModel::Planar),
            },
        }
    }
}

impl StrengthSection {
    fn into_model(self) -> Result<StrengthModel, ConfigError> {
        StrengthModel::new(
            self.proximity_weight
                .unwrap_or(StrengthModel::DEFAULT_PROXIMITY_WEIGHT),
            self.quality_weight
                .unwrap_or(StrengthModel::DEFAULT_QUALITY_WEIGHT),
            self.quality_scale
                .unwrap_or(StrengthModel::DEFAULT_QUALITY_SCALE),
        )
    }
}

impl GapSection {
    fn into_search(self) -> Result<GapSearch, ConfigError> {
        GapSearch::new(
            self.search_multiplier
                .unwrap_or(GapSearch::DEFAULT_SEARCH_MULTIPLIER),
            self.max_neighbours
                .unwrap_or(GapSearch::DEFAULT_MAX_NEIGHBOURS),
        )
    }
}

impl SpeciesSection {
    fn apply(self, mut profile: SpeciesProfile) -> Result<SpeciesProfile, ConfigError> {
        if let Some(range) = self.max_range_km {
            profile = profile.with_max_range_km(range)?;
        }
        if let Some(weight) = self.display_weight {
            profile = profile.with_display_weight(weight)?;
        }
        if self.color.is_some() || self.label.is_some() {
            let current = profile.corridor().clone();
            profile = profile.with_corridor(CorridorStyle::new(
                self.color.unwrap_or(current.color),
                self.label.unwrap_or(current.label),
            ));
        }
        Ok(profile)
    }
}

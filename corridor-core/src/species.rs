//! Pollinator species profiles and the registry that validates them.
//!
//! A profile's flight range is the connectivity cutoff for a run. The display
//! weight and corridor style exist for renderers and never influence the
//! graph.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Pollinator categories understood by the analyzer.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesKind {
    /// Generic profile covering all pollinators.
    All,
    /// Native and managed bees.
    Bee,
    /// Butterflies.
    Butterfly,
    /// Hummingbirds.
    Hummingbird,
    /// Moths.
    Moth,
}

impl SpeciesKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Bee,
        Self::Butterfly,
        Self::Hummingbird,
        Self::Moth,
    ];

    /// Returns the lowercase name used on the wire and in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Bee => "bee",
            Self::Butterfly => "butterfly",
            Self::Hummingbird => "hummingbird",
            Self::Moth => "moth",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::All => 0,
            Self::Bee => 1,
            Self::Butterfly => 2,
            Self::Hummingbird => 3,
            Self::Moth => 4,
        }
    }
}

impl fmt::Display for SpeciesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeciesKind {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalised)
            .ok_or_else(|| ConfigError::UnknownSpecies {
                name: Arc::from(raw),
            })
    }
}

/// Colour and label used when drawing a species' corridors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorStyle {
    /// CSS colour string.
    pub color: String,
    /// Human-readable legend label.
    pub label: String,
}

impl CorridorStyle {
    /// Builds a style from a colour and label.
    #[must_use]
    pub fn new(color: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            label: label.into(),
        }
    }
}

/// Flight-range profile for one pollinator category.
///
/// # Examples
/// ```
/// use corridor_core::{SpeciesKind, SpeciesProfile};
///
/// let bee = SpeciesProfile::default_for(SpeciesKind::Bee);
/// assert_eq!(bee.max_range_km(), 0.3);
/// let wider = bee.clone().with_max_range_km(0.45)?;
/// assert_eq!(wider.max_range_km(), 0.45);
/// assert!(bee.with_max_range_km(f64::NAN).is_err());
/// # Ok::<(), corridor_core::ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesProfile {
    kind: SpeciesKind,
    max_range_km: f64,
    display_weight: f64,
    corridor: CorridorStyle,
}

impl SpeciesProfile {
    /// Creates a profile after checking its range and display weight.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidRange`] unless `max_range_km` is finite
    /// and positive, and [`ConfigError::InvalidDisplayWeight`] unless
    /// `display_weight` is.
    pub fn new(
        kind: SpeciesKind,
        max_range_km: f64,
        display_weight: f64,
        corridor: CorridorStyle,
    ) -> Result<Self, ConfigError> {
        let profile = Self {
            kind,
            max_range_km,
            display_weight,
            corridor,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Returns the built-in profile for `kind`.
    #[must_use]
    pub fn default_for(kind: SpeciesKind) -> Self {
        let (range, weight, color, label) = match kind {
            SpeciesKind::All => (0.5, 2.0, "#16a34a", "All pollinators"),
            SpeciesKind::Bee => (0.3, 2.5, "#f59e0b", "Native bees"),
            SpeciesKind::Butterfly => (0.8, 2.0, "#a855f7", "Butterflies"),
            SpeciesKind::Hummingbird => (1.2, 3.0, "#ef4444", "Hummingbirds"),
            SpeciesKind::Moth => (0.5, 1.5, "#6366f1", "Moths"),
        };
        Self {
            kind,
            max_range_km: range,
            display_weight: weight,
            corridor: CorridorStyle::new(color, label),
        }
    }

    /// Replaces the flight range.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidRange`] unless `max_range_km` is finite
    /// and positive.
    pub fn with_max_range_km(mut self, max_range_km: f64) -> Result<Self, ConfigError> {
        self.max_range_km = max_range_km;
        self.validate()?;
        Ok(self)
    }

    /// Replaces the display weight.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidDisplayWeight`] unless `display_weight`
    /// is finite and positive.
    pub fn with_display_weight(mut self, display_weight: f64) -> Result<Self, ConfigError> {
        self.display_weight = display_weight;
        self.validate()?;
        Ok(self)
    }

    /// Replaces the corridor style.
    #[must_use]
    pub fn with_corridor(mut self, corridor: CorridorStyle) -> Self {
        self.corridor = corridor;
        self
    }

    /// Returns the species this profile describes.
    #[must_use]
    pub const fn kind(&self) -> SpeciesKind {
        self.kind
    }

    /// Returns the connectivity cutoff in kilometres.
    #[must_use]
    pub const fn max_range_km(&self) -> f64 {
        self.max_range_km
    }

    /// Returns the renderer line weight.
    #[must_use]
    pub const fn display_weight(&self) -> f64 {
        self.display_weight
    }

    /// Returns the renderer style.
    #[must_use]
    pub const fn corridor(&self) -> &CorridorStyle {
        &self.corridor
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_range_km.is_finite() || self.max_range_km <= 0.0 {
            return Err(ConfigError::InvalidRange {
                species: self.kind,
                value: self.max_range_km,
            });
        }
        if !self.display_weight.is_finite() || self.display_weight <= 0.0 {
            return Err(ConfigError::InvalidDisplayWeight {
                species: self.kind,
                value: self.display_weight,
            });
        }
        Ok(())
    }
}

/// Validated set holding exactly one profile per [`SpeciesKind`].
///
/// # Examples
/// ```
/// use corridor_core::{SpeciesKind, SpeciesProfile, SpeciesRegistry};
///
/// let registry = SpeciesRegistry::default();
/// assert_eq!(registry.profile(SpeciesKind::Hummingbird).max_range_km(), 1.2);
///
/// let partial = [SpeciesProfile::default_for(SpeciesKind::Bee)];
/// assert!(SpeciesRegistry::new(partial).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpeciesRegistry {
    profiles: Vec<SpeciesProfile>,
}

impl Default for SpeciesRegistry {
    fn default() -> Self {
        Self {
            profiles: SpeciesKind::ALL
                .into_iter()
                .map(SpeciesProfile::default_for)
                .collect(),
        }
    }
}

impl SpeciesRegistry {
    /// Builds a registry holding one profile per kind.
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateProfile`] when a kind repeats and
    /// [`ConfigError::MissingProfile`] when a kind is absent.
    pub fn new(profiles: impl IntoIterator<Item = SpeciesProfile>) -> Result<Self, ConfigError> {
        let mut slots: [Option<SpeciesProfile>; 5] = Default::default();
        for profile in profiles {
            let slot = &mut slots[profile.kind().index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateProfile {
                    species: profile.kind(),
                });
            }
            *slot = Some(profile);
        }

        let mut ordered = Vec::with_capacity(slots.len());
        for (kind, slot) in SpeciesKind::ALL.into_iter().zip(slots) {
            ordered.push(slot.ok_or(ConfigError::MissingProfile { species: kind })?);
        }
        Ok(Self { profiles: ordered })
    }

    /// Returns the profile for `kind`.
    #[must_use]
    pub fn profile(&self, kind: SpeciesKind) -> &SpeciesProfile {
        // `new` guarantees one profile per kind, stored in `SpeciesKind::ALL` order.
        &self.profiles[kind.index()]
    }

    /// Iterates over all profiles in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesProfile> {
        self.profiles.iter()
    }

    /// Returns a copy of the registry with `profile` replacing the profile of
    /// the same kind.
    ///
    /// # Errors
    /// Returns the validation errors of [`Self::new`] for the replacement.
    pub fn with_profile(&self, profile: SpeciesProfile) -> Result<Self, ConfigError> {
        let kind = profile.kind();
        Self::new(
            self.profiles
                .iter()
                .filter(|existing| existing.kind() != kind)
                .cloned()
                .chain(std::iter::once(profile)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(SpeciesKind::All, 0.5)]
    #[case(SpeciesKind::Bee, 0.3)]
    #[case(SpeciesKind::Butterfly, 0.8)]
    #[case(SpeciesKind::Hummingbird, 1.2)]
    #[case(SpeciesKind::Moth, 0.5)]
    fn default_ranges_match_field_guidance(#[case] kind: SpeciesKind, #[case] expected: f64) {
        let registry = SpeciesRegistry::default();
        assert_eq!(registry.profile(kind).max_range_km(), expected);
        assert_eq!(registry.profile(kind).kind(), kind);
    }

    #[rstest]
    #[case("bee", SpeciesKind::Bee)]
    #[case(" Hummingbird ", SpeciesKind::Hummingbird)]
    #[case("ALL", SpeciesKind::All)]
    fn species_names_parse_case_insensitively(#[case] raw: &str, #[case] expected: SpeciesKind) {
        assert_eq!(raw.parse::<SpeciesKind>().expect("known species"), expected);
    }

    #[test]
    fn unknown_species_is_rejected() {
        let err = "wasp".parse::<SpeciesKind>().expect_err("wasp is not registered");
        assert!(matches!(err, ConfigError::UnknownSpecies { .. }));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn degenerate_range_is_rejected_on_override(#[case] range: f64) {
        let err = SpeciesProfile::default_for(SpeciesKind::Moth)
            .with_max_range_km(range)
            .expect_err("degenerate range must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                species: SpeciesKind::Moth,
                ..
            }
        ));
    }

    #[rstest]
    #[case::zero_range(0.0, 2.0)]
    #[case::nan_range(f64::NAN, 2.0)]
    #[case::infinite_range(f64::INFINITY, 2.0)]
    #[case::nan_weight(0.5, f64::NAN)]
    #[case::negative_weight(0.5, -1.0)]
    fn degenerate_profile_cannot_be_constructed(#[case] range: f64, #[case] weight: f64) {
        let err = SpeciesProfile::new(
            SpeciesKind::All,
            range,
            weight,
            CorridorStyle::new("#000000", "Test"),
        )
        .expect_err("degenerate profile must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                species: SpeciesKind::All,
                ..
            } | ConfigError::InvalidDisplayWeight {
                species: SpeciesKind::All,
                ..
            }
        ));
    }

    #[test]
    fn rejected_weight_override_reports_the_weight() {
        let err = SpeciesProfile::default_for(SpeciesKind::Bee)
            .with_display_weight(0.0)
            .expect_err("zero weight must fail");
        assert!(matches!(
            err,
            ConfigError::InvalidDisplayWeight {
                species: SpeciesKind::Bee,
                ..
            }
        ));
    }

    #[test]
    fn valid_profile_is_constructed_unchanged() {
        let profile = SpeciesProfile::new(
            SpeciesKind::Butterfly,
            0.75,
            1.0,
            CorridorStyle::new("#a855f7", "Monarchs"),
        )
        .expect("valid profile");
        assert_eq!(profile.max_range_km(), 0.75);
        assert_eq!(profile.display_weight(), 1.0);
        assert_eq!(profile.corridor().label, "Monarchs");
    }

    #[test]
    fn duplicate_and_missing_profiles_are_rejected() {
        let duplicate = SpeciesRegistry::new([
            SpeciesProfile::default_for(SpeciesKind::Bee),
            SpeciesProfile::default_for(SpeciesKind::Bee),
        ])
        .expect_err("duplicate must fail");
        assert_eq!(
            duplicate,
            ConfigError::DuplicateProfile {
                species: SpeciesKind::Bee
            }
        );

        let missing = SpeciesRegistry::new([SpeciesProfile::default_for(SpeciesKind::Bee)])
            .expect_err("missing kinds must fail");
        assert_eq!(
            missing,
            ConfigError::MissingProfile {
                species: SpeciesKind::All
            }
        );
    }

    #[test]
    fn with_profile_replaces_only_the_matching_kind() {
        let registry = SpeciesRegistry::default()
            .with_profile(
                SpeciesProfile::default_for(SpeciesKind::Bee)
                    .with_max_range_km(0.4)
                    .expect("valid range"),
            )
            .expect("valid override");
        assert_eq!(registry.profile(SpeciesKind::Bee).max_range_km(), 0.4);
        assert_eq!(registry.profile(SpeciesKind::Moth).max_range_km(), 0.5);
        let order: Vec<_> = registry.iter().map(SpeciesProfile::kind).collect();
        assert_eq!(order, SpeciesKind::ALL);
    }
}

use crate::{error::ConfigError, garden::Coordinates};

use super::{
    haversine::haversine_km,
    planar::{PlanarScale, planar_km},
};

/// Selects how kilometres are estimated between two gardens.
///
/// # Examples
/// ```
/// use corridor_core::{Coordinates, DistanceModel};
///
/// let a = Coordinates::new(40.0, -111.0)?;
/// let b = Coordinates::new(40.01, -111.01)?;
/// let planar = DistanceModel::default().distance_km(a, b);
/// let geodesic = DistanceModel::Haversine.distance_km(a, b);
/// assert!((planar - geodesic).abs() < 0.01);
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DistanceModel {
    /// Fixed kilometres-per-degree factors applied to degree differences.
    Planar(PlanarScale),
    /// Great-circle distance on a spherical Earth.
    Haversine,
}

impl Default for DistanceModel {
    fn default() -> Self {
        Self::Planar(PlanarScale::default())
    }
}

impl DistanceModel {
    /// Builds a planar model whose longitude scale suits `reference_latitude`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] when the latitude is
    /// non-finite or too close to a pole for a planar projection.
    pub fn planar_for_latitude(reference_latitude: f64) -> Result<Self, ConfigError> {
        PlanarScale::for_reference_latitude(reference_latitude).map(Self::Planar)
    }

    /// Returns the estimated distance in kilometres.
    ///
    /// The result is symmetric and nonnegative for all validated inputs.
    #[must_use]
    pub fn distance_km(&self, a: Coordinates, b: Coordinates) -> f64 {
        match self {
            Self::Planar(scale) => planar_km(scale, a, b),
            Self::Haversine => haversine_km(a, b),
        }
    }

    /// Returns the degree extents `(lat, lng)` of a box that contains every
    /// point within `range_km` of its centre.
    ///
    /// Only planar models admit a fixed extent; `None` is returned for
    /// haversine because the longitude extent depends on latitude.
    #[must_use]
    pub fn search_extent_degrees(&self, range_km: f64) -> Option<(f64, f64)> {
        match self {
            Self::Planar(scale) => Some((
                range_km / scale.lat_km_per_degree(),
                range_km / scale.lng_km_per_degree(),
            )),
            Self::Haversine => None,
        }
    }

    /// Reports whether the model is reliable at `latitude`.
    ///
    /// Haversine is valid everywhere; planar scales are only valid inside
    /// their reference band.
    #[must_use]
    pub fn covers_latitude(&self, latitude: f64) -> bool {
        match self {
            Self::Planar(scale) => scale.covers_latitude(latitude),
            Self::Haversine => true,
        }
    }

    /// Returns a stable label for logs and summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Planar(_) => "planar",
            Self::Haversine => "haversine",
        }
    }
}

//! Garden records and validated coordinates.
//!
//! Gardens arrive from the registration workflow. The analyzer never mutates
//! them, and the constructors here are the only way to obtain one, so NaN or
//! out-of-range degrees are rejected before any distance is computed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GardenError;

/// A validated `(latitude, longitude)` pair in decimal degrees.
///
/// # Examples
/// ```
/// use corridor_core::Coordinates;
///
/// let point = Coordinates::new(40.0, -111.0)?;
/// assert_eq!(point.latitude(), 40.0);
/// assert!(Coordinates::new(f64::NAN, 0.0).is_err());
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = GardenError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Validates and constructs a coordinate pair.
    ///
    /// # Errors
    /// Returns [`GardenError::InvalidLatitude`] when `latitude` is non-finite
    /// or outside `[-90, 90]`, and [`GardenError::InvalidLongitude`] when
    /// `longitude` is non-finite or outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GardenError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GardenError::InvalidLatitude { value: latitude });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GardenError::InvalidLongitude { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the point halfway between `self` and `other` in degree space.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        // The mean of two in-range values is in range.
        Self {
            latitude: (self.latitude + other.latitude) / 2.0,
            longitude: (self.longitude + other.longitude) / 2.0,
        }
    }

    /// Returns the arithmetic mean of `points` in degree space, or `None` for
    /// an empty input.
    ///
    /// Longitudes are averaged numerically, so point sets straddling the
    /// antimeridian produce a mean on the wrong side of the globe.
    #[must_use]
    pub fn centroid(points: impl IntoIterator<Item = Self>) -> Option<Self> {
        let (count, latitude, longitude) = points.into_iter().fold(
            (0_u32, 0.0_f64, 0.0_f64),
            |(count, latitude, longitude), point| {
                (
                    count + 1,
                    latitude + point.latitude,
                    longitude + point.longitude,
                )
            },
        );
        (count > 0).then(|| Self {
            latitude: latitude / f64::from(count),
            longitude: longitude / f64::from(count),
        })
    }
}

/// A registered habitat site.
///
/// # Examples
/// ```
/// use corridor_core::Garden;
///
/// let garden = Garden::new("g-1", 40.0, -111.0, 72.0, "gold")?;
/// assert_eq!(garden.id(), "g-1");
/// assert_eq!(garden.tier(), "gold");
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGarden", rename_all = "camelCase")]
pub struct Garden {
    id: Arc<str>,
    #[serde(flatten)]
    coordinates: Coordinates,
    quality_score: f64,
    tier: String,
}

/// Wire shape of a garden before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGarden {
    id: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    quality_score: f64,
    #[serde(default)]
    tier: String,
}

impl TryFrom<RawGarden> for Garden {
    type Error = GardenError;

    fn try_from(raw: RawGarden) -> Result<Self, Self::Error> {
        Self::new(
            raw.id,
            raw.latitude,
            raw.longitude,
            raw.quality_score,
            raw.tier,
        )
    }
}

impl Garden {
    /// Validates and constructs a garden.
    ///
    /// # Errors
    /// Returns [`GardenError::EmptyId`] for blank identifiers,
    /// [`GardenError::InvalidLatitude`] or [`GardenError::InvalidLongitude`]
    /// for bad coordinates, and [`GardenError::InvalidQuality`] when the
    /// quality score is negative or non-finite.
    pub fn new(
        id: impl Into<Arc<str>>,
        latitude: f64,
        longitude: f64,
        quality_score: f64,
        tier: impl Into<String>,
    ) -> Result<Self, GardenError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(GardenError::EmptyId);
        }
        let coordinates = Coordinates::new(latitude, longitude)?;
        if !quality_score.is_finite() || quality_score < 0.0 {
            return Err(GardenError::InvalidQuality {
                id,
                value: quality_score,
            });
        }
        Ok(Self {
            id,
            coordinates,
            quality_score,
            tier: tier.into(),
        })
    }

    /// Returns the stable garden identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a shared handle to the identifier.
    #[must_use]
    pub fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.id)
    }

    /// Returns the garden location.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Returns the upstream habitat quality score.
    #[must_use]
    pub const fn quality_score(&self) -> f64 {
        self.quality_score
    }

    /// Returns the nominal tier label.
    #[must_use]
    pub fn tier(&self) -> &str {
        &self.tier
    }
}

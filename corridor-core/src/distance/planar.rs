use crate::{error::ConfigError, garden::Coordinates};

/// Kilometres per degree of latitude.
pub const DEFAULT_LAT_KM_PER_DEGREE: f64 = 111.0;

/// Kilometres per degree of longitude at the reference latitude.
///
/// `85 ≈ 111 · cos(40°)`, so the default scale assumes gardens near 40° north
/// or south.
pub const DEFAULT_LNG_KM_PER_DEGREE: f64 = 85.0;

/// Half-width, in degrees of latitude, of the band around the reference
/// latitude where a fixed longitude scale stays usable.
pub const REFERENCE_BAND_DEGREES: f64 = 10.0;

/// Scale factors for the planar approximation.
///
/// # Examples
/// ```
/// use corridor_core::PlanarScale;
///
/// let scale = PlanarScale::default();
/// assert!((scale.reference_latitude() - 40.0).abs() < 0.1);
/// assert!(scale.covers_latitude(35.0));
/// assert!(!scale.covers_latitude(0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanarScale {
    lat_km_per_degree: f64,
    lng_km_per_degree: f64,
}

impl Default for PlanarScale {
    fn default() -> Self {
        Self {
            lat_km_per_degree: DEFAULT_LAT_KM_PER_DEGREE,
            lng_km_per_degree: DEFAULT_LNG_KM_PER_DEGREE,
        }
    }
}

impl PlanarScale {
    /// Builds a scale from explicit factors.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] when either factor is not a
    /// positive finite number, or when the longitude factor exceeds the
    /// latitude factor.
    pub fn new(lat_km_per_degree: f64, lng_km_per_degree: f64) -> Result<Self, ConfigError> {
        ensure_positive("lat_km_per_degree", lat_km_per_degree)?;
        ensure_positive("lng_km_per_degree", lng_km_per_degree)?;
        if lng_km_per_degree > lat_km_per_degree {
            return Err(ConfigError::InvalidParameter {
                parameter: "lng_km_per_degree",
                reason: format!(
                    "{lng_km_per_degree} exceeds lat_km_per_degree {lat_km_per_degree}"
                )
                .into(),
            });
        }
        Ok(Self {
            lat_km_per_degree,
            lng_km_per_degree,
        })
    }

    /// Derives the longitude factor as `lat_km_per_degree · cos(latitude)`.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] when the latitude is not
    /// finite or lies within one degree of a pole, where the scale collapses.
    pub fn for_reference_latitude(latitude: f64) -> Result<Self, ConfigError> {
        if !latitude.is_finite() || latitude.abs() >= 89.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "reference_latitude",
                reason: format!("{latitude} must be finite and within (-89, 89)").into(),
            });
        }
        let lng = DEFAULT_LAT_KM_PER_DEGREE * latitude.to_radians().cos();
        Self::new(DEFAULT_LAT_KM_PER_DEGREE, lng)
    }

    /// Returns the kilometres per degree of latitude.
    #[must_use]
    pub const fn lat_km_per_degree(&self) -> f64 {
        self.lat_km_per_degree
    }

    /// Returns the kilometres per degree of longitude.
    #[must_use]
    pub const fn lng_km_per_degree(&self) -> f64 {
        self.lng_km_per_degree
    }

    /// Returns the absolute latitude, in degrees, at which this scale is exact.
    #[must_use]
    pub fn reference_latitude(&self) -> f64 {
        (self.lng_km_per_degree / self.lat_km_per_degree)
            .clamp(0.0, 1.0)
            .acos()
            .to_degrees()
    }

    /// Reports whether `latitude` lies within [`REFERENCE_BAND_DEGREES`] of
    /// the reference latitude in either hemisphere.
    #[must_use]
    pub fn covers_latitude(&self, latitude: f64) -> bool {
        (latitude.abs() - self.reference_latitude()).abs() <= REFERENCE_BAND_DEGREES
    }
}

fn ensure_positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            parameter,
            reason: format!("{value} must be positive and finite").into(),
        })
    }
}

/// Computes the planar distance in kilometres between two points.
///
/// # Examples
/// ```
/// use corridor_core::{Coordinates, PlanarScale, planar_km};
///
/// let a = Coordinates::new(40.0, -111.0)?;
/// let b = Coordinates::new(40.001, -111.001)?;
/// let d = planar_km(&PlanarScale::default(), a, b);
/// assert!((d - 0.14).abs() < 0.001);
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[must_use]
pub fn planar_km(scale: &PlanarScale, a: Coordinates, b: Coordinates) -> f64 {
    let lat_km = (a.latitude() - b.latitude()).abs() * scale.lat_km_per_degree;
    let lng_km = (a.longitude() - b.longitude()).abs() * scale.lng_km_per_degree;
    lat_km.hypot(lng_km)
}

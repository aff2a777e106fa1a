use crate::garden::Coordinates;

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Computes the great-circle distance between two points in kilometres.
///
/// # Examples
/// ```
/// use corridor_core::{Coordinates, haversine_km};
///
/// let a = Coordinates::new(0.0, 0.0)?;
/// let b = Coordinates::new(0.0, 1.0)?;
/// assert!((haversine_km(a, b) - 111.195).abs() < 1e-3);
/// # Ok::<(), corridor_core::GardenError>(())
/// ```
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let half_dlat = (lat_b - lat_a) / 2.0;
    let half_dlng = (b.longitude() - a.longitude()).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlng.sin().powi(2);
    // Rounding can push `h` fractionally above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

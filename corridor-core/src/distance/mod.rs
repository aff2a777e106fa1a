//! Distance estimation between garden locations.
//!
//! The default model is a local planar approximation that scales degree
//! differences by fixed kilometres-per-degree factors. It is exact enough for
//! a deployment spanning a few hundred kilometres at one latitude, and it is
//! not a geodesic. A haversine model is available for deployments that cross
//! latitude bands.

mod haversine;
mod model;
mod planar;

pub use self::haversine::{EARTH_RADIUS_KM, haversine_km};
pub use self::model::DistanceModel;
pub use self::planar::{
    DEFAULT_LAT_KM_PER_DEGREE, DEFAULT_LNG_KM_PER_DEGREE, PlanarScale, REFERENCE_BAND_DEGREES,
    planar_km,
};

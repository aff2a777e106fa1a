//! Seeded synthetic garden fleets.

use corridor_core::{DEFAULT_LAT_KM_PER_DEGREE, DEFAULT_LNG_KM_PER_DEGREE, Garden, GardenError};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Centre of every synthetic fleet, inside the planar model's reference band.
const ORIGIN: (f64, f64) = (40.0, -111.0);

/// Errors raised while generating a synthetic fleet.
#[derive(Debug, thiserror::Error)]
pub enum SyntheticError {
    /// The requested garden count was zero.
    #[error("garden count must be greater than zero")]
    ZeroGardens,
    /// The requested extent was not a positive finite number.
    #[error("extent must be positive and finite, got {extent_km}")]
    InvalidExtent {
        /// Rejected side length in kilometres.
        extent_km: f64,
    },
    /// A generated garden failed validation.
    #[error(transparent)]
    Garden(#[from] GardenError),
}

/// Configuration for a uniformly scattered fleet.
#[derive(Clone, Debug)]
pub struct SyntheticFleetConfig {
    /// Number of gardens to generate.
    pub garden_count: usize,
    /// Side length of the square the gardens are scattered over.
    pub extent_km: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Generates `config.garden_count` gardens spread uniformly over a square of
/// side `config.extent_km` centred on 40°N, 111°W.
///
/// Quality scores are uniform in `[0, 100)` and tiers follow the score.
///
/// # Errors
/// Returns [`SyntheticError`] for a zero count or a degenerate extent.
///
/// # Examples
/// ```
/// use corridor_benches::source::{SyntheticFleetConfig, generate_fleet};
///
/// let fleet = generate_fleet(&SyntheticFleetConfig {
///     garden_count: 8,
///     extent_km: 2.0,
///     seed: 7,
/// })?;
/// assert_eq!(fleet.len(), 8);
/// # Ok::<(), corridor_benches::source::SyntheticError>(())
/// ```
pub fn generate_fleet(config: &SyntheticFleetConfig) -> Result<Vec<Garden>, SyntheticError> {
    if config.garden_count == 0 {
        return Err(SyntheticError::ZeroGardens);
    }
    if !config.extent_km.is_finite() || config.extent_km <= 0.0 {
        return Err(SyntheticError::InvalidExtent {
            extent_km: config.extent_km,
        });
    }

    let half_lat = config.extent_km / 2.0 / DEFAULT_LAT_KM_PER_DEGREE;
    let half_lng = config.extent_km / 2.0 / DEFAULT_LNG_KM_PER_DEGREE;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    (0..config.garden_count)
        .map(|index| {
            let latitude = ORIGIN.0 + rng.gen_range(-half_lat..half_lat);
            let longitude = ORIGIN.1 + rng.gen_range(-half_lng..half_lng);
            let quality: f64 = rng.gen_range(0.0..100.0);
            Garden::new(
                format!("synthetic-{index}"),
                latitude,
                longitude,
                quality,
                tier_for(quality),
            )
            .map_err(SyntheticError::from)
        })
        .collect()
}

fn tier_for(quality: f64) -> &'static str {
    match quality {
        q if q >= 75.0 => "gold",
        q if q >= 50.0 => "silver",
        _ => "bronze",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn config(garden_count: usize, extent_km: f64) -> SyntheticFleetConfig {
        SyntheticFleetConfig {
            garden_count,
            extent_km,
            seed: 42,
        }
    }

    #[test]
    fn same_seed_same_fleet() {
        let first = generate_fleet(&config(50, 5.0)).expect("valid config");
        let second = generate_fleet(&config(50, 5.0)).expect("valid config");
        assert_eq!(first, second);
    }

    #[test]
    fn gardens_stay_inside_the_square() {
        let fleet = generate_fleet(&config(200, 4.0)).expect("valid config");
        for garden in &fleet {
            let point = garden.coordinates();
            assert!((point.latitude() - ORIGIN.0).abs() * DEFAULT_LAT_KM_PER_DEGREE <= 2.0);
            assert!((point.longitude() - ORIGIN.1).abs() * DEFAULT_LNG_KM_PER_DEGREE <= 2.0);
            assert!((0.0..100.0).contains(&garden.quality_score()));
        }
    }

    #[rstest]
    #[case::zero_count(0, 1.0)]
    #[case::zero_extent(10, 0.0)]
    #[case::nan_extent(10, f64::NAN)]
    fn degenerate_configs_are_rejected(#[case] garden_count: usize, #[case] extent_km: f64) {
        assert!(generate_fleet(&config(garden_count, extent_km)).is_err());
    }

    #[rstest]
    #[case(80.0, "gold")]
    #[case(50.0, "silver")]
    #[case(12.5, "bronze")]
    fn tiers_follow_quality(#[case] quality: f64, #[case] expected: &str) {
        assert_eq!(tier_for(quality), expected);
    }
}

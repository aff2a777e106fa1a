//! Edge strength scoring.

use crate::error::ConfigError;

/// Weighting applied when scoring a corridor.
///
/// `strength = clamp(proximity_weight · (1 − d / range) +
/// quality_weight · (q_a + q_b) / (2 · quality_scale), 0, 1)`.
///
/// The quality scale is fixed rather than inferred from the garden set so
/// strengths stay comparable between runs over different populations.
///
/// # Examples
/// ```
/// use corridor_core::StrengthModel;
///
/// let model = StrengthModel::default();
/// // Co-located gardens with perfect quality saturate at 1.
/// assert_eq!(model.score(0.0, 0.5, 100.0, 100.0), 1.0);
/// // Edge of range with zero quality scores 0.
/// assert_eq!(model.score(0.5, 0.5, 0.0, 0.0), 0.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrengthModel {
    proximity_weight: f64,
    quality_weight: f64,
    quality_scale: f64,
}

impl Default for StrengthModel {
    fn default() -> Self {
        Self {
            proximity_weight: Self::DEFAULT_PROXIMITY_WEIGHT,
            quality_weight: Self::DEFAULT_QUALITY_WEIGHT,
            quality_scale: Self::DEFAULT_QUALITY_SCALE,
        }
    }
}

impl StrengthModel {
    /// Default weight of the proximity term.
    pub const DEFAULT_PROXIMITY_WEIGHT: f64 = 0.7;
    /// Default weight of the quality term.
    pub const DEFAULT_QUALITY_WEIGHT: f64 = 0.3;
    /// Upper end of the upstream quality score scale.
    pub const DEFAULT_QUALITY_SCALE: f64 = 100.0;

    /// Builds a model from explicit weights and quality scale.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidParameter`] when a weight is negative or
    /// non-finite, or when the quality scale is not positive and finite.
    pub fn new(
        proximity_weight: f64,
        quality_weight: f64,
        quality_scale: f64,
    ) -> Result<Self, ConfigError> {
        for (parameter, weight) in [
            ("proximity_weight", proximity_weight),
            ("quality_weight", quality_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    parameter,
                    reason: format!("{weight} must be finite and nonnegative").into(),
                });
            }
        }
        if !quality_scale.is_finite() || quality_scale <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "quality_scale",
                reason: format!("{quality_scale} must be positive and finite").into(),
            });
        }
        Ok(Self {
            proximity_weight,
            quality_weight,
            quality_scale,
        })
    }

    /// Returns the weight of the proximity term.
    #[must_use]
    pub const fn proximity_weight(&self) -> f64 {
        self.proximity_weight
    }

    /// Returns the weight of the quality term.
    #[must_use]
    pub const fn quality_weight(&self) -> f64 {
        self.quality_weight
    }

    /// Returns the quality normalisation constant.
    #[must_use]
    pub const fn quality_scale(&self) -> f64 {
        self.quality_scale
    }

    /// Scores a corridor of `distance_km` under a flight range of `range_km`.
    #[must_use]
    pub fn score(&self, distance_km: f64, range_km: f64, quality_a: f64, quality_b: f64) -> f64 {
        let proximity = 1.0 - distance_km / range_km;
        let quality = (quality_a + quality_b) / (2.0 * self.quality_scale);
        (self.proximity_weight * proximity + self.quality_weight * quality).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(0.25, 0.5, 50.0, 50.0, 0.7 * 0.5 + 0.3 * 0.5)]
    #[case(0.1, 0.5, 80.0, 40.0, 0.7 * 0.8 + 0.3 * 0.6)]
    #[case(0.0, 0.5, 250.0, 250.0, 1.0)]
    fn score_follows_weighted_formula(
        #[case] distance: f64,
        #[case] range: f64,
        #[case] qa: f64,
        #[case] qb: f64,
        #[case] expected: f64,
    ) {
        let score = StrengthModel::default().score(distance, range, qa, qb);
        assert!((score - expected).abs() < 1e-12, "{score} != {expected}");
    }

    #[rstest]
    #[case(-0.1, 0.3, 100.0)]
    #[case(0.7, f64::NAN, 100.0)]
    #[case(0.7, 0.3, 0.0)]
    fn invalid_parameters_are_rejected(#[case] p: f64, #[case] q: f64, #[case] scale: f64) {
        let err = StrengthModel::new(p, q, scale).expect_err("parameters must be rejected");
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }
}

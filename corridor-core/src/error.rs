//! Error types for the corridor core library.
//!
//! Each enum maps to one input boundary: garden construction, configuration
//! loading, and analysis entry. Every variant carries a stable code so callers
//! can branch on failures without matching display strings.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::species::SpeciesKind;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing a [`crate::Garden`] or its
/// [`crate::Coordinates`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GardenError {
    /// Garden identifiers must contain at least one non-whitespace character.
    #[error("garden id must not be empty")]
    EmptyId,
    /// Latitude was non-finite or outside `[-90, 90]`.
    #[error("latitude {value} is outside [-90, 90] or not finite")]
    InvalidLatitude {
        /// The rejected latitude in decimal degrees.
        value: f64,
    },
    /// Longitude was non-finite or outside `[-180, 180]`.
    #[error("longitude {value} is outside [-180, 180] or not finite")]
    InvalidLongitude {
        /// The rejected longitude in decimal degrees.
        value: f64,
    },
    /// Quality score was negative or non-finite.
    #[error("garden `{id}` has invalid quality score {value}")]
    InvalidQuality {
        /// Identifier of the offending garden.
        id: Arc<str>,
        /// The rejected score.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GardenError`] variants.
    enum GardenErrorCode for GardenError {
        /// Garden identifiers must not be empty.
        EmptyId => EmptyId => "CORRIDOR_EMPTY_GARDEN_ID",
        /// Latitude was non-finite or out of range.
        InvalidLatitude => InvalidLatitude { .. } => "CORRIDOR_INVALID_LATITUDE",
        /// Longitude was non-finite or out of range.
        InvalidLongitude => InvalidLongitude { .. } => "CORRIDOR_INVALID_LONGITUDE",
        /// Quality score was negative or non-finite.
        InvalidQuality => InvalidQuality { .. } => "CORRIDOR_INVALID_QUALITY",
    }
}

/// An error produced while validating analyzer configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A species profile declared a non-positive or non-finite flight range.
    #[error("species `{species}` must have a positive finite flight range (got {value})")]
    InvalidRange {
        /// Species whose range was rejected.
        species: SpeciesKind,
        /// The rejected range in kilometres.
        value: f64,
    },
    /// A species profile declared a non-positive or non-finite display weight.
    #[error("species `{species}` must have a positive finite display weight (got {value})")]
    InvalidDisplayWeight {
        /// Species whose weight was rejected.
        species: SpeciesKind,
        /// The rejected weight.
        value: f64,
    },
    /// The registry received two profiles for the same species.
    #[error("species `{species}` is registered more than once")]
    DuplicateProfile {
        /// Species that appeared twice.
        species: SpeciesKind,
    },
    /// The registry lacks a profile for a known species.
    #[error("species `{species}` has no registered profile")]
    MissingProfile {
        /// Species without a profile.
        species: SpeciesKind,
    },
    /// A tuning parameter was outside its accepted domain.
    #[error("invalid `{parameter}`: {reason}")]
    InvalidParameter {
        /// Name of the rejected parameter.
        parameter: &'static str,
        /// Human-readable reason for the rejection.
        reason: Arc<str>,
    },
    /// The species name could not be parsed.
    #[error("unknown species `{name}`; expected one of all, bee, butterfly, hummingbird, moth")]
    UnknownSpecies {
        /// Raw name supplied by the caller.
        name: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigError`] variants.
    enum ConfigErrorCode for ConfigError {
        /// Species range must be positive and finite.
        InvalidRange => InvalidRange { .. } => "CORRIDOR_INVALID_RANGE",
        /// Species display weight must be positive and finite.
        InvalidDisplayWeight => InvalidDisplayWeight { .. } => "CORRIDOR_INVALID_DISPLAY_WEIGHT",
        /// A species appeared twice in the registry.
        DuplicateProfile => DuplicateProfile { .. } => "CORRIDOR_DUPLICATE_PROFILE",
        /// A species is missing from the registry.
        MissingProfile => MissingProfile { .. } => "CORRIDOR_MISSING_PROFILE",
        /// A tuning parameter was rejected.
        InvalidParameter => InvalidParameter { .. } => "CORRIDOR_INVALID_PARAMETER",
        /// A species name could not be parsed.
        UnknownSpecies => UnknownSpecies { .. } => "CORRIDOR_UNKNOWN_SPECIES",
    }
}

/// An error produced when an analysis run rejects its input.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Two gardens in the same run shared an identifier.
    #[error("garden id `{id}` appears more than once (positions {first} and {second})")]
    DuplicateGardenId {
        /// The repeated identifier.
        id: Arc<str>,
        /// Position of the first occurrence.
        first: usize,
        /// Position of the repeated occurrence.
        second: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`AnalysisError`] variants.
    enum AnalysisErrorCode for AnalysisError {
        /// Two gardens shared an identifier.
        DuplicateGardenId => DuplicateGardenId { .. } => "CORRIDOR_DUPLICATE_GARDEN_ID",
    }
}

/// Convenient alias for results returned by the analysis entry points.
pub type Result<T> = core::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(GardenError::EmptyId, "CORRIDOR_EMPTY_GARDEN_ID")]
    #[case(GardenError::InvalidLatitude { value: 91.0 }, "CORRIDOR_INVALID_LATITUDE")]
    #[case(GardenError::InvalidLongitude { value: f64::NAN }, "CORRIDOR_INVALID_LONGITUDE")]
    fn garden_error_codes_are_stable(#[case] error: GardenError, #[case] expected: &str) {
        assert_eq!(error.code().as_str(), expected);
        assert_eq!(error.code().to_string(), expected);
    }

    #[test]
    fn config_error_message_names_species() {
        let error = ConfigError::InvalidRange {
            species: SpeciesKind::Bee,
            value: 0.0,
        };
        assert_eq!(error.code(), ConfigErrorCode::InvalidRange);
        assert_eq!(
            error.to_string(),
            "species `bee` must have a positive finite flight range (got 0)"
        );
    }

    #[test]
    fn analysis_error_reports_both_positions() {
        let error = AnalysisError::DuplicateGardenId {
            id: Arc::from("g-1"),
            first: 0,
            second: 3,
        };
        assert_eq!(error.code().as_str(), "CORRIDOR_DUPLICATE_GARDEN_ID");
        assert!(error.to_string().contains("positions 0 and 3"));
    }
}

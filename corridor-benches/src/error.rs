//! Benchmark setup error type.
//!
//! Aggregates the failures that can arise while preparing benchmark inputs
//! so setup functions can propagate them with `?`.

use corridor_core::ConfigError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic fleet generation failed.
    #[error("synthetic fleet generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Analyzer configuration was rejected.
    #[error("analyzer configuration failed: {0}")]
    Config(#[from] ConfigError),
}

//! Benchmark support crate for the corridor analyzer.
//!
//! Provides seeded synthetic garden fleets and parameter types used by the
//! Criterion benchmarks for graph construction and full analysis runs.

pub mod error;
pub mod params;
pub mod source;

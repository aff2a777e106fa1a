//! Benchmark parameter types.

use std::fmt;

use corridor_core::PairStrategy;

/// Parameters for a graph construction benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Number of gardens in the fleet.
    pub garden_count: usize,
    /// Pair enumeration strategy under test.
    pub strategy: PairStrategy,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},{}", self.garden_count, self.strategy.label())
    }
}

/// Parameters for a full analysis benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisBenchParams {
    /// Number of gardens in the fleet.
    pub garden_count: usize,
}

impl fmt::Display for AnalysisBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.garden_count)
    }
}

//! Command-line interface orchestration for the corridor analyzer.
//!
//! The CLI offers an `analyze` command that loads a JSON garden snapshot and
//! runs the corridor pipeline, and a `species` command that lists the
//! effective flight-range profiles. Both accept an optional TOML
//! configuration file.

mod commands;
mod config;
mod input;

pub use commands::{
    AnalyzeCommand, Cli, CliError, Command, ExecutionSummary, OutputFormat, Report,
    SpeciesCommand, StrategyArg, render_summary, run_cli,
};
pub use config::{
    ClassificationSection, DistanceSection, FileConfig, GapSection, ModelName, SpeciesSection,
    StrengthSection,
};
pub use input::load_gardens;

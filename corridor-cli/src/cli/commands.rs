//! Command implementations and argument parsing for the corridor CLI.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use corridor_core::{
    AnalysisError, Analyzer, AnalyzerBuilder, ConfigError, NetworkAnalysis, PairStrategy,
    SpeciesKind, SpeciesProfile,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::{config::FileConfig, input::load_gardens};

/// Top-level CLI options parsed by [`clap`].
#[derive(Clone, Debug, Parser)]
#[command(name = "corridor", about = "Analyse pollinator corridor networks.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Analyse a garden snapshot.
    Analyze(AnalyzeCommand),
    /// List the species profiles in effect.
    Species(SpeciesCommand),
}

/// Options accepted by the `analyze` command.
#[derive(Clone, Debug, Args)]
pub struct AnalyzeCommand {
    /// JSON snapshot: `{"gardens": [...]}` or a bare array. Use `-` for stdin.
    pub input: PathBuf,

    /// Pollinator profile to analyse.
    #[arg(long, default_value_t = SpeciesKind::All)]
    pub species: SpeciesKind,

    /// Analyse every registered profile instead of `--species`.
    #[arg(long, conflicts_with = "species")]
    pub all_species: bool,

    /// Candidate pair enumeration.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Optional TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Options accepted by the `species` command.
#[derive(Clone, Debug, Args)]
pub struct SpeciesCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Optional TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Pair strategies selectable from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StrategyArg {
    /// Grid for large planar fleets, otherwise brute force.
    Auto,
    /// Measure every pair.
    BruteForce,
    /// Measure pairs in neighbouring grid cells only.
    Grid,
}

impl From<StrategyArg> for PairStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::BruteForce => Self::BruteForce,
            StrategyArg::Grid => Self::Grid,
        }
    }
}

/// Report formats.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text summary.
    #[default]
    Human,
    /// Pretty-printed camelCase JSON.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while reading an input.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure; `-` for stdin.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The garden snapshot was not valid JSON or held an invalid garden.
    #[error("invalid garden snapshot `{path}`: {source}")]
    Snapshot {
        /// Path of the snapshot.
        path: PathBuf,
        /// Underlying parse or validation failure.
        #[source]
        source: serde_json::Error,
    },
    /// The configuration file was not valid TOML or had unknown keys.
    #[error("invalid configuration `{path}`: {source}")]
    Toml {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// Configuration values were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The analysis rejected its input.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl CliError {
    /// Returns the stable core error code, when the failure came from the
    /// core library.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Config(err) => Some(err.code().as_str()),
            Self::Analysis(err) => Some(err.code().as_str()),
            Self::Io { .. } | Self::Snapshot { .. } | Self::Toml { .. } => None,
        }
    }
}

/// What a command produced.
#[derive(Clone, Debug)]
pub enum Report {
    /// One analysis per requested species.
    Analyses(Vec<NetworkAnalysis>),
    /// The effective species profiles.
    Species(Vec<SpeciesProfile>),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Clone, Debug)]
pub struct ExecutionSummary {
    /// Requested rendering.
    pub format: OutputFormat,
    /// Command output.
    pub report: Report,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read or parsed, when the
/// configuration is invalid, or when the analysis rejects the snapshot.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use corridor_cli::cli::{Cli, Command, OutputFormat, Report, SpeciesCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli {
///     command: Command::Species(SpeciesCommand {
///         format: OutputFormat::Human,
///         config: None,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(matches!(summary.report, Report::Species(ref profiles) if profiles.len() == 5));
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Analyze(command) => {
            span.record("command", "analyze");
            run_analyze(command)
        }
        Command::Species(command) => {
            span.record("command", "species");
            run_species(command)
        }
    }
}

#[instrument(
    name = "cli.analyze",
    err,
    skip(command),
    fields(input = %command.input.display(), gardens = field::Empty, runs = field::Empty),
)]
pub(super) fn run_analyze(command: AnalyzeCommand) -> Result<ExecutionSummary, CliError> {
    let analyzer = load_builder(command.config.as_deref())?
        .with_pair_strategy(command.strategy.into())
        .build()?;
    let gardens = load_gardens(&command.input)?;
    let span = Span::current();
    span.record("gardens", gardens.len());

    let analyses = if command.all_species {
        analyzer.run_all(&gardens)?
    } else {
        vec![analyzer.run(&gardens, command.species)?]
    };
    span.record("runs", analyses.len());
    info!(
        gardens = gardens.len(),
        runs = analyses.len(),
        "analyze command completed"
    );
    Ok(ExecutionSummary {
        format: command.format,
        report: Report::Analyses(analyses),
    })
}

#[instrument(name = "cli.species", err, skip(command))]
pub(super) fn run_species(command: SpeciesCommand) -> Result<ExecutionSummary, CliError> {
    let analyzer: Analyzer = load_builder(command.config.as_deref())?.build()?;
    Ok(ExecutionSummary {
        format: command.format,
        report: Report::Species(analyzer.registry().iter().cloned().collect()),
    })
}

fn load_builder(config: Option<&Path>) -> Result<AnalyzerBuilder, CliError> {
    match config {
        Some(path) => Ok(FileConfig::load(path)?.into_builder()?),
        None => Ok(AnalyzerBuilder::new()),
    }
}

/// Renders `summary` to `writer`.
///
/// JSON output is a single analysis object for one species and an array
/// otherwise.
///
/// # Errors
/// Returns [`io::Error`] if writing or serialisation fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use corridor_cli::cli::{ExecutionSummary, OutputFormat, Report, render_summary};
/// # use corridor_core::{SpeciesKind, SpeciesProfile};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     format: OutputFormat::Human,
///     report: Report::Species(vec![SpeciesProfile::default_for(SpeciesKind::Moth)]),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "moth\t0.50 km\tweight 1.5\t#6366f1\tMoths\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match (&summary.report, summary.format) {
        (Report::Analyses(analyses), OutputFormat::Json) => {
            if let [single] = analyses.as_slice() {
                serde_json::to_writer_pretty(&mut writer, single)?;
            } else {
                serde_json::to_writer_pretty(&mut writer, analyses)?;
            }
            writeln!(writer)
        }
        (Report::Species(profiles), OutputFormat::Json) => {
            serde_json::to_writer_pretty(&mut writer, profiles)?;
            writeln!(writer)
        }
        (Report::Analyses(analyses), OutputFormat::Human) => {
            for (index, analysis) in analyses.iter().enumerate() {
                if index > 0 {
                    writeln!(writer)?;
                }
                render_analysis(analysis, &mut writer)?;
            }
            Ok(())
        }
        (Report::Species(profiles), OutputFormat::Human) => {
            for profile in profiles {
                let style = profile.corridor();
                writeln!(
                    writer,
                    "{}\t{:.2} km\tweight {:.1}\t{}\t{}",
                    profile.kind(),
                    profile.max_range_km(),
                    profile.display_weight(),
                    style.color,
                    style.label
                )?;
            }
            Ok(())
        }
    }
}

fn render_analysis(analysis: &NetworkAnalysis, mut writer: impl Write) -> io::Result<()> {
    let stats = analysis.statistics();
    writeln!(
        writer,
        "species: {} (range {:.2} km, {})",
        analysis.species(),
        analysis.max_range_km(),
        analysis.distance_model()
    )?;
    writeln!(
        writer,
        "gardens: {}  corridors: {}  hubs: {}  isolated: {}",
        stats.total_gardens, stats.total_edges, stats.hub_gardens, stats.isolated_gardens
    )?;
    writeln!(writer, "average degree: {:.2}", stats.average_degree)?;
    writeln!(writer, "network health: {}%", stats.network_health)?;
    writeln!(
        writer,
        "clusters: {} (largest {})",
        stats.corridor_clusters, stats.largest_cluster
    )?;
    writeln!(writer, "gap zones: {}", analysis.gap_zones().len())?;
    for zone in analysis.gap_zones() {
        let point = zone.coordinates();
        let ids: Vec<&str> = zone
            .contributing_garden_ids()
            .iter()
            .map(|id| &**id)
            .collect();
        writeln!(
            writer,
            "  {:.6}, {:.6}\tpriority {}\tvia {}",
            point.latitude(),
            point.longitude(),
            zone.priority(),
            ids.join(", ")
        )?;
    }
    Ok(())
}

//! CLI entry point for the pollinator corridor analyzer.
//!
//! Parses command-line arguments with clap, runs the requested command,
//! renders the report to stdout and maps failures to a non-zero exit code.
//! Logging is initialised first so every later step can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use corridor_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the report, and flush the
/// output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render report")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        // Tracing is unavailable, so stderr is the only channel left.
        let _ = report_logging_init_error(&err, io::stderr().lock());
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err.downcast_ref::<CliError>().and_then(CliError::code);
        error!(
            error = %err,
            code = code.map(field::display),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn report_logging_init_error(err: &LoggingError, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "failed to initialise logging: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_init_failure_is_reported_as_one_line() {
        let err = LoggingError::UnsupportedFormat {
            provided: "xml".to_owned(),
        };
        let mut buffer = Vec::new();
        report_logging_init_error(&err, &mut buffer).expect("writing to a buffer succeeds");
        assert_eq!(
            String::from_utf8(buffer).expect("message is UTF-8"),
            "failed to initialise logging: unsupported log format `xml`; expected `human` or `json`\n"
        );
    }
}

mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use schemars::schema_for;
use thiserror::Error;
use zonalyss_core::{GeoLevel, VerificationReport, VerifyConfig};
use zonalyss_verify::{FsSource, ReportError, ReportFormat, Verifier, render_console, write_report};

use config::load_config;
use logging::init_logging;

/// Exit status when at least one dataset recorded an error.
const EXIT_VERIFICATION_FAILED: u8 = 2;
/// Exit status for failures outside the verification itself.
const EXIT_INTERNAL_ERROR: u8 = 1;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] zonalyss_core::Error),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "zonalyss", version, about = "Zonalyss data verification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cross-check boundary and metrics files for one geographic level.
    Verify(VerifyArgs),
    /// Print the JSON Schema of the verification report (or of the config).
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Repository root holding `data/` and `reports/`.
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Geographic level to verify.
    #[arg(long, value_enum, default_value_t = LevelArg::Communes)]
    level: LevelArg,
    /// Optional TOML file overriding datasets, columns, aliases and bounds.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Save the report under `<root>/reports/`.
    #[arg(long, default_value_t = false)]
    save_report: bool,
    /// Print the structured report as JSON (and save it when --save-report is set).
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Append NDJSON log events to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Increase log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// CLI level choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LevelArg {
    Communes,
    Quartiers,
}

impl From<LevelArg> for GeoLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Communes => GeoLevel::Communes,
            LevelArg::Quartiers => GeoLevel::Quartiers,
        }
    }
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Emit the config schema instead of the report schema.
    #[arg(long, default_value_t = false)]
    config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Passed,
    Failed,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Passed => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::from(EXIT_VERIFICATION_FAILED),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Verify(args) => run_verify(args),
        Command::Schema(args) => run_schema(args).map(|()| RunStatus::Passed),
    };

    match outcome {
        Ok(status) => status.into(),
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::from(EXIT_INTERNAL_ERROR)
        }
    }
}

fn run_verify(args: VerifyArgs) -> Result<RunStatus, CliError> {
    let VerifyArgs {
        root,
        level,
        config,
        save_report,
        json,
        log_file,
        verbose,
    } = args;

    let level = GeoLevel::from(level);
    init_logging(verbose, log_file.as_deref())?;
    let config = load_config(config.as_deref())?;
    let root = std::path::absolute(&root)?;

    tracing::info!(
        event = "run_started",
        level = %level,
        root = %root.display(),
        datasets = config.datasets.len()
    );
    let timer = Instant::now();

    let source = FsSource::new(&root);
    let report = Verifier::new(config).verify_level(&source, level);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_console(&report));
    }

    if save_report {
        save_reports(&root, &report, json)?;
    }

    let status = if report.failed() {
        RunStatus::Failed
    } else {
        RunStatus::Passed
    };
    tracing::info!(
        event = "run_finished",
        status = if status == RunStatus::Passed { "passed" } else { "failed" },
        errors = report.error_count(),
        warnings = report.warning_count(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    Ok(status)
}

fn save_reports(
    root: &std::path::Path,
    report: &VerificationReport,
    json: bool,
) -> Result<(), CliError> {
    let mut saved = vec![write_report(root, report, ReportFormat::Markdown)?];
    if json {
        saved.push(write_report(root, report, ReportFormat::Json)?);
    }

    for path in &saved {
        tracing::info!(event = "report_written", path = %path.display());
        // stdout carries the JSON document in --json mode
        if json {
            eprintln!("Saved report to: {}", path.display());
        } else {
            println!("\nSaved report to: {}", path.display());
        }
    }
    Ok(())
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = if args.config {
        schema_for!(VerifyConfig)
    } else {
        schema_for!(VerificationReport)
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

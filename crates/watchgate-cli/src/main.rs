// crates/watchgate-cli/src/main.rs
// ============================================================================
// Module: Watchgate CLI Entry Point
// Description: Command dispatcher for conformance runs and selection encoding.
// Purpose: Provide the guest-side `run` and host-side `select` commands.
// Dependencies: clap, watchgate-config, watchgate-core, watchgate-runner,
// watchgate-suites, tracing-subscriber
// ============================================================================

//! ## Overview
//! The Watchgate CLI wires the built-in suite registry, the harness
//! configuration, and the test director together. `run` executes the batch a
//! selection file names and prints one report table per category; `select`
//! encodes a selection payload for the host side. Progress lines go to stderr
//! through `tracing`; report tables go to stdout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use watchgate_config::HarnessConfig;
use watchgate_core::Selection;
use watchgate_core::SuiteRegistry;
use watchgate_runner::TestDirector;
use watchgate_suites::register_all;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// Watchgate conformance harness CLI.
#[derive(Parser)]
#[command(
    name = "watchgate",
    version,
    about = "Conformance harness for security-policy monitors"
)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Command {
    /// Runs the conformance batch named by a selection file.
    Run(RunCommand),
    /// Encodes a selection payload for the host side.
    Select(SelectCommand),
}

/// Arguments of the `run` command.
#[derive(Args)]
struct RunCommand {
    /// Path to the selection payload file.
    selection: PathBuf,
    /// Path to the harness configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Arguments of the `select` command.
#[derive(Args)]
struct SelectCommand {
    /// Output path for the encoded payload.
    output: PathBuf,
    /// Test name to include; repeatable, none selects every test.
    #[arg(long = "test")]
    tests: Vec<String>,
    /// Suite or category name to include; repeatable.
    #[arg(long = "group")]
    groups: Vec<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a human-readable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Creates an error from a message.
    fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI command handlers.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point: initializes logging and dispatches the command.
fn main() -> ExitCode {
    init_tracing();
    match dispatch() {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("watchgate: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Initializes stderr tracing with an env-filter, default level info.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parses arguments and executes the selected command.
///
/// # Errors
///
/// Returns [`CliError`] when the command fails.
fn dispatch() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run(command) => command_run(&command),
        Command::Select(command) => command_select(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the conformance run command.
///
/// # Errors
///
/// Returns [`CliError`] when configuration, registration, or the run fails.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = HarnessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let mut registry = SuiteRegistry::new();
    register_all(&mut registry).map_err(|err| CliError::new(err.to_string()))?;
    let director = TestDirector::new(config, &registry);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    director.run(&command.selection, &mut out).map_err(|err| CliError::new(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the selection encoding command.
///
/// # Errors
///
/// Returns [`CliError`] when validation or writing fails.
fn command_select(command: &SelectCommand) -> CliResult<ExitCode> {
    let selection = Selection::new(command.tests.clone(), command.groups.clone())
        .map_err(|err| CliError::new(err.to_string()))?;
    selection
        .encode_file(&command.output)
        .map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&format!("selection written to {}", command.output.display()))
        .map_err(|err| CliError::new(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

//! # envv CLI entry point
//!
//! Parses command-line arguments, sets up logging on stderr, and runs the
//! check.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use envv_cli::check::{run_check, CheckArgs};

/// Validate a .env file against a REQUIRED_KEYS/OPTIONAL_KEYS schema.
///
/// Missing required keys are errors; type mismatches and keys the schema
/// does not declare are warnings. With `--exit true`, either one makes the
/// run exit with status 1.
#[derive(Parser, Debug)]
#[command(name = "envv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit log events as JSON lines.
    #[arg(long)]
    log_json: bool,

    #[command(flatten)]
    check: CheckArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "envv starting");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    match run_check(&cli.check, &cwd) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

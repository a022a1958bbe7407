//! # Check Command
//!
//! Validates one env file against one schema and renders the report.
//!
//! Every flag has an environment-variable fallback so the check can be
//! configured from CI without editing the invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, ValueEnum};
use serde::Serialize;

use envv_schema::{load_env_file, validate, Finding, Schema, SchemaOptions, ValidationReport};

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sections with line markers.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Arguments for an `envv` run.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the .env file.
    #[arg(long, value_name = "PATH", env = "ENVV_ENV_FILE", default_value = ".env")]
    pub env: PathBuf,

    /// Path to the schema file (.json, or .yaml/.yml).
    #[arg(
        long,
        value_name = "PATH",
        env = "ENVV_SCHEMA",
        default_value = "./env.schema.json"
    )]
    pub schema: PathBuf,

    /// Exit with status 1 when the report has any error or warning.
    #[arg(
        long,
        value_name = "BOOL",
        env = "ENVV_EXIT",
        default_value = "false",
        default_missing_value = "true",
        num_args = 0..=1,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub exit: bool,

    /// Reject type tags outside string/number/boolean/array/json/date.
    #[arg(long)]
    pub strict_types: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute a check run.
///
/// Returns the process exit code: 0 when the run passes under the exit
/// policy, 1 when it fails or an input file is missing.
pub fn run_check(args: &CheckArgs, cwd: &Path) -> Result<u8> {
    let env_path = crate::resolve_path(&args.env, cwd);
    let schema_path = crate::resolve_path(&args.schema, cwd);

    if !env_path.is_file() {
        eprintln!("❌ .env file not found at {}", env_path.display());
        return Ok(1);
    }
    if !schema_path.is_file() {
        eprintln!("❌ Schema file not found at {}", schema_path.display());
        return Ok(1);
    }

    let env_name = file_name(&env_path);
    if args.format == OutputFormat::Text {
        println!("⚙️ Validating {env_name}...");
    }

    let env = load_env_file(&env_path)
        .with_context(|| format!("failed to load env file {}", env_path.display()))?;
    let options = SchemaOptions {
        strict_types: args.strict_types,
    };
    let schema = Schema::from_path(&schema_path, options)
        .with_context(|| format!("failed to load schema {}", schema_path.display()))?;

    let report = validate(&env, &schema);
    let code = exit_code(&report, args.exit);

    tracing::info!(
        env = %env_path.display(),
        schema = %schema_path.display(),
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        exit_code = code,
        "validation finished"
    );

    match args.format {
        OutputFormat::Text => {
            print!("{}", render_text(&report, &env_name));
            if code != 0 {
                println!("🚨 Validation failed. Exiting.");
            }
        }
        OutputFormat::Json => {
            println!("{}", render_json(&report, &env_path, &schema_path, code)?);
        }
    }

    Ok(code)
}

/// Exit policy: 1 when `fail_on_findings` is set and the report has any
/// error or warning, 0 otherwise.
pub fn exit_code(report: &ValidationReport, fail_on_findings: bool) -> u8 {
    if fail_on_findings && !report.is_clean() {
        1
    } else {
        0
    }
}

/// Render the report sections. The pass line appears only for a clean
/// report.
pub fn render_text(report: &ValidationReport, env_name: &str) -> String {
    let mut out = String::new();

    if report.has_errors() {
        out.push_str("\n🚨 Missing or invalid keys:\n");
        for error in report.errors() {
            out.push_str(&format!("  ❌ {error}\n"));
        }
    }

    if report.has_warnings() {
        out.push_str("\n⚠️ Warnings:\n");
        for warning in report.warnings() {
            out.push_str(&format!("  ⚠️ {warning}\n"));
        }
    }

    if report.is_clean() {
        out.push_str(&format!("\n✅ {env_name} file passed validation.\n"));
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    env_file: String,
    schema_file: String,
    passed: bool,
    exit_code: u8,
    errors: &'a [String],
    warnings: &'a [String],
    findings: &'a [Finding],
}

/// Render the report as a pretty-printed JSON document.
pub fn render_json(
    report: &ValidationReport,
    env_path: &Path,
    schema_path: &Path,
    exit_code: u8,
) -> Result<String> {
    let doc = JsonReport {
        env_file: env_path.display().to_string(),
        schema_file: schema_path.display().to_string(),
        passed: report.is_clean(),
        exit_code,
        errors: report.errors(),
        warnings: report.warnings(),
        findings: report.findings(),
    };
    serde_json::to_string_pretty(&doc).context("failed to serialize report")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! # envv-cli — CLI Tool for envv
//!
//! Provides the `envv` command-line interface: load a `.env` file and a
//! schema, validate one against the other, print the report, and turn the
//! result into a process exit status.
//!
//! ```bash
//! envv                                   # ./.env against ./env.schema.json
//! envv --env .env.production --schema config/env.schema.yaml
//! envv --exit true                       # exit 1 on any error or warning
//! envv --format json --strict-types
//! ```
//!
//! ## Output Contract
//!
//! The report goes to stdout. Missing input files are reported on stderr
//! with a `❌` line and exit status 1. Other operational failures (parse
//! errors, unreadable files, strict-mode rejections) are logged through
//! `tracing` with their context chain and also exit 1.

pub mod check;

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `cwd`.
///
/// Absolute paths are returned as-is. `.` components are dropped so
/// messages show `/srv/app/.env` rather than `/srv/app/./.env`.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

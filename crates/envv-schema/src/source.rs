//! # Env File Loading
//!
//! Reads dotenv files into an [`EnvMap`]. Syntax (comments, quoting,
//! `export` prefixes, escapes) and `$VAR` / `${VAR}` expansion are handled
//! by `dotenvy`; expansion sees keys defined earlier in the same file and
//! the process environment.
//!
//! Loading never touches the process environment. The values only flow
//! into the returned map.
//!
//! JSON values must be single-quoted in the file (`FEATURES='["a", "b"]'`).
//! Unquoted, the dotenv grammar treats the inner double quotes as quoting
//! and a space as the end of the value.

use std::path::Path;

use envv_core::{EnvMap, EnvvError};
use tracing::debug;

/// Load a dotenv file.
///
/// Later assignments to the same key override earlier ones; the key keeps
/// the position of its first assignment.
///
/// # Errors
///
/// Returns `EnvvError::NotFound` if the file does not exist,
/// `EnvvError::EnvParse` for a syntax error, and `EnvvError::Io` for other
/// read failures.
pub fn load_env_file(path: &Path) -> Result<EnvMap, EnvvError> {
    let source = path.display().to_string();
    let iter = dotenvy::from_path_iter(path).map_err(|e| convert_error(&source, e))?;

    let env = collect(iter, &source)?;
    debug!(path = %source, keys = env.len(), "loaded env file");
    Ok(env)
}

/// Parse dotenv text that is already in memory.
///
/// `source` names the text in errors.
pub fn parse_env_str(content: &str, source: &str) -> Result<EnvMap, EnvvError> {
    collect(dotenvy::from_read_iter(content.as_bytes()), source)
}

fn collect<I>(iter: I, source: &str) -> Result<EnvMap, EnvvError>
where
    I: Iterator<Item = dotenvy::Result<(String, String)>>,
{
    let mut env = EnvMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| convert_error(source, e))?;
        if let Some(previous) = env.get(&key) {
            debug!(source, key = %key, previous, "env key assigned more than once; last value wins");
        }
        env.insert(key, value);
    }
    Ok(env)
}

fn convert_error(source: &str, err: dotenvy::Error) -> EnvvError {
    match err {
        dotenvy::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            EnvvError::NotFound {
                path: source.to_string(),
            }
        }
        dotenvy::Error::Io(io) => EnvvError::Io(io),
        other => EnvvError::EnvParse {
            path: source.to_string(),
            reason: other.to_string(),
        },
    }
}

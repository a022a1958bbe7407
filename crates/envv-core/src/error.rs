//! # Error Types
//!
//! Operational errors for envv: files that cannot be found, read, or
//! parsed, and schema tags rejected in strict mode. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Validation findings (missing keys, type mismatches, unused keys) are
//! **not** errors. They are reported as data by the validator and never
//! travel through this type.

use thiserror::Error;

/// Top-level error type for envv.
#[derive(Error, Debug)]
pub enum EnvvError {
    /// An input file does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The env file exists but is not valid dotenv syntax.
    #[error("env file parse error in '{path}': {reason}")]
    EnvParse {
        /// Path to the env file.
        path: String,
        /// Parser message, including the offending line.
        reason: String,
    },

    /// The schema document could not be parsed or has the wrong shape.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path or identifier of the schema document.
        path: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// A schema entry names a type tag outside the known set, and the
    /// schema was loaded in strict mode.
    #[error("unknown semantic type {tag:?} for key '{key}'")]
    UnknownSemanticType {
        /// Key whose tag was rejected.
        key: String,
        /// The tag as written in the schema.
        tag: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

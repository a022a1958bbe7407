//! # envv-core — Foundational Types for envv
//!
//! The leaf crate of the workspace. It defines the values every other
//! crate passes around and the single-value conformance check that the
//! validator builds on.
//!
//! ## Key Types
//!
//! - [`EnvMap`] — insertion-ordered snapshot of an env file's key/value pairs.
//! - [`SemanticType`] — a schema type tag (`string`, `number`, `boolean`,
//!   `array`, `json`, `date`) with an exhaustive `match` dispatching to each
//!   conformance predicate. Unknown tags are modelled explicitly as
//!   [`SemanticType::Unrecognized`] rather than silently dropped.
//! - [`conforms`] — the Type Checker: does one raw value fit one type?
//! - [`EnvvError`] — operational errors (I/O, parse, strict-mode rejection).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `envv-*` crates.
//! - No I/O. Everything here is a pure function over in-memory values.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod env;
pub mod error;
pub mod semantic;
pub mod temporal;

pub use env::EnvMap;
pub use error::EnvvError;
pub use semantic::{conforms, SemanticType, UnknownTypeTag, KNOWN_TYPE_TAGS};
pub use temporal::{is_iso8601, parse_iso8601, IsoDateTime};

//! # envv-schema — Schema Loading & Env Validation
//!
//! Turns the two inputs of a validation run into in-memory values and
//! compares them.
//!
//! ## Inputs
//!
//! - [`source`] reads dotenv files into an [`envv_core::EnvMap`] through
//!   `dotenvy`, without touching the process environment.
//! - [`schema`] loads `REQUIRED_KEYS` / `OPTIONAL_KEYS` documents from JSON
//!   or YAML into a [`Schema`], keeping declaration order.
//!
//! ## Validation (`validate`)
//!
//! [`validate()`] runs the required, optional and unused-key passes and
//! returns a [`ValidationReport`]. Missing required keys are errors; type
//! mismatches and unused keys are warnings. Validation itself cannot fail.
//!
//! ## Crate Policy
//!
//! - Depends only on `envv-core` internally.
//! - Loading is the only fallible step. Load errors are
//!   [`envv_core::EnvvError`] values, never panics.
//! - Report message text is part of the CLI output contract. Changing a
//!   `Finding` display string changes what users see.

pub mod schema;
pub mod source;
pub mod validate;

pub use schema::{Schema, SchemaOptions, SchemaSection, OPTIONAL_SECTION, REQUIRED_SECTION};
pub use source::{load_env_file, parse_env_str};
pub use validate::{validate, Finding, Severity, ValidationReport};

//! # Env Validation
//!
//! Compares an [`EnvMap`] against a [`Schema`] and reports what is wrong
//! with it. The result is data, never an error: [`validate`] always
//! returns a report, and it is up to the caller to decide whether
//! warnings matter.
//!
//! ## Passes
//!
//! 1. **Required**: every required key must be set to a non-empty value
//!    (`"<key> is missing"` otherwise). A set value that does not fit its
//!    type is a warning. The presence check short-circuits, so one key
//!    never produces both.
//! 2. **Optional**: a set, non-empty optional value that does not fit its
//!    type is a warning. Unset optional keys are fine.
//! 3. **Unused**: env keys declared in neither section are collected into a
//!    single `"Unused keys: A, B"` warning, in env file order.
//!
//! Passes 1 and 2 run independently, so a key declared in both sections
//! is checked twice.
//!
//! ## Thread Safety
//!
//! `validate` is a pure function over borrowed inputs. It can run on any
//! number of threads at once without coordination.

use std::collections::HashSet;
use std::fmt;

use envv_core::{conforms, EnvMap, SemanticType};
use serde::Serialize;
use tracing::debug;

use crate::schema::Schema;

/// How a finding is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Listed under `errors`.
    Error,
    /// Listed under `warnings`.
    Warning,
}

/// One structured report entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// A required key is unset or empty.
    MissingRequiredKey {
        /// The required key.
        key: String,
    },
    /// A set value does not fit its declared type.
    TypeMismatch {
        /// The offending key.
        key: String,
        /// The type the schema declared.
        expected: SemanticType,
    },
    /// Env keys declared in neither schema section.
    UnusedKeys {
        /// Keys in env file order.
        keys: Vec<String>,
    },
}

impl Finding {
    /// Severity of this finding.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingRequiredKey { .. } => Severity::Error,
            Self::TypeMismatch { .. } | Self::UnusedKeys { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredKey { key } => write!(f, "{key} is missing"),
            Self::TypeMismatch { key, expected } => {
                write!(f, "{key} type mismatch (expected {expected})")
            }
            Self::UnusedKeys { keys } => write!(f, "Unused keys: {}", keys.join(", ")),
        }
    }
}

/// Result of one validation run.
///
/// `errors` and `warnings` are the rendered finding messages in the order
/// the passes produced them. The structured findings behind them are kept
/// in the same order and are available through [`ValidationReport::findings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
    #[serde(skip)]
    findings: Vec<Finding>,
}

impl ValidationReport {
    fn record(&mut self, finding: Finding) {
        debug!(severity = ?finding.severity(), "{finding}");
        match finding.severity() {
            Severity::Error => self.errors.push(finding.to_string()),
            Severity::Warning => self.warnings.push(finding.to_string()),
        }
        self.findings.push(finding);
    }

    /// Error messages (missing required keys).
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Warning messages (type mismatches, then the unused-keys summary).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Structured findings, in emission order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Returns true if any required key is missing.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true if there is any type mismatch or unused key.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns true if there is nothing to report.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Consumes the report and returns `(errors, warnings)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.errors, self.warnings)
    }
}

/// Validate `env` against `schema`.
///
/// Never fails; an empty env or an empty schema simply produces a report
/// (with an empty schema, every env key is unused).
pub fn validate(env: &EnvMap, schema: &Schema) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (key, ty) in schema.required.iter() {
        match env.get_present(key) {
            None => report.record(Finding::MissingRequiredKey {
                key: key.to_string(),
            }),
            Some(value) => check_type(&mut report, key, value, ty),
        }
    }

    for (key, ty) in schema.optional.iter() {
        if let Some(value) = env.get_present(key) {
            check_type(&mut report, key, value, ty);
        }
    }

    let declared: HashSet<&str> = schema
        .required
        .keys()
        .chain(schema.optional.keys())
        .collect();
    let unused: Vec<String> = env
        .keys()
        .filter(|k| !declared.contains(k))
        .map(str::to_string)
        .collect();
    if !unused.is_empty() {
        report.record(Finding::UnusedKeys { keys: unused });
    }

    debug!(
        keys = env.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation complete"
    );

    report
}

fn check_type(report: &mut ValidationReport, key: &str, value: &str, ty: &SemanticType) {
    if !conforms(Some(value), ty) {
        report.record(Finding::TypeMismatch {
            key: key.to_string(),
            expected: ty.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaSection;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs.iter().copied().collect()
    }

    fn section(pairs: &[(&str, SemanticType)]) -> SchemaSection {
        pairs.iter().cloned().collect()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn report_types_are_send_and_sync() {
        assert_send_sync::<EnvMap>();
        assert_send_sync::<Schema>();
        assert_send_sync::<ValidationReport>();
    }

    // ---- worked examples ----

    #[test]
    fn scenarios() {
        let required = section(&[("API_KEY", SemanticType::String), ("SMTP_PORT", SemanticType::Number)]);
        let schema = Schema::new(required, section(&[]));

        let report = validate(&env(&[("API_KEY", "abc"), ("SMTP_PORT", "587")]), &schema);
        assert!(report.is_clean());

        let report = validate(&env(&[("SMTP_PORT", "587")]), &schema);
        assert_eq!(report.errors(), ["API_KEY is missing"]);

        let schema = Schema::new(section(&[("DEBUG_MODE", SemanticType::Boolean)]), section(&[]));
        let report = validate(&env(&[("DEBUG_MODE", "notabool")]), &schema);
        assert_eq!(report.warnings(), ["DEBUG_MODE type mismatch (expected boolean)"]);

        let schema = Schema::new(section(&[("API_KEY", SemanticType::String)]), section(&[]));
        let report = validate(&env(&[("API_KEY", "x"), ("EXTRA", "y")]), &schema);
        assert_eq!(report.warnings(), ["Unused keys: EXTRA"]);

        let schema = Schema::new(section(&[]), section(&[("START_DATE", SemanticType::Date)]));
        let report = validate(&env(&[("START_DATE", "not-a-date")]), &schema);
        assert_eq!(report.warnings(), ["START_DATE type mismatch (expected date)"]);
    }

    // ---- passes ----

    #[test]
    fn missing_required_key_is_an_error_only() {
        let schema = Schema::new(section(&[("API_KEY", SemanticType::Number)]), section(&[]));
        let report = validate(&env(&[]), &schema);
        assert_eq!(report.errors(), ["API_KEY is missing"]);
        assert!(report.warnings().is_empty());
        assert_eq!(
            report.findings(),
            [Finding::MissingRequiredKey { key: "API_KEY".to_string() }]
        );
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let schema = Schema::new(section(&[("API_KEY", SemanticType::String)]), section(&[]));
        let report = validate(&env(&[("API_KEY", "")]), &schema);
        assert_eq!(report.errors(), ["API_KEY is missing"]);
        // The key is declared, so it is not also reported as unused.
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn zero_string_is_present() {
        let schema = Schema::new(section(&[("RETRIES", SemanticType::Number)]), section(&[]));
        let report = validate(&env(&[("RETRIES", "0")]), &schema);
        assert!(report.is_clean());
    }

    #[test]
    fn required_type_mismatch_is_a_warning() {
        let schema = Schema::new(section(&[("SMTP_PORT", SemanticType::Number)]), section(&[]));
        let report = validate(&env(&[("SMTP_PORT", "notanumber")]), &schema);
        assert!(report.errors().is_empty());
        assert_eq!(report.warnings(), ["SMTP_PORT type mismatch (expected number)"]);
    }

    #[test]
    fn blank_number_is_present_and_conforms() {
        let schema = Schema::new(
            section(&[("TIMEOUT", SemanticType::Number)]),
            section(&[("RETRIES", SemanticType::Number)]),
        );
        let report = validate(&env(&[("TIMEOUT", "  "), ("RETRIES", "\t")]), &schema);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn optional_keys_checked_only_when_present() {
        let schema = Schema::new(
            section(&[]),
            section(&[
                ("PORT", SemanticType::Number),
                ("ENABLE_SSO", SemanticType::Boolean),
                ("CACHE_TIMEOUT", SemanticType::Number),
            ]),
        );
        let report = validate(
            &env(&[("ENABLE_SSO", "maybe"), ("CACHE_TIMEOUT", "")]),
            &schema,
        );
        assert!(report.errors().is_empty());
        assert_eq!(report.warnings(), ["ENABLE_SSO type mismatch (expected boolean)"]);
    }

    #[test]
    fn mismatches_follow_schema_order_and_unused_comes_last() {
        let schema = Schema::new(
            section(&[("B_NUM", SemanticType::Number), ("A_BOOL", SemanticType::Boolean)]),
            section(&[("C_DATE", SemanticType::Date)]),
        );
        let report = validate(
            &env(&[
                ("EXTRA_2", "x"),
                ("C_DATE", "soon"),
                ("A_BOOL", "yes"),
                ("B_NUM", "many"),
                ("EXTRA_1", "y"),
            ]),
            &schema,
        );
        assert_eq!(
            report.warnings(),
            [
                "B_NUM type mismatch (expected number)",
                "A_BOOL type mismatch (expected boolean)",
                "C_DATE type mismatch (expected date)",
                "Unused keys: EXTRA_2, EXTRA_1",
            ]
        );
    }

    #[test]
    fn key_in_both_sections_is_checked_twice() {
        let schema = Schema::new(
            section(&[("PORT", SemanticType::Number)]),
            section(&[("PORT", SemanticType::Boolean)]),
        );
        let report = validate(&env(&[("PORT", "8080")]), &schema);
        assert_eq!(report.warnings(), ["PORT type mismatch (expected boolean)"]);

        let report = validate(&env(&[("PORT", "abc")]), &schema);
        assert_eq!(
            report.warnings(),
            [
                "PORT type mismatch (expected number)",
                "PORT type mismatch (expected boolean)",
            ]
        );
    }

    #[test]
    fn empty_schema_makes_every_key_unused() {
        let report = validate(&env(&[("A", "1"), ("B", "2")]), &Schema::default());
        assert!(report.errors().is_empty());
        assert_eq!(report.warnings(), ["Unused keys: A, B"]);
        assert_eq!(
            report.findings(),
            [Finding::UnusedKeys { keys: vec!["A".to_string(), "B".to_string()] }]
        );
    }

    #[test]
    fn empty_env_and_empty_schema_is_clean() {
        let report = validate(&EnvMap::new(), &Schema::default());
        assert!(report.is_clean());
        assert_eq!(report.into_parts(), (Vec::<String>::new(), Vec::<String>::new()));
    }

    #[test]
    fn unrecognized_type_never_warns() {
        let schema = Schema::new(
            section(&[]),
            section(&[("CONFIG", SemanticType::Unrecognized("object".to_string()))]),
        );
        let report = validate(&env(&[("CONFIG", "definitely not an object")]), &schema);
        assert!(report.is_clean());
    }

    #[test]
    fn mismatch_message_uses_tag_as_written() {
        let finding = Finding::TypeMismatch {
            key: "X".to_string(),
            expected: SemanticType::Json,
        };
        assert_eq!(finding.to_string(), "X type mismatch (expected json)");
        assert_eq!(finding.severity(), Severity::Warning);
    }

    #[test]
    fn report_serializes_messages_only() {
        let schema = Schema::new(section(&[("API_KEY", SemanticType::String)]), section(&[]));
        let report = validate(&env(&[("EXTRA", "y")]), &schema);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "errors": ["API_KEY is missing"],
                "warnings": ["Unused keys: EXTRA"]
            })
        );
    }

    #[test]
    fn finding_serializes_with_kind_tag() {
        let finding = Finding::TypeMismatch {
            key: "DEBUG_MODE".to_string(),
            expected: SemanticType::Boolean,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "type_mismatch",
                "key": "DEBUG_MODE",
                "expected": "boolean"
            })
        );
    }
}

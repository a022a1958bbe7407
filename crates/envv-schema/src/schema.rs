//! # Schema Documents
//!
//! A schema declares which env keys must be set and what shape each value
//! has:
//!
//! ```json
//! {
//!   "REQUIRED_KEYS": { "API_KEY": "string", "SMTP_PORT": "number" },
//!   "OPTIONAL_KEYS": { "DEBUG_MODE": "boolean" }
//! }
//! ```
//!
//! ## Loading Rules
//!
//! Schema files are external input, so loading is tolerant of shape
//! problems that do not make the document ambiguous:
//!
//! - A missing or `null` section is an empty section.
//! - A section that is not an object is logged and treated as empty.
//! - A tag that is not a string is kept as an unrecognized tag holding its
//!   JSON text.
//!
//! The document root must be an object; anything else is a load error.
//! Section order is preserved, so reports list keys in the order the schema
//! author wrote them.
//!
//! `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.

use std::path::Path;

use envv_core::{EnvvError, SemanticType};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Document key holding the required section.
pub const REQUIRED_SECTION: &str = "REQUIRED_KEYS";
/// Document key holding the optional section.
pub const OPTIONAL_SECTION: &str = "OPTIONAL_KEYS";

/// Options applied while loading a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Reject tags outside the known set instead of treating them as
    /// always-conforming.
    pub strict_types: bool,
}

/// One schema section: ordered `(key, type)` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSection {
    entries: Vec<(String, SemanticType)>,
}

impl SchemaSection {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `key` with type `ty`. A repeated key replaces the earlier
    /// declaration in place.
    pub fn insert(&mut self, key: impl Into<String>, ty: SemanticType) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = ty,
            None => self.entries.push((key, ty)),
        }
    }

    /// Declared type for `key`.
    pub fn get(&self, key: &str) -> Option<&SemanticType> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, ty)| ty)
    }

    /// `(key, type)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SemanticType)> {
        self.entries.iter().map(|(k, ty)| (k.as_str(), ty))
    }

    /// Declared keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SemanticType)> for SchemaSection {
    fn from_iter<I: IntoIterator<Item = (K, SemanticType)>>(iter: I) -> Self {
        let mut section = Self::new();
        for (k, ty) in iter {
            section.insert(k, ty);
        }
        section
    }
}

impl Serialize for SchemaSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, ty) in &self.entries {
            map.serialize_entry(k, ty)?;
        }
        map.end()
    }
}

/// A two-tier env schema.
///
/// A key may appear in both sections; the validator then applies both
/// checks independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Schema {
    /// Keys that must be set to a non-empty value.
    #[serde(rename = "REQUIRED_KEYS")]
    pub required: SchemaSection,
    /// Keys that are type-checked only when set.
    #[serde(rename = "OPTIONAL_KEYS")]
    pub optional: SchemaSection,
}

impl Schema {
    /// Build a schema from two sections.
    pub fn new(required: SchemaSection, optional: SchemaSection) -> Self {
        Self { required, optional }
    }

    /// Returns true if `key` is declared in either section.
    pub fn declares(&self, key: &str) -> bool {
        self.required.get(key).is_some() || self.optional.get(key).is_some()
    }

    /// Declarations whose tag is outside the known set, required section first.
    pub fn unrecognized(&self) -> Vec<(&str, &SemanticType)> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .filter(|(_, ty)| !ty.is_recognized())
            .collect()
    }

    /// Build a schema from a parsed JSON document.
    ///
    /// `source` names the document in log events and errors.
    ///
    /// # Errors
    ///
    /// Returns `EnvvError::SchemaLoad` if the root is not an object, and
    /// `EnvvError::UnknownSemanticType` for an unknown tag in strict mode.
    pub fn from_json_value(
        doc: &Value,
        source: &str,
        options: SchemaOptions,
    ) -> Result<Self, EnvvError> {
        let root = doc.as_object().ok_or_else(|| EnvvError::SchemaLoad {
            path: source.to_string(),
            reason: format!("document root must be an object, found {}", json_kind(doc)),
        })?;

        let required = parse_section(root, REQUIRED_SECTION, source, options)?;
        let optional = parse_section(root, OPTIONAL_SECTION, source, options)?;

        debug!(
            schema = source,
            required = required.len(),
            optional = optional.len(),
            "parsed schema"
        );

        Ok(Self { required, optional })
    }

    /// Parse a schema from JSON text.
    pub fn from_json_str(
        content: &str,
        source: &str,
        options: SchemaOptions,
    ) -> Result<Self, EnvvError> {
        let doc: Value = serde_json::from_str(content).map_err(|e| EnvvError::SchemaLoad {
            path: source.to_string(),
            reason: format!("invalid JSON: {e}"),
        })?;
        Self::from_json_value(&doc, source, options)
    }

    /// Parse a schema from YAML text.
    pub fn from_yaml_str(
        content: &str,
        source: &str,
        options: SchemaOptions,
    ) -> Result<Self, EnvvError> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| EnvvError::SchemaLoad {
                path: source.to_string(),
                reason: format!("invalid YAML: {e}"),
            })?;
        let doc = yaml_to_json(&yaml).map_err(|reason| EnvvError::SchemaLoad {
            path: source.to_string(),
            reason: format!("YAML-to-JSON conversion failed: {reason}"),
        })?;
        Self::from_json_value(&doc, source, options)
    }

    /// Load a schema file, choosing the format from the extension
    /// (`.yaml`/`.yml` for YAML, anything else JSON).
    ///
    /// # Errors
    ///
    /// Returns `EnvvError::NotFound` if the file does not exist,
    /// `EnvvError::Io` if it cannot be read, and the errors of
    /// [`Schema::from_json_value`] otherwise.
    pub fn from_path(path: &Path, options: SchemaOptions) -> Result<Self, EnvvError> {
        let source = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EnvvError::NotFound {
                    path: source.clone(),
                }
            } else {
                EnvvError::Io(e)
            }
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content, &source, options),
            _ => Self::from_json_str(&content, &source, options),
        }
    }
}

fn parse_section(
    root: &Map<String, Value>,
    name: &str,
    source: &str,
    options: SchemaOptions,
) -> Result<SchemaSection, EnvvError> {
    let declarations = match root.get(name) {
        None | Some(Value::Null) => return Ok(SchemaSection::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            warn!(
                schema = source,
                section = name,
                found = json_kind(other),
                "schema section is not an object; treating it as empty"
            );
            return Ok(SchemaSection::new());
        }
    };

    let mut section = SchemaSection::new();
    for (key, tag) in declarations {
        let ty = match tag {
            Value::String(s) => SemanticType::parse_lenient(s),
            other => SemanticType::Unrecognized(other.to_string()),
        };

        if !ty.is_recognized() {
            if options.strict_types {
                return Err(EnvvError::UnknownSemanticType {
                    key: key.clone(),
                    tag: ty.as_str().to_string(),
                });
            }
            warn!(
                schema = source,
                section = name,
                key = %key,
                tag = %ty,
                "unrecognized type tag; values for this key are not type-checked"
            );
        }

        section.insert(key.as_str(), ty);
    }
    Ok(section)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Convert a `serde_yaml::Value` into the equivalent `serde_json::Value`.
///
/// Scalar map keys are stringified so `8080: number` declares the key
/// `"8080"`. YAML tags are dropped.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent number {n} in JSON"))
            }
        }
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                let key = match k {
                    Yaml::String(s) => s.clone(),
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported map key: {other:?}")),
                };
                map.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(map))
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

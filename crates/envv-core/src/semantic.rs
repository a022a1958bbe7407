//! # Semantic Types — Conformance of Raw Env Values
//!
//! Every env value arrives as a string. A schema declares what shape that
//! string is supposed to have, using one of six type tags:
//!
//! | Tag | Conforms when |
//! |-----|---------------|
//! | `string` | always (any present value) |
//! | `number` | finite numeric literal, e.g. `587`, `-1.5e3`, `0x1F`; blank counts as zero |
//! | `boolean` | `true` or `false`, case-insensitive |
//! | `array` | JSON text whose top-level value is an array |
//! | `json` | JSON text whose top-level value is an object |
//! | `date` | ISO-8601 date or date-time naming a real instant |
//!
//! Tags are matched exactly (`Number` is not `number`). Any other tag is
//! kept as [`SemanticType::Unrecognized`] and accepts every value, so a
//! typo in a schema never produces a false type-mismatch warning. Callers
//! that want typos caught use the strict [`FromStr`] parse instead of
//! [`SemanticType::parse_lenient`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::temporal;

/// Tags understood by [`SemanticType::from_str`], in documentation order.
pub const KNOWN_TYPE_TAGS: &[&str] = &["string", "number", "boolean", "array", "json", "date"];

/// The declared shape of a raw env value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    /// Any value.
    String,
    /// Finite numeric literal.
    Number,
    /// `true` / `false`, case-insensitive.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Json,
    /// ISO-8601 date or date-time.
    Date,
    /// A tag outside the known set, carried verbatim. Accepts every value.
    Unrecognized(String),
}

/// A type tag rejected by the strict parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown semantic type {0:?}; expected one of: string, number, boolean, array, json, date")]
pub struct UnknownTypeTag(pub String);

impl SemanticType {
    /// Parse a tag, keeping anything unknown as [`SemanticType::Unrecognized`].
    pub fn parse_lenient(tag: &str) -> Self {
        tag.parse::<Self>()
            .unwrap_or_else(|UnknownTypeTag(tag)| Self::Unrecognized(tag))
    }

    /// Returns the tag as it appears in a schema document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Json => "json",
            Self::Date => "date",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Returns false for [`SemanticType::Unrecognized`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Returns true if `raw` has the shape this type declares.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Self::String => true,
            Self::Number => is_numeric_literal(raw),
            Self::Boolean => matches!(raw.to_lowercase().as_str(), "true" | "false"),
            Self::Array => parse_json(raw).is_some_and(|v| v.is_array()),
            Self::Json => parse_json(raw).is_some_and(|v| v.is_object()),
            Self::Date => temporal::is_iso8601(raw),
            Self::Unrecognized(_) => true,
        }
    }
}

/// Returns true if `value` is set and conforms to `ty`.
///
/// An unset value never conforms, whatever the type.
pub fn conforms(value: Option<&str>, ty: &SemanticType) -> bool {
    value.is_some_and(|v| ty.accepts(v))
}

/// Numeric coercion check: decimal (sign, fraction, exponent) or an
/// unsigned `0x`/`0o`/`0b` integer. Surrounding whitespace is ignored, and
/// a value that is empty after trimming coerces to zero. NaN and
/// infinities are not numbers.
fn is_numeric_literal(raw: &str) -> bool {
    let s = raw.trim_matches(is_coercion_whitespace);
    if s.is_empty() {
        return true;
    }
    if let Some((radix, body)) = split_radix_prefix(s) {
        return !body.is_empty() && body.chars().all(|c| c.is_digit(radix));
    }
    s.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Whitespace stripped before numeric coercion: Unicode `White_Space`
/// without NEL, plus the byte-order mark.
fn is_coercion_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c != '\u{85}' && c.is_whitespace())
}

fn split_radix_prefix(s: &str) -> Option<(u32, &str)> {
    let prefix = s.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &s[2..]))
}

fn parse_json(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = UnknownTypeTag;

    /// Strict parse: only the six known tags are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "json" => Ok(Self::Json),
            "date" => Ok(Self::Date),
            other => Err(UnknownTypeTag(other.to_string())),
        }
    }
}

impl Serialize for SemanticType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&tag))
    }
}

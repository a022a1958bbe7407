//! # Env Map — Ordered Configuration Snapshot
//!
//! `EnvMap` holds the key/value pairs read from an env file. Keys are
//! case-sensitive and every value is the raw string as it came out of the
//! dotenv parser (variable expansion already applied).
//!
//! Iteration follows first-insertion order. Reports that list keys (the
//! unused-keys warning) depend on this to be reproducible: they name keys
//! in the order the file declared them, not in hash order.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// An insertion-ordered map from env key to raw string value.
///
/// Re-inserting an existing key replaces its value but keeps the key at
/// its original position, the same way a later line in a `.env` file
/// overrides an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl EnvMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Returns true if `key` is set, even to an empty string.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` only when it is set to a non-empty string.
    ///
    /// This is the presence rule used for required keys: `KEY=` counts
    /// as missing.
    pub fn get_present(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for EnvMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for EnvMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl Serialize for EnvMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let env: EnvMap = [("ZETA", "1"), ("ALPHA", "2"), ("MID", "3")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = env.keys().collect();
        assert_eq!(keys, vec!["ZETA", "ALPHA", "MID"]);
    }

    #[test]
    fn reinsert_overwrites_in_place() {
        let mut env = EnvMap::new();
        env.insert("A", "first");
        env.insert("B", "x");
        let previous = env.insert("A", "second");

        assert_eq!(previous.as_deref(), Some("first"));
        assert_eq!(env.get("A"), Some("second"));
        assert_eq!(env.len(), 2);
        let keys: Vec<&str> = env.keys().collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let env: EnvMap = [("api_key", "x")].into_iter().collect();
        assert!(env.contains_key("api_key"));
        assert!(!env.contains_key("API_KEY"));
    }

    #[test]
    fn empty_value_is_set_but_not_present() {
        let env: EnvMap = [("EMPTY", ""), ("ZERO", "0")].into_iter().collect();
        assert!(env.contains_key("EMPTY"));
        assert_eq!(env.get("EMPTY"), Some(""));
        assert_eq!(env.get_present("EMPTY"), None);
        // "0" is a non-empty string, so it counts as present.
        assert_eq!(env.get_present("ZERO"), Some("0"));
        assert_eq!(env.get_present("UNSET"), None);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let env: EnvMap = [("B", "2"), ("A", "1")].into_iter().collect();
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"B":"2","A":"1"}"#);
    }
}

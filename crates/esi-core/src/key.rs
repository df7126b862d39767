//! Cache-key names and values.
//!
//! Keys distinguish variants of the same fragment and double as the
//! parameters handed to in-process evaluation, so their names are kept to a
//! conservative charset and their values to plain scalars.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{EsiError, EsiResult};

/// Check that a name is a valid key name (`[A-Za-z0-9_-]+`).
pub fn is_valid_key_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Coerce a parameter value into its key-value string form.
///
/// Strings pass through, numbers use their display form, and booleans
/// serialize as the literal strings `true`/`false`. `Ok(None)` means a null
/// value, which callers skip. Arrays and objects are rejected.
pub fn key_value_to_string(name: &str, value: &Value) -> EsiResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(if *b { "true" } else { "false" }.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(EsiError::InvalidKeyValue(name.to_string())),
    }
}

/// Insertion-ordered map of cache-key names to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap {
    entries: Vec<(String, String)>,
}

impl KeyMap {
    /// Create an empty key map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a key map from template-directive parameters.
    ///
    /// Invalid names and unsupported value types are dropped with a warning;
    /// null values are skipped silently.
    pub fn from_params(params: &[(String, Value)]) -> Self {
        let mut keys = Self::new();
        for (name, value) in params {
            if !is_valid_key_name(name) {
                warn!(key = %name, "invalid key name, dropping key");
                continue;
            }
            match key_value_to_string(name, value) {
                Ok(Some(value)) => keys.insert(name, value),
                Ok(None) => {}
                Err(_) => {
                    warn!(key = %name, "unsupported value type, dropping key");
                }
            }
        }
        keys
    }

    /// Build a key map from raw query pairs, keeping only valid names.
    ///
    /// Used on the edge-fetch path, where surrogates control the query
    /// string; invalid names are dropped without ceremony.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut keys = Self::new();
        for (name, value) in pairs {
            if is_valid_key_name(name) {
                keys.insert(name, value);
            }
        }
        keys
    }

    /// Set a key, replacing the value of an existing key in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Get a key's value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over the keys in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_name_validation() {
        assert!(is_valid_key_name("a-b_2"));
        assert!(is_valid_key_name("page"));
        assert!(!is_valid_key_name("a b"));
        assert!(!is_valid_key_name(""));
        assert!(!is_valid_key_name("k=v"));
        assert!(!is_valid_key_name("n\u{e5}me"));
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(
            key_value_to_string("k", &json!(true)).unwrap(),
            Some("true".to_string())
        );
        assert_eq!(
            key_value_to_string("k", &json!(false)).unwrap(),
            Some("false".to_string())
        );
        assert_eq!(
            key_value_to_string("k", &json!(42)).unwrap(),
            Some("42".to_string())
        );
        assert_eq!(
            key_value_to_string("k", &json!("v")).unwrap(),
            Some("v".to_string())
        );
        assert_eq!(key_value_to_string("k", &Value::Null).unwrap(), None);
        assert_eq!(
            key_value_to_string("k", &json!(["a"])).unwrap_err(),
            EsiError::InvalidKeyValue("k".to_string())
        );
    }

    #[test]
    fn test_from_params_drops_invalid() {
        let params = vec![
            ("page".to_string(), json!(2)),
            ("a b".to_string(), json!("bad name")),
            ("flag".to_string(), json!(true)),
            ("skip".to_string(), Value::Null),
            ("list".to_string(), json!([1, 2])),
        ];
        let keys = KeyMap::from_params(&params);
        let collected: Vec<(&str, &str)> = keys.iter().collect();
        assert_eq!(collected, [("page", "2"), ("flag", "true")]);
    }

    #[test]
    fn test_from_query_pairs_filters_names() {
        let keys = KeyMap::from_query_pairs([("ok", "1"), ("not ok", "2"), ("", "3")]);
        let collected: Vec<(&str, &str)> = keys.iter().collect();
        assert_eq!(collected, [("ok", "1")]);
    }

    #[test]
    fn test_insert_preserves_order_on_replace() {
        let mut keys = KeyMap::new();
        keys.insert("a", "1");
        keys.insert("b", "2");
        keys.insert("a", "3");
        let collected: Vec<(&str, &str)> = keys.iter().collect();
        assert_eq!(collected, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_remove() {
        let mut keys = KeyMap::new();
        keys.insert("a", "1");
        assert_eq!(keys.remove("a"), Some("1".to_string()));
        assert_eq!(keys.remove("a"), None);
        assert!(keys.is_empty());
    }
}

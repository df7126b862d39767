//! Response-header collection and well-known header names.

/// Header names used by the ESI layer.
pub mod header_names {
    /// Inbound capability advertisement from surrogates.
    pub const SURROGATE_CAPABILITY: &str = "Surrogate-Capability";
    /// Outbound cache directives consumed by surrogates.
    pub const SURROGATE_CONTROL: &str = "Surrogate-Control";
    /// Optional sentinel a front-end cache can gate ESI processing on.
    pub const X_DO_ESI: &str = "X-Do-ESI";
    /// Keys received by the edge-fetch endpoint (debugging).
    pub const X_ESI_KEYS: &str = "X-ESI-Keys";
    /// Template resolved by the edge-fetch endpoint (debugging).
    pub const X_ESI_TEMPLATE: &str = "X-ESI-Template";
    /// Class resolved by the edge-fetch endpoint (debugging).
    pub const X_ESI_CLASS: &str = "X-ESI-Class";
    /// Method resolved by the edge-fetch endpoint (debugging).
    pub const X_ESI_METHOD: &str = "X-ESI-Method";
}

/// Ordered collection of response headers.
///
/// Setting a name that is already present replaces its value in place, so
/// repeated renders of the same header stay in their original position.
/// Lookup is case-insensitive, as header names are on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Get a header value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Remove a header by name, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index).1)
    }

    /// Iterate over the headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of headers set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut headers = ResponseHeaders::new();
        headers.set(header_names::SURROGATE_CONTROL, "max-age=60");
        assert_eq!(headers.get("Surrogate-Control"), Some("max-age=60"));
        assert_eq!(headers.get("surrogate-control"), Some("max-age=60"));
        assert_eq!(headers.get("X-Do-ESI"), None);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers = ResponseHeaders::new();
        headers.set("Surrogate-Control", "max-age=60");
        headers.set("X-Do-ESI", "true");
        headers.set("Surrogate-Control", "no-store, max-age=0");
        assert_eq!(headers.len(), 2);
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["Surrogate-Control", "X-Do-ESI"]);
        assert_eq!(
            headers.get("Surrogate-Control"),
            Some("no-store, max-age=0")
        );
    }

    #[test]
    fn test_remove() {
        let mut headers = ResponseHeaders::new();
        headers.set("X-Do-ESI", "true");
        assert_eq!(headers.remove("x-do-esi"), Some("true".to_string()));
        assert!(headers.is_empty());
        assert_eq!(headers.remove("x-do-esi"), None);
    }
}

//! Path parameters captured during routing.

use serde::Serialize;
use std::collections::BTreeMap;

/// Captured `:name` segments, keyed by parameter name.
///
/// Values are percent-decoded. When a nested router captures a name that an
/// enclosing router already captured, the nested value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a captured value by name (without the leading colon).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Record a capture, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a new set holding `self` overlaid with `captures`.
    pub fn merged(&self, captures: &Params) -> Params {
        let mut merged = self.clone();
        for (name, value) in captures.iter() {
            merged.insert(name, value);
        }
        merged
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_existing_names() {
        let outer: Params = [("one", "one"), ("two", "two")].into_iter().collect();
        let inner: Params = [("one", "three"), ("three", "four")].into_iter().collect();

        let merged = outer.merged(&inner);
        assert_eq!(merged.get("one"), Some("three"));
        assert_eq!(merged.get("two"), Some("two"));
        assert_eq!(merged.get("three"), Some("four"));

        // Original untouched
        assert_eq!(outer.get("one"), Some("one"));
        assert!(!outer.contains("three"));
    }
}

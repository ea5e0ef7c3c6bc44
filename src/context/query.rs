//! Query string parsing.

use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// The value(s) recorded for one query parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// The name appeared once.
    One(String),
    /// The name repeated; values are kept in encounter order.
    Many(Vec<String>),
}

impl QueryValue {
    fn push(&mut self, value: String) {
        match self {
            QueryValue::One(first) => {
                let first = std::mem::take(first);
                *self = QueryValue::Many(vec![first, value]);
            }
            QueryValue::Many(values) => values.push(value),
        }
    }

    /// The first value recorded for the name.
    pub fn first(&self) -> &str {
        match self {
            QueryValue::One(value) => value,
            QueryValue::Many(values) => values.first().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn all(&self) -> Vec<&str> {
        match self {
            QueryValue::One(value) => vec![value.as_str()],
            QueryValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Query string parameters of a request URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(BTreeMap<String, QueryValue>);

impl Query {
    /// Parse the query component of `url` with form-urlencoded rules.
    pub fn from_url(url: &Url) -> Self {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.0.get(name)
    }

    /// Shorthand for the first value of `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).map(QueryValue::first)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, String)> for Query {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map: BTreeMap<String, QueryValue> = BTreeMap::new();
        for (name, value) in iter {
            match map.get_mut(&name) {
                Some(existing) => existing.push(value),
                None => {
                    map.insert(name, QueryValue::One(value));
                }
            }
        }
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> Query {
        let url = Url::parse(&format!("http://localhost/?{raw}")).unwrap();
        Query::from_url(&url)
    }

    #[test]
    fn test_single_values() {
        let q = query("a=1&b=two");
        assert_eq!(q.get("a"), Some(&QueryValue::One("1".into())));
        assert_eq!(q.first("b"), Some("two"));
        assert_eq!(q.get("c"), None);
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let q = query("tag=x&other=1&tag=y&tag=z");
        assert_eq!(
            q.get("tag"),
            Some(&QueryValue::Many(vec!["x".into(), "y".into(), "z".into()]))
        );
        assert_eq!(q.first("tag"), Some("x"));
        assert_eq!(q.get("tag").unwrap().all(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_decoding() {
        let q = query("msg=hello+world&path=%2Fa%2Fb");
        assert_eq!(q.first("msg"), Some("hello world"));
        assert_eq!(q.first("path"), Some("/a/b"));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let q = query("a=1&b=2&b=3");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json, serde_json::json!({ "a": "1", "b": ["2", "3"] }));
    }
}

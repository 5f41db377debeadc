//! Query string parameters for generated links
//!
//! A [`Query`] replaces the whole query component of a link URL. Keys keep
//! their insertion order so the encoded string is deterministic for a
//! given mapping.

use indexmap::IndexMap;
use url::form_urlencoded;

/// A single query value, or several values for a repeated key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Multiple(Vec<String>),
}

impl QueryValue {
    /// All values, in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                *self = QueryValue::Multiple(vec![std::mem::take(first), value]);
            }
            QueryValue::Multiple(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multiple(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(values: [&str; N]) -> Self {
        QueryValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered mapping of query keys to values
///
/// # Example
///
/// ```rust
/// use hypermedia::core::Query;
///
/// let query = Query::new()
///     .with("movie", "/movie/1")
///     .with("search-for", "actors");
///
/// assert_eq!(query.encode(), "movie=%2Fmovie%2F1&search-for=actors");
/// assert_eq!(Query::parse(&query.encode()), query);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: IndexMap<String, QueryValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Query::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, returning the previous value
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Option<QueryValue> {
        self.params.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode as `application/x-www-form-urlencoded`
    ///
    /// Multiple values expand into one pair per value.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            for item in value.values() {
                serializer.append_pair(key, item);
            }
        }
        serializer.finish()
    }

    /// Decode a query string; repeated keys collect into [`QueryValue::Multiple`]
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let mut query = Self::new();
        for (key, value) in form_urlencoded::parse(input.as_bytes()) {
            match query.params.get_mut(&*key) {
                Some(existing) => existing.push(value.into_owned()),
                None => {
                    query
                        .params
                        .insert(key.into_owned(), QueryValue::Single(value.into_owned()));
                }
            }
        }
        query
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let query = Query::from([("q", "a b&c"), ("path", "/x/y")]);
        assert_eq!(query.encode(), "q=a+b%26c&path=%2Fx%2Fy");
    }

    #[test]
    fn test_encode_multiple_values() {
        let query = Query::new().with("tag", ["drama", "comedy"]).with("page", "2");
        assert_eq!(query.encode(), "tag=drama&tag=comedy&page=2");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(Query::new().encode(), "");
    }

    #[test]
    fn test_parse_collects_repeated_keys() {
        let query = Query::parse("?tag=drama&page=2&tag=comedy");
        assert_eq!(
            query.get("tag"),
            Some(&QueryValue::Multiple(vec![
                "drama".to_string(),
                "comedy".to_string()
            ]))
        );
        assert_eq!(query.get("page"), Some(&QueryValue::from("2")));
    }

    #[test]
    fn test_round_trip_preserves_mapping() {
        let query = Query::from([
            ("movie", "/movie/1"),
            ("search-for", "actors"),
            ("empty", ""),
            ("symbols", "~!*()'=+&?#"),
        ]);
        assert_eq!(Query::parse(&query.encode()), query);
    }

    #[test]
    fn test_insert_replaces_value_in_place() {
        let mut query = Query::from([("a", "1"), ("b", "2")]);
        let previous = query.insert("a", "3");

        assert_eq!(previous, Some(QueryValue::from("1")));
        assert_eq!(query.encode(), "a=3&b=2");
    }
}

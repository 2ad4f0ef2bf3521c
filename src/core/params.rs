//! Raw query-string parameters
//!
//! Browsers may repeat a key (`?page=2&page=5`). Reports only ever look at the
//! first occurrence, so the raw map keeps the first value and drops the rest.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use indexmap::IndexMap;
use std::convert::Infallible;

/// Query-string key/value pairs as received, first occurrence wins
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParams {
    values: IndexMap<String, String>,
}

impl RawParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered pairs, keeping the first value of repeated keys
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = IndexMap::new();
        for (key, value) in pairs {
            values.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { values }
    }

    /// Parse a raw query string (without the leading `?`)
    ///
    /// Pairs that cannot be percent-decoded are dropped.
    pub fn parse(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                Some((decode_component(key)?, decode_component(value)?))
            });
        Self::from_pairs(pairs)
    }

    /// Get the first value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

impl<S> FromRequestParts<S> for RawParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A vector of pairs keeps duplicates so the first occurrence can win.
        match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => Ok(Self::from_pairs(pairs)),
            Err(_) => Ok(Self::parse(parts.uri.query().unwrap_or_default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let params = RawParams::parse("page=2&limit=10&page=5");
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("limit"), Some("10"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_decodes_percent_and_plus() {
        let params = RawParams::parse("clasificacion=A+-+Alto+Valor&categoria=Hogar%20y%20Jard%C3%ADn");
        assert_eq!(params.get("clasificacion"), Some("A - Alto Valor"));
        assert_eq!(params.get("categoria"), Some("Hogar y Jardín"));
    }

    #[test]
    fn test_key_without_value() {
        let params = RawParams::parse("minIngresos&page=3");
        assert_eq!(params.get("minIngresos"), Some(""));
        assert_eq!(params.get("page"), Some("3"));
    }

    #[test]
    fn test_empty_query() {
        assert!(RawParams::parse("").is_empty());
        assert!(RawParams::new().get("page").is_none());
    }
}

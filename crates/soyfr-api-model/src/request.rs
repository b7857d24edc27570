//! The per-call request value handed to data sources and controllers.

use std::collections::BTreeMap;

use bytes::Bytes;

/// Query parameters as name → ordered list of values.
///
/// Each raw value is split on commas: `sort=title,date` yields
/// `["title", "date"]`. When a name is repeated, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    /// Create an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw (percent-encoded) query string.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            if params.0.contains_key(name.as_ref()) {
                continue;
            }
            let values = value.split(',').map(ToOwned::to_owned).collect();
            params.0.insert(name.into_owned(), values);
        }
        params
    }

    /// All values for a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// The first value for a parameter.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Whether a parameter is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Set a parameter, replacing any previous values.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.0.insert(name.into(), values);
    }

    /// Iterate parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A routed API request.
///
/// Created per incoming HTTP call and dropped once the response is written.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Target resource type name.
    pub resource: String,
    /// Ids from the element segment, comma-split. Empty for collection routes.
    pub ids: Vec<String>,
    /// Relation name from the relation segment.
    pub relation: Option<String>,
    /// Query parameters, passed through to data sources unmodified.
    pub query: QueryParams,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Raw request body.
    pub body: Bytes,
}

impl ApiRequest {
    /// Create a bodiless GET request for a resource collection.
    #[must_use]
    pub fn collection(resource: impl Into<String>) -> Self {
        Self {
            method: http::Method::GET,
            resource: resource.into(),
            ids: Vec::new(),
            relation: None,
            query: QueryParams::new(),
            headers: http::HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Builder-style query parameter setter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.query.insert(name, values);
        self
    }

    /// The single element id, if the request addresses exactly one element.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self.ids.as_slice() {
            [id] => Some(id),
            _ => None,
        }
    }
}

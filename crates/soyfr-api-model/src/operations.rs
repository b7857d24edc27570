//! Route kinds and API operations.

use std::fmt;

/// Route shape derived from the path: `/{type}[/{ids}[/{relation}]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// `/{type}`
    Collection,
    /// `/{type}/{id}` or `/{type}/{id1},{id2}`
    Element,
    /// `/{type}/{id}/{relation}`
    Relation,
}

impl RouteKind {
    /// Value of the `Allow` header for OPTIONS requests on this route.
    #[must_use]
    pub fn allowed_methods(&self) -> &'static str {
        match self {
            Self::Collection => "GET,POST,OPTIONS",
            Self::Element => "GET,PUT,DELETE,OPTIONS",
            Self::Relation => "GET,OPTIONS",
        }
    }

    /// Returns the route kind name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "Collection",
            Self::Element => "Element",
            Self::Relation => "Relation",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All operations the dispatcher performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    // Reads
    /// `GET /{type}`
    FindAll,
    /// `GET /{type}/{id}`
    FindOne,
    /// `GET /{type}/{id1},{id2},...`
    FindMultiple,
    /// `GET /{type}/{id}/{relation}`
    FindRelated,

    // Writes
    /// `POST /{type}`
    Create,
    /// `PUT /{type}/{id}`
    Update,
    /// `DELETE /{type}/{id}`
    Delete,

    // Meta
    /// `OPTIONS` on a collection or element route.
    Options,
}

impl ApiOperation {
    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindAll => "FindAll",
            Self::FindOne => "FindOne",
            Self::FindMultiple => "FindMultiple",
            Self::FindRelated => "FindRelated",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Options => "Options",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

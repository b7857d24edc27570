//! API error types.
//!
//! Every failure that reaches the dispatch boundary is an [`ApiError`]. The
//! error formatter renders it as
//!
//! ```json
//! { "errors": [ { "status": "404", "title": "post not found" } ] }
//! ```
//!
//! or, when field-level errors are attached, as the list of those errors alone.

use std::fmt;

use serde::Serialize;

/// Broad category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ApiErrorKind {
    /// Missing resource type, relation, or entity id.
    NotFound,
    /// Rejected input, usually carrying field errors.
    Validation,
    /// Uncategorized failure. Rendered as a bare 500 with no body.
    #[default]
    InternalServerError,
    /// Status and title chosen by whoever raised the error (data source or controller).
    Http,
}

impl ApiErrorKind {
    /// Returns the short kind string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::Validation => "Validation",
            Self::InternalServerError => "InternalServerError",
            Self::Http => "Http",
        }
    }

    /// Returns the default HTTP status code for this kind.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::Validation => http::StatusCode::BAD_REQUEST,
            Self::InternalServerError | Self::Http => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field-level error attached to an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Opaque identifier chosen by the raiser.
    pub id: String,
    /// Path of the offending field.
    pub path: String,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// An error produced anywhere between routing and response writing.
#[derive(Debug)]
pub struct ApiError {
    /// The error kind.
    pub kind: ApiErrorKind,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// User-facing title.
    pub title: String,
    /// Field-level errors, in the order they were added.
    pub errors: Vec<FieldError>,
    /// The underlying source error, if any. Never serialized.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ApiError({}, {}): {}",
            self.kind,
            self.status_code.as_u16(),
            self.title
        )
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ApiError {
    /// Create a new error of the given kind with a custom title.
    #[must_use]
    pub fn new(kind: ApiErrorKind, title: impl Into<String>) -> Self {
        Self {
            status_code: kind.default_status_code(),
            title: title.into(),
            kind,
            errors: Vec::new(),
            source: None,
        }
    }

    /// Create an error with an explicit status code.
    ///
    /// Controllers and data sources use this to pick the response status.
    #[must_use]
    pub fn with_status(status_code: http::StatusCode, title: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            status_code,
            title: title.into(),
            errors: Vec::new(),
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Append a field error.
    #[must_use]
    pub fn with_field_error(mut self, id: impl Into<String>, path: impl Into<String>) -> Self {
        self.errors.push(FieldError::new(id, path));
        self
    }

    /// Whether the error renders with a body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.kind != ApiErrorKind::InternalServerError
    }

    // -- Convenience constructors --

    /// Resource, relation or entity not found.
    #[must_use]
    pub fn not_found(title: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, title)
    }

    /// Validation error.
    #[must_use]
    pub fn validation(title: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, title)
    }

    /// Uncategorized internal failure.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InternalServerError, message)
    }

    /// Method not allowed on an otherwise valid route.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method) -> Self {
        Self::with_status(
            http::StatusCode::METHOD_NOT_ALLOWED,
            format!("method {method} not allowed"),
        )
    }
}

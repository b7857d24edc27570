//! Error types for the Soyfr application layer.

use soyfr_api_http::RegistryError;

/// Core error type for Soyfr.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Resource registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

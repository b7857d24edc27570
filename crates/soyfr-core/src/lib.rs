//! Configuration and application resources for Soyfr.
//!
//! The engine in `soyfr-api-http` knows nothing about concrete resources.
//! This crate supplies the pieces a running server needs on top of it:
//! environment-driven configuration and the `users` resource.

mod config;
mod error;
pub mod user;

use std::sync::Arc;

use soyfr_api_http::ResourceRegistry;

pub use config::SoyfrConfig;
pub use error::{CoreError, CoreResult};
pub use user::{UserSource, user_schema};

/// Build the registry of every resource the application serves.
///
/// # Errors
///
/// Returns [`CoreError::Registry`] if two resources share a type name.
pub fn build_registry() -> CoreResult<ResourceRegistry> {
    let mut builder = ResourceRegistry::builder();
    builder.register(user_schema(), Arc::new(UserSource::new()))?;
    Ok(builder.build())
}

//! Resource dispatch engine and HTTP service layer for Soyfr.
//!
//! This crate maps registered resource types onto a JSON document REST
//! protocol:
//!
//! - **Context**: turns a raw HTTP request into a method, path segments, query and body
//! - **Router**: classifies the path into a collection, element or relation route
//! - **Registry**: resource type name → schema, data source and optional controller
//! - **Dispatch**: controller hook → data source → relationship resolution → document
//! - **Resolver**: side-loads related entities through their own data sources
//! - **Document**: renders entities into the response document shape
//! - **Response**: canonical error documents and HTTP response helpers
//! - **Service**: Hyper `Service` implementation tying it together

pub mod body;
pub mod context;
pub mod dispatch;
pub mod document;
pub mod registry;
pub mod resolver;
pub mod response;
pub mod router;
pub mod service;
pub mod source;

pub use body::ApiResponseBody;
pub use dispatch::{ApiResponse, Dispatcher};
pub use registry::{RegistryError, ResourceDefinition, ResourceRegistry, ResourceRegistryBuilder};
pub use service::{ApiHttpConfig, ApiHttpService};
pub use source::{Controller, DataSource, HookOutcome};

//! Model types for the Soyfr resource API.
//!
//! These types are shared between the HTTP engine and the data sources that
//! plug into it:
//!
//! - **Schema**: explicit per-resource field descriptors (no reflection)
//! - **Entity**: the generic payload container data sources produce and consume
//! - **Request**: the per-call request value handed to data sources and controllers
//! - **Errors**: the `ApiError` type rendered into the canonical error document

pub mod entity;
pub mod error;
pub mod operations;
pub mod request;
pub mod schema;

pub use entity::Entity;
pub use error::{ApiError, ApiErrorKind, FieldError};
pub use operations::{ApiOperation, RouteKind};
pub use request::{ApiRequest, QueryParams};
pub use schema::{FieldDescriptor, FieldKind, Schema};

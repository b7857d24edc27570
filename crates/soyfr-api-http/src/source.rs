//! Data-source and controller contracts.
//!
//! A [`DataSource`] provides persistence for one resource type. A
//! [`Controller`] is an optional per-resource override that sees each
//! request before the data source does.
//!
//! Both are shared across all concurrent requests; implementations must be
//! safe for concurrent use (`Send + Sync`) and do their own synchronization.

use async_trait::async_trait;

use soyfr_api_model::{ApiError, ApiRequest, Entity};

/// Persistence operations for one resource type.
///
/// Filtering and limiting are the data source's business: the engine passes
/// query parameters through untouched. Relationship lookups arrive as
/// `find_all` calls carrying a single `{ownerType}ID` parameter.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Return all entities matching the request.
    async fn find_all(&self, req: &ApiRequest) -> Result<Vec<Entity>, ApiError>;

    /// Return a single entity by id.
    async fn find_one(&self, id: &str, req: &ApiRequest) -> Result<Entity, ApiError>;

    /// Return the entities for the given ids. Missing ids may simply be
    /// absent from the result.
    async fn find_multiple(&self, ids: &[String], req: &ApiRequest)
    -> Result<Vec<Entity>, ApiError>;

    /// Store a new entity and return its id.
    async fn create(&self, entity: Entity) -> Result<String, ApiError>;

    /// Store changes to an existing entity.
    async fn update(&self, entity: Entity) -> Result<(), ApiError>;

    /// Remove an entity by id.
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// What a controller hook decided.
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome<T> {
    /// Continue with the data source.
    Proceed,
    /// Skip the data source and respond with this result.
    Replace(T),
}

/// Per-resource override point.
///
/// Every hook defaults to [`HookOutcome::Proceed`]. Returning an error stops
/// dispatch; the data source is not called and the error is rendered.
/// Returning [`HookOutcome::Replace`] bypasses the data source entirely for
/// that call.
#[async_trait]
pub trait Controller: Send + Sync + 'static {
    /// Called before `DataSource::find_all`.
    async fn find_all(&self, _req: &ApiRequest) -> Result<HookOutcome<Vec<Entity>>, ApiError> {
        Ok(HookOutcome::Proceed)
    }

    /// Called before `DataSource::find_one`.
    async fn find_one(
        &self,
        _req: &ApiRequest,
        _id: &str,
    ) -> Result<HookOutcome<Entity>, ApiError> {
        Ok(HookOutcome::Proceed)
    }

    /// Called before `DataSource::create` with the parsed entity. A
    /// replacement is the created entity and must carry its id.
    async fn create(
        &self,
        _req: &ApiRequest,
        _entity: &Entity,
    ) -> Result<HookOutcome<Entity>, ApiError> {
        Ok(HookOutcome::Proceed)
    }

    /// Called before `DataSource::update` with the parsed entity.
    async fn update(
        &self,
        _req: &ApiRequest,
        _entity: &Entity,
    ) -> Result<HookOutcome<()>, ApiError> {
        Ok(HookOutcome::Proceed)
    }

    /// Called before `DataSource::delete`.
    async fn delete(&self, _req: &ApiRequest, _id: &str) -> Result<HookOutcome<()>, ApiError> {
        Ok(HookOutcome::Proceed)
    }
}

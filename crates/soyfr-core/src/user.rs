//! The `users` resource.
//!
//! Users are held in a concurrent in-memory map keyed by a generated uuid.

use async_trait::async_trait;
use dashmap::DashMap;
use soyfr_api_http::DataSource;
use soyfr_api_model::{ApiError, ApiRequest, Entity, Schema};

/// Schema of the `users` resource.
#[must_use]
pub fn user_schema() -> Schema {
    Schema::for_type("User").scalar("username")
}

/// In-memory data source for users.
#[derive(Debug, Default)]
pub struct UserSource {
    users: DashMap<String, Entity>,
}

impl UserSource {
    /// Create an empty user store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn user_not_found() -> ApiError {
    ApiError::not_found("user not found")
}

fn username(entity: &Entity) -> &str {
    entity.get_str("username").unwrap_or_default()
}

#[async_trait]
impl DataSource for UserSource {
    async fn find_all(&self, _req: &ApiRequest) -> Result<Vec<Entity>, ApiError> {
        let mut users: Vec<Entity> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| username(a).cmp(username(b)).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_one(&self, id: &str, _req: &ApiRequest) -> Result<Entity, ApiError> {
        self.users
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(user_not_found)
    }

    async fn find_multiple(
        &self,
        ids: &[String],
        _req: &ApiRequest,
    ) -> Result<Vec<Entity>, ApiError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|e| e.value().clone()))
            .collect())
    }

    async fn create(&self, mut entity: Entity) -> Result<String, ApiError> {
        if username(&entity).is_empty() {
            return Err(ApiError::validation("username is required")
                .with_field_error("username-required", "username"));
        }

        let id = uuid::Uuid::new_v4().to_string();
        entity.id.clone_from(&id);
        tracing::debug!(%id, username = username(&entity), "created user");
        self.users.insert(id.clone(), entity);
        Ok(id)
    }

    async fn update(&self, entity: Entity) -> Result<(), ApiError> {
        let mut stored = self.users.get_mut(&entity.id).ok_or_else(user_not_found)?;
        for (name, value) in entity.fields {
            stored.set(&name, value);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.users
            .remove(id)
            .map(|_| ())
            .ok_or_else(user_not_found)
    }
}

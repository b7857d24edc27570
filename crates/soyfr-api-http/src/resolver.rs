//! Relationship resolution.
//!
//! Related entities are always fetched through the related resource's own
//! data source:
//!
//! - to-one with a known foreign key: `find_one(fk)`. When the direct lookup
//!   fails, `find_all` filtered by `{ownerType}ID={ownerId}` is consulted and
//!   only an entity whose id equals the foreign key is accepted
//! - to-one without a foreign key: the same filter, which must match exactly
//!   one entity
//! - to-many: `find_all` filtered by `{ownerType}ID={ownerId}`
//!
//! While building links for a document, failures are logged and degrade to
//! an empty relation. The relation route uses [`RelationResolver::related`],
//! which propagates them instead.

use std::sync::Arc;

use soyfr_api_model::schema::FieldDescriptor;
use soyfr_api_model::{ApiError, ApiRequest, Entity};

use crate::document::{LinkedSet, Links, RelationLink, Resolved};
use crate::registry::{ResourceDefinition, ResourceRegistry};

/// Result of resolving one relation for the relation route.
#[derive(Debug)]
pub enum Related {
    /// To-one relation; `None` when nothing is linked.
    One(Option<Resolved>),
    /// To-many relation.
    Many(Vec<Resolved>),
}

/// Resolves relations declared in resource schemas.
#[derive(Debug, Clone, Copy)]
pub struct RelationResolver<'a> {
    registry: &'a ResourceRegistry,
    base_path: &'a str,
}

impl<'a> RelationResolver<'a> {
    /// Create a resolver over a registry. `base_path` prefixes relation URLs.
    #[must_use]
    pub fn new(registry: &'a ResourceRegistry, base_path: &'a str) -> Self {
        Self {
            registry,
            base_path,
        }
    }

    /// Build link metadata for every relation of `entity`.
    ///
    /// With a `linked` sink, related entities are fetched and side-loaded.
    /// Without one, only metadata is produced: to-one links come from the
    /// foreign key alone, to-many links still query for ids.
    pub async fn links(
        &self,
        owner: &ResourceDefinition,
        entity: &Entity,
        req: &ApiRequest,
        mut linked: Option<&mut LinkedSet>,
    ) -> Links {
        let mut links = Links::new();

        for relation in owner.schema().relations() {
            let Some(target_type) = relation.target() else {
                continue;
            };
            let target = self.registry.lookup(target_type);
            let resource = format!(
                "{}/{}/{}/{}",
                self.base_path,
                owner.type_name(),
                entity.id,
                relation.name
            );

            let link = match relation.foreign_key() {
                Some(foreign_key) => {
                    let fk = entity.foreign_key(foreign_key);
                    if let (Some(fk), Some(target), Some(sink)) =
                        (fk, &target, linked.as_deref_mut())
                    {
                        match self.load_to_one(owner, entity, target, fk, req).await {
                            Ok(Some(related)) => {
                                sink.insert(Resolved::new(Arc::clone(target), related));
                            }
                            Ok(None) => {}
                            Err(err) => {
                                tracing::warn!(
                                    resource = owner.type_name(),
                                    id = %entity.id,
                                    relation = %relation.name,
                                    error = %err,
                                    "failed to resolve to-one relation",
                                );
                            }
                        }
                    }
                    RelationLink {
                        id: fk.map(ToOwned::to_owned),
                        ids: None,
                        type_name: target_type.to_owned(),
                        resource,
                    }
                }
                None => {
                    let mut ids = Vec::new();
                    if let Some(target) = &target {
                        match self.load_to_many(owner, entity, target, req).await {
                            Ok(related) => {
                                for item in related {
                                    ids.push(item.id.clone());
                                    if let Some(sink) = linked.as_deref_mut() {
                                        sink.insert(Resolved::new(Arc::clone(target), item));
                                    }
                                }
                            }
                            Err(err) => {
                                tracing::warn!(
                                    resource = owner.type_name(),
                                    id = %entity.id,
                                    relation = %relation.name,
                                    error = %err,
                                    "failed to resolve to-many relation",
                                );
                            }
                        }
                    }
                    RelationLink {
                        id: None,
                        ids: Some(ids),
                        type_name: target_type.to_owned(),
                        resource,
                    }
                }
            };

            links.insert(relation.name.clone(), link);
        }

        links
    }

    /// Resolve a single relation for the relation route. Errors propagate.
    pub async fn related(
        &self,
        owner: &ResourceDefinition,
        entity: &Entity,
        relation: &FieldDescriptor,
        req: &ApiRequest,
    ) -> Result<Related, ApiError> {
        let Some(target_type) = relation.target() else {
            return Err(ApiError::not_found(format!(
                "relation {} not found",
                relation.name
            )));
        };
        let target = self.registry.lookup(target_type).ok_or_else(|| {
            ApiError::not_found(format!("resource type {target_type} not found"))
        })?;

        if let Some(foreign_key) = relation.foreign_key() {
            let found = match entity.foreign_key(foreign_key) {
                Some(fk) => self.load_to_one(owner, entity, &target, fk, req).await?,
                None => self.load_by_filter(owner, entity, &target, req).await?,
            };
            return Ok(Related::One(
                found.map(|e| Resolved::new(Arc::clone(&target), e)),
            ));
        }

        let found = self.load_to_many(owner, entity, &target, req).await?;
        Ok(Related::Many(
            found
                .into_iter()
                .map(|e| Resolved::new(Arc::clone(&target), e))
                .collect(),
        ))
    }

    async fn load_to_one(
        &self,
        owner: &ResourceDefinition,
        entity: &Entity,
        target: &ResourceDefinition,
        fk: &str,
        req: &ApiRequest,
    ) -> Result<Option<Entity>, ApiError> {
        let direct = ApiRequest {
            headers: req.headers.clone(),
            ..ApiRequest::collection(target.type_name())
        };
        let err = match target.source().find_one(fk, &direct).await {
            Ok(found) => return Ok(Some(found)),
            Err(err) => err,
        };
        tracing::debug!(
            resource = target.type_name(),
            id = fk,
            error = %err,
            "direct lookup failed, querying by owner filter",
        );
        match self.load_to_many(owner, entity, target, req).await {
            Ok(found) => Ok(found.into_iter().find(|e| e.id == fk)),
            Err(_) => Err(err),
        }
    }

    async fn load_by_filter(
        &self,
        owner: &ResourceDefinition,
        entity: &Entity,
        target: &ResourceDefinition,
        req: &ApiRequest,
    ) -> Result<Option<Entity>, ApiError> {
        let mut found = self.load_to_many(owner, entity, target, req).await?;
        if found.len() > 1 {
            tracing::warn!(
                resource = target.type_name(),
                owner = owner.type_name(),
                owner_id = %entity.id,
                matches = found.len(),
                "to-one filter matched several entities, treating as unlinked",
            );
            return Ok(None);
        }
        Ok(found.pop())
    }

    async fn load_to_many(
        &self,
        owner: &ResourceDefinition,
        entity: &Entity,
        target: &ResourceDefinition,
        req: &ApiRequest,
    ) -> Result<Vec<Entity>, ApiError> {
        let filter = ApiRequest {
            headers: req.headers.clone(),
            ..ApiRequest::collection(target.type_name())
        }
        .with_query(owner.schema().filter_param(), vec![entity.id.clone()]);
        target.source().find_all(&filter).await
    }
}

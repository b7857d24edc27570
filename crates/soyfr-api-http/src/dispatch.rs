//! Operation dispatch.
//!
//! For every routed request the [`Dispatcher`]:
//!
//! 1. looks the resource type up in the registry (404 when unknown) and
//!    maps the method to an operation (405 when unsupported)
//! 2. offers the operation to the resource's controller, if any
//! 3. calls the data source unless the controller replaced the result
//! 4. resolves relations of the returned entities
//! 5. assembles the response document
//!
//! The first error at any step aborts the request. Relation resolution while
//! building links is the exception; see [`crate::resolver`].

use std::sync::Arc;

use serde_json::Value;
use soyfr_api_model::{ApiError, ApiOperation, ApiRequest, Entity, RouteKind};

use crate::document::{Document, LinkedSet, Resolved, render_entity};
use crate::registry::{ResourceDefinition, ResourceRegistry};
use crate::resolver::{Related, RelationResolver};
use crate::router::{Route, Router};
use crate::source::HookOutcome;

/// Outcome of a successfully dispatched operation.
#[derive(Debug)]
pub enum ApiResponse {
    /// A JSON document.
    Document {
        /// Response status.
        status: http::StatusCode,
        /// Document body.
        document: Document,
        /// `Location` header for created entities.
        location: Option<String>,
    },
    /// 204 with no body.
    NoContent {
        /// `Allow` header for OPTIONS responses.
        allow: Option<&'static str>,
    },
}

impl ApiResponse {
    fn ok(document: Document) -> Self {
        Self::Document {
            status: http::StatusCode::OK,
            document,
            location: None,
        }
    }
}

/// Routes requests to data sources and assembles documents.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<ResourceRegistry>,
    router: Router,
    base_path: String,
}

impl Dispatcher {
    /// Create a dispatcher over a frozen registry.
    #[must_use]
    pub fn new(registry: Arc<ResourceRegistry>, prefix: &str) -> Self {
        let router = Router::new(prefix);
        let base_path = router.base_path();
        Self {
            registry,
            router,
            base_path,
        }
    }

    /// The router matching this dispatcher's prefix.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The registry.
    #[must_use]
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Dispatch a request of the given path shape.
    ///
    /// The resource type is looked up before the method is mapped to an
    /// operation, so an unknown type is a 404 for every method.
    pub async fn dispatch(&self, kind: RouteKind, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        let definition = self.registry.lookup(&req.resource).ok_or_else(|| {
            ApiError::not_found(format!("resource type {} not found", req.resource))
        })?;
        let route = Route::identify(kind, &req)?;

        tracing::debug!(
            operation = %route.operation,
            resource = %req.resource,
            ids = ?req.ids,
            relation = ?req.relation,
            "dispatching API operation",
        );

        match route.operation {
            ApiOperation::FindAll => self.find_all(&definition, &req).await,
            ApiOperation::FindOne => self.find_one(&definition, &req).await,
            ApiOperation::FindMultiple => self.find_multiple(&definition, &req).await,
            ApiOperation::FindRelated => self.find_related(&definition, &req).await,
            ApiOperation::Create => self.create(&definition, &req).await,
            ApiOperation::Update => self.update(&definition, &req).await,
            ApiOperation::Delete => self.delete(&definition, &req).await,
            ApiOperation::Options => Ok(ApiResponse::NoContent {
                allow: Some(route.kind.allowed_methods()),
            }),
        }
    }

    async fn find_all(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let hooked = match definition.controller() {
            Some(controller) => controller.find_all(req).await?,
            None => HookOutcome::Proceed,
        };
        let entities = match hooked {
            HookOutcome::Replace(entities) => entities,
            HookOutcome::Proceed => definition.source().find_all(req).await?,
        };
        Ok(ApiResponse::ok(
            self.assemble_many(definition, entities, req).await,
        ))
    }

    async fn find_one(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let id = single_id(req)?;
        let hooked = match definition.controller() {
            Some(controller) => controller.find_one(req, id).await?,
            None => HookOutcome::Proceed,
        };
        let entity = match hooked {
            HookOutcome::Replace(entity) => entity,
            HookOutcome::Proceed => definition.source().find_one(id, req).await?,
        };
        Ok(ApiResponse::ok(
            self.assemble_one(definition, entity, req).await,
        ))
    }

    async fn find_multiple(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let entities = definition.source().find_multiple(&req.ids, req).await?;
        if entities.is_empty() {
            return Err(ApiError::not_found(format!(
                "no {} found for ids {}",
                definition.type_name(),
                req.ids.join(",")
            )));
        }
        Ok(ApiResponse::ok(
            self.assemble_many(definition, entities, req).await,
        ))
    }

    async fn find_related(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let id = single_id(req)?;
        let name = req.relation.as_deref().unwrap_or_default();
        let relation = definition.schema().relation(name).ok_or_else(|| {
            ApiError::not_found(format!(
                "relation {name} not found on {}",
                definition.type_name()
            ))
        })?;

        let owner = definition.source().find_one(id, req).await?;
        let related = self
            .resolver()
            .related(definition, &owner, relation, req)
            .await?;

        let document = match related {
            Related::One(Some(resolved)) => {
                self.assemble_one(&resolved.definition, resolved.entity, req)
                    .await
            }
            Related::One(None) => Document {
                data: Value::Null,
                linked: Vec::new(),
            },
            Related::Many(items) => {
                let mut linked = LinkedSet::new();
                let mut data = Vec::with_capacity(items.len());
                for item in &items {
                    data.push(self.render_primary(item, req, &mut linked).await);
                }
                self.finish(Value::Array(data), linked, req).await
            }
        };
        Ok(ApiResponse::ok(document))
    }

    async fn create(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let entity = parse_write_body(definition, &req.body)?;
        let hooked = match definition.controller() {
            Some(controller) => controller.create(req, &entity).await?,
            None => HookOutcome::Proceed,
        };
        let created = match hooked {
            HookOutcome::Replace(created) => created,
            HookOutcome::Proceed => {
                let id = definition.source().create(entity).await?;
                definition.source().find_one(&id, req).await?
            }
        };

        let location = format!(
            "{}/{}/{}",
            self.base_path,
            definition.type_name(),
            created.id
        );
        tracing::debug!(resource = definition.type_name(), id = %created.id, "created entity");

        Ok(ApiResponse::Document {
            status: http::StatusCode::CREATED,
            document: self.assemble_one(definition, created, req).await,
            location: Some(location),
        })
    }

    async fn update(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let id = single_id(req)?;
        let mut entity = parse_write_body(definition, &req.body)?;
        if entity.id.is_empty() {
            entity.id = id.to_owned();
        } else if entity.id != id {
            return Err(ApiError::validation(format!(
                "body id {} does not match url id {id}",
                entity.id
            )));
        }

        let hooked = match definition.controller() {
            Some(controller) => controller.update(req, &entity).await?,
            None => HookOutcome::Proceed,
        };
        if let HookOutcome::Proceed = hooked {
            definition.source().update(entity).await?;
        }
        Ok(ApiResponse::NoContent { allow: None })
    }

    async fn delete(
        &self,
        definition: &Arc<ResourceDefinition>,
        req: &ApiRequest,
    ) -> Result<ApiResponse, ApiError> {
        let id = single_id(req)?;
        let hooked = match definition.controller() {
            Some(controller) => controller.delete(req, id).await?,
            None => HookOutcome::Proceed,
        };
        if let HookOutcome::Proceed = hooked {
            definition.source().delete(id).await?;
        }
        Ok(ApiResponse::NoContent { allow: None })
    }

    // -- Document assembly --

    fn resolver(&self) -> RelationResolver<'_> {
        RelationResolver::new(&self.registry, &self.base_path)
    }

    async fn assemble_one(
        &self,
        definition: &Arc<ResourceDefinition>,
        entity: Entity,
        req: &ApiRequest,
    ) -> Document {
        let mut linked = LinkedSet::new();
        let primary = Resolved::new(Arc::clone(definition), entity);
        let data = self.render_primary(&primary, req, &mut linked).await;
        self.finish(data, linked, req).await
    }

    async fn assemble_many(
        &self,
        definition: &Arc<ResourceDefinition>,
        entities: Vec<Entity>,
        req: &ApiRequest,
    ) -> Document {
        let mut linked = LinkedSet::new();
        let mut data = Vec::with_capacity(entities.len());
        for entity in entities {
            let primary = Resolved::new(Arc::clone(definition), entity);
            data.push(self.render_primary(&primary, req, &mut linked).await);
        }
        self.finish(Value::Array(data), linked, req).await
    }

    /// Render a primary entity, side-loading its relations into `linked`.
    async fn render_primary(
        &self,
        primary: &Resolved,
        req: &ApiRequest,
        linked: &mut LinkedSet,
    ) -> Value {
        let links = self
            .resolver()
            .links(&primary.definition, &primary.entity, req, Some(linked))
            .await;
        render_entity(primary.definition.schema(), &primary.entity, &links)
    }

    /// Render the side-loaded set (links metadata only, no further loading).
    async fn finish(&self, data: Value, linked: LinkedSet, req: &ApiRequest) -> Document {
        let mut rendered = Vec::with_capacity(linked.len());
        for item in linked.into_entries() {
            let links = self
                .resolver()
                .links(&item.definition, &item.entity, req, None)
                .await;
            rendered.push(render_entity(item.definition.schema(), &item.entity, &links));
        }
        Document {
            data,
            linked: rendered,
        }
    }
}

/// The single id of an element or relation route.
fn single_id(req: &ApiRequest) -> Result<&str, ApiError> {
    req.id().ok_or_else(|| {
        ApiError::internal_error(format!(
            "expected exactly one id, got {}",
            req.ids.len()
        ))
    })
}

/// Parse `{"<type>": object | [object]}` into an entity.
///
/// An empty or multi-element array is an internal error, not a validation
/// error.
pub fn parse_write_body(
    definition: &ResourceDefinition,
    body: &[u8],
) -> Result<Entity, ApiError> {
    let type_name = definition.type_name();
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::validation("Bad Request").with_source(e))?;

    let payload = document
        .as_object()
        .and_then(|root| root.get(type_name))
        .ok_or_else(|| ApiError::validation(format!("expected top-level key {type_name}")))?;

    let object = match payload {
        Value::Object(object) => object,
        Value::Array(items) => match items.as_slice() {
            [Value::Object(object)] => object,
            [_] => {
                return Err(ApiError::validation(format!(
                    "{type_name} entry must be an object"
                )));
            }
            _ => {
                return Err(ApiError::internal_error(format!(
                    "expected exactly one {type_name} entity, got {}",
                    items.len()
                )));
            }
        },
        _ => {
            return Err(ApiError::validation(format!(
                "{type_name} must be an object or an array"
            )));
        }
    };

    Entity::from_json(definition.schema(), object)
}

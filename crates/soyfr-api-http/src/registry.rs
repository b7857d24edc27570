//! Resource registry.
//!
//! Built once at startup through [`ResourceRegistryBuilder`], then frozen
//! into a [`ResourceRegistry`] that only supports lookups. The frozen
//! registry is shared behind an `Arc` and needs no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use soyfr_api_model::Schema;

use crate::source::{Controller, DataSource};

/// Errors raised while building the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A resource type name was registered twice.
    #[error("resource type already registered: {0}")]
    DuplicateResource(String),
}

/// Everything the engine knows about one resource type.
pub struct ResourceDefinition {
    schema: Schema,
    source: Arc<dyn DataSource>,
    controller: Option<Arc<dyn Controller>>,
}

impl ResourceDefinition {
    /// Resource type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    /// Schema descriptor.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Data source.
    #[must_use]
    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    /// Controller override, if registered.
    #[must_use]
    pub fn controller(&self) -> Option<&dyn Controller> {
        self.controller.as_deref()
    }
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("schema", &self.schema)
            .field("source", &"...")
            .field("controller", &self.controller.as_ref().map(|_| "..."))
            .finish()
    }
}

/// Mutable registry used during startup.
#[derive(Debug, Default)]
pub struct ResourceRegistryBuilder {
    resources: HashMap<String, Arc<ResourceDefinition>>,
}

impl ResourceRegistryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource served by a data source.
    pub fn register(
        &mut self,
        schema: Schema,
        source: Arc<dyn DataSource>,
    ) -> Result<&mut Self, RegistryError> {
        self.insert(schema, source, None)
    }

    /// Register a resource whose operations pass through a controller first.
    pub fn register_with_controller(
        &mut self,
        schema: Schema,
        source: Arc<dyn DataSource>,
        controller: Arc<dyn Controller>,
    ) -> Result<&mut Self, RegistryError> {
        self.insert(schema, source, Some(controller))
    }

    fn insert(
        &mut self,
        schema: Schema,
        source: Arc<dyn DataSource>,
        controller: Option<Arc<dyn Controller>>,
    ) -> Result<&mut Self, RegistryError> {
        let type_name = schema.type_name().to_owned();
        if self.resources.contains_key(&type_name) {
            return Err(RegistryError::DuplicateResource(type_name));
        }

        tracing::debug!(
            resource = %type_name,
            fields = schema.fields().len(),
            controller = controller.is_some(),
            "registered resource",
        );

        self.resources.insert(
            type_name,
            Arc::new(ResourceDefinition {
                schema,
                source,
                controller,
            }),
        );
        Ok(self)
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> ResourceRegistry {
        ResourceRegistry {
            resources: self.resources,
        }
    }
}

/// Read-only resource registry.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<ResourceDefinition>>,
}

impl ResourceRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> ResourceRegistryBuilder {
        ResourceRegistryBuilder::new()
    }

    /// Look up a resource by type name.
    #[must_use]
    pub fn lookup(&self, type_name: &str) -> Option<Arc<ResourceDefinition>> {
        self.resources.get(type_name).map(Arc::clone)
    }

    /// Registered type names (sorted).
    #[must_use]
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether no resources are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

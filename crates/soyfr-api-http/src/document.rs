//! Document assembly.
//!
//! Entities render as
//!
//! ```json
//! {
//!   "id": "1",
//!   "type": "posts",
//!   "title": "Hello, World!",
//!   "value": null,
//!   "links": {
//!     "author":   { "id": "1", "type": "users", "resource": "/posts/1/author" },
//!     "comments": { "ids": ["1"], "type": "comments", "resource": "/posts/1/comments" }
//!   }
//! }
//! ```
//!
//! and responses as `{"data": ..., "linked": [...]}`, with `linked` omitted
//! when nothing was side-loaded.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use soyfr_api_model::schema::FieldKind;
use soyfr_api_model::{ApiError, Entity, Schema};

use crate::registry::ResourceDefinition;

/// Link metadata for one relation of a rendered entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationLink {
    /// Related id; to-one relations with a known foreign key only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Related ids; always present for to-many relations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    /// Related resource type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// URL of the relation route.
    pub resource: String,
}

/// Relation name → link metadata.
pub type Links = BTreeMap<String, RelationLink>;

/// An entity paired with the definition of the resource it belongs to.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Owning resource.
    pub definition: Arc<ResourceDefinition>,
    /// The entity.
    pub entity: Entity,
}

impl Resolved {
    /// Pair an entity with its resource definition.
    #[must_use]
    pub fn new(definition: Arc<ResourceDefinition>, entity: Entity) -> Self {
        Self { definition, entity }
    }

    fn key(&self) -> (String, String) {
        (
            self.definition.type_name().to_owned(),
            self.entity.id.clone(),
        )
    }
}

/// Side-loaded entities, deduplicated by `(type, id)` in insertion order.
#[derive(Debug, Default)]
pub struct LinkedSet {
    seen: HashSet<(String, String)>,
    entries: Vec<Resolved>,
}

impl LinkedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity unless one with the same `(type, id)` is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, resolved: Resolved) -> bool {
        if self.seen.insert(resolved.key()) {
            self.entries.push(resolved);
            true
        } else {
            false
        }
    }

    /// Number of side-loaded entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was side-loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the set, yielding entries in insertion order.
    #[must_use]
    pub fn into_entries(self) -> Vec<Resolved> {
        self.entries
    }
}

/// A response document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Primary data: an object, an array, or `null`.
    pub data: Value,
    /// Side-loaded entities.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked: Vec<Value>,
}

impl Document {
    /// Serialize the document.
    pub fn to_json(&self) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(self)
            .map_err(|e| ApiError::internal_error(format!("Failed to serialize document: {e}")))
    }
}

/// Render one entity.
///
/// Scalars render when set; nullable scalars render `null` when unset.
/// Foreign keys and other relation fields only show up under `links`, which
/// is emitted when the schema declares relations.
#[must_use]
pub fn render_entity(schema: &Schema, entity: &Entity, links: &Links) -> Value {
    let mut object = Map::new();
    object.insert("id".to_owned(), Value::String(entity.id.clone()));
    object.insert(
        "type".to_owned(),
        Value::String(schema.type_name().to_owned()),
    );

    for field in schema.attributes() {
        match (&field.kind, entity.get(&field.name)) {
            (_, Some(value)) => {
                object.insert(field.name.clone(), value.clone());
            }
            (FieldKind::NullableScalar, None) => {
                object.insert(field.name.clone(), Value::Null);
            }
            _ => {}
        }
    }

    if schema.relations().next().is_some() {
        let links = links
            .iter()
            .filter_map(|(name, link)| Some((name.clone(), serde_json::to_value(link).ok()?)))
            .collect();
        object.insert("links".to_owned(), Value::Object(links));
    }

    Value::Object(object)
}

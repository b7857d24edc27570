//! Generic entity container exchanged with data sources.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::schema::{FieldKind, Schema};

/// A single resource instance: an id plus a bag of named field values.
///
/// Attribute values are keyed by their schema field name; to-one relations
/// are stored under their foreign-key field (`authorID`). The owning
/// resource type is not stored here; the engine always pairs an entity with
/// the schema it was produced for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Entity identifier. Empty for entities that have not been created yet.
    pub id: String,
    /// Field values.
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Create an entity with the given id and no fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_owned(), value.into());
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field value as a string slice.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Foreign key of a to-one relation, if set and non-empty.
    #[must_use]
    pub fn foreign_key(&self, field: &str) -> Option<&str> {
        self.get_str(field).filter(|v| !v.is_empty())
    }

    /// Build an entity from a JSON object in a write body.
    ///
    /// Attributes are taken from keys matching the schema; to-one foreign
    /// keys are read from `links.<relation>` or from the foreign-key key
    /// itself. Unknown keys are ignored.
    pub fn from_json(schema: &Schema, object: &Map<String, Value>) -> Result<Self, ApiError> {
        let id = match object.get("id") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(ApiError::validation("Bad Request").with_field_error("invalid-id", "id"));
            }
        };

        let links = object.get("links").and_then(Value::as_object);
        let mut entity = Self::new(id);

        for field in schema.fields() {
            match &field.kind {
                FieldKind::Scalar | FieldKind::NullableScalar => {
                    if let Some(value) = object.get(&field.name) {
                        entity.set(&field.name, value.clone());
                    }
                }
                FieldKind::ToOne { foreign_key, .. } => {
                    let linked = links
                        .and_then(|l| l.get(&field.name))
                        .and_then(Value::as_str)
                        .or_else(|| object.get(foreign_key).and_then(Value::as_str));
                    if let Some(fk) = linked {
                        entity.set(foreign_key, fk);
                    }
                }
                FieldKind::ToMany { .. } => {}
            }
        }

        Ok(entity)
    }
}

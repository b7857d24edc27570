//! Resource schema descriptors.
//!
//! A [`Schema`] is declared once per resource at registration time and tells
//! the engine which entity fields are plain attributes and which are
//! relations to other resources.
//!
//! ```
//! use soyfr_api_model::schema::Schema;
//!
//! let posts = Schema::for_type("Post")
//!     .scalar("title")
//!     .nullable("value")
//!     .to_one("author", "User")
//!     .to_many("comments", "Comment");
//!
//! assert_eq!(posts.type_name(), "posts");
//! assert_eq!(posts.relation("author").unwrap().target(), Some("users"));
//! ```

/// The kind of a single schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain attribute.
    Scalar,
    /// An attribute rendered as `null` when unset.
    NullableScalar,
    /// A single related entity referenced through a foreign-key field.
    ToOne {
        /// Resource type name of the related entity.
        target: String,
        /// Entity field holding the related id.
        foreign_key: String,
    },
    /// An ordered collection of related entities.
    ToMany {
        /// Resource type name of the related entities.
        target: String,
    },
}

/// A named field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as it appears in documents.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Whether this field is a relation.
    #[must_use]
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, FieldKind::ToOne { .. } | FieldKind::ToMany { .. })
    }

    /// Target resource type for relations.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::ToOne { target, .. } | FieldKind::ToMany { target } => Some(target),
            FieldKind::Scalar | FieldKind::NullableScalar => None,
        }
    }

    /// Foreign-key field for to-one relations.
    #[must_use]
    pub fn foreign_key(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::ToOne { foreign_key, .. } => Some(foreign_key),
            _ => None,
        }
    }
}

/// Ordered field list for one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Start a schema for a domain type, deriving the resource type name
    /// (`"Post"` becomes `"posts"`).
    #[must_use]
    pub fn for_type(domain_name: &str) -> Self {
        Self::named(resource_name(domain_name))
    }

    /// Start a schema with an explicit resource type name.
    #[must_use]
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a scalar attribute.
    #[must_use]
    pub fn scalar(self, name: &str) -> Self {
        self.field(name, FieldKind::Scalar)
    }

    /// Add a nullable scalar attribute.
    #[must_use]
    pub fn nullable(self, name: &str) -> Self {
        self.field(name, FieldKind::NullableScalar)
    }

    /// Add a to-one relation to the given domain type. The relation is named
    /// by [`relation_name`] and its foreign key field is `"{relation}ID"`.
    #[must_use]
    pub fn to_one(self, name: &str, target_domain: &str) -> Self {
        let foreign_key = format!("{}ID", relation_name(name));
        self.to_one_with_key(name, target_domain, &foreign_key)
    }

    /// Add a to-one relation with an explicit foreign key field.
    #[must_use]
    pub fn to_one_with_key(self, name: &str, target_domain: &str, foreign_key: &str) -> Self {
        self.field(
            &relation_name(name),
            FieldKind::ToOne {
                target: resource_name(target_domain),
                foreign_key: foreign_key.to_owned(),
            },
        )
    }

    /// Add a to-many relation to the given domain type, named by
    /// [`relation_name`].
    #[must_use]
    pub fn to_many(self, name: &str, target_domain: &str) -> Self {
        self.field(
            &relation_name(name),
            FieldKind::ToMany {
                target: resource_name(target_domain),
            },
        )
    }

    /// Add a field, replacing any earlier field with the same name.
    #[must_use]
    pub fn field(mut self, name: &str, kind: FieldKind) -> Self {
        let descriptor = FieldDescriptor {
            name: name.to_owned(),
            kind,
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    /// Resource type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Attribute fields (scalar and nullable scalar) in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_relation())
    }

    /// Relation fields in declaration order.
    pub fn relations(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_relation())
    }

    /// Look up a relation by name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&FieldDescriptor> {
        self.relations().find(|f| f.name == name)
    }

    /// Query parameter name used to filter related resources by this
    /// resource's id (`"postsID"` for `posts`).
    #[must_use]
    pub fn filter_param(&self) -> String {
        format!("{}ID", self.type_name)
    }
}

/// Derive a resource type name from a domain type name: lower-cased and
/// pluralized.
#[must_use]
pub fn resource_name(domain_name: &str) -> String {
    pluralize(&domain_name.to_lowercase())
}

/// Derive a relation name from a domain field name (`"Author"` becomes `"author"`).
#[must_use]
pub fn relation_name(field_name: &str) -> String {
    let mut chars = field_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// English pluralization for lower-case nouns.
#[must_use]
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return format!("{word}es");
    }
    format!("{word}s")
}

//! Model (Schema) Data Structures
//!
//! A model is a schema document describing one class of records: an opaque
//! id, a display name, and a mapping from field name to field definition.
//!
//! # Link Fields
//!
//! A field of type `link` declares a bidirectional relationship: it names the
//! model on the other side and the field on that model that mirrors this one.
//! Link fields always come in reciprocal pairs: if model A's field `f1`
//! links to model B with remote field `f2`, model B holds a field `f2` of
//! type `link` pointing back at A's `f1`. The pair is actively maintained by
//! the link coordinator on model save/delete, not merely assumed.
//!
//! # Example Model Document
//!
//! ```json
//! {
//!   "id": "m1",
//!   "name": "Author",
//!   "schema": {
//!     "name":  { "type": "scalar", "fieldType": "string" },
//!     "books": { "type": "link", "modelId": "m2", "fieldName": "author" }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The remote half of a link field declaration
///
/// Carried by every `FieldDefinition::Link`: the id of the model on the
/// other side of the relationship and the name of the field on that model
/// that mirrors this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkField {
    /// Id of the model on the other side of the relationship
    pub model_id: String,

    /// Name of the reciprocal field on the other model
    pub field_name: String,
}

/// Definition of a single field in a model's schema
///
/// Internally tagged on `type`. The tagged variant replaces runtime
/// type-string checks: a `Link` field structurally always carries both
/// halves of the remote declaration, so a malformed link field cannot exist
/// past deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldDefinition {
    /// Bidirectional reference to records of another model
    Link(LinkField),

    /// Any non-link field; the link coordinator never inspects these
    Scalar {
        /// Concrete value type (e.g., "string", "number", "boolean")
        #[serde(rename = "fieldType")]
        field_type: String,
    },
}

impl FieldDefinition {
    /// Convenience constructor for a link field
    pub fn link(model_id: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self::Link(LinkField {
            model_id: model_id.into(),
            field_name: field_name.into(),
        })
    }

    /// Convenience constructor for a scalar field
    pub fn scalar(field_type: impl Into<String>) -> Self {
        Self::Scalar {
            field_type: field_type.into(),
        }
    }
}

/// Schema definition for a class of records
///
/// Stored as a document in its own right; `schema` maps field name to
/// definition. A `BTreeMap` keeps iteration order deterministic across
/// invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque model id
    pub id: String,

    /// Display name; also the key under which reciprocal fields are
    /// created in linked models
    pub name: String,

    /// Field name → field definition
    pub schema: BTreeMap<String, FieldDefinition>,

    /// Store-assigned revision, absent until first persisted
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
}

impl Model {
    /// Create a model with an empty schema
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            schema: BTreeMap::new(),
            rev: None,
        }
    }

    /// Add or replace a field definition, builder style
    pub fn with_field(mut self, name: impl Into<String>, field: FieldDefinition) -> Self {
        self.schema.insert(name.into(), field);
        self
    }

    /// True iff any field in the schema is a link field
    ///
    /// Used by the event dispatcher as a fast-path guard: a model with no
    /// link fields never reaches the coordinator.
    pub fn has_link_fields(&self) -> bool {
        self.schema
            .values()
            .any(|f| matches!(f, FieldDefinition::Link(_)))
    }

    /// Iterate over the link fields of this model in field-name order
    pub fn link_fields(&self) -> impl Iterator<Item = (&str, &LinkField)> {
        self.schema.iter().filter_map(|(name, field)| match field {
            FieldDefinition::Link(link) => Some((name.as_str(), link)),
            FieldDefinition::Scalar { .. } => None,
        })
    }

    /// Insert or replace the reciprocal field another model maintains here
    pub fn upsert_field(&mut self, name: impl Into<String>, field: FieldDefinition) {
        self.schema.insert(name.into(), field);
    }

    /// Remove a field definition; no-op when the field is already absent,
    /// so re-running a propagation converges
    pub fn remove_field(&mut self, name: &str) -> Option<FieldDefinition> {
        self.schema.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author_model() -> Model {
        Model::new("m1", "Author")
            .with_field("name", FieldDefinition::scalar("string"))
            .with_field("books", FieldDefinition::link("m2", "author"))
    }

    #[test]
    fn test_has_link_fields() {
        assert!(author_model().has_link_fields());

        let plain = Model::new("m3", "Note").with_field("body", FieldDefinition::scalar("string"));
        assert!(!plain.has_link_fields());

        let empty = Model::new("m4", "Empty");
        assert!(!empty.has_link_fields());
    }

    #[test]
    fn test_link_fields_iterates_only_links() {
        let model = author_model();
        let links: Vec<_> = model.link_fields().collect();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, "books");
        assert_eq!(links[0].1.model_id, "m2");
        assert_eq!(links[0].1.field_name, "author");
    }

    #[test]
    fn test_remove_field_is_idempotent() {
        let mut model = author_model();

        assert!(model.remove_field("books").is_some());
        assert!(model.remove_field("books").is_none());
        assert!(!model.has_link_fields());
    }

    /// Contract test: pins the exact JSON format of field definitions.
    ///
    /// Serde's `#[serde(tag = "type")]` produces an INTERNALLY-TAGGED format
    /// where the discriminator is merged with the variant fields (FLAT, not
    /// nested). Stored model documents depend on this shape.
    #[test]
    fn test_field_definition_serialization_contract() {
        let link = FieldDefinition::link("m1", "books");
        let json = serde_json::to_value(&link).unwrap();

        assert_eq!(json.get("type").unwrap(), "link");
        assert_eq!(json.get("modelId").unwrap(), "m1");
        assert_eq!(json.get("fieldName").unwrap(), "books");
        assert!(json.get("link").is_none(), "must not nest under 'link'");

        let scalar = FieldDefinition::scalar("string");
        let json = serde_json::to_value(&scalar).unwrap();

        assert_eq!(json.get("type").unwrap(), "scalar");
        assert_eq!(json.get("fieldType").unwrap(), "string");
    }

    #[test]
    fn test_model_deserialization() {
        let json = json!({
            "id": "m2",
            "name": "Book",
            "schema": {
                "title": { "type": "scalar", "fieldType": "string" },
                "author": { "type": "link", "modelId": "m1", "fieldName": "books" }
            }
        });

        let model: Model = serde_json::from_value(json).unwrap();
        assert_eq!(model.id, "m2");
        assert_eq!(model.rev, None);
        assert_eq!(
            model.schema.get("author"),
            Some(&FieldDefinition::link("m1", "books"))
        );
    }

    #[test]
    fn test_malformed_link_field_rejected() {
        // Link field missing the remote half must fail deserialization,
        // never produce a partially-formed definition.
        let json = json!({ "type": "link", "modelId": "m1" });
        assert!(serde_json::from_value::<FieldDefinition>(json).is_err());
    }
}

//! Link Document Data Structures
//!
//! A link document is derived state: one persisted association between two
//! records, carrying enough information on each side (model id, field name,
//! record id) to be queried from either direction.
//!
//! # Symmetry
//!
//! Which side lands in `side1` versus `side2` is an artifact of which record
//! triggered creation, not a meaningful distinction. Identity is independent
//! of side ordering, and scope matching checks both sides.
//!
//! # Lifecycle
//!
//! absent → present (record save gains a reference) → absent (record save
//! drops the reference, the record is deleted, or the owning model is
//! deleted). Deletion is a tombstone per the store's `_deleted` convention.
//!
//! # Wire Shape
//!
//! ```json
//! {
//!   "_id": "…",
//!   "_rev": "…",
//!   "side1": { "modelId": "m1", "fieldName": "books",  "recordId": "r1" },
//!   "side2": { "modelId": "m2", "fieldName": "author", "recordId": "b1" },
//!   "_deleted": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One side of a link document: where the association is anchored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSide {
    /// Owning model id
    pub model_id: String,

    /// Link field name on the owning model
    pub field_name: String,

    /// Record id on this side
    pub record_id: String,
}

impl LinkSide {
    /// True iff this side falls inside the given scope
    ///
    /// `None` for field or record acts as a wildcard.
    fn in_scope(&self, scope: &LinkScope) -> bool {
        self.model_id == scope.model_id
            && scope
                .field_name
                .as_deref()
                .map_or(true, |f| f == self.field_name)
            && scope
                .record_id
                .as_deref()
                .map_or(true, |r| r == self.record_id)
    }
}

/// Scope for querying existing link documents
///
/// `field_name`/`record_id` of `None` are wildcards: model deletion queries
/// (any field, any record of this model); record deletion queries (any
/// field, this record). A document is in scope when either of its sides
/// matches: callers never need to know which side they are on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkScope {
    /// Target instance (selects which store/database)
    pub instance: String,

    /// Model id anchoring the query
    pub model_id: String,

    /// Restrict to one link field, or `None` for any field
    pub field_name: Option<String>,

    /// Restrict to one record, or `None` for any record
    pub record_id: Option<String>,
}

impl LinkScope {
    /// Scope covering one (field, record) pair: the record-save flow
    pub fn field_record(
        instance: impl Into<String>,
        model_id: impl Into<String>,
        field_name: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self {
            instance: instance.into(),
            model_id: model_id.into(),
            field_name: Some(field_name.into()),
            record_id: Some(record_id.into()),
        }
    }

    /// Scope covering every field of one record: the record-delete flow
    pub fn record(
        instance: impl Into<String>,
        model_id: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self {
            instance: instance.into(),
            model_id: model_id.into(),
            field_name: None,
            record_id: Some(record_id.into()),
        }
    }

    /// Scope covering every link document of a model: the model-delete flow
    pub fn model(instance: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            model_id: model_id.into(),
            field_name: None,
            record_id: None,
        }
    }
}

/// One persisted bidirectional association between two records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDocument {
    /// Store document id
    #[serde(rename = "_id")]
    pub id: String,

    /// Store-assigned revision, absent until first persisted
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,

    /// First side of the association
    pub side1: LinkSide,

    /// Second side of the association
    pub side2: LinkSide,

    /// Tombstone marker; `true` schedules the document for deletion
    #[serde(rename = "_deleted", default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

impl LinkDocument {
    /// Construct a link document pairing two (model, field, record) tuples
    ///
    /// Pure construction: no validation, no side effects beyond drawing a
    /// fresh id. Callers guarantee the pairing is correct.
    pub fn between(
        model_id_1: impl Into<String>,
        field_name_1: impl Into<String>,
        record_id_1: impl Into<String>,
        model_id_2: impl Into<String>,
        field_name_2: impl Into<String>,
        record_id_2: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rev: None,
            side1: LinkSide {
                model_id: model_id_1.into(),
                field_name: field_name_1.into(),
                record_id: record_id_1.into(),
            },
            side2: LinkSide {
                model_id: model_id_2.into(),
                field_name: field_name_2.into(),
                record_id: record_id_2.into(),
            },
            deleted: false,
        }
    }

    /// True iff either side of this document falls inside the scope
    pub fn matches(&self, scope: &LinkScope) -> bool {
        self.side1.in_scope(scope) || self.side2.in_scope(scope)
    }

    /// The side opposite the given (model, field, record) anchor
    ///
    /// Used to read "which record ids is this record currently linked to"
    /// out of documents returned by a scoped query.
    pub fn other_side(&self, model_id: &str, field_name: &str, record_id: &str) -> &LinkSide {
        if self.side1.model_id == model_id
            && self.side1.field_name == field_name
            && self.side1.record_id == record_id
        {
            &self.side2
        } else {
            &self.side1
        }
    }

    /// Consume the document and return its tombstone
    pub fn into_tombstone(mut self) -> Self {
        self.deleted = true;
        self
    }
}

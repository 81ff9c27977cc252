//! Record Data Structures
//!
//! A record belongs to exactly one model and holds its field values as JSON.
//! The record store itself is an external collaborator; this crate only
//! consumes records handed to it by the event source, so the struct carries
//! exactly what link reconciliation needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// A single record of some model
///
/// A link-typed field's value is a JSON array of referenced record ids.
/// Order is not meaningful and duplicates should not occur; extraction
/// treats the value as a set either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Opaque record id
    pub id: String,

    /// Id of the model this record belongs to
    pub model_id: String,

    /// Field name → field value
    pub fields: BTreeMap<String, Value>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Create a record with the given field values, timestamped now
    pub fn new(
        id: impl Into<String>,
        model_id: impl Into<String>,
        fields: BTreeMap<String, Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            model_id: model_id.into(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Extract the set of record ids referenced by a link field
    ///
    /// Deduplicates and ignores non-string entries. An absent field or a
    /// non-array value yields the empty set: record save treats both as
    /// "no references", which deletes any links the field previously had.
    pub fn link_ids(&self, field_name: &str) -> BTreeSet<String> {
        match self.fields.get(field_name) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
            Some(other) => {
                tracing::debug!(
                    "record {}: link field '{}' holds non-array value ({}), treating as empty",
                    self.id,
                    field_name,
                    other
                );
                BTreeSet::new()
            }
            None => BTreeSet::new(),
        }
    }
}

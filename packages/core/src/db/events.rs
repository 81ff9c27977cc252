//! Link Maintenance Events
//!
//! This module defines the four event kinds the event source delivers to
//! link maintenance. Each payload carries the triggering model id, an
//! optional pre-fetched model (to avoid a redundant read; mandatory in
//! practice for model deletion, since a deleted model can no longer be
//! fetched), and the record for record-level events.
//!
//! The event source owns sequencing; this crate handles one event per
//! invocation and provides no mutual exclusion of its own.

use crate::models::{Model, Record};

/// A record or model change that may require link reconciliation
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// A record was created or updated
    RecordSaved {
        model_id: String,
        model: Option<Model>,
        record: Record,
    },

    /// A record was deleted
    RecordDeleted {
        model_id: String,
        model: Option<Model>,
        record: Record,
    },

    /// A model's schema was created or updated
    ModelSaved {
        model_id: String,
        model: Option<Model>,
    },

    /// A model was deleted
    ModelDeleted {
        model_id: String,
        model: Option<Model>,
    },
}

impl LinkEvent {
    /// Get a string representation of the event type, for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            LinkEvent::RecordSaved { .. } => "record:saved",
            LinkEvent::RecordDeleted { .. } => "record:deleted",
            LinkEvent::ModelSaved { .. } => "model:saved",
            LinkEvent::ModelDeleted { .. } => "model:deleted",
        }
    }

    /// Id of the model this event concerns
    pub fn model_id(&self) -> &str {
        match self {
            LinkEvent::RecordSaved { model_id, .. }
            | LinkEvent::RecordDeleted { model_id, .. }
            | LinkEvent::ModelSaved { model_id, .. }
            | LinkEvent::ModelDeleted { model_id, .. } => model_id,
        }
    }
}

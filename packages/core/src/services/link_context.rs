//! Resolved Invocation Context
//!
//! Model resolution is an explicit step owned by the event entry point, not
//! something the coordinator does lazily mid-operation. The coordinator's
//! operations take a [`LinkContext`] that already holds the triggering
//! model, which keeps them deterministic over their inputs and testable
//! without redundant fetches.

use crate::db::{DocumentStore, StoreError};
use crate::models::Model;
use crate::services::LinkServiceError;

/// Per-event context: the target instance and the resolved triggering model
#[derive(Debug, Clone)]
pub struct LinkContext {
    /// Instance identifier selecting which store/database to operate against
    pub instance: String,

    /// The model whose record or schema change triggered the event
    pub model: Model,
}

impl LinkContext {
    /// Build a context from an already-loaded model
    pub fn new(instance: impl Into<String>, model: Model) -> Self {
        Self {
            instance: instance.into(),
            model,
        }
    }

    /// Resolve the triggering model: use the caller-supplied copy when
    /// present, otherwise fetch it by id
    ///
    /// Event payloads may carry the model to avoid a redundant read (model
    /// events always should: a deleted model can no longer be fetched).
    ///
    /// # Errors
    ///
    /// - `ModelNotFound`: no supplied model and the id does not exist
    pub async fn resolve(
        store: &dyn DocumentStore,
        instance: &str,
        model_id: &str,
        prefetched: Option<Model>,
    ) -> Result<Self, LinkServiceError> {
        let model = match prefetched {
            Some(model) => model,
            None => store
                .get_model(instance, model_id)
                .await
                .map_err(|err| match err {
                    StoreError::NotFound { .. } => LinkServiceError::model_not_found(model_id),
                    other => LinkServiceError::from(other),
                })?,
        };

        Ok(Self::new(instance, model))
    }
}

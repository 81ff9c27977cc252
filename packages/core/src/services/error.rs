//! Service Layer Error Types
//!
//! This module defines error types for link maintenance operations. Every
//! store failure propagates to the event source, nothing is swallowed, but
//! the variants here add the context the caller needs to act: which model
//! was missing, which field's propagation failed, which specific link
//! documents inside a bulk write failed.

use crate::db::StoreError;
use thiserror::Error;

/// One failed item inside a bulk link write
///
/// Successfully applied items in the same batch remain applied; this names
/// the ones that did not.
#[derive(Debug)]
pub struct BulkFailure {
    /// Id of the link document the operation targeted
    pub id: String,

    /// Why the item failed
    pub reason: String,
}

/// Link maintenance operation errors
#[derive(Error, Debug)]
pub enum LinkServiceError {
    /// Triggering or referenced model does not exist in the store
    #[error("Model not found: {id}")]
    ModelNotFound { id: String },

    /// Propagating a reciprocal field to a linked model failed
    ///
    /// Reported per originating field: one field's failure is never merged
    /// with another's outcome.
    #[error("Failed to propagate reciprocal field for '{field_name}' to model {model_id}: {source}")]
    ReciprocalUpdateFailed {
        model_id: String,
        field_name: String,
        source: StoreError,
    },

    /// A bulk link write reported per-item failures
    #[error("Bulk link write failed for {} document(s)", .failures.len())]
    PartialBulkFailure { failures: Vec<BulkFailure> },

    /// Reconciliation kept hitting write conflicts and gave up
    #[error("Link reconciliation conflicted on every attempt ({attempts})")]
    RetriesExhausted { attempts: u32 },

    /// Store operation failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl LinkServiceError {
    /// Create a model not found error
    pub fn model_not_found(id: impl Into<String>) -> Self {
        Self::ModelNotFound { id: id.into() }
    }

    /// Create a reciprocal update failed error
    pub fn reciprocal_update_failed(
        model_id: impl Into<String>,
        field_name: impl Into<String>,
        source: StoreError,
    ) -> Self {
        Self::ReciprocalUpdateFailed {
            model_id: model_id.into(),
            field_name: field_name.into(),
            source,
        }
    }

    /// Create a partial bulk failure error
    pub fn partial_bulk_failure(failures: Vec<BulkFailure>) -> Self {
        Self::PartialBulkFailure { failures }
    }

    /// Create a retries exhausted error
    pub fn retries_exhausted(attempts: u32) -> Self {
        Self::RetriesExhausted { attempts }
    }
}

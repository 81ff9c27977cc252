//! Store Error Types
//!
//! This module defines error types for document store operations. The
//! service layer matches on these to classify failures: `Conflict` is the
//! retryable kind, everything else propagates as-is.

use thiserror::Error;

/// Document store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Document not found by id
    #[error("Document not found: {id}")]
    NotFound { id: String },

    /// Write rejected due to concurrent modification (stale revision)
    #[error("Revision conflict writing document: {id}")]
    Conflict { id: String },

    /// Document body could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend-specific failure (connection, I/O, query execution)
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a revision conflict error
    pub fn conflict(id: impl Into<String>) -> Self {
        Self::Conflict { id: id.into() }
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

//! Document Store Abstraction Layer
//!
//! This module defines the traits that abstract the document store and the
//! link-document query capability. The store is an external collaborator:
//! DocLink specifies only the operations link maintenance consumes, so any
//! backend with get/put/bulk-write semantics can sit behind these traits.
//!
//! # Design Decisions
//!
//! 1. **Async-first**: all methods are async to support both embedded and
//!    network backends.
//! 2. **Typed errors**: the coordinator must distinguish `Conflict` (retry
//!    the reconcile) from `NotFound` (propagate), so the traits return
//!    `StoreError` rather than an opaque error type.
//! 3. **Per-item bulk results**: `bulk_links` never fails wholesale for item
//!    level problems: each operation reports its own outcome, and applied
//!    items stay applied. This is the store's contract, not something this
//!    crate can compensate for (no multi-document transactions).

use crate::db::StoreError;
use crate::models::{LinkDocument, LinkScope, Model};
use async_trait::async_trait;

/// Store-assigned revision token returned by successful writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(pub String);

/// Outcome of one operation inside a bulk write
///
/// `id` is the document id the operation targeted; `result` carries the new
/// revision on success or the per-item failure.
#[derive(Debug)]
pub struct BulkOutcome {
    /// Document id the operation targeted
    pub id: String,

    /// New revision, or why this item failed
    pub result: Result<Revision, StoreError>,
}

impl BulkOutcome {
    /// Successful item outcome
    pub fn ok(id: impl Into<String>, rev: Revision) -> Self {
        Self {
            id: id.into(),
            result: Ok(rev),
        }
    }

    /// Failed item outcome
    pub fn failed(id: impl Into<String>, error: StoreError) -> Self {
        Self {
            id: id.into(),
            result: Err(error),
        }
    }
}

/// Abstraction over the schema-driven document store
///
/// Implementations must be `Send + Sync` for use in async contexts where
/// futures move between threads. All operations are scoped to an `instance`,
/// the identifier selecting which database to operate against.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a model document by id
    ///
    /// # Errors
    ///
    /// - `NotFound`: no model with this id exists in the instance
    async fn get_model(&self, instance: &str, model_id: &str) -> Result<Model, StoreError>;

    /// Persist a model document, returning the new revision
    ///
    /// # Errors
    ///
    /// - `Conflict`: the model's `_rev` is stale (concurrent modification)
    async fn put_model(&self, instance: &str, model: &Model) -> Result<Revision, StoreError>;

    /// Apply a batch of link-document creations and tombstones
    ///
    /// One bulk write per triggering event; there is no multi-document
    /// transaction. Items succeed or fail independently, and successfully
    /// applied items remain applied even when others fail.
    async fn bulk_links(
        &self,
        instance: &str,
        ops: Vec<LinkDocument>,
    ) -> Result<Vec<BulkOutcome>, StoreError>;
}

/// Query capability over existing link documents
///
/// Provided alongside the store; kept as its own trait because backends
/// typically answer it from an index rather than the primary document table.
#[async_trait]
pub trait LinkQuery: Send + Sync {
    /// Return all link documents matching the scope, read from either side
    ///
    /// Omitted `field_name`/`record_id` in the scope act as wildcards.
    /// Tombstoned documents are never returned.
    async fn get_link_documents(&self, scope: &LinkScope) -> Result<Vec<LinkDocument>, StoreError>;
}

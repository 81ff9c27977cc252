//! Document Store Boundary
//!
//! This module holds everything that faces the document store:
//!
//! - The [`DocumentStore`] and [`LinkQuery`] traits the coordinator consumes
//! - Store error types with conflict/not-found classification
//! - [`MemoryStore`], an embedded in-memory backend implementing both traits
//! - [`LinkEvent`], the event kinds delivered by the event source
//!
//! The store is an external collaborator: it offers single-document get/put
//! and bulk multi-document writes with per-item results, but no
//! multi-document transactions. All link maintenance is written against
//! that contract.

mod document_store;
mod error;
pub mod events;
mod memory_store;

pub use document_store::{BulkOutcome, DocumentStore, LinkQuery, Revision};
pub use error::StoreError;
pub use events::LinkEvent;
pub use memory_store::MemoryStore;

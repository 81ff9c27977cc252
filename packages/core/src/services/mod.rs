//! Business Services
//!
//! This module contains the link maintenance logic:
//!
//! - `LinkContext` - Per-event resolved context (instance + triggering model)
//! - `LinkCoordinator` - Reconciles link documents and reciprocal fields
//!
//! The coordinator sits between the event source and the document store,
//! turning save/delete events into the minimal set of link-document
//! mutations and schema patches.

pub mod error;
pub mod link_context;
pub mod link_coordinator;

pub use error::{BulkFailure, LinkServiceError};
pub use link_context::LinkContext;
pub use link_coordinator::{LinkCoordinator, MAX_RECONCILE_ATTEMPTS};

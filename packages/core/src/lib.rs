//! DocLink Core Business Logic Layer
//!
//! This crate maintains bidirectional reference integrity between records in
//! a schema-driven document store. When a model declares a "link" field
//! pointing at another model, every reference a record holds is mirrored by
//! a symmetric link document, and those documents are kept consistent as
//! records and schemas change, without a relational foreign-key engine.
//!
//! # Architecture
//!
//! - **Set reconciliation**: desired link state is diffed against persisted
//!   link documents; only the difference is written, in one bulk write per
//!   event, so every operation is idempotent and safe to re-invoke
//! - **Schema propagation**: model save/delete keeps the reciprocal link
//!   field on the other model in sync
//! - **Store as collaborator**: the document store and link query are trait
//!   boundaries; an in-memory backend ships for embedding and tests
//!
//! # Modules
//!
//! - [`models`] - Data structures (Model, Record, LinkDocument)
//! - [`services`] - Link coordination logic
//! - [`db`] - Store traits, events, and the in-memory backend

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;

//! Data Models
//!
//! This module contains the core data structures used throughout DocLink:
//!
//! - `Model` - Schema document with field definitions, including link fields
//! - `Record` - A single record of some model with JSON field values
//! - `LinkDocument` - Derived state representing one bidirectional association
//!
//! Models and link documents carry CouchDB-style `_rev` metadata assigned by
//! the document store; records are external input and carry none.

mod link;
mod model;
mod record;

pub use link::{LinkDocument, LinkScope, LinkSide};
pub use model::{FieldDefinition, LinkField, Model};
pub use record::Record;

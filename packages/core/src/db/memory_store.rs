//! In-Memory Document Store
//!
//! Embedded reference implementation of [`DocumentStore`] and [`LinkQuery`]
//! backed by per-instance hash maps. It reproduces the store semantics the
//! coordinator depends on:
//!
//! - monotonic revisions with conflict detection on stale writes
//! - per-item bulk-write outcomes (applied items stay applied)
//! - link queries answered from either side of a document
//!
//! Used directly by the test suite and suitable as an embedded backend for
//! single-process deployments.

use crate::db::{BulkOutcome, DocumentStore, LinkQuery, Revision, StoreError};
use crate::models::{LinkDocument, LinkScope, Model};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct InstanceData {
    /// Model id → model document (rev populated)
    models: HashMap<String, Model>,

    /// Link document id → live link document; tombstones remove the entry
    links: HashMap<String, LinkDocument>,
}

/// In-memory store, keyed by instance identifier
#[derive(Default)]
pub struct MemoryStore {
    instances: RwLock<HashMap<String, InstanceData>>,
    rev_counter: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Next revision token: `<generation>-<sequence>`
    fn next_rev(&self, previous: Option<&str>) -> String {
        let generation = previous
            .and_then(|rev| rev.split('-').next())
            .and_then(|gen| gen.parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        let sequence = self.rev_counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", generation, sequence)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_model(&self, instance: &str, model_id: &str) -> Result<Model, StoreError> {
        let instances = self.instances.read().await;
        instances
            .get(instance)
            .and_then(|data| data.models.get(model_id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(model_id))
    }

    async fn put_model(&self, instance: &str, model: &Model) -> Result<Revision, StoreError> {
        let mut instances = self.instances.write().await;
        let data = instances.entry(instance.to_string()).or_default();

        let current_rev = data.models.get(&model.id).and_then(|m| m.rev.as_deref());
        if model.rev.as_deref() != current_rev {
            return Err(StoreError::conflict(&model.id));
        }

        let rev = self.next_rev(current_rev);
        let mut stored = model.clone();
        stored.rev = Some(rev.clone());
        data.models.insert(model.id.clone(), stored);

        Ok(Revision(rev))
    }

    async fn bulk_links(
        &self,
        instance: &str,
        ops: Vec<LinkDocument>,
    ) -> Result<Vec<BulkOutcome>, StoreError> {
        let mut instances = self.instances.write().await;
        let data = instances.entry(instance.to_string()).or_default();

        let mut outcomes = Vec::with_capacity(ops.len());
        for op in ops {
            let current_rev = data.links.get(&op.id).and_then(|l| l.rev.as_deref());

            // Stale or missing revision: the document changed (or vanished)
            // between the caller's query and this write.
            if op.rev.as_deref() != current_rev {
                outcomes.push(BulkOutcome::failed(&op.id, StoreError::conflict(&op.id)));
                continue;
            }

            let rev = self.next_rev(current_rev);
            let id = op.id.clone();
            if op.deleted {
                data.links.remove(&id);
            } else {
                let mut stored = op;
                stored.rev = Some(rev.clone());
                data.links.insert(id.clone(), stored);
            }
            outcomes.push(BulkOutcome::ok(id, Revision(rev)));
        }

        Ok(outcomes)
    }
}

#[async_trait]
impl LinkQuery for MemoryStore {
    async fn get_link_documents(&self, scope: &LinkScope) -> Result<Vec<LinkDocument>, StoreError> {
        let instances = self.instances.read().await;
        let Some(data) = instances.get(&scope.instance) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<LinkDocument> = data
            .links
            .values()
            .filter(|link| link.matches(scope))
            .cloned()
            .collect();
        // Deterministic order for callers and tests
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}

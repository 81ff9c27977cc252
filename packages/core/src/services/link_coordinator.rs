//! Link Coordinator
//!
//! Keeps link documents and reciprocal schema fields in sync when records
//! and models change. Every operation is expressed as set reconciliation:
//! desired state is derived from the event payload, actual state is read
//! back from the store, and the minimal create/tombstone set is applied in
//! one bulk write. Re-running any event therefore converges to the same end
//! state, which is what makes partial failure recoverable: the event
//! source simply re-invokes the event.
//!
//! # Concurrency
//!
//! The window between the link query and the bulk write is racy: concurrent
//! saves of the same record's link field, or a save racing the other side's
//! delete, can interleave there. The coordinator takes no locks. The store's
//! revision check turns such races into per-item `Conflict` results, and a
//! conflicted reconcile is re-run from the top, bounded by
//! [`MAX_RECONCILE_ATTEMPTS`]. Races the store cannot see (none currently
//! known) would surface as lost updates; there is no versioning of the link
//! relationship itself.
//!
//! # No Rollback
//!
//! There is no compensating transaction across the
//! patch-other-model-then-persist or remove-field-then-purge-links
//! sequences. If a later step fails after an earlier one succeeded, the
//! intermediate state is left in place and the error propagates;
//! re-invoking the event finishes the job.

use crate::db::{DocumentStore, LinkEvent, LinkQuery, StoreError};
use crate::models::{FieldDefinition, LinkDocument, LinkScope, Record};
use crate::services::error::BulkFailure;
use crate::services::{LinkContext, LinkServiceError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How many times a conflicted reconcile is re-run before giving up
pub const MAX_RECONCILE_ATTEMPTS: u32 = 3;

/// Outcome of one bulk application attempt
enum BulkApply {
    /// Every item applied
    Clean,
    /// Only revision conflicts failed; re-running the reconcile may succeed
    Conflicted,
}

/// Coordinates link-document and reciprocal-field maintenance
///
/// Stateless: all per-event state lives in the [`LinkContext`] built by the
/// event entry point, so one coordinator can serve any number of events.
pub struct LinkCoordinator {
    store: Arc<dyn DocumentStore>,
    links: Arc<dyn LinkQuery>,
}

impl LinkCoordinator {
    /// Create a coordinator over a document store and link query capability
    pub fn new(store: Arc<dyn DocumentStore>, links: Arc<dyn LinkQuery>) -> Self {
        Self { store, links }
    }

    /// Entry point for the event source
    ///
    /// Resolves the triggering model, applies the link-field fast path (a
    /// model with no link fields is a no-op for every event kind: by the
    /// reciprocity invariant no link document can reference it either), and
    /// dispatches to the matching operation.
    pub async fn handle_event(
        &self,
        instance: &str,
        event: LinkEvent,
    ) -> Result<(), LinkServiceError> {
        let event_type = event.event_type();
        match event {
            LinkEvent::RecordSaved {
                model_id,
                model,
                record,
            } => {
                let ctx = LinkContext::resolve(self.store.as_ref(), instance, &model_id, model)
                    .await?;
                if !ctx.model.has_link_fields() {
                    return Ok(());
                }
                self.record_saved(&ctx, &record).await
            }
            LinkEvent::RecordDeleted {
                model_id,
                model,
                record,
            } => {
                let ctx = LinkContext::resolve(self.store.as_ref(), instance, &model_id, model)
                    .await?;
                if !ctx.model.has_link_fields() {
                    return Ok(());
                }
                self.record_deleted(&ctx, &record).await
            }
            LinkEvent::ModelSaved { model_id, model } => {
                let ctx = LinkContext::resolve(self.store.as_ref(), instance, &model_id, model)
                    .await?;
                if !ctx.model.has_link_fields() {
                    return Ok(());
                }
                tracing::debug!("handling {} for model {}", event_type, ctx.model.id);
                self.model_saved(&ctx).await
            }
            LinkEvent::ModelDeleted { model_id, model } => {
                let ctx = LinkContext::resolve(self.store.as_ref(), instance, &model_id, model)
                    .await?;
                if !ctx.model.has_link_fields() {
                    return Ok(());
                }
                tracing::debug!("handling {} for model {}", event_type, ctx.model.id);
                self.model_deleted(&ctx).await
            }
        }
    }

    /// Reconcile link documents after a record was created or updated
    ///
    /// For every link field: diff the record's current references against
    /// the persisted link documents and apply exactly the difference. Ids
    /// present on both sides produce no writes. An empty or absent field
    /// value deletes every remaining link for that field.
    pub async fn record_saved(
        &self,
        ctx: &LinkContext,
        record: &Record,
    ) -> Result<(), LinkServiceError> {
        for attempt in 1..=MAX_RECONCILE_ATTEMPTS {
            let ops = self.plan_record_save(ctx, record).await?;
            if ops.is_empty() {
                return Ok(());
            }
            match self.apply_bulk(&ctx.instance, ops).await? {
                BulkApply::Clean => return Ok(()),
                BulkApply::Conflicted => {
                    tracing::debug!(
                        "link reconcile for record {} conflicted on attempt {}, re-running",
                        record.id,
                        attempt
                    );
                }
            }
        }
        Err(LinkServiceError::retries_exhausted(MAX_RECONCILE_ATTEMPTS))
    }

    /// Compute the create/tombstone set for a record save
    async fn plan_record_save(
        &self,
        ctx: &LinkContext,
        record: &Record,
    ) -> Result<Vec<LinkDocument>, LinkServiceError> {
        let mut ops = Vec::new();

        for (field_name, link) in ctx.model.link_fields() {
            let scope =
                LinkScope::field_record(&ctx.instance, &ctx.model.id, field_name, &record.id);
            let existing = self.links.get_link_documents(&scope).await?;

            // Actual state keyed by the other side's record id. Both sides
            // are sets, so ordering of ids can never cause churn for ids
            // present in both.
            let mut current: BTreeMap<String, LinkDocument> = BTreeMap::new();
            for doc in existing {
                let other_id = doc
                    .other_side(&ctx.model.id, field_name, &record.id)
                    .record_id
                    .clone();
                current.insert(other_id, doc);
            }

            let desired = record.link_ids(field_name);

            for id in &desired {
                if !current.contains_key(id) {
                    ops.push(LinkDocument::between(
                        ctx.model.id.as_str(),
                        field_name,
                        record.id.as_str(),
                        link.model_id.as_str(),
                        link.field_name.as_str(),
                        id.as_str(),
                    ));
                }
            }
            for (other_id, doc) in current {
                if !desired.contains(&other_id) {
                    ops.push(doc.into_tombstone());
                }
            }
        }

        Ok(ops)
    }

    /// Remove every link document referencing a deleted record
    ///
    /// Queries with a wildcard field: all of the record's links go,
    /// regardless of which fields produced them. No schema inspection.
    pub async fn record_deleted(
        &self,
        ctx: &LinkContext,
        record: &Record,
    ) -> Result<(), LinkServiceError> {
        let scope = LinkScope::record(&ctx.instance, &ctx.model.id, &record.id);
        self.purge_links(ctx, &scope).await
    }

    /// Propagate this model's link fields to the models they point at
    ///
    /// For each link field, the other model gains (or has refreshed) a
    /// reciprocal field named after this model, pointing back at the
    /// originating field. Applied per field independently; the first
    /// failure is reported with its originating field and nothing after it
    /// is attempted. Link documents are not touched.
    pub async fn model_saved(&self, ctx: &LinkContext) -> Result<(), LinkServiceError> {
        for (field_name, link) in ctx.model.link_fields() {
            let mut other = self
                .store
                .get_model(&ctx.instance, &link.model_id)
                .await
                .map_err(|err| {
                    LinkServiceError::reciprocal_update_failed(&link.model_id, field_name, err)
                })?;

            other.upsert_field(
                ctx.model.name.as_str(),
                FieldDefinition::link(ctx.model.id.as_str(), field_name),
            );

            self.store
                .put_model(&ctx.instance, &other)
                .await
                .map_err(|err| {
                    LinkServiceError::reciprocal_update_failed(&link.model_id, field_name, err)
                })?;

            tracing::debug!(
                "upserted reciprocal field '{}' on model {} for {}.{}",
                ctx.model.name,
                link.model_id,
                ctx.model.id,
                field_name
            );
        }
        Ok(())
    }

    /// Tear down a deleted model's link state
    ///
    /// Removes the reciprocal field from every model this one linked to,
    /// then purges every link document that references this model,
    /// cascading regardless of how many fields or records were involved.
    pub async fn model_deleted(&self, ctx: &LinkContext) -> Result<(), LinkServiceError> {
        for (field_name, link) in ctx.model.link_fields() {
            // A self-referencing model has no surviving schema to patch.
            if link.model_id == ctx.model.id {
                continue;
            }

            let mut other = match self.store.get_model(&ctx.instance, &link.model_id).await {
                Ok(model) => model,
                Err(StoreError::NotFound { .. }) => {
                    // Linked model already deleted; its reciprocal entry
                    // went with it, and re-invocations must still converge.
                    tracing::debug!(
                        "model {} gone before reciprocal cleanup of '{}', skipping",
                        link.model_id,
                        field_name
                    );
                    continue;
                }
                Err(err) => {
                    return Err(LinkServiceError::reciprocal_update_failed(
                        &link.model_id,
                        field_name,
                        err,
                    ));
                }
            };

            if other.remove_field(&ctx.model.name).is_some() {
                self.store
                    .put_model(&ctx.instance, &other)
                    .await
                    .map_err(|err| {
                        LinkServiceError::reciprocal_update_failed(&link.model_id, field_name, err)
                    })?;
            }
        }

        let scope = LinkScope::model(&ctx.instance, &ctx.model.id);
        self.purge_links(ctx, &scope).await
    }

    /// Tombstone every link document in scope, retrying on conflicts
    async fn purge_links(
        &self,
        ctx: &LinkContext,
        scope: &LinkScope,
    ) -> Result<(), LinkServiceError> {
        for attempt in 1..=MAX_RECONCILE_ATTEMPTS {
            let existing = self.links.get_link_documents(scope).await?;
            if existing.is_empty() {
                return Ok(());
            }

            let ops: Vec<LinkDocument> = existing
                .into_iter()
                .map(LinkDocument::into_tombstone)
                .collect();

            match self.apply_bulk(&ctx.instance, ops).await? {
                BulkApply::Clean => return Ok(()),
                BulkApply::Conflicted => {
                    tracing::debug!(
                        "link purge for model {} conflicted on attempt {}, re-running",
                        ctx.model.id,
                        attempt
                    );
                }
            }
        }
        Err(LinkServiceError::retries_exhausted(MAX_RECONCILE_ATTEMPTS))
    }

    /// Apply one bulk write and classify its per-item outcomes
    ///
    /// Applied items stay applied either way. Revision conflicts alone mean
    /// the reconcile raced a concurrent writer and should be re-planned;
    /// any other per-item failure surfaces as `PartialBulkFailure` naming
    /// exactly the documents that failed.
    async fn apply_bulk(
        &self,
        instance: &str,
        ops: Vec<LinkDocument>,
    ) -> Result<BulkApply, LinkServiceError> {
        let creates = ops.iter().filter(|op| !op.deleted).count();
        let deletes = ops.len() - creates;

        let outcomes = self.store.bulk_links(instance, ops).await?;

        let mut conflicts_only = true;
        let mut failures = Vec::new();
        for outcome in outcomes {
            if let Err(err) = outcome.result {
                if !matches!(err, StoreError::Conflict { .. }) {
                    conflicts_only = false;
                }
                failures.push(BulkFailure {
                    id: outcome.id,
                    reason: err.to_string(),
                });
            }
        }

        if failures.is_empty() {
            tracing::debug!("applied {} link creation(s), {} deletion(s)", creates, deletes);
            Ok(BulkApply::Clean)
        } else if conflicts_only {
            Ok(BulkApply::Conflicted)
        } else {
            Err(LinkServiceError::partial_bulk_failure(failures))
        }
    }
}

//! The per-entity reconciliation seam.

use crate::error::{Operation, ReconcileError, ReconcileResult};
use async_trait::async_trait;
use segform_client::SegmentClient;

/// Local record of one entity as the front-end stores it.
pub trait EntityRecord: Clone + Send + Sync {
    /// Whether the record carries a remote identity.
    fn is_present(&self) -> bool;

    /// Copy the remote identity of `observed` into this record.
    fn adopt_identity(&mut self, observed: &Self);

    /// Human-readable identity used in logs and errors.
    fn describe(&self) -> String;
}

/// Create / read / update / delete / import for one entity type.
///
/// Each call is self-contained: it runs its requests one after another through
/// the client handle it is given and keeps no state between calls. A read that
/// finds the entity gone clears the record's identity instead of failing.
#[async_trait]
pub trait Reconciler: Send + Sync {
    type Record: EntityRecord;

    /// Entity type name used in logs and errors.
    fn entity_type(&self) -> &'static str;

    async fn create(&self, client: &SegmentClient, record: &mut Self::Record)
    -> ReconcileResult<()>;

    async fn read(&self, client: &SegmentClient, record: &mut Self::Record) -> ReconcileResult<()>;

    async fn update(&self, client: &SegmentClient, record: &mut Self::Record)
    -> ReconcileResult<()>;

    async fn delete(&self, client: &SegmentClient, record: &Self::Record) -> ReconcileResult<()>;

    /// Adopt an existing entity from its import key.
    async fn import(&self, client: &SegmentClient, key: &str) -> ReconcileResult<Self::Record>;
}

/// Fail `op` when the read that follows a write no longer sees the entity.
///
/// A write the service accepted but cannot read back must not look like an
/// absent entity, or the next reconciliation would create it again.
pub(crate) fn confirm_present<R: EntityRecord>(
    record: &R,
    op: Operation,
    entity: &str,
) -> ReconcileResult<()> {
    if record.is_present() {
        Ok(())
    } else {
        Err(ReconcileError::not_found(op, entity))
    }
}

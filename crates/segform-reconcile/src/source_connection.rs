//! Source connection reconciliation.
//!
//! A connection attaches one source to one tracking plan. The service has no
//! update for it, so any change to either side is a replacement.

use crate::error::{Operation, ReconcileError, ReconcileResult};
use crate::identity::{derive_identifier, parse_composite_key};
use crate::reconciler::{EntityRecord, Reconciler, confirm_present};
use async_trait::async_trait;
use segform_client::SegmentClient;
use segform_core::ShortId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ENTITY_TYPE: &str = "source connection";
const IMPORT_FORMAT: &str = "<TRACKING-PLAN-ID>/<SOURCE-NAME>";

/// Local record of a source connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConnectionRecord {
    /// `"{plan}/{source}"`; `None` when the connection does not exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub tracking_plan_id: ShortId,

    pub source_name: String,
}

impl SourceConnectionRecord {
    pub fn new(tracking_plan_id: ShortId, source_name: impl Into<String>) -> Self {
        Self {
            id: None,
            tracking_plan_id,
            source_name: source_name.into(),
        }
    }

    fn composite_id(&self) -> String {
        format!("{}/{}", self.tracking_plan_id, self.source_name)
    }

    /// Whether the plan currently lists this record's source.
    async fn is_connected(&self, client: &SegmentClient, op: Operation) -> ReconcileResult<bool> {
        match client.list_source_connections(&self.tracking_plan_id).await {
            Ok(listing) => Ok(listing
                .connections
                .iter()
                .any(|conn| derive_identifier(&conn.source_name).as_str() == self.source_name)),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(ReconcileError::from_client(op, &self.describe(), e)),
        }
    }
}

impl EntityRecord for SourceConnectionRecord {
    fn is_present(&self) -> bool {
        self.id.is_some()
    }

    fn adopt_identity(&mut self, observed: &Self) {
        self.id = observed.id.clone();
    }

    fn describe(&self) -> String {
        format!("{ENTITY_TYPE} \"{}\"", self.composite_id())
    }
}

/// Whether moving from `observed` to `desired` needs destroy + recreate.
pub fn requires_replacement(
    observed: &SourceConnectionRecord,
    desired: &SourceConnectionRecord,
) -> bool {
    observed.tracking_plan_id != desired.tracking_plan_id
        || observed.source_name != desired.source_name
}

/// Reconciler for source connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceConnectionReconciler;

#[async_trait]
impl Reconciler for SourceConnectionReconciler {
    type Record = SourceConnectionRecord;

    fn entity_type(&self) -> &'static str {
        ENTITY_TYPE
    }

    async fn create(
        &self,
        client: &SegmentClient,
        record: &mut SourceConnectionRecord,
    ) -> ReconcileResult<()> {
        client
            .create_source_connection(&record.tracking_plan_id, &record.source_name)
            .await
            .map_err(|e| ReconcileError::from_client(Operation::Create, &record.describe(), e))?;
        info!(
            plan = %record.tracking_plan_id,
            source = %record.source_name,
            "connected source to tracking plan"
        );
        record.id = Some(record.composite_id());

        self.read(client, record).await?;
        confirm_present(record, Operation::Create, &record.describe())
    }

    async fn read(
        &self,
        client: &SegmentClient,
        record: &mut SourceConnectionRecord,
    ) -> ReconcileResult<()> {
        debug!(plan = %record.tracking_plan_id, source = %record.source_name, "reading source connection");
        if record.is_connected(client, Operation::Read).await? {
            record.id = Some(record.composite_id());
        } else if record.id.is_some() {
            warn!(
                plan = %record.tracking_plan_id,
                source = %record.source_name,
                "source connection no longer exists, clearing identity"
            );
            record.id = None;
        }
        Ok(())
    }

    async fn update(
        &self,
        _client: &SegmentClient,
        record: &mut SourceConnectionRecord,
    ) -> ReconcileResult<()> {
        Err(ReconcileError::malformed(
            Operation::Update,
            &record.describe(),
            "source connections cannot be updated in place",
        ))
    }

    async fn delete(
        &self,
        client: &SegmentClient,
        record: &SourceConnectionRecord,
    ) -> ReconcileResult<()> {
        client
            .delete_source_connection(&record.tracking_plan_id, &record.source_name)
            .await
            .map_err(|e| ReconcileError::from_client(Operation::Delete, &record.describe(), e))?;
        info!(
            plan = %record.tracking_plan_id,
            source = %record.source_name,
            "disconnected source from tracking plan"
        );
        Ok(())
    }

    async fn import(
        &self,
        client: &SegmentClient,
        key: &str,
    ) -> ReconcileResult<SourceConnectionRecord> {
        let op = Operation::Import;
        let (plan, source) = parse_composite_key(key, ENTITY_TYPE, IMPORT_FORMAT)?;
        let mut record = SourceConnectionRecord::new(ShortId::new(plan), source);

        if !record.is_connected(client, op).await? {
            return Err(ReconcileError::not_found(op, &record.describe()));
        }
        record.id = Some(record.composite_id());
        info!(key = %key, "imported source connection");
        Ok(record)
    }
}

//! Tracking plan reconciliation.
//!
//! Plans are addressed by short identifier. Rules travel as text in the
//! record and are parsed strictly before any write, so a malformed document
//! never reaches the service as an empty plan.

use crate::codec::{parse_rules, render_rules};
use crate::error::{Operation, ReconcileError, ReconcileResult};
use crate::identity::{derive_identifier, resolve_identifier_map};
use crate::reconciler::{EntityRecord, Reconciler, confirm_present};
use async_trait::async_trait;
use segform_client::SegmentClient;
use segform_core::ids::NAME_SEPARATOR;
use segform_core::{ShortId, TrackingPlan, UpdateMask};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ENTITY_TYPE: &str = "tracking plan";
const IMPORT_FORMAT: &str = "<TRACKING-PLAN-ID> or workspaces/<WORKSPACE>/tracking-plans/<TRACKING-PLAN-ID>";

/// Fields named by every tracking plan update.
pub const TRACKING_PLAN_UPDATE_PATHS: [&str; 2] =
    ["tracking_plan.display_name", "tracking_plan.rules"];

/// Local record of a tracking plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingPlanRecord {
    /// Short identifier; `None` when the plan does not exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShortId>,

    /// Computed; mirrors `id` after a successful read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ShortId>,

    pub display_name: String,

    /// Rules document as text. Canonical after a read.
    pub rules: String,
}

impl TrackingPlanRecord {
    pub fn new(display_name: impl Into<String>, rules: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            rules: rules.into(),
            ..Default::default()
        }
    }

    fn apply_observed(
        &mut self,
        op: Operation,
        id: ShortId,
        observed: &TrackingPlan,
    ) -> ReconcileResult<()> {
        let rules = render_rules(&observed.rules)
            .map_err(|e| ReconcileError::from_codec(op, &self.describe(), e))?;
        self.display_name = observed.display_name.clone();
        self.rules = rules;
        self.name = Some(id.clone());
        self.id = Some(id);
        Ok(())
    }

    fn clear_identity(&mut self) {
        self.id = None;
        self.name = None;
    }

    fn require_id(&self, op: Operation) -> ReconcileResult<ShortId> {
        self.id
            .clone()
            .ok_or_else(|| ReconcileError::malformed(op, &self.describe(), "record has no identifier"))
    }
}

impl EntityRecord for TrackingPlanRecord {
    fn is_present(&self) -> bool {
        self.id.is_some()
    }

    fn adopt_identity(&mut self, observed: &Self) {
        self.id = observed.id.clone();
        self.name = observed.name.clone();
    }

    fn describe(&self) -> String {
        match &self.id {
            Some(id) => format!("{ENTITY_TYPE} \"{id}\""),
            None => format!("{ENTITY_TYPE} {:?}", self.display_name),
        }
    }
}

/// Reconciler for tracking plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingPlanReconciler;

#[async_trait]
impl Reconciler for TrackingPlanReconciler {
    type Record = TrackingPlanRecord;

    fn entity_type(&self) -> &'static str {
        ENTITY_TYPE
    }

    async fn create(
        &self,
        client: &SegmentClient,
        record: &mut TrackingPlanRecord,
    ) -> ReconcileResult<()> {
        let op = Operation::Create;
        let entity = record.describe();
        let rules =
            parse_rules(&record.rules).map_err(|e| ReconcileError::from_codec(op, &entity, e))?;

        let created = client
            .create_tracking_plan(&record.display_name, rules)
            .await
            .map_err(|e| ReconcileError::from_client(op, &entity, e))?;

        let name = created.name.ok_or_else(|| ReconcileError::Decode {
            op,
            entity: entity.clone(),
            reason: "response carries no resource name".to_string(),
        })?;
        let id = name.short_id();
        info!(id = %id, display_name = %record.display_name, "created tracking plan");
        record.id = Some(id);

        self.read(client, record).await?;
        confirm_present(record, op, &entity)
    }

    async fn read(
        &self,
        client: &SegmentClient,
        record: &mut TrackingPlanRecord,
    ) -> ReconcileResult<()> {
        let op = Operation::Read;
        let entity = record.describe();
        let Some(id) = record.id.clone() else {
            record.clear_identity();
            return Ok(());
        };

        let known = resolve_identifier_map(client)
            .await
            .map_err(|e| ReconcileError::from_client(op, &entity, e))?;
        if !known.contains_key(&id) {
            warn!(id = %id, "tracking plan no longer exists, clearing identity");
            record.clear_identity();
            return Ok(());
        }

        debug!(id = %id, "reading tracking plan");
        match client.get_tracking_plan(&id).await {
            Ok(observed) => record.apply_observed(op, id, &observed),
            Err(e) if e.is_not_found() => {
                warn!(id = %id, "tracking plan no longer exists, clearing identity");
                record.clear_identity();
                Ok(())
            }
            Err(e) => Err(ReconcileError::from_client(op, &entity, e)),
        }
    }

    async fn update(
        &self,
        client: &SegmentClient,
        record: &mut TrackingPlanRecord,
    ) -> ReconcileResult<()> {
        let op = Operation::Update;
        let entity = record.describe();
        let id = record.require_id(op)?;
        let rules =
            parse_rules(&record.rules).map_err(|e| ReconcileError::from_codec(op, &entity, e))?;

        let plan = TrackingPlan {
            display_name: record.display_name.clone(),
            rules,
            ..Default::default()
        };
        client
            .update_tracking_plan(&id, UpdateMask::new(TRACKING_PLAN_UPDATE_PATHS), plan)
            .await
            .map_err(|e| ReconcileError::from_client(op, &entity, e))?;
        info!(id = %id, "updated tracking plan");

        self.read(client, record).await?;
        confirm_present(record, op, &entity)
    }

    async fn delete(
        &self,
        client: &SegmentClient,
        record: &TrackingPlanRecord,
    ) -> ReconcileResult<()> {
        let op = Operation::Delete;
        let id = record.require_id(op)?;
        client
            .delete_tracking_plan(&id)
            .await
            .map_err(|e| ReconcileError::from_client(op, &record.describe(), e))?;
        info!(id = %id, "deleted tracking plan");
        Ok(())
    }

    async fn import(&self, client: &SegmentClient, key: &str) -> ReconcileResult<TrackingPlanRecord> {
        let op = Operation::Import;
        let id = derive_identifier(key);
        // A full name is accepted only when it names a plan of this workspace.
        let foreign = key.contains(NAME_SEPARATOR) && key != client.paths().tracking_plan(&id);
        if id.as_str().is_empty() || foreign {
            return Err(ReconcileError::InvalidImportFormat {
                entity_type: ENTITY_TYPE,
                key: key.to_string(),
                expected: IMPORT_FORMAT,
            });
        }
        let entity = format!("{ENTITY_TYPE} \"{id}\"");

        let observed = client.get_tracking_plan(&id).await.map_err(|e| {
            if e.is_not_found() {
                ReconcileError::not_found(op, &entity)
            } else {
                ReconcileError::from_client(op, &entity, e)
            }
        })?;

        // The service's own name is authoritative for the stored identifier.
        let id = observed.name.as_ref().map_or(id, |name| name.short_id());
        let mut record = TrackingPlanRecord::default();
        record.apply_observed(op, id, &observed)?;
        info!(key = %key, "imported tracking plan");
        Ok(record)
    }
}

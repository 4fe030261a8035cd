//! Destination reconciliation.
//!
//! A destination is addressed by its source and destination names. Creation
//! returns the full resource name, which becomes the record's identity; every
//! write is followed by a read so defaulted fields come from the service.
//! `connection_mode` is fixed at creation; changing it means replacing the
//! destination (see [`requires_replacement`]).

use crate::codec::{ConfigSet, extract_configs, to_observed_configs};
use crate::error::{Operation, ReconcileError, ReconcileResult};
use crate::identity::parse_composite_key;
use crate::reconciler::{EntityRecord, Reconciler, confirm_present};
use async_trait::async_trait;
use segform_client::SegmentClient;
use segform_core::{Destination, FullName};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const ENTITY_TYPE: &str = "destination";
const IMPORT_FORMAT: &str = "<SOURCE-NAME>/<DESTINATION-NAME>";

/// Local record of a destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecord {
    /// Full resource name; `None` when the destination does not exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FullName>,

    pub source_name: String,

    pub destination_name: String,

    pub connection_mode: String,

    pub enabled: bool,

    #[serde(default)]
    pub configs: ConfigSet,
}

impl DestinationRecord {
    pub fn new(
        source_name: impl Into<String>,
        destination_name: impl Into<String>,
        connection_mode: impl Into<String>,
        enabled: bool,
        configs: ConfigSet,
    ) -> Self {
        Self {
            id: None,
            source_name: source_name.into(),
            destination_name: destination_name.into(),
            connection_mode: connection_mode.into(),
            enabled,
            configs,
        }
    }

    /// Destination segment of the remote path, taken from the identity when
    /// there is one.
    fn remote_destination(&self) -> String {
        match &self.id {
            Some(id) => id.short_id().to_string(),
            None => self.destination_name.clone(),
        }
    }

    fn apply_observed(&mut self, observed: Destination) {
        self.enabled = observed.enabled;
        self.connection_mode = observed.connection_mode;
        self.configs = to_observed_configs(&observed.configs);
        if let Some(name) = observed.name {
            self.id = Some(name);
        }
    }
}

impl EntityRecord for DestinationRecord {
    fn is_present(&self) -> bool {
        self.id.is_some()
    }

    fn adopt_identity(&mut self, observed: &Self) {
        self.id = observed.id.clone();
    }

    fn describe(&self) -> String {
        format!(
            "{ENTITY_TYPE} \"{}/{}\"",
            self.source_name, self.destination_name
        )
    }
}

/// Whether moving from `observed` to `desired` needs destroy + recreate.
pub fn requires_replacement(observed: &DestinationRecord, desired: &DestinationRecord) -> bool {
    observed.source_name != desired.source_name
        || observed.destination_name != desired.destination_name
        || observed.connection_mode != desired.connection_mode
}

/// Reconciler for destinations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationReconciler;

#[async_trait]
impl Reconciler for DestinationReconciler {
    type Record = DestinationRecord;

    fn entity_type(&self) -> &'static str {
        ENTITY_TYPE
    }

    async fn create(
        &self,
        client: &SegmentClient,
        record: &mut DestinationRecord,
    ) -> ReconcileResult<()> {
        let op = Operation::Create;
        let entity = record.describe();
        let configs =
            extract_configs(&record.configs).map_err(|e| ReconcileError::from_codec(op, &entity, e))?;

        let created = client
            .create_destination(
                &record.source_name,
                &record.destination_name,
                &record.connection_mode,
                record.enabled,
                configs,
            )
            .await
            .map_err(|e| ReconcileError::from_client(op, &entity, e))?;

        let name = created.name.ok_or_else(|| ReconcileError::Decode {
            op,
            entity: entity.clone(),
            reason: "response carries no resource name".to_string(),
        })?;
        info!(source = %record.source_name, name = %name, "created destination");
        record.id = Some(name);

        self.read(client, record).await?;
        confirm_present(record, op, &entity)
    }

    async fn read(
        &self,
        client: &SegmentClient,
        record: &mut DestinationRecord,
    ) -> ReconcileResult<()> {
        let entity = record.describe();
        // Nothing to look up until the destination has been created or imported.
        if record.id.is_none() {
            return Ok(());
        }
        let destination = record.remote_destination();
        debug!(source = %record.source_name, destination = %destination, "reading destination");

        match client
            .get_destination(&record.source_name, &destination)
            .await
        {
            Ok(observed) => {
                record.apply_observed(observed);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    source = %record.source_name,
                    destination = %destination,
                    "destination no longer exists, clearing identity"
                );
                record.id = None;
                Ok(())
            }
            Err(e) => Err(ReconcileError::from_client(Operation::Read, &entity, e)),
        }
    }

    async fn update(
        &self,
        client: &SegmentClient,
        record: &mut DestinationRecord,
    ) -> ReconcileResult<()> {
        let op = Operation::Update;
        let entity = record.describe();
        let configs =
            extract_configs(&record.configs).map_err(|e| ReconcileError::from_codec(op, &entity, e))?;
        let destination = record.remote_destination();

        client
            .update_destination(&record.source_name, &destination, record.enabled, configs)
            .await
            .map_err(|e| ReconcileError::from_client(op, &entity, e))?;
        info!(source = %record.source_name, destination = %destination, "updated destination");

        self.read(client, record).await?;
        confirm_present(record, op, &entity)
    }

    async fn delete(&self, client: &SegmentClient, record: &DestinationRecord) -> ReconcileResult<()> {
        let destination = record.remote_destination();
        client
            .delete_destination(&record.source_name, &destination)
            .await
            .map_err(|e| ReconcileError::from_client(Operation::Delete, &record.describe(), e))?;
        info!(source = %record.source_name, destination = %destination, "deleted destination");
        Ok(())
    }

    async fn import(&self, client: &SegmentClient, key: &str) -> ReconcileResult<DestinationRecord> {
        let op = Operation::Import;
        let (source, destination) = parse_composite_key(key, ENTITY_TYPE, IMPORT_FORMAT)?;
        let mut record = DestinationRecord {
            source_name: source.to_string(),
            destination_name: destination.to_string(),
            ..Default::default()
        };
        let entity = record.describe();

        let observed = client
            .get_destination(source, destination)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ReconcileError::not_found(op, &entity)
                } else {
                    ReconcileError::from_client(op, &entity, e)
                }
            })?;
        if observed.name.is_none() {
            return Err(ReconcileError::Decode {
                op,
                entity,
                reason: "response carries no resource name".to_string(),
            });
        }

        record.apply_observed(observed);
        info!(key = %key, "imported destination");
        Ok(record)
    }
}

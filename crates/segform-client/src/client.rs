//! Typed Config API client.
//!
//! One method per remote call. Request bodies are built from the wire model,
//! responses are decoded back into it; nothing here interprets the payloads.

use crate::error::{ClientError, ClientResult};
use crate::paths::Paths;
use crate::transport::{HttpTransport, Method, Transport};
use segform_core::model::{
    DestinationCreateRequest, DestinationUpdateRequest, TrackingPlanCreateRequest,
    TrackingPlanUpdateRequest,
};
use segform_core::{
    ClientConfig, Destination, DestinationConfig, Rules, ShortId, SourceConnection,
    SourceConnections, TrackingPlan, TrackingPlans, UpdateMask,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Update mask paths sent with every destination update.
pub const DESTINATION_UPDATE_PATHS: [&str; 2] = ["destination.config", "destination.enabled"];

/// Client handle passed explicitly to every reconciliation call.
#[derive(Clone)]
pub struct SegmentClient {
    transport: Arc<dyn Transport>,
    paths: Paths,
}

impl SegmentClient {
    pub fn new(workspace: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            paths: Paths::new(workspace),
        }
    }

    /// Build a client over HTTPS from configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(config.workspace.clone(), Arc::new(transport)))
    }

    pub fn workspace(&self) -> &str {
        self.paths.workspace()
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &'static str,
    ) -> ClientResult<T> {
        let data = self.transport.do_request(Method::Get, path, None).await?;
        decode(&data, context)
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let data = self
            .transport
            .do_request(method, path, Some(&body))
            .await?;
        decode(&data, context)
    }

    async fn remove(&self, path: &str) -> ClientResult<()> {
        self.transport.do_request(Method::Delete, path, None).await?;
        Ok(())
    }

    // ── Tracking plans ────────────────────────────────────────────────

    pub async fn list_tracking_plans(&self) -> ClientResult<TrackingPlans> {
        self.fetch(&self.paths.tracking_plans(), "tracking plans response")
            .await
    }

    pub async fn get_tracking_plan(&self, id: &ShortId) -> ClientResult<TrackingPlan> {
        self.fetch(&self.paths.tracking_plan(id), "tracking plan response")
            .await
    }

    pub async fn create_tracking_plan(
        &self,
        display_name: &str,
        rules: Rules,
    ) -> ClientResult<TrackingPlan> {
        let request = TrackingPlanCreateRequest {
            tracking_plan: TrackingPlan {
                display_name: display_name.to_string(),
                rules,
                ..Default::default()
            },
        };
        self.send(
            Method::Post,
            &self.paths.tracking_plan_collection(),
            &request,
            "tracking plan response",
        )
        .await
    }

    /// Partial update touching only the fields named in `update_mask`.
    pub async fn update_tracking_plan(
        &self,
        id: &ShortId,
        update_mask: UpdateMask,
        tracking_plan: TrackingPlan,
    ) -> ClientResult<TrackingPlan> {
        let request = TrackingPlanUpdateRequest {
            tracking_plan,
            update_mask,
        };
        self.send(
            Method::Put,
            &self.paths.tracking_plan(id),
            &request,
            "tracking plan response",
        )
        .await
    }

    pub async fn delete_tracking_plan(&self, id: &ShortId) -> ClientResult<()> {
        self.remove(&self.paths.tracking_plan(id)).await
    }

    // ── Destinations ──────────────────────────────────────────────────

    pub async fn get_destination(
        &self,
        source: &str,
        destination: &str,
    ) -> ClientResult<Destination> {
        self.fetch(
            &self.paths.destination(source, destination),
            "destination response",
        )
        .await
    }

    pub async fn create_destination(
        &self,
        source: &str,
        destination: &str,
        connection_mode: &str,
        enabled: bool,
        configs: Vec<DestinationConfig>,
    ) -> ClientResult<Destination> {
        let request = DestinationCreateRequest {
            destination: Destination {
                name: Some(self.paths.destination_name(source, destination)),
                connection_mode: connection_mode.to_string(),
                enabled,
                configs,
                ..Default::default()
            },
        };
        self.send(
            Method::Post,
            &self.paths.destination_collection(source),
            &request,
            "destination response",
        )
        .await
    }

    /// Replace the settings and enabled flag of a destination.
    pub async fn update_destination(
        &self,
        source: &str,
        destination: &str,
        enabled: bool,
        configs: Vec<DestinationConfig>,
    ) -> ClientResult<Destination> {
        let request = DestinationUpdateRequest {
            destination: Destination {
                enabled,
                configs,
                ..Default::default()
            },
            update_mask: UpdateMask::new(DESTINATION_UPDATE_PATHS),
        };
        self.send(
            Method::Put,
            &self.paths.destination(source, destination),
            &request,
            "destination response",
        )
        .await
    }

    pub async fn delete_destination(&self, source: &str, destination: &str) -> ClientResult<()> {
        self.remove(&self.paths.destination(source, destination))
            .await
    }

    // ── Source connections ────────────────────────────────────────────

    pub async fn list_source_connections(
        &self,
        plan: &ShortId,
    ) -> ClientResult<SourceConnections> {
        self.fetch(
            &self.paths.source_connections(plan),
            "source connections response",
        )
        .await
    }

    pub async fn create_source_connection(
        &self,
        plan: &ShortId,
        source: &str,
    ) -> ClientResult<SourceConnection> {
        let request = SourceConnection {
            source_name: self.paths.source_name(source).to_string(),
            tracking_plan_id: String::new(),
        };
        self.send(
            Method::Post,
            &self.paths.source_connections(plan),
            &request,
            "source connection response",
        )
        .await
    }

    pub async fn delete_source_connection(&self, plan: &ShortId, source: &str) -> ClientResult<()> {
        self.remove(&self.paths.source_connection(plan, source))
            .await
    }
}

fn decode<T: DeserializeOwned>(data: &[u8], context: &'static str) -> ClientResult<T> {
    serde_json::from_slice(data).map_err(|source| ClientError::Decode { context, source })
}

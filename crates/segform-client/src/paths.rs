//! Resource path construction.
//!
//! All paths are relative to the API base URL and scoped to one workspace.

use segform_core::{FullName, ShortId};

pub const WORKSPACES_ENDPOINT: &str = "workspaces";
pub const SOURCES_ENDPOINT: &str = "sources";
pub const DESTINATIONS_ENDPOINT: &str = "destinations";
pub const TRACKING_PLANS_ENDPOINT: &str = "tracking-plans";
pub const SOURCE_CONNECTIONS_ENDPOINT: &str = "source-connections";

/// Builds workspace-scoped resource paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    workspace: String,
}

impl Paths {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
        }
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    fn scoped(&self, rest: &str) -> String {
        format!("{}/{}/{}", WORKSPACES_ENDPOINT, self.workspace, rest)
    }

    // ── Tracking plans ────────────────────────────────────────────────

    /// List path.
    pub fn tracking_plans(&self) -> String {
        self.scoped(TRACKING_PLANS_ENDPOINT)
    }

    /// Create path.
    pub fn tracking_plan_collection(&self) -> String {
        self.scoped(&format!("{TRACKING_PLANS_ENDPOINT}/"))
    }

    /// Read/update/delete path.
    pub fn tracking_plan(&self, id: &ShortId) -> String {
        self.scoped(&format!("{TRACKING_PLANS_ENDPOINT}/{id}"))
    }

    // ── Destinations ──────────────────────────────────────────────────

    /// Create path for destinations of a source.
    pub fn destination_collection(&self, source: &str) -> String {
        self.scoped(&format!(
            "{SOURCES_ENDPOINT}/{source}/{DESTINATIONS_ENDPOINT}/"
        ))
    }

    /// Read/update/delete path.
    pub fn destination(&self, source: &str, destination: &str) -> String {
        self.scoped(&format!(
            "{SOURCES_ENDPOINT}/{source}/{DESTINATIONS_ENDPOINT}/{destination}"
        ))
    }

    /// Resource name the service assigns to a destination.
    pub fn destination_name(&self, source: &str, destination: &str) -> FullName {
        FullName::new(self.destination(source, destination))
    }

    /// Resource name of a source.
    pub fn source_name(&self, source: &str) -> FullName {
        FullName::new(self.scoped(&format!("{SOURCES_ENDPOINT}/{source}")))
    }

    // ── Source connections ────────────────────────────────────────────

    /// List and create path for the sources connected to a plan.
    pub fn source_connections(&self, plan: &ShortId) -> String {
        self.scoped(&format!(
            "{TRACKING_PLANS_ENDPOINT}/{plan}/{SOURCE_CONNECTIONS_ENDPOINT}/"
        ))
    }

    /// Delete path.
    pub fn source_connection(&self, plan: &ShortId, source: &str) -> String {
        self.scoped(&format!(
            "{TRACKING_PLANS_ENDPOINT}/{plan}/{SOURCE_CONNECTIONS_ENDPOINT}/{source}"
        ))
    }
}

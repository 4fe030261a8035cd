//! Source connection wire types.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Attachment of a source to a tracking plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConnection {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tracking_plan_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConnections {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<SourceConnection>,
}

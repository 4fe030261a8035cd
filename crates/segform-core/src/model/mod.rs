//! Wire representation of Config API entities.
//!
//! Every request and response body is one of these types. Empty scalar fields
//! are omitted on encode, and `null` in place of a list, map or nested rule is
//! read as empty, so payloads written by other clients decode cleanly.

pub mod destination;
pub mod source_connection;
pub mod tracking_plan;

use serde::{Deserialize, Deserializer, Serialize};

pub use destination::{
    ConfigValue, Destination, DestinationConfig, DestinationCreateRequest,
    DestinationUpdateRequest,
};
pub use source_connection::{SourceConnection, SourceConnections};
pub use tracking_plan::{
    Event, Rule, Rules, TrackingPlan, TrackingPlanCreateRequest, TrackingPlanUpdateRequest,
    TrackingPlans,
};

/// Field mask of a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMask {
    #[serde(default, deserialize_with = "null_as_default")]
    pub paths: Vec<String>,
}

impl UpdateMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

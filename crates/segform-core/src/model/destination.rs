//! Destination wire types.

use super::{UpdateMask, null_as_default};
use crate::ids::FullName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A connection between a source and a third-party endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FullName>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub parent: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub display_name: String,

    /// Always encoded, `false` is a meaningful value on update.
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub connection_mode: String,

    #[serde(rename = "config", default, deserialize_with = "null_as_default")]
    pub configs: Vec<DestinationConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

/// One typed setting of a destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Machine name of the setting; the local record calls this `id`.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConfigValue>,

    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub config_type: String,
}

/// Value of a destination setting as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Lists and maps.
    Structured(serde_json::Value),
}

impl ConfigValue {
    /// Textual form stored in local records.
    ///
    /// Numbers keep their JSON spelling, structured values become compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Number(n) => n.to_string(),
            ConfigValue::String(s) => s.clone(),
            ConfigValue::Structured(v) => v.to_string(),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationCreateRequest {
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationUpdateRequest {
    pub destination: Destination,
    pub update_mask: UpdateMask,
}

//! Tracking plan wire types and the recursive rule tree.
//!
//! Known rule keywords are typed; anything else a rule carries (`items`,
//! `format`, `minimum`, ...) is kept in `extra` so a decode/encode cycle never
//! drops schema content. Map keys serialize in lexicographic order, which makes
//! the encoded form of a tree deterministic.

use super::{UpdateMask, null_as_default};
use crate::ids::FullName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<FullName>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub display_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Rules,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

/// Every rule of a tracking plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default, deserialize_with = "null_as_default")]
    pub global: Rule,

    /// Ordered; position is meaningful.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub events: Vec<Event>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub identify: Rule,

    #[serde(default, deserialize_with = "null_as_default")]
    pub group: Rule,

    #[serde(default, deserialize_with = "null_as_default")]
    pub identify_traits: Vec<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub group_traits: Vec<Value>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A JSON-Schema style rule node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,

    #[serde(
        rename = "enum",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub enum_values: Vec<Value>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Value>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub properties: BTreeMap<String, Rule>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required: Vec<String>,

    /// A type name or a list of type names.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<Value>,

    #[serde(
        rename = "$schema",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub schema: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Rules for one tracked event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero"
    )]
    pub version: i64,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Rule,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingPlans {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracking_plans: Vec<TrackingPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingPlanCreateRequest {
    pub tracking_plan: TrackingPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingPlanUpdateRequest {
    pub tracking_plan: TrackingPlan,
    pub update_mask: UpdateMask,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

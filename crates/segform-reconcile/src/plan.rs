//! Change planning.
//!
//! Compares an observed record with the desired one, decides which lifecycle
//! operation brings the remote side in line, and runs it.

use crate::codec::{CodecError, canonicalize};
use crate::destination::{self, DestinationRecord};
use crate::error::{Operation, ReconcileError, ReconcileResult};
use crate::reconciler::{EntityRecord, Reconciler};
use crate::source_connection::{self, SourceConnectionRecord};
use crate::tracking_plan::TrackingPlanRecord;
use segform_client::SegmentClient;
use std::fmt;
use tracing::debug;

/// Operation needed to move from observed to desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    None,
    Create,
    Update,
    /// Delete the observed entity, then create the desired one.
    Replace,
}

impl Change {
    pub fn as_str(&self) -> &'static str {
        match self {
            Change::None => "none",
            Change::Create => "create",
            Change::Update => "update",
            Change::Replace => "replace",
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn present<R: EntityRecord>(observed: Option<&R>) -> Option<&R> {
    observed.filter(|r| r.is_present())
}

pub fn plan_destination(
    observed: Option<&DestinationRecord>,
    desired: &DestinationRecord,
) -> Change {
    let Some(observed) = present(observed) else {
        return Change::Create;
    };
    if destination::requires_replacement(observed, desired) {
        Change::Replace
    } else if observed.enabled != desired.enabled || observed.configs != desired.configs {
        Change::Update
    } else {
        Change::None
    }
}

/// Plan a tracking plan change. Rules are compared in canonical form, so a
/// formatting-only difference is no change.
pub fn plan_tracking_plan(
    observed: Option<&TrackingPlanRecord>,
    desired: &TrackingPlanRecord,
) -> Result<Change, CodecError> {
    let desired_rules = canonicalize(&desired.rules)?;
    let Some(observed) = present(observed) else {
        return Ok(Change::Create);
    };
    if observed.display_name != desired.display_name
        || canonicalize(&observed.rules)? != desired_rules
    {
        Ok(Change::Update)
    } else {
        Ok(Change::None)
    }
}

pub fn plan_source_connection(
    observed: Option<&SourceConnectionRecord>,
    desired: &SourceConnectionRecord,
) -> Change {
    match present(observed) {
        None => Change::Create,
        Some(observed) if source_connection::requires_replacement(observed, desired) => {
            Change::Replace
        }
        Some(_) => Change::None,
    }
}

/// Execute `change` and return the resulting record.
///
/// `Update` and `Replace` need a present observed record; without one the
/// call fails before any request.
pub async fn apply<R: Reconciler>(
    reconciler: &R,
    client: &SegmentClient,
    change: Change,
    observed: Option<R::Record>,
    desired: R::Record,
) -> ReconcileResult<R::Record> {
    debug!(entity_type = reconciler.entity_type(), change = %change, entity = %desired.describe(), "applying change");
    let mut record = desired;
    match change {
        Change::None => Ok(observed.unwrap_or(record)),
        Change::Create => {
            reconciler.create(client, &mut record).await?;
            Ok(record)
        }
        Change::Update => {
            let observed = require_present(observed, &record, Operation::Update)?;
            record.adopt_identity(&observed);
            reconciler.update(client, &mut record).await?;
            Ok(record)
        }
        Change::Replace => {
            let observed = require_present(observed, &record, Operation::Delete)?;
            reconciler.delete(client, &observed).await?;
            reconciler.create(client, &mut record).await?;
            Ok(record)
        }
    }
}

fn require_present<T: EntityRecord>(
    observed: Option<T>,
    desired: &T,
    op: Operation,
) -> ReconcileResult<T> {
    observed.filter(|r| r.is_present()).ok_or_else(|| {
        ReconcileError::malformed(op, &desired.describe(), "no observed entity to act on")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ConfigEntry;
    use segform_core::{FullName, ShortId};

    fn destination(enabled: bool, api_key: &str) -> DestinationRecord {
        DestinationRecord::new(
            "web",
            "amplitude",
            "CLOUD",
            enabled,
            vec![ConfigEntry::new("apiKey", "API Key", api_key, "string")].into(),
        )
    }

    fn observed_destination() -> DestinationRecord {
        let mut r = destination(true, "abc");
        r.id = Some(FullName::new("workspaces/w/sources/web/destinations/amplitude"));
        r
    }

    #[test]
    fn test_plan_destination() {
        let observed = observed_destination();
        assert_eq!(plan_destination(None, &destination(true, "abc")), Change::Create);
        assert_eq!(
            plan_destination(Some(&observed), &destination(true, "abc")),
            Change::None
        );
        assert_eq!(
            plan_destination(Some(&observed), &destination(false, "abc")),
            Change::Update
        );
        assert_eq!(
            plan_destination(Some(&observed), &destination(true, "xyz")),
            Change::Update
        );

        let mut moved = destination(true, "abc");
        moved.connection_mode = "DEVICE".to_string();
        assert_eq!(plan_destination(Some(&observed), &moved), Change::Replace);
    }

    #[test]
    fn test_cleared_identity_plans_create() {
        let mut gone = observed_destination();
        gone.id = None;
        assert_eq!(
            plan_destination(Some(&gone), &destination(true, "abc")),
            Change::Create
        );
    }

    #[test]
    fn test_plan_tracking_plan_ignores_formatting() {
        let mut observed = TrackingPlanRecord::new(
            "Checkout",
            canonicalize(r#"{"events":[{"name":"A"}]}"#).unwrap(),
        );
        observed.id = Some(ShortId::new("rs_1"));

        let reformatted = TrackingPlanRecord::new("Checkout", "{ \"events\" : [ {\"name\":\"A\"} ] }");
        assert_eq!(
            plan_tracking_plan(Some(&observed), &reformatted).unwrap(),
            Change::None
        );

        let renamed = TrackingPlanRecord::new("Checkout v2", r#"{"events":[{"name":"A"}]}"#);
        assert_eq!(
            plan_tracking_plan(Some(&observed), &renamed).unwrap(),
            Change::Update
        );

        let reordered = TrackingPlanRecord::new("Checkout", r#"{"events":[{"name":"B"},{"name":"A"}]}"#);
        assert_eq!(
            plan_tracking_plan(Some(&observed), &reordered).unwrap(),
            Change::Update
        );
    }

    #[test]
    fn test_plan_tracking_plan_rejects_malformed_rules() {
        let desired = TrackingPlanRecord::new("Checkout", "{not json");
        assert!(plan_tracking_plan(None, &desired).is_err());
    }

    #[test]
    fn test_plan_source_connection() {
        let mut observed = SourceConnectionRecord::new(ShortId::new("rs_1"), "web");
        observed.id = Some("rs_1/web".to_string());
        let same = SourceConnectionRecord::new(ShortId::new("rs_1"), "web");
        let other = SourceConnectionRecord::new(ShortId::new("rs_1"), "ios");

        assert_eq!(plan_source_connection(None, &same), Change::Create);
        assert_eq!(plan_source_connection(Some(&observed), &same), Change::None);
        assert_eq!(plan_source_connection(Some(&observed), &other), Change::Replace);
    }
}

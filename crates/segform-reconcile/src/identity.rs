//! Identity resolution between full resource names and short identifiers.
//!
//! Creation and listing return full names; read, update and delete paths take
//! short identifiers. Shortening is a pure function. Expanding a short id
//! requires listing the collection, which doubles as the existence check for
//! tracking plans because the service offers nothing cheaper.

use crate::error::{ReconcileError, ReconcileResult};
use segform_client::{ClientResult, SegmentClient};
use segform_core::{FullName, ShortId};
use std::collections::BTreeMap;

pub use segform_core::derive_identifier;

/// Lookup from short identifier to full resource name.
pub type IdentifierMap = BTreeMap<ShortId, FullName>;

/// Index full names by their derived identifiers.
pub fn build_identifier_map<I>(names: I) -> IdentifierMap
where
    I: IntoIterator<Item = FullName>,
{
    names
        .into_iter()
        .map(|name| (name.short_id(), name))
        .collect()
}

/// List all tracking plans of the workspace and index them by identifier.
pub async fn resolve_identifier_map(client: &SegmentClient) -> ClientResult<IdentifierMap> {
    let plans = client.list_tracking_plans().await?;
    Ok(build_identifier_map(
        plans.tracking_plans.into_iter().filter_map(|plan| plan.name),
    ))
}

/// Split a `"{parent}/{child}"` import key.
///
/// The key must contain exactly one separator and both halves must be
/// non-empty.
pub fn parse_composite_key<'a>(
    key: &'a str,
    entity_type: &'static str,
    expected: &'static str,
) -> ReconcileResult<(&'a str, &'a str)> {
    let invalid = || ReconcileError::InvalidImportFormat {
        entity_type,
        key: key.to_string(),
        expected,
    };

    let mut parts = key.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(parent), Some(child), None) if !parent.is_empty() && !child.is_empty() => {
            Ok((parent, child))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_build_identifier_map() {
        let map = build_identifier_map(vec![
            FullName::new("workspaces/w/tracking-plans/rs_1"),
            FullName::new("workspaces/w/tracking-plans/rs_2"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(&ShortId::new("rs_2")).unwrap().as_str(),
            "workspaces/w/tracking-plans/rs_2"
        );
        assert!(!map.contains_key(&ShortId::new("rs_3")));
    }

    #[test]
    fn test_parse_composite_key() {
        assert_eq!(
            parse_composite_key("src1/dest1", "destination", "<S>/<D>").unwrap(),
            ("src1", "dest1")
        );
    }

    #[test]
    fn test_parse_composite_key_rejects_bad_shapes() {
        for key in ["src1", "", "/dest1", "src1/", "a/b/c", "/"] {
            let err = parse_composite_key(key, "destination", "<S>/<D>").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidImportFormat, "key {key:?}");
        }
    }
}

//! Identifier types for remote entities.
//!
//! The Config API names every entity with a hierarchical resource name such as
//! `workspaces/acme/tracking-plans/rs_1a2b`, but its read, update and delete
//! paths only accept the trailing segment. The two forms are kept apart as
//! [`FullName`] and [`ShortId`]. A full name can always be shortened; going
//! the other way requires a listing of the remote collection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between segments of a hierarchical resource name.
pub const NAME_SEPARATOR: char = '/';

/// Service-assigned hierarchical resource name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing path segment of this name.
    pub fn short_id(&self) -> ShortId {
        derive_identifier(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short identifier accepted on read/update/delete paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the short identifier of a hierarchical name.
///
/// Returns the final `/`-separated segment; a name without any separator is
/// its own identifier.
pub fn derive_identifier(full_name: &str) -> ShortId {
    let last = full_name
        .rsplit(NAME_SEPARATOR)
        .next()
        .unwrap_or(full_name);
    ShortId::new(last)
}

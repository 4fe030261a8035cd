//! Conversion between wire payloads and local records.
//!
//! - [`configs`]: destination settings, a set keyed by id locally and a list
//!   on the wire
//! - [`rules`]: tracking plan rule trees and their canonical text form

pub mod configs;
pub mod rules;

use thiserror::Error;

pub use configs::{ConfigEntry, ConfigSet, extract_configs, to_observed_configs};
pub use rules::{canonicalize, parse_rules, render_rules};

/// Errors raised while encoding or decoding entity payloads.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A config entry lacks one of `id`, `name`, `value`, `type`.
    #[error("config entry {entry} is missing required field '{field}'")]
    MissingConfigField { entry: String, field: &'static str },

    /// Two config entries share an id.
    #[error("config entry {entry} appears more than once")]
    DuplicateConfigId { entry: String },

    /// Rules text is not a valid rule tree.
    #[error("failed to decode rules: {0}")]
    InvalidRules(#[source] serde_json::Error),

    /// A rule tree could not be rendered as text.
    #[error("failed to render rules: {0}")]
    Render(#[source] serde_json::Error),
}

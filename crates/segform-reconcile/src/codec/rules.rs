//! Tracking plan rules codec.
//!
//! Rules are supplied and stored as text. The canonical form is the text
//! rendering of the parsed tree: known fields in declaration order, map keys
//! sorted, two-space indentation. Two inputs that differ only in formatting or
//! key order share one canonical form; the order of `events` is kept as given.

use super::CodecError;
use segform_core::Rules;

/// Parse rules text into a rule tree.
///
/// Malformed text is an error, never an empty tree.
pub fn parse_rules(raw: &str) -> Result<Rules, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::InvalidRules)
}

/// Render a rule tree in canonical form.
pub fn render_rules(rules: &Rules) -> Result<String, CodecError> {
    serde_json::to_string_pretty(rules).map_err(CodecError::Render)
}

/// Parse and re-render rules text.
pub fn canonicalize(raw: &str) -> Result<String, CodecError> {
    render_rules(&parse_rules(raw)?)
}

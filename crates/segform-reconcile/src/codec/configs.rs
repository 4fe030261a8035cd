//! Destination settings codec.
//!
//! Locally, settings form a set keyed by `id`: enumeration order never matters
//! and two entries with the same id are the same setting. On the wire they are
//! a list of `{name, display_name, value, type}` where the wire `name` is the
//! local `id` and the wire `display_name` is the local `name`.

use super::CodecError;
use segform_core::{ConfigValue, DestinationConfig};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Local record of one destination setting.
///
/// Fields are optional because desired-state records come from user input;
/// [`extract_configs`] rejects incomplete entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,
}

impl ConfigEntry {
    /// Fully populated entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        config_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            value: Some(value.into()),
            config_type: Some(config_type.into()),
        }
    }

    fn label(&self) -> String {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => format!("{id:?}"),
            _ => "without id".to_string(),
        }
    }
}

/// Destination settings keyed by id.
///
/// [`ConfigSet::insert`], `collect()` and `From<Vec<ConfigEntry>>` keep the
/// last entry for a repeated id. Records decoded from user input go through
/// [`ConfigSet::from_entries`], which rejects repeats instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<ConfigEntry>")]
pub struct ConfigSet {
    entries: BTreeMap<Option<String>, ConfigEntry>,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from entries that must have distinct ids.
    pub fn from_entries(entries: Vec<ConfigEntry>) -> Result<Self, CodecError> {
        let mut set = ConfigSet::new();
        for entry in entries {
            let label = entry.label();
            if set.insert(entry).is_some() {
                return Err(CodecError::DuplicateConfigId { entry: label });
            }
        }
        Ok(set)
    }

    /// Insert an entry, replacing any entry with the same id.
    pub fn insert(&mut self, entry: ConfigEntry) -> Option<ConfigEntry> {
        self.entries.insert(entry.id.clone(), entry)
    }

    pub fn get(&self, id: &str) -> Option<&ConfigEntry> {
        self.entries.get(&Some(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }
}

impl FromIterator<ConfigEntry> for ConfigSet {
    fn from_iter<I: IntoIterator<Item = ConfigEntry>>(iter: I) -> Self {
        let mut set = ConfigSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

impl IntoIterator for ConfigSet {
    type Item = ConfigEntry;
    type IntoIter = std::collections::btree_map::IntoValues<Option<String>, ConfigEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl From<Vec<ConfigEntry>> for ConfigSet {
    fn from(entries: Vec<ConfigEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl<'de> Deserialize<'de> for ConfigSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<ConfigEntry>::deserialize(deserializer)?;
        ConfigSet::from_entries(entries).map_err(serde::de::Error::custom)
    }
}

impl From<ConfigSet> for Vec<ConfigEntry> {
    fn from(set: ConfigSet) -> Self {
        set.into_iter().collect()
    }
}

/// Map desired settings to the wire list.
///
/// Every entry must carry `id`, `name`, `value` and `type`. Values of
/// `boolean` and `number` settings go out as JSON booleans and numbers when
/// their text is exactly the JSON spelling of one; everything else is sent as
/// a string.
pub fn extract_configs(set: &ConfigSet) -> Result<Vec<DestinationConfig>, CodecError> {
    set.iter()
        .map(|entry| {
            let id = entry
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| missing(entry, "id"))?;
            let name = entry.name.as_deref().ok_or_else(|| missing(entry, "name"))?;
            let value = entry.value.as_deref().ok_or_else(|| missing(entry, "value"))?;
            let config_type = entry
                .config_type
                .as_deref()
                .ok_or_else(|| missing(entry, "type"))?;

            Ok(DestinationConfig {
                name: id.to_string(),
                display_name: name.to_string(),
                value: Some(typed_value(value, config_type)),
                config_type: config_type.to_string(),
            })
        })
        .collect()
}

/// Map wire settings to the local set, turning every value into text.
pub fn to_observed_configs(configs: &[DestinationConfig]) -> ConfigSet {
    configs
        .iter()
        .map(|config| ConfigEntry {
            id: Some(config.name.clone()),
            name: Some(config.display_name.clone()),
            value: Some(
                config
                    .value
                    .as_ref()
                    .map(ConfigValue::to_text)
                    .unwrap_or_default(),
            ),
            config_type: Some(config.config_type.clone()),
        })
        .collect()
}

/// Wire value for `text`, typed by the setting's declared type.
///
/// Only spellings that turn back into the same text are typed, so observed
/// values always read back exactly as they were written.
fn typed_value(text: &str, config_type: &str) -> ConfigValue {
    match config_type {
        "boolean" => match text {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => ConfigValue::from(text),
        },
        "number" => match serde_json::from_str::<serde_json::Number>(text) {
            Ok(number) if number.to_string() == text => ConfigValue::Number(number),
            _ => ConfigValue::from(text),
        },
        _ => ConfigValue::from(text),
    }
}

fn missing(entry: &ConfigEntry, field: &'static str) -> CodecError {
    CodecError::MissingConfigField {
        entry: entry.label(),
        field,
    }
}

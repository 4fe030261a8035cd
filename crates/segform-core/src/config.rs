//! Client configuration.
//!
//! Loaded from a YAML file such as:
//!
//! ```yaml
//! workspace: acme
//! access_token_env: SEGMENT_ACCESS_TOKEN
//! timeout_seconds: 15
//! ```
//!
//! The access token is resolved in order of precedence:
//! 1. The environment variable named by `access_token_env`
//! 2. The inline `access_token`

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Connection settings for the Config API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Workspace every resource path is scoped to.
    #[serde(default)]
    pub workspace: String,

    /// Base URL of the Config API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Inline access token. Lowest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Environment variable holding the access token.
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            workspace: String::new(),
            api_base_url: default_api_base_url(),
            access_token: None,
            access_token_env: default_access_token_env(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for a workspace with default settings.
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace.trim().is_empty() {
            return Err(ConfigError::MissingWorkspace);
        }
        Ok(())
    }

    /// Resolve the access token, checking the environment first.
    pub fn access_token(&self) -> Result<String, ConfigError> {
        if !self.access_token_env.is_empty()
            && let Ok(token) = std::env::var(&self.access_token_env)
            && !token.is_empty()
        {
            return Ok(token);
        }
        match &self.access_token {
            Some(token) if !token.is_empty() => Ok(token.clone()),
            _ => Err(ConfigError::MissingAccessToken {
                env: self.access_token_env.clone(),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_api_base_url() -> String {
    "https://platform.segmentapis.com/v1beta".to_string()
}

fn default_access_token_env() -> String {
    "SEGMENT_ACCESS_TOKEN".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("segform/{}", env!("CARGO_PKG_VERSION"))
}

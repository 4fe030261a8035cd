//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur while loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid YAML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// No workspace was configured.
    #[error("config is missing a workspace")]
    MissingWorkspace,

    /// No access token inline or in the environment.
    #[error("no access token configured (set {env} or access_token)")]
    MissingAccessToken { env: String },
}

//! Error types for the client crate.

use thiserror::Error;

/// Errors that can occur while talking to the Config API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("remote rejected request with HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// The response body does not have the expected shape.
    #[error("failed to decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The client could not be built from its configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// HTTP status of a remote rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<segform_core::ConfigError> for ClientError {
    fn from(err: segform_core::ConfigError) -> Self {
        ClientError::InvalidConfig(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

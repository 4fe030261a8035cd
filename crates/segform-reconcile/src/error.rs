//! Error types for reconciliation.
//!
//! Every error names the operation that failed and the entity it was working
//! on, so a failure can be traced without request ids.

use crate::codec::CodecError;
use segform_client::ClientError;
use std::fmt;
use thiserror::Error;

/// Reconciliation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse category of a [`ReconcileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    RemoteRejected,
    Decode,
    MalformedInput,
    InvalidImportFormat,
    NotFound,
}

/// Errors that can occur during reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The request did not complete.
    #[error("{op} {entity}: {source}")]
    Transport {
        op: Operation,
        entity: String,
        #[source]
        source: ClientError,
    },

    /// The service answered with a non-success status.
    #[error("{op} {entity}: remote rejected request with HTTP {status}: {body}")]
    RemoteRejected {
        op: Operation,
        entity: String,
        status: u16,
        body: String,
    },

    /// A payload (response body or rules text) could not be decoded.
    #[error("{op} {entity}: {reason}")]
    Decode {
        op: Operation,
        entity: String,
        reason: String,
    },

    /// The caller's record is incomplete or inconsistent.
    #[error("{op} {entity}: malformed input: {reason}")]
    MalformedInput {
        op: Operation,
        entity: String,
        reason: String,
    },

    /// An import key does not have the expected shape.
    #[error("invalid {entity_type} import format: {key:?} (expected {expected})")]
    InvalidImportFormat {
        entity_type: &'static str,
        key: String,
        expected: &'static str,
    },

    /// The entity does not exist where it must.
    #[error("{op} {entity}: not found")]
    NotFound { op: Operation, entity: String },
}

impl ReconcileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::Transport { .. } => ErrorKind::Transport,
            ReconcileError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            ReconcileError::Decode { .. } => ErrorKind::Decode,
            ReconcileError::MalformedInput { .. } => ErrorKind::MalformedInput,
            ReconcileError::InvalidImportFormat { .. } => ErrorKind::InvalidImportFormat,
            ReconcileError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Wrap a client failure with operation and entity context.
    pub fn from_client(op: Operation, entity: &str, err: ClientError) -> Self {
        let entity = entity.to_string();
        match err {
            ClientError::Remote { status, body } => ReconcileError::RemoteRejected {
                op,
                entity,
                status,
                body,
            },
            ClientError::Decode { .. } => ReconcileError::Decode {
                op,
                entity,
                reason: err.to_string(),
            },
            ClientError::Encode(_) => ReconcileError::MalformedInput {
                op,
                entity,
                reason: err.to_string(),
            },
            ClientError::Transport(_) | ClientError::InvalidConfig(_) => {
                ReconcileError::Transport {
                    op,
                    entity,
                    source: err,
                }
            }
        }
    }

    /// Wrap a codec failure with operation and entity context.
    pub fn from_codec(op: Operation, entity: &str, err: CodecError) -> Self {
        let entity = entity.to_string();
        let reason = err.to_string();
        match err {
            CodecError::MissingConfigField { .. } | CodecError::DuplicateConfigId { .. } => {
                ReconcileError::MalformedInput { op, entity, reason }
            }
            CodecError::InvalidRules(_) | CodecError::Render(_) => {
                ReconcileError::Decode { op, entity, reason }
            }
        }
    }

    pub fn malformed(op: Operation, entity: &str, reason: impl Into<String>) -> Self {
        ReconcileError::MalformedInput {
            op,
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(op: Operation, entity: &str) -> Self {
        ReconcileError::NotFound {
            op,
            entity: entity.to_string(),
        }
    }
}

/// Result type for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

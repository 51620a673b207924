//! Error types for remote service calls.

use thiserror::Error;

/// Result type alias for service operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Errors returned by the remote services.
///
/// `NotFound` is the only variant callers treat as a lookup miss; every
/// other variant is a failure.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("failed to open state: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("deserialization error: {0}")]
    Deserialize(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl CloudError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

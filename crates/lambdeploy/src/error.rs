//! Error types for deployment operations.

use std::io;
use std::path::PathBuf;

use lambdeploy_cloud::CloudError;
use thiserror::Error;

/// Result type alias for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;

#[derive(Debug, Error)]
pub enum DeployError {
    /// A remote call failed, or a lookup missed where a resource must exist.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("failed to digest {}: {source}", .path.display())]
    Digest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read artifact {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("attempting to publish {}: {source}", .path.display())]
    PublishLayer {
        path: PathBuf,
        #[source]
        source: CloudError,
    },

    #[error("no artifact bucket configured")]
    MissingBucket,

    #[error("no such variable: {0}")]
    NoSuchVariable(String),

    #[error("log event timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

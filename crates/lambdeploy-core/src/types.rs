//! Shared types used across lambdeploy crates.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The application being deployed. Its name keys the role, the
/// function, and the log group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSource {
    pub app: String,
}

impl AppSource {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }
}

/// Artifacts and metadata produced by the build phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Execution environment identifier, e.g. `ruby2.5`.
    pub runtime: String,
    /// Unique identifier of this build.
    pub build_id: String,
    /// Application package.
    pub app_zip: PathBuf,
    /// Bootstrap/preprocessing layer artifact.
    pub pre_zip: PathBuf,
    /// Library dependency layer artifact.
    pub lib_zip: PathBuf,
}

/// Result of a deployment: the ARN of the published function version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deployment {
    pub function_arn: String,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function_arn)
    }
}

/// A single named configuration variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVar {
    pub name: String,
    pub value: String,
}

impl ConfigVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One line of function output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Log stream the event was read from.
    pub partition: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

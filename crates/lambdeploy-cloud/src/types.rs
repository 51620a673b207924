//! Request and response types for the remote services.
//!
//! Field names follow the platform's API shapes so a network-backed
//! client can map onto them one to one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version label of a function's mutable head.
pub const LATEST: &str = "$LATEST";

// ── Roles ──────────────────────────────────────────────────────────

/// An execution role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_name: String,
    pub arn: String,
    pub path: String,
    pub assume_role_policy_document: String,
    pub attached_policies: Vec<String>,
    pub created_at: u64,
}

// ── Blob storage ───────────────────────────────────────────────────

/// Location of an object in blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// Metadata returned by a head or put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub location: ObjectLocation,
    /// Hex SHA-256 of the object bytes.
    pub etag: String,
    pub size: u64,
}

// ── Functions ──────────────────────────────────────────────────────

/// The configurable fields of a function, as sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSettings {
    pub handler: String,
    /// Role ARN.
    pub role: String,
    pub runtime: String,
    /// Seconds.
    pub timeout: u32,
    /// Megabytes.
    pub memory_size: u32,
    /// Layer version ARNs, in application order.
    pub layers: Vec<String>,
    /// `None` leaves the current environment untouched on update.
    pub environment: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFunctionRequest {
    pub function_name: String,
    pub description: String,
    pub settings: FunctionSettings,
    pub code: ObjectLocation,
    pub tags: HashMap<String, String>,
}

/// Current (`$LATEST`) configuration of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfiguration {
    pub function_name: String,
    pub function_arn: String,
    pub description: String,
    pub handler: String,
    pub role: String,
    pub runtime: String,
    pub timeout: u32,
    pub memory_size: u32,
    pub layers: Vec<String>,
    pub environment: Option<HashMap<String, String>>,
    /// Base64 SHA-256 of the deployed package.
    pub code_sha256: String,
    pub code_size: u64,
    pub code: ObjectLocation,
    pub version: String,
    pub tags: HashMap<String, String>,
    pub last_modified: u64,
}

impl FunctionConfiguration {
    /// The configurable fields, copied verbatim.
    pub fn settings(&self) -> FunctionSettings {
        FunctionSettings {
            handler: self.handler.clone(),
            role: self.role.clone(),
            runtime: self.runtime.clone(),
            timeout: self.timeout,
            memory_size: self.memory_size,
            layers: self.layers.clone(),
            environment: self.environment.clone(),
        }
    }
}

/// An immutable published snapshot of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionVersion {
    pub function_name: String,
    pub version: u64,
    /// Version-qualified ARN.
    pub function_arn: String,
    pub code_sha256: String,
    pub configuration: FunctionConfiguration,
    pub created_at: u64,
}

// ── Layers ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerContent {
    /// Base64 SHA-256 of the layer archive.
    pub code_sha256: String,
    pub code_size: u64,
    pub location: ObjectLocation,
}

/// A published layer version with its content details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVersion {
    pub layer_name: String,
    pub layer_arn: String,
    pub layer_version_arn: String,
    pub version: u64,
    pub description: String,
    pub compatible_runtimes: Vec<String>,
    pub content: LayerContent,
    pub created_at: u64,
}

/// Entry in a layer version listing. Does not carry the content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVersionSummary {
    pub version: u64,
    pub layer_version_arn: String,
    pub description: String,
    pub compatible_runtimes: Vec<String>,
    pub created_at: u64,
}

impl From<&LayerVersion> for LayerVersionSummary {
    fn from(v: &LayerVersion) -> Self {
        Self {
            version: v.version,
            layer_version_arn: v.layer_version_arn.clone(),
            description: v.description.clone(),
            compatible_runtimes: v.compatible_runtimes.clone(),
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishLayerRequest {
    pub layer_name: String,
    pub description: String,
    pub content: ObjectLocation,
    pub compatible_runtimes: Vec<String>,
}

// ── Logs ───────────────────────────────────────────────────────────

/// A named collection of log streams, one per function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogGroup {
    pub log_group_name: String,
    pub creation_time: i64,
}

/// A log stream within a log group. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStream {
    pub log_stream_name: String,
    pub creation_time: i64,
    pub first_event_timestamp: Option<i64>,
    pub last_event_timestamp: Option<i64>,
    pub stored_events: u64,
}

/// An event to ingest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLogEvent {
    pub timestamp: i64,
    pub message: String,
}

/// An event as returned by a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLogEvent {
    pub timestamp: i64,
    pub message: String,
    pub ingestion_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLogEventsRequest {
    pub log_group_name: String,
    pub log_stream_name: String,
    /// Token from a previous page; `None` starts a fresh read.
    pub next_token: Option<String>,
    /// Read oldest-first when starting without a token.
    pub start_from_head: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEventsPage {
    pub events: Vec<OutputLogEvent>,
    /// Token for the following page. Repeats when the stream is exhausted.
    pub next_forward_token: String,
}

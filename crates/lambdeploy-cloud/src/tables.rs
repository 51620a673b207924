//! redb table definitions for the local cloud.
//!
//! Each table uses `&str` keys and `&[u8]` values. All tables except
//! `OBJECTS` hold JSON-serialized records; `OBJECTS` holds raw blob bytes.

use redb::TableDefinition;

/// Roles keyed by `{role_name}`.
pub const ROLES: TableDefinition<&str, &[u8]> = TableDefinition::new("roles");

/// `$LATEST` function configuration keyed by `{function_name}`.
pub const FUNCTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("functions");

/// Published function versions keyed by `{function_name}:{version:010}`.
pub const FUNCTION_VERSIONS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("function_versions");

/// Layer versions keyed by `{layer_name}:{version:010}`.
pub const LAYER_VERSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("layer_versions");

/// Blob bytes keyed by `{bucket}/{key}`.
pub const OBJECTS: TableDefinition<&str, &[u8]> = TableDefinition::new("objects");

/// Blob metadata keyed by `{bucket}/{key}`.
pub const OBJECT_META: TableDefinition<&str, &[u8]> = TableDefinition::new("object_meta");

/// Log groups keyed by `{group}`.
pub const LOG_GROUPS: TableDefinition<&str, &[u8]> = TableDefinition::new("log_groups");

/// Log stream descriptors keyed by `{group}\0{stream}`.
pub const LOG_STREAMS: TableDefinition<&str, &[u8]> = TableDefinition::new("log_streams");

/// Log events keyed by `{group}\0{stream}\0{timestamp:020}\0{seq:010}`.
pub const LOG_EVENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("log_events");

/// Zero-padded numeric suffix so lexicographic key order matches numeric order.
pub fn version_key(name: &str, version: u64) -> String {
    format!("{name}:{version:010}")
}

pub fn object_key(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}

/// Separates the parts of log keys. Group and stream names may not contain it,
/// so a prefix scan over one stream never reaches into another.
pub const LOG_KEY_SEP: char = '\0';

pub fn stream_key(group: &str, stream: &str) -> String {
    format!("{group}{LOG_KEY_SEP}{stream}")
}

/// Prefix shared by every stream of `group`.
pub fn stream_prefix(group: &str) -> String {
    format!("{group}{LOG_KEY_SEP}")
}

/// Prefix shared by every event of one stream.
pub fn event_prefix(group: &str, stream: &str) -> String {
    format!("{}{LOG_KEY_SEP}", stream_key(group, stream))
}

/// Events sort by timestamp, then by arrival order within the stream.
pub fn event_key(group: &str, stream: &str, timestamp: u64, seq: u64) -> String {
    format!("{}{timestamp:020}{LOG_KEY_SEP}{seq:010}", event_prefix(group, stream))
}

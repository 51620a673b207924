//! LocalCloud: redb-backed emulator of the function platform.
//!
//! Implements every service contract in [`crate::services`] against a
//! single redb database. The store supports both on-disk and in-memory
//! backends (the latter for testing). Records are JSON-serialized into
//! `&[u8]` value columns; blob bytes are stored raw.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use lambdeploy_core::code_sha256_bytes;
use lambdeploy_core::config::{DEFAULT_ACCOUNT_ID, DEFAULT_REGION};
use redb::{Database, ReadableDatabase, ReadableTable, Table, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CloudError, CloudResult};
use crate::services::{BlobStore, FunctionService, LogSource, RoleService};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `CloudError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| CloudError::$variant(e.to_string())
    };
}

type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Events returned per `get_log_events` page when the request sets no limit.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Thread-safe local cloud backed by redb.
#[derive(Clone)]
pub struct LocalCloud {
    db: Arc<Database>,
    region: String,
    account_id: String,
    page_size: usize,
}

impl LocalCloud {
    /// Open (or create) a persistent local cloud at the given path.
    pub fn open(path: &Path) -> CloudResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let cloud = Self::with_db(db);
        cloud.ensure_tables()?;
        debug!(?path, "local cloud opened");
        Ok(cloud)
    }

    /// Create an ephemeral in-memory local cloud (for testing).
    pub fn open_in_memory() -> CloudResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let cloud = Self::with_db(db);
        cloud.ensure_tables()?;
        debug!("in-memory local cloud opened");
        Ok(cloud)
    }

    fn with_db(db: Database) -> Self {
        Self {
            db: Arc::new(db),
            region: DEFAULT_REGION.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Region and account used when minting ARNs.
    pub fn with_identity(mut self, region: impl Into<String>, account_id: impl Into<String>) -> Self {
        self.region = region.into();
        self.account_id = account_id.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> CloudResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        for def in [
            ROLES,
            FUNCTIONS,
            FUNCTION_VERSIONS,
            LAYER_VERSIONS,
            OBJECTS,
            OBJECT_META,
            LOG_GROUPS,
            LOG_STREAMS,
            LOG_EVENTS,
        ] {
            txn.open_table(def).map_err(map_err!(Table))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, def: JsonTable, key: &str) -> CloudResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(def).map_err(map_err!(Table))?;
        read_json(&table, key)
    }

    fn scan<T: DeserializeOwned>(&self, def: JsonTable, prefix: &str) -> CloudResult<Vec<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(def).map_err(map_err!(Table))?;
        scan_json(&table, prefix)
    }

    fn function_arn(&self, function_name: &str) -> String {
        format!(
            "arn:aws:lambda:{}:{}:function:{function_name}",
            self.region, self.account_id
        )
    }

    fn layer_arn(&self, layer_name: &str) -> String {
        format!(
            "arn:aws:lambda:{}:{}:layer:{layer_name}",
            self.region, self.account_id
        )
    }

    // ── Log ingestion ──────────────────────────────────────────────

    /// Create an empty log group. Fails if the group already exists.
    pub fn create_log_group(&self, log_group_name: &str) -> CloudResult<LogGroup> {
        check_log_name("log group", log_group_name)?;
        let group = LogGroup {
            log_group_name: log_group_name.to_string(),
            creation_time: now_millis(),
        };
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut groups = txn.open_table(LOG_GROUPS).map_err(map_err!(Table))?;
            if groups.get(log_group_name).map_err(map_err!(Read))?.is_some() {
                return Err(CloudError::AlreadyExists {
                    kind: "log group",
                    name: log_group_name.to_string(),
                });
            }
            write_json(&mut groups, log_group_name, &group)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(group = log_group_name, "log group created");
        Ok(group)
    }

    /// Append events to a stream, creating the group and stream if needed.
    ///
    /// Timestamps are epoch milliseconds and must not be negative.
    pub fn put_log_events(
        &self,
        log_group_name: &str,
        log_stream_name: &str,
        events: &[InputLogEvent],
    ) -> CloudResult<()> {
        check_log_name("log group", log_group_name)?;
        check_log_name("log stream", log_stream_name)?;
        let timestamps = events
            .iter()
            .map(|e| {
                u64::try_from(e.timestamp).map_err(|_| {
                    CloudError::InvalidRequest(format!(
                        "log event timestamp {} is before the epoch",
                        e.timestamp
                    ))
                })
            })
            .collect::<CloudResult<Vec<u64>>>()?;

        let skey = stream_key(log_group_name, log_stream_name);
        let now = now_millis();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut groups = txn.open_table(LOG_GROUPS).map_err(map_err!(Table))?;
            if groups.get(log_group_name).map_err(map_err!(Read))?.is_none() {
                let group = LogGroup {
                    log_group_name: log_group_name.to_string(),
                    creation_time: now,
                };
                write_json(&mut groups, log_group_name, &group)?;
            }

            let mut streams = txn.open_table(LOG_STREAMS).map_err(map_err!(Table))?;
            let mut log = txn.open_table(LOG_EVENTS).map_err(map_err!(Table))?;

            let mut stream: LogStream = read_json(&streams, &skey)?.unwrap_or(LogStream {
                log_stream_name: log_stream_name.to_string(),
                creation_time: now,
                first_event_timestamp: None,
                last_event_timestamp: None,
                stored_events: 0,
            });

            for (event, ts) in events.iter().zip(timestamps) {
                let key = event_key(log_group_name, log_stream_name, ts, stream.stored_events);
                write_json(
                    &mut log,
                    &key,
                    &OutputLogEvent {
                        timestamp: event.timestamp,
                        message: event.message.clone(),
                        ingestion_time: now,
                    },
                )?;
                stream.stored_events += 1;
                stream.first_event_timestamp = Some(
                    stream
                        .first_event_timestamp
                        .map_or(event.timestamp, |t| t.min(event.timestamp)),
                );
                stream.last_event_timestamp = Some(
                    stream
                        .last_event_timestamp
                        .map_or(event.timestamp, |t| t.max(event.timestamp)),
                );
            }

            write_json(&mut streams, &skey, &stream)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(group = log_group_name, stream = log_stream_name, count = events.len(), "log events stored");
        Ok(())
    }
}

// ── Table helpers ──────────────────────────────────────────────────

fn read_json<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> CloudResult<Option<T>> {
    match table.get(key).map_err(map_err!(Read))? {
        Some(guard) => {
            let value: T = serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// All values whose key starts with `prefix`, in key order.
fn scan_json<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    prefix: &str,
) -> CloudResult<Vec<T>> {
    let mut results = Vec::new();
    for entry in table.iter().map_err(map_err!(Read))? {
        let (key, value) = entry.map_err(map_err!(Read))?;
        if key.value().starts_with(prefix) {
            let item: T = serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(item);
        }
    }
    Ok(results)
}

fn write_json<T: Serialize>(
    table: &mut Table<'_, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> CloudResult<()> {
    let bytes = serde_json::to_vec(value).map_err(map_err!(Serialize))?;
    table
        .insert(key, bytes.as_slice())
        .map_err(map_err!(Write))?;
    Ok(())
}

/// Code digest and size of a stored object, as the platform reports them.
fn object_digest(
    objects: &impl ReadableTable<&'static str, &'static [u8]>,
    location: &ObjectLocation,
) -> CloudResult<(String, u64)> {
    let key = object_key(&location.bucket, &location.key);
    match objects.get(key.as_str()).map_err(map_err!(Read))? {
        Some(guard) => {
            let bytes = guard.value();
            Ok((code_sha256_bytes(bytes), bytes.len() as u64))
        }
        None => Err(CloudError::InvalidRequest(format!(
            "code object s3://{key} does not exist"
        ))),
    }
}

/// Next version number for records stored under `{name}:{version}` keys.
fn next_version(table: &impl ReadableTable<&'static str, &'static [u8]>, name: &str) -> CloudResult<u64> {
    let prefix = format!("{name}:");
    let mut max = 0;
    for entry in table.iter().map_err(map_err!(Read))? {
        let (key, _) = entry.map_err(map_err!(Read))?;
        if let Some(suffix) = key.value().strip_prefix(&prefix) {
            if let Ok(v) = suffix.parse::<u64>() {
                max = max.max(v);
            }
        }
    }
    Ok(max + 1)
}

/// Split `arn:...:layer:{name}:{version}` into name and version.
fn parse_layer_version_arn(arn: &str) -> Option<(&str, u64)> {
    let (layer_arn, version) = arn.rsplit_once(':')?;
    let (_, name) = layer_arn.split_once(":layer:")?;
    Some((name, version.parse().ok()?))
}

fn validate_settings(
    roles: &impl ReadableTable<&'static str, &'static [u8]>,
    layers: &impl ReadableTable<&'static str, &'static [u8]>,
    settings: &FunctionSettings,
) -> CloudResult<()> {
    let known_roles: Vec<Role> = scan_json(roles, "")?;
    if !known_roles.iter().any(|r| r.arn == settings.role) {
        return Err(CloudError::InvalidRequest(format!(
            "role {} cannot be assumed",
            settings.role
        )));
    }
    for arn in &settings.layers {
        let (name, version) = parse_layer_version_arn(arn)
            .ok_or_else(|| CloudError::InvalidRequest(format!("malformed layer ARN {arn}")))?;
        if layers
            .get(version_key(name, version).as_str())
            .map_err(map_err!(Read))?
            .is_none()
        {
            return Err(CloudError::InvalidRequest(format!("layer {arn} does not exist")));
        }
    }
    Ok(())
}

fn check_log_name(kind: &str, name: &str) -> CloudResult<()> {
    if name.is_empty() || name.contains(LOG_KEY_SEP) {
        return Err(CloudError::InvalidRequest(format!("invalid {kind} name {name:?}")));
    }
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

// ── Roles ──────────────────────────────────────────────────────────

impl RoleService for LocalCloud {
    fn get_role(&self, role_name: &str) -> CloudResult<Role> {
        self.read(ROLES, role_name)?
            .ok_or_else(|| CloudError::not_found("role", role_name))
    }

    fn create_role(&self, role_name: &str, assume_role_policy: &str) -> CloudResult<Role> {
        let role = Role {
            role_name: role_name.to_string(),
            arn: format!("arn:aws:iam::{}:role/{role_name}", self.account_id),
            path: "/".to_string(),
            assume_role_policy_document: assume_role_policy.to_string(),
            attached_policies: Vec::new(),
            created_at: now_secs(),
        };
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(ROLES).map_err(map_err!(Table))?;
            if table.get(role_name).map_err(map_err!(Read))?.is_some() {
                return Err(CloudError::AlreadyExists {
                    kind: "role",
                    name: role_name.to_string(),
                });
            }
            write_json(&mut table, role_name, &role)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(role = role_name, "role created");
        Ok(role)
    }

    fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> CloudResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(ROLES).map_err(map_err!(Table))?;
            let mut role: Role = read_json(&table, role_name)?
                .ok_or_else(|| CloudError::not_found("role", role_name))?;
            if !role.attached_policies.iter().any(|p| p == policy_arn) {
                role.attached_policies.push(policy_arn.to_string());
            }
            write_json(&mut table, role_name, &role)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

// ── Functions and layers ───────────────────────────────────────────

impl FunctionService for LocalCloud {
    fn get_function(&self, function_name: &str) -> CloudResult<FunctionConfiguration> {
        self.read(FUNCTIONS, function_name)?
            .ok_or_else(|| CloudError::not_found("function", function_name))
    }

    fn create_function(&self, req: &CreateFunctionRequest) -> CloudResult<FunctionConfiguration> {
        let name = req.function_name.as_str();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let config;
        {
            let mut functions = txn.open_table(FUNCTIONS).map_err(map_err!(Table))?;
            if functions.get(name).map_err(map_err!(Read))?.is_some() {
                return Err(CloudError::AlreadyExists {
                    kind: "function",
                    name: name.to_string(),
                });
            }
            let roles = txn.open_table(ROLES).map_err(map_err!(Table))?;
            let layers = txn.open_table(LAYER_VERSIONS).map_err(map_err!(Table))?;
            validate_settings(&roles, &layers, &req.settings)?;
            let objects = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
            let (code_sha256, code_size) = object_digest(&objects, &req.code)?;

            let s = &req.settings;
            config = FunctionConfiguration {
                function_name: name.to_string(),
                function_arn: self.function_arn(name),
                description: req.description.clone(),
                handler: s.handler.clone(),
                role: s.role.clone(),
                runtime: s.runtime.clone(),
                timeout: s.timeout,
                memory_size: s.memory_size,
                layers: s.layers.clone(),
                environment: s.environment.clone(),
                code_sha256,
                code_size,
                code: req.code.clone(),
                version: LATEST.to_string(),
                tags: req.tags.clone(),
                last_modified: now_secs(),
            };
            write_json(&mut functions, name, &config)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(function = name, "function created");
        Ok(config)
    }

    fn update_function_configuration(
        &self,
        function_name: &str,
        settings: &FunctionSettings,
    ) -> CloudResult<FunctionConfiguration> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let config;
        {
            let mut functions = txn.open_table(FUNCTIONS).map_err(map_err!(Table))?;
            let mut current: FunctionConfiguration = read_json(&functions, function_name)?
                .ok_or_else(|| CloudError::not_found("function", function_name))?;
            let roles = txn.open_table(ROLES).map_err(map_err!(Table))?;
            let layers = txn.open_table(LAYER_VERSIONS).map_err(map_err!(Table))?;
            validate_settings(&roles, &layers, settings)?;

            current.handler = settings.handler.clone();
            current.role = settings.role.clone();
            current.runtime = settings.runtime.clone();
            current.timeout = settings.timeout;
            current.memory_size = settings.memory_size;
            current.layers = settings.layers.clone();
            if let Some(env) = &settings.environment {
                current.environment = Some(env.clone());
            }
            current.last_modified = now_secs();
            write_json(&mut functions, function_name, &current)?;
            config = current;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(function = function_name, "function configuration updated");
        Ok(config)
    }

    fn update_function_code(
        &self,
        function_name: &str,
        code: &ObjectLocation,
    ) -> CloudResult<FunctionConfiguration> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let config;
        {
            let mut functions = txn.open_table(FUNCTIONS).map_err(map_err!(Table))?;
            let mut current: FunctionConfiguration = read_json(&functions, function_name)?
                .ok_or_else(|| CloudError::not_found("function", function_name))?;
            let objects = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
            let (code_sha256, code_size) = object_digest(&objects, code)?;

            current.code_sha256 = code_sha256;
            current.code_size = code_size;
            current.code = code.clone();
            current.last_modified = now_secs();
            write_json(&mut functions, function_name, &current)?;
            config = current;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(function = function_name, "function code updated");
        Ok(config)
    }

    fn publish_version(
        &self,
        function_name: &str,
        code_sha256: Option<&str>,
    ) -> CloudResult<FunctionVersion> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let published;
        {
            let functions = txn.open_table(FUNCTIONS).map_err(map_err!(Table))?;
            let current: FunctionConfiguration = read_json(&functions, function_name)?
                .ok_or_else(|| CloudError::not_found("function", function_name))?;
            if let Some(expected) = code_sha256 {
                if expected != current.code_sha256 {
                    return Err(CloudError::PreconditionFailed(format!(
                        "code digest {expected} does not match current {}",
                        current.code_sha256
                    )));
                }
            }

            let mut versions = txn.open_table(FUNCTION_VERSIONS).map_err(map_err!(Table))?;
            let version = next_version(&versions, function_name)?;
            let mut snapshot = current.clone();
            snapshot.version = version.to_string();
            published = FunctionVersion {
                function_name: function_name.to_string(),
                version,
                function_arn: format!("{}:{version}", current.function_arn),
                code_sha256: current.code_sha256.clone(),
                configuration: snapshot,
                created_at: now_secs(),
            };
            write_json(&mut versions, &version_key(function_name, version), &published)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(function = function_name, version = published.version, "version published");
        Ok(published)
    }

    fn list_layer_versions(&self, layer_name: &str) -> CloudResult<Vec<LayerVersionSummary>> {
        let versions: Vec<LayerVersion> = self.scan(LAYER_VERSIONS, &format!("{layer_name}:"))?;
        // Newest first, as the platform lists them.
        Ok(versions
            .iter()
            .rev()
            .map(LayerVersionSummary::from)
            .collect())
    }

    fn get_layer_version(&self, layer_name: &str, version: u64) -> CloudResult<LayerVersion> {
        self.read(LAYER_VERSIONS, &version_key(layer_name, version))?
            .ok_or_else(|| CloudError::not_found("layer version", format!("{layer_name}:{version}")))
    }

    fn publish_layer_version(&self, req: &PublishLayerRequest) -> CloudResult<LayerVersion> {
        let name = req.layer_name.as_str();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let published;
        {
            let objects = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
            let (code_sha256, code_size) = object_digest(&objects, &req.content)?;

            let mut layers = txn.open_table(LAYER_VERSIONS).map_err(map_err!(Table))?;
            let version = next_version(&layers, name)?;
            let layer_arn = self.layer_arn(name);
            published = LayerVersion {
                layer_name: name.to_string(),
                layer_version_arn: format!("{layer_arn}:{version}"),
                layer_arn,
                version,
                description: req.description.clone(),
                compatible_runtimes: req.compatible_runtimes.clone(),
                content: LayerContent {
                    code_sha256,
                    code_size,
                    location: req.content.clone(),
                },
                created_at: now_secs(),
            };
            write_json(&mut layers, &version_key(name, version), &published)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(layer = name, version = published.version, "layer version published");
        Ok(published)
    }
}

// ── Blob storage ───────────────────────────────────────────────────

impl BlobStore for LocalCloud {
    fn head_object(&self, bucket: &str, key: &str) -> CloudResult<ObjectMeta> {
        let okey = object_key(bucket, key);
        self.read(OBJECT_META, &okey)?
            .ok_or_else(|| CloudError::not_found("object", okey))
    }

    fn put_object(&self, bucket: &str, key: &str, body: &mut dyn Read) -> CloudResult<ObjectMeta> {
        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes)?;
        let okey = object_key(bucket, key);
        let meta = ObjectMeta {
            location: ObjectLocation::new(bucket, key),
            etag: hex::encode(Sha256::digest(&bytes)),
            size: bytes.len() as u64,
        };
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut objects = txn.open_table(OBJECTS).map_err(map_err!(Table))?;
            objects
                .insert(okey.as_str(), bytes.as_slice())
                .map_err(map_err!(Write))?;
            let mut metas = txn.open_table(OBJECT_META).map_err(map_err!(Table))?;
            write_json(&mut metas, &okey, &meta)?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(key = %okey, size = meta.size, "object stored");
        Ok(meta)
    }
}

// ── Logs ───────────────────────────────────────────────────────────

impl LogSource for LocalCloud {
    fn describe_log_streams(&self, log_group_name: &str) -> CloudResult<Vec<LogStream>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let groups = txn.open_table(LOG_GROUPS).map_err(map_err!(Table))?;
        if groups.get(log_group_name).map_err(map_err!(Read))?.is_none() {
            return Err(CloudError::not_found("log group", log_group_name));
        }
        let table = txn.open_table(LOG_STREAMS).map_err(map_err!(Table))?;
        let mut streams: Vec<LogStream> = scan_json(&table, &stream_prefix(log_group_name))?;
        streams.sort_by_key(|s| s.last_event_timestamp);
        Ok(streams)
    }

    fn get_log_events(&self, req: &GetLogEventsRequest) -> CloudResult<LogEventsPage> {
        let skey = stream_key(&req.log_group_name, &req.log_stream_name);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let streams = txn.open_table(LOG_STREAMS).map_err(map_err!(Table))?;
        if streams.get(skey.as_str()).map_err(map_err!(Read))?.is_none() {
            return Err(CloudError::not_found("log stream", req.log_stream_name.clone()));
        }
        let log = txn.open_table(LOG_EVENTS).map_err(map_err!(Table))?;
        let events: Vec<OutputLogEvent> =
            scan_json(&log, &event_prefix(&req.log_group_name, &req.log_stream_name))?;

        let limit = req.limit.unwrap_or(self.page_size).max(1);
        let offset = match &req.next_token {
            Some(token) => parse_forward_token(token)?.min(events.len()),
            None if req.start_from_head => 0,
            None => events.len().saturating_sub(limit),
        };
        let end = (offset + limit).min(events.len());
        Ok(LogEventsPage {
            events: events[offset..end].to_vec(),
            next_forward_token: format!("f/{end}"),
        })
    }
}

fn parse_forward_token(token: &str) -> CloudResult<usize> {
    token
        .strip_prefix("f/")
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| CloudError::InvalidRequest(format!("invalid pagination token {token}")))
}

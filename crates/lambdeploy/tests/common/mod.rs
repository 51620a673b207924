//! Shared fixtures: a call-recording cloud and build artifacts on disk.

#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;

use lambdeploy_cloud::*;
use lambdeploy_core::{BuildInfo, DeployConfig};

/// Wraps a `LocalCloud`, recording every call by operation name and
/// failing operations listed in `fail`.
pub struct Recorder {
    pub inner: LocalCloud,
    calls: Mutex<Vec<&'static str>>,
    fail: Mutex<HashSet<&'static str>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::with_cloud(LocalCloud::open_in_memory().unwrap())
    }

    pub fn with_cloud(inner: LocalCloud) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(HashSet::new()),
        }
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn fail_on(&self, op: &'static str) {
        self.fail.lock().unwrap().insert(op);
    }

    pub fn heal(&self) {
        self.fail.lock().unwrap().clear();
    }

    fn record(&self, op: &'static str) -> CloudResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.fail.lock().unwrap().contains(op) {
            return Err(CloudError::Transaction(format!("injected failure in {op}")));
        }
        Ok(())
    }
}

impl RoleService for Recorder {
    fn get_role(&self, role_name: &str) -> CloudResult<Role> {
        self.record("get_role")?;
        self.inner.get_role(role_name)
    }

    fn create_role(&self, role_name: &str, assume_role_policy: &str) -> CloudResult<Role> {
        self.record("create_role")?;
        self.inner.create_role(role_name, assume_role_policy)
    }

    fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> CloudResult<()> {
        self.record("attach_role_policy")?;
        self.inner.attach_role_policy(role_name, policy_arn)
    }
}

impl FunctionService for Recorder {
    fn get_function(&self, function_name: &str) -> CloudResult<FunctionConfiguration> {
        self.record("get_function")?;
        self.inner.get_function(function_name)
    }

    fn create_function(&self, req: &CreateFunctionRequest) -> CloudResult<FunctionConfiguration> {
        self.record("create_function")?;
        self.inner.create_function(req)
    }

    fn update_function_configuration(
        &self,
        function_name: &str,
        settings: &FunctionSettings,
    ) -> CloudResult<FunctionConfiguration> {
        self.record("update_function_configuration")?;
        self.inner.update_function_configuration(function_name, settings)
    }

    fn update_function_code(
        &self,
        function_name: &str,
        code: &ObjectLocation,
    ) -> CloudResult<FunctionConfiguration> {
        self.record("update_function_code")?;
        self.inner.update_function_code(function_name, code)
    }

    fn publish_version(
        &self,
        function_name: &str,
        code_sha256: Option<&str>,
    ) -> CloudResult<FunctionVersion> {
        self.record("publish_version")?;
        self.inner.publish_version(function_name, code_sha256)
    }

    fn list_layer_versions(&self, layer_name: &str) -> CloudResult<Vec<LayerVersionSummary>> {
        self.record("list_layer_versions")?;
        self.inner.list_layer_versions(layer_name)
    }

    fn get_layer_version(&self, layer_name: &str, version: u64) -> CloudResult<LayerVersion> {
        self.record("get_layer_version")?;
        self.inner.get_layer_version(layer_name, version)
    }

    fn publish_layer_version(&self, req: &PublishLayerRequest) -> CloudResult<LayerVersion> {
        self.record("publish_layer_version")?;
        self.inner.publish_layer_version(req)
    }
}

impl BlobStore for Recorder {
    fn head_object(&self, bucket: &str, key: &str) -> CloudResult<ObjectMeta> {
        self.record("head_object")?;
        self.inner.head_object(bucket, key)
    }

    fn put_object(&self, bucket: &str, key: &str, body: &mut dyn Read) -> CloudResult<ObjectMeta> {
        self.record("put_object")?;
        self.inner.put_object(bucket, key, body)
    }
}

impl LogSource for Recorder {
    fn describe_log_streams(&self, log_group_name: &str) -> CloudResult<Vec<LogStream>> {
        self.record("describe_log_streams")?;
        self.inner.describe_log_streams(log_group_name)
    }

    fn get_log_events(&self, req: &GetLogEventsRequest) -> CloudResult<LogEventsPage> {
        self.record("get_log_events")?;
        self.inner.get_log_events(req)
    }
}

pub fn deploy_config() -> DeployConfig {
    DeployConfig {
        bucket: "artifacts".to_string(),
        ..Default::default()
    }
}

/// Write a build's three artifacts under `dir` and describe them.
pub fn write_build(dir: &Path, build_id: &str, app: &[u8], pre: &[u8], lib: &[u8]) -> BuildInfo {
    let write = |name: &str, body: &[u8]| {
        let path = dir.join(format!("{build_id}-{name}"));
        fs::write(&path, body).unwrap();
        path
    };
    BuildInfo {
        runtime: "ruby2.5".to_string(),
        build_id: build_id.to_string(),
        app_zip: write("app.zip", app),
        pre_zip: write("pre.zip", pre),
        lib_zip: write("lib.zip", lib),
    }
}

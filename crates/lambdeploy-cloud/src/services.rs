//! Service contracts used by the deployer.
//!
//! Every call is synchronous and blocking. A missing resource is
//! reported as [`CloudError::NotFound`](crate::CloudError::NotFound);
//! anything else is a failure the deployer propagates unchanged.

use std::io::Read;

use crate::error::CloudResult;
use crate::types::*;

/// Identity and access management: execution roles and their policies.
pub trait RoleService {
    fn get_role(&self, role_name: &str) -> CloudResult<Role>;

    /// Create a role at path `/` with the given trust policy document.
    fn create_role(&self, role_name: &str, assume_role_policy: &str) -> CloudResult<Role>;

    fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> CloudResult<()>;
}

/// The function execution platform, including its layer registry.
pub trait FunctionService {
    fn get_function(&self, function_name: &str) -> CloudResult<FunctionConfiguration>;

    fn create_function(&self, req: &CreateFunctionRequest) -> CloudResult<FunctionConfiguration>;

    fn update_function_configuration(
        &self,
        function_name: &str,
        settings: &FunctionSettings,
    ) -> CloudResult<FunctionConfiguration>;

    fn update_function_code(
        &self,
        function_name: &str,
        code: &ObjectLocation,
    ) -> CloudResult<FunctionConfiguration>;

    /// Snapshot `$LATEST` as a new version. When `code_sha256` is given the
    /// call fails unless it matches the function's current code digest.
    fn publish_version(
        &self,
        function_name: &str,
        code_sha256: Option<&str>,
    ) -> CloudResult<FunctionVersion>;

    fn list_layer_versions(&self, layer_name: &str) -> CloudResult<Vec<LayerVersionSummary>>;

    fn get_layer_version(&self, layer_name: &str, version: u64) -> CloudResult<LayerVersion>;

    fn publish_layer_version(&self, req: &PublishLayerRequest) -> CloudResult<LayerVersion>;
}

/// Object storage for packages and layer archives.
pub trait BlobStore {
    fn head_object(&self, bucket: &str, key: &str) -> CloudResult<ObjectMeta>;

    fn put_object(&self, bucket: &str, key: &str, body: &mut dyn Read) -> CloudResult<ObjectMeta>;
}

/// Function log storage.
pub trait LogSource {
    /// Streams in the group, ordered by last event time ascending.
    fn describe_log_streams(&self, log_group_name: &str) -> CloudResult<Vec<LogStream>>;

    fn get_log_events(&self, req: &GetLogEventsRequest) -> CloudResult<LogEventsPage>;
}

//! Function reconciler: drives a function to match a build.
//!
//! ```text
//! Absent ──create──▶ Deployed(v1) ──update──▶ Deployed(vN+1)
//! ```
//!
//! Steps run strictly in order: role, `pre` layer, `lib` layer, package
//! upload, then create or update, then version publish. A failure at any
//! step aborts the run; whatever was created before it stays in place and
//! is found again on retry.

use std::collections::HashMap;

use lambdeploy_cloud::{
    BlobStore, CreateFunctionRequest, FunctionConfiguration, FunctionService, FunctionSettings,
    FunctionVersion, ObjectLocation, RoleService,
};
use lambdeploy_core::{AppSource, BuildInfo, DeployConfig, Deployment};
use tracing::info;

use crate::error::{DeployError, DeployResult};
use crate::layer::{LayerCategory, LayerPublisher, build_description, upload_file};
use crate::role::RoleProvisioner;

/// Tag naming the application on created functions.
pub const APP_TAG: &str = "lambdeploy.app";
/// Tag carrying the build identifier on created functions.
pub const BUILD_TAG: &str = "lambdeploy.app.id";

/// Blob key for the application package of a given build.
pub fn app_object_key(app: &str, build_id: &str) -> String {
    format!("{app}-{build_id}-app.zip")
}

pub struct FunctionReconciler<'a, C: ?Sized> {
    cloud: &'a C,
    config: &'a DeployConfig,
}

impl<'a, C> FunctionReconciler<'a, C>
where
    C: RoleService + FunctionService + BlobStore + ?Sized,
{
    pub fn new(cloud: &'a C, config: &'a DeployConfig) -> Self {
        Self { cloud, config }
    }

    /// Deploy `build` as `app` and return the published version.
    ///
    /// Fails with [`DeployError::MissingBucket`] before any remote call
    /// when no artifact bucket is configured.
    pub fn reconcile(&self, app: &AppSource, build: &BuildInfo) -> DeployResult<Deployment> {
        if self.config.bucket.is_empty() {
            return Err(DeployError::MissingBucket);
        }
        let name = app.app.as_str();

        let mut roles = RoleProvisioner::new(self.cloud, &self.config.role_prefix);
        let role = roles.ensure_role(name)?;

        let layers = LayerPublisher::new(self.cloud, &self.config.bucket);
        let pre = layers.publish(
            LayerCategory::Pre,
            name,
            &build.build_id,
            &build.runtime,
            &build.pre_zip,
        )?;
        let lib = layers.publish(
            LayerCategory::Lib,
            name,
            &build.build_id,
            &build.runtime,
            &build.lib_zip,
        )?;

        let key = app_object_key(name, &build.build_id);
        upload_file(self.cloud, &self.config.bucket, &key, &build.app_zip)?;
        let code = ObjectLocation::new(self.config.bucket.as_str(), key);

        let settings = FunctionSettings {
            handler: self.config.handler.clone(),
            role: role.arn,
            runtime: build.runtime.clone(),
            timeout: self.config.timeout,
            memory_size: self.config.memory_size,
            layers: vec![pre, lib],
            environment: None,
        };

        let version = match self.cloud.get_function(name) {
            Ok(current) => self.update(&current, &settings, &code)?,
            Err(e) if e.is_not_found() => self.create(name, build, settings, code)?,
            Err(e) => return Err(e.into()),
        };

        Ok(Deployment {
            function_arn: version.function_arn,
        })
    }

    fn create(
        &self,
        name: &str,
        build: &BuildInfo,
        settings: FunctionSettings,
        code: ObjectLocation,
    ) -> DeployResult<FunctionVersion> {
        let created = self.cloud.create_function(&CreateFunctionRequest {
            function_name: name.to_string(),
            description: build_description(name, &build.build_id),
            settings,
            code,
            tags: HashMap::from([
                (APP_TAG.to_string(), name.to_string()),
                (BUILD_TAG.to_string(), build.build_id.clone()),
            ]),
        })?;

        let version = self
            .cloud
            .publish_version(name, Some(&created.code_sha256))?;
        info!(arn = %version.function_arn, sha = %created.code_sha256, "created function");
        Ok(version)
    }

    fn update(
        &self,
        current: &FunctionConfiguration,
        settings: &FunctionSettings,
        code: &ObjectLocation,
    ) -> DeployResult<FunctionVersion> {
        let name = current.function_name.as_str();

        if current.layers != settings.layers {
            info!(
                current = ?current.layers,
                desired = ?settings.layers,
                "detected layer changes, updating function config"
            );
            self.cloud.update_function_configuration(name, settings)?;
        }

        let updated = self.cloud.update_function_code(name, code)?;
        let version = self
            .cloud
            .publish_version(name, Some(&updated.code_sha256))?;
        info!(arn = %version.function_arn, sha = %updated.code_sha256, "updated function");
        Ok(version)
    }
}

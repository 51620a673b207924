//! Capability traits the orchestrator drives, and their function
//! platform implementation.

use lambdeploy_cloud::{BlobStore, FunctionService, LogSource, RoleService};
use lambdeploy_core::{AppSource, BuildInfo, ConfigVar, DeployConfig, Deployment, LogEvent};

use crate::config_var::ConfigMutator;
use crate::error::DeployResult;
use crate::logs::LogReader;
use crate::reconciler::FunctionReconciler;

/// A deployment target.
pub trait Platform {
    fn deploy(&self, app: &AppSource, build: &BuildInfo) -> DeployResult<Deployment>;

    fn logs<'a>(&'a self, app: &AppSource) -> DeployResult<Box<dyn LogViewer + 'a>>;
}

/// A target whose deployed application exposes named configuration.
pub trait Configurable {
    fn config_set(&self, app: &AppSource, var: &ConfigVar) -> DeployResult<()>;

    fn config_get(&self, app: &AppSource, name: &str) -> DeployResult<ConfigVar>;
}

/// Paged access to an application's logs. An empty batch ends the stream.
pub trait LogViewer {
    fn next_log_batch(&mut self) -> DeployResult<Vec<LogEvent>>;
}

impl<L: LogSource + ?Sized> LogViewer for LogReader<'_, L> {
    fn next_log_batch(&mut self) -> DeployResult<Vec<LogEvent>> {
        self.next_batch()
    }
}

/// Deploys to a function platform reached through `C`.
pub struct LambdaPlatform<C> {
    cloud: C,
    config: DeployConfig,
}

impl<C> LambdaPlatform<C> {
    pub fn new(cloud: C, config: DeployConfig) -> Self {
        Self { cloud, config }
    }

    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    pub fn cloud(&self) -> &C {
        &self.cloud
    }
}

impl<C> Platform for LambdaPlatform<C>
where
    C: RoleService + FunctionService + BlobStore + LogSource,
{
    fn deploy(&self, app: &AppSource, build: &BuildInfo) -> DeployResult<Deployment> {
        FunctionReconciler::new(&self.cloud, &self.config).reconcile(app, build)
    }

    fn logs<'a>(&'a self, app: &AppSource) -> DeployResult<Box<dyn LogViewer + 'a>> {
        Ok(Box::new(LogReader::open(&self.cloud, &app.app)?))
    }
}

impl<C: FunctionService> Configurable for LambdaPlatform<C> {
    fn config_set(&self, app: &AppSource, var: &ConfigVar) -> DeployResult<()> {
        ConfigMutator::new(&self.cloud).set_var(&app.app, var)?;
        Ok(())
    }

    fn config_get(&self, app: &AppSource, name: &str) -> DeployResult<ConfigVar> {
        let value = ConfigMutator::new(&self.cloud).get_var(&app.app, name)?;
        Ok(ConfigVar::new(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambdeploy_cloud::LocalCloud;

    fn as_platform(p: &dyn Platform) -> &dyn Platform {
        p
    }

    fn as_configurable(c: &dyn Configurable) -> &dyn Configurable {
        c
    }

    #[test]
    fn lambda_platform_is_a_configurable_platform() {
        let platform = LambdaPlatform::new(
            LocalCloud::open_in_memory().unwrap(),
            DeployConfig::default(),
        );
        let _ = as_platform(&platform);
        let _ = as_configurable(&platform);
        assert_eq!(platform.config().handler, "app.handler");
    }

    #[test]
    fn config_get_before_deploy_is_a_cloud_error() {
        let platform = LambdaPlatform::new(
            LocalCloud::open_in_memory().unwrap(),
            DeployConfig::default(),
        );
        assert!(platform.config_get(&AppSource::new("api"), "A").is_err());
    }
}

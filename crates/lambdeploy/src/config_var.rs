//! Environment variable get/set on a deployed function.

use lambdeploy_cloud::{FunctionService, FunctionVersion};
use lambdeploy_core::ConfigVar;
use tracing::info;

use crate::error::{DeployError, DeployResult};

/// Read-modify-write access to a function's environment.
pub struct ConfigMutator<'a, F: ?Sized> {
    functions: &'a F,
}

impl<'a, F: FunctionService + ?Sized> ConfigMutator<'a, F> {
    pub fn new(functions: &'a F) -> Self {
        Self { functions }
    }

    /// Insert or overwrite one variable, keeping every other setting as
    /// it is, then publish a new version.
    pub fn set_var(&self, app: &str, var: &ConfigVar) -> DeployResult<FunctionVersion> {
        let current = self.functions.get_function(app)?;

        let mut settings = current.settings();
        let mut env = settings.environment.take().unwrap_or_default();
        if env.contains_key(&var.name) {
            info!(name = %var.name, "updating config variable");
        } else {
            info!(name = %var.name, "setting config variable");
        }
        env.insert(var.name.clone(), var.value.clone());
        settings.environment = Some(env);

        self.functions.update_function_configuration(app, &settings)?;
        let version = self.functions.publish_version(app, None)?;
        info!(arn = %version.function_arn, "created new function version");
        Ok(version)
    }

    /// Look up one variable. A function without the variable (or without
    /// any environment) yields [`DeployError::NoSuchVariable`].
    pub fn get_var(&self, app: &str, name: &str) -> DeployResult<String> {
        let current = self.functions.get_function(app)?;
        current
            .environment
            .as_ref()
            .and_then(|env| env.get(name))
            .cloned()
            .ok_or_else(|| DeployError::NoSuchVariable(name.to_string()))
    }
}

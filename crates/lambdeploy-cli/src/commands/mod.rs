pub mod config;
pub mod deploy;
pub mod logs;

use std::path::Path;

use anyhow::Context as _;
use lambdeploy::LambdaPlatform;
use lambdeploy_cloud::LocalCloud;
use lambdeploy_core::{AppSource, LambdeployConfig};
use tracing::debug;

/// Resolved configuration shared by every command.
pub struct Context {
    pub config: LambdeployConfig,
    pub app: AppSource,
}

impl Context {
    /// Read `path` if it exists, then apply the `--app` override.
    pub fn load(path: &Path, app: Option<&str>) -> anyhow::Result<Self> {
        let config = if path.exists() {
            LambdeployConfig::from_file(path)
                .with_context(|| format!("reading {}", path.display()))?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            LambdeployConfig::default()
        };

        let name = app
            .or(config.app_name())
            .context("no application name: pass --app or set [app].name")?
            .to_string();

        Ok(Self {
            config,
            app: AppSource::new(name),
        })
    }

    /// Open the local cloud state and wrap it as a platform.
    pub fn platform(&self) -> anyhow::Result<LambdaPlatform<LocalCloud>> {
        let cloud_config = &self.config.cloud;
        let parent = cloud_config.state_path.parent();
        if let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let cloud = LocalCloud::open(&cloud_config.state_path)?
            .with_identity(&cloud_config.region, &cloud_config.account_id);
        Ok(LambdaPlatform::new(cloud, self.config.deploy.clone()))
    }
}

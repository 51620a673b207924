//! lambdeploy.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ROLE_PREFIX: &str = "lambda";
pub const DEFAULT_HANDLER: &str = "app.handler";
pub const DEFAULT_TIMEOUT: u32 = 60;
pub const DEFAULT_MEMORY: u32 = 256;
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_ACCOUNT_ID: &str = "000000000000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LambdeployConfig {
    pub app: Option<AppConfig>,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub cloud: CloudConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
}

/// Settings applied to every function the deployer creates or updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Bucket holding uploaded packages and layer archives.
    pub bucket: String,
    pub role_prefix: String,
    pub handler: String,
    /// Seconds.
    pub timeout: u32,
    /// Megabytes.
    pub memory_size: u32,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            role_prefix: DEFAULT_ROLE_PREFIX.to_string(),
            handler: DEFAULT_HANDLER.to_string(),
            timeout: DEFAULT_TIMEOUT,
            memory_size: DEFAULT_MEMORY,
        }
    }
}

/// Where the local cloud emulator keeps its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub state_path: PathBuf,
    pub region: String,
    pub account_id: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(".lambdeploy/cloud.redb"),
            region: DEFAULT_REGION.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
        }
    }
}

impl LambdeployConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LambdeployConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Application name from `[app]`, if configured.
    pub fn app_name(&self) -> Option<&str> {
        self.app.as_ref().map(|a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let toml_str = r#"
[deploy]
bucket = "artifacts"
"#;
        let config: LambdeployConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.deploy.bucket, "artifacts");
        assert_eq!(config.deploy.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.deploy.memory_size, DEFAULT_MEMORY);
        assert_eq!(config.deploy.handler, "app.handler");
        assert_eq!(config.cloud.region, "us-west-2");
        assert!(config.app_name().is_none());
    }

    #[test]
    fn test_parse_full() {
        let toml_str = r#"
[app]
name = "billing"

[deploy]
bucket = "artifacts"
role_prefix = "svc"
timeout = 30
memory_size = 512

[cloud]
state_path = "/tmp/cloud.redb"
region = "eu-west-1"
"#;
        let config: LambdeployConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.app_name(), Some("billing"));
        assert_eq!(config.deploy.role_prefix, "svc");
        assert_eq!(config.deploy.timeout, 30);
        assert_eq!(config.deploy.memory_size, 512);
        assert_eq!(config.cloud.state_path, PathBuf::from("/tmp/cloud.redb"));
        assert_eq!(config.cloud.account_id, DEFAULT_ACCOUNT_ID);
    }

    #[test]
    fn test_from_file_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lambdeploy.toml");
        let mut config = LambdeployConfig::default();
        config.deploy.bucket = "b".to_string();
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = LambdeployConfig::from_file(&path).unwrap();
        assert_eq!(loaded.deploy, config.deploy);
    }
}

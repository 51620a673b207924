pub mod config;
pub mod digest;
pub mod types;

pub use config::{CloudConfig, DeployConfig, LambdeployConfig};
pub use digest::{code_sha256, code_sha256_bytes};
pub use types::*;

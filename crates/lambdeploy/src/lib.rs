//! lambdeploy: deploys a packaged application onto a function platform.
//!
//! The engine brings a remote function in line with a local build while
//! doing as little as possible:
//!
//! - **`role`**: find or create the application's execution role
//! - **`layer`**: content-addressed layer publishing (no re-upload of unchanged archives)
//! - **`reconciler`**: create-or-update of the function, then publish a version
//! - **`config_var`**: read-modify-write of a single environment variable
//! - **`logs`**: chronological, paginated reading across log streams
//! - **`platform`**: the capability traits the orchestrator drives
//!
//! Every remote call goes through the traits in [`lambdeploy_cloud::services`],
//! injected at construction time.

pub mod config_var;
pub mod error;
pub mod layer;
pub mod logs;
pub mod platform;
pub mod reconciler;
pub mod role;

pub use config_var::ConfigMutator;
pub use error::{DeployError, DeployResult};
pub use layer::{LayerCategory, LayerPublisher};
pub use logs::LogReader;
pub use platform::{Configurable, LambdaPlatform, LogViewer, Platform};
pub use reconciler::FunctionReconciler;
pub use role::{ResolvedRole, RoleProvisioner};

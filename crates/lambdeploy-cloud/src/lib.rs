//! lambdeploy-cloud: the remote services the deployer talks to.
//!
//! The deployer reaches four services through narrow traits defined in
//! [`services`]: roles, functions and layers, blob storage, and logs.
//! [`LocalCloud`] implements all four on top of
//! [redb](https://docs.rs/redb), mirroring the platform's observable
//! behavior: ARNs, monotonically assigned versions, base64 SHA-256 code
//! digests, and forward-token log pagination.
//!
//! # Architecture
//!
//! All records are JSON-serialized into redb's `&[u8]` value columns.
//! Composite keys (`{function}:{version}`, `{group}\0{stream}`) enable
//! prefix scans for related records. `LocalCloud` is `Clone` + `Send` +
//! `Sync` (backed by `Arc<Database>`).

pub mod error;
pub mod services;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{CloudError, CloudResult};
pub use services::{BlobStore, FunctionService, LogSource, RoleService};
pub use store::LocalCloud;
pub use types::*;

//! Environment variable get/set on a deployed function.

mod common;

use common::{Recorder, deploy_config, write_build};
use lambdeploy::{ConfigMutator, Configurable, DeployError, FunctionReconciler, LambdaPlatform};
use lambdeploy_cloud::FunctionService;
use lambdeploy_core::{AppSource, ConfigVar};

fn deployed(dir: &std::path::Path) -> Recorder {
    let cloud = Recorder::new();
    let config = deploy_config();
    FunctionReconciler::new(&cloud, &config)
        .reconcile(
            &AppSource::new("api"),
            &write_build(dir, "b1", b"app", b"pre", b"lib"),
        )
        .unwrap();
    cloud.reset();
    cloud
}

#[test]
fn set_merges_into_existing_environment() {
    let dir = tempfile::tempdir().unwrap();
    let cloud = deployed(dir.path());
    let before = cloud.inner.get_function("api").unwrap();
    let vars = ConfigMutator::new(&cloud);

    vars.set_var("api", &ConfigVar::new("A", "1")).unwrap();
    vars.set_var("api", &ConfigVar::new("B", "2")).unwrap();

    let after = cloud.inner.get_function("api").unwrap();
    let env = after.environment.clone().unwrap();
    assert_eq!(env.get("A").map(String::as_str), Some("1"));
    assert_eq!(env.get("B").map(String::as_str), Some("2"));

    assert_eq!(after.handler, before.handler);
    assert_eq!(after.role, before.role);
    assert_eq!(after.timeout, before.timeout);
    assert_eq!(after.memory_size, before.memory_size);
    assert_eq!(after.runtime, before.runtime);
    assert_eq!(after.layers, before.layers);
    assert_eq!(after.code_sha256, before.code_sha256);
}

#[test]
fn set_overwrites_and_publishes_each_time() {
    let dir = tempfile::tempdir().unwrap();
    let cloud = deployed(dir.path());
    let vars = ConfigMutator::new(&cloud);

    let v2 = vars.set_var("api", &ConfigVar::new("A", "1")).unwrap();
    let v3 = vars.set_var("api", &ConfigVar::new("A", "2")).unwrap();

    assert_eq!(vars.get_var("api", "A").unwrap(), "2");
    assert_eq!(v2.version + 1, v3.version);
    assert_eq!(cloud.count("update_function_configuration"), 2);
    assert_eq!(cloud.count("publish_version"), 2);
    assert_eq!(cloud.count("update_function_code"), 0);
}

#[test]
fn get_of_unset_variable_is_no_such_variable() {
    let dir = tempfile::tempdir().unwrap();
    let cloud = deployed(dir.path());
    let vars = ConfigMutator::new(&cloud);

    // No environment at all yet.
    let err = vars.get_var("api", "MISSING").unwrap_err();
    assert!(matches!(err, DeployError::NoSuchVariable(ref n) if n == "MISSING"));

    vars.set_var("api", &ConfigVar::new("A", "1")).unwrap();
    let err = vars.get_var("api", "MISSING").unwrap_err();
    assert!(matches!(err, DeployError::NoSuchVariable(_)));
}

#[test]
fn transport_failure_is_not_no_such_variable() {
    let dir = tempfile::tempdir().unwrap();
    let cloud = deployed(dir.path());
    cloud.fail_on("get_function");

    let err = ConfigMutator::new(&cloud).get_var("api", "A").unwrap_err();
    assert!(matches!(err, DeployError::Cloud(_)));
}

#[test]
fn redeploy_keeps_environment() {
    let dir = tempfile::tempdir().unwrap();
    let cloud = deployed(dir.path());
    ConfigMutator::new(&cloud)
        .set_var("api", &ConfigVar::new("A", "1"))
        .unwrap();

    let config = deploy_config();
    FunctionReconciler::new(&cloud, &config)
        .reconcile(
            &AppSource::new("api"),
            &write_build(dir.path(), "b2", b"app2", b"pre", b"lib2"),
        )
        .unwrap();

    assert_eq!(
        ConfigMutator::new(&cloud).get_var("api", "A").unwrap(),
        "1"
    );
}

#[test]
fn platform_config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let cloud = deployed(dir.path());
    let platform = LambdaPlatform::new(cloud, deploy_config());
    let app = AppSource::new("api");

    platform
        .config_set(&app, &ConfigVar::new("DATABASE_URL", "postgres://db"))
        .unwrap();
    let var = platform.config_get(&app, "DATABASE_URL").unwrap();
    assert_eq!(var, ConfigVar::new("DATABASE_URL", "postgres://db"));
}

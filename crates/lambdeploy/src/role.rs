//! Execution role provisioning.

use lambdeploy_cloud::RoleService;
use tracing::{info, warn};

use crate::error::DeployResult;

/// Trust policy letting the function platform assume the role.
pub const TRUST_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {
      "Effect": "Allow",
      "Principal": {
        "Service": "lambda.amazonaws.com"
      },
      "Action": "sts:AssumeRole"
    }
  ]
}"#;

/// Managed policy granting log write access.
pub const BASIC_EXECUTION_POLICY: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub name: String,
    pub arn: String,
}

/// Finds or creates an application's execution role.
///
/// A provisioner is meant to live for a single deployment run: the first
/// resolved role is cached and returned by later calls for the same app.
pub struct RoleProvisioner<'a, R: ?Sized> {
    roles: &'a R,
    prefix: &'a str,
    resolved: Option<ResolvedRole>,
}

impl<'a, R: RoleService + ?Sized> RoleProvisioner<'a, R> {
    pub fn new(roles: &'a R, prefix: &'a str) -> Self {
        Self {
            roles,
            prefix,
            resolved: None,
        }
    }

    pub fn role_name(&self, app: &str) -> String {
        format!("{}-{app}", self.prefix)
    }

    /// Return the role for `app`, creating and configuring it if absent.
    ///
    /// Any lookup failure counts as absence; a failed create or attach
    /// is returned unchanged.
    pub fn ensure_role(&mut self, app: &str) -> DeployResult<ResolvedRole> {
        let name = self.role_name(app);
        if let Some(cached) = self.resolved.as_ref().filter(|r| r.name == name) {
            return Ok(cached.clone());
        }

        info!(role_name = %name, "attempting to retrieve existing role");
        let resolved = match self.roles.get_role(&name) {
            Ok(role) => {
                info!(arn = %role.arn, "found existing role");
                ResolvedRole { name, arn: role.arn }
            }
            Err(e) => {
                if !e.is_not_found() {
                    warn!(role_name = %name, error = %e, "role lookup failed, treating as absent");
                }
                self.create(name)?
            }
        };

        self.resolved = Some(resolved.clone());
        Ok(resolved)
    }

    fn create(&self, name: String) -> DeployResult<ResolvedRole> {
        info!(role_name = %name, "creating new role");
        let role = self.roles.create_role(&name, TRUST_POLICY)?;
        info!(arn = %role.arn, "created new role");

        self.roles.attach_role_policy(&name, BASIC_EXECUTION_POLICY)?;
        info!("attached execution role policy");

        Ok(ResolvedRole {
            name,
            arn: role.arn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambdeploy_cloud::LocalCloud;

    #[test]
    fn creates_role_with_trust_and_policy() {
        let cloud = LocalCloud::open_in_memory().unwrap();
        let mut roles = RoleProvisioner::new(&cloud, "lambda");

        let role = roles.ensure_role("api").unwrap();
        assert_eq!(role.name, "lambda-api");

        let stored = cloud.get_role("lambda-api").unwrap();
        assert_eq!(stored.arn, role.arn);
        assert_eq!(stored.assume_role_policy_document, TRUST_POLICY);
        assert_eq!(stored.attached_policies, vec![BASIC_EXECUTION_POLICY.to_string()]);
    }

    #[test]
    fn second_provisioner_finds_existing_role() {
        let cloud = LocalCloud::open_in_memory().unwrap();
        let first = RoleProvisioner::new(&cloud, "lambda").ensure_role("api").unwrap();
        let second = RoleProvisioner::new(&cloud, "lambda").ensure_role("api").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cache_is_keyed_by_app() {
        let cloud = LocalCloud::open_in_memory().unwrap();
        let mut roles = RoleProvisioner::new(&cloud, "svc");
        let a = roles.ensure_role("a").unwrap();
        let b = roles.ensure_role("b").unwrap();
        assert_ne!(a.arn, b.arn);
        assert_eq!(b.name, "svc-b");
    }
}

//! Content-addressed layer publishing.
//!
//! A layer version is only published when no existing version of the
//! layer carries the same code digest as the local archive. Uploads and
//! publishes are the expensive part of a deploy, so the common case of
//! an unchanged dependency set costs a listing and a few lookups.

use std::fmt;
use std::fs::File;
use std::path::Path;

use lambdeploy_cloud::{
    BlobStore, FunctionService, LayerVersionSummary, ObjectLocation, PublishLayerRequest,
};
use lambdeploy_core::code_sha256;
use tracing::{debug, info, warn};

use crate::error::{DeployError, DeployResult};

/// The two layers every application deploys with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerCategory {
    /// Bootstrap and preprocessing artifacts.
    Pre,
    /// Library dependencies.
    Lib,
}

impl LayerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerCategory::Pre => "pre",
            LayerCategory::Lib => "lib",
        }
    }

    /// Remote layer name for an application, e.g. `api-lib`.
    pub fn layer_name(&self, app: &str) -> String {
        format!("{app}-{}", self.as_str())
    }
}

impl fmt::Display for LayerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blob key for a layer archive of a given build.
pub fn layer_object_key(app: &str, build_id: &str, category: LayerCategory) -> String {
    format!("{app}-{build_id}-{category}.zip")
}

/// Description attached to everything a build publishes.
pub fn build_description(app: &str, build_id: &str) -> String {
    format!("lambdeploy app {app} - {build_id}")
}

/// Publishes layer archives, reusing any version whose digest matches.
pub struct LayerPublisher<'a, C: ?Sized> {
    cloud: &'a C,
    bucket: &'a str,
}

impl<'a, C: FunctionService + BlobStore + ?Sized> LayerPublisher<'a, C> {
    pub fn new(cloud: &'a C, bucket: &'a str) -> Self {
        Self { cloud, bucket }
    }

    /// Return the ARN of a layer version holding the contents of `path`,
    /// publishing a new version only if none exists yet.
    pub fn publish(
        &self,
        category: LayerCategory,
        app: &str,
        build_id: &str,
        runtime: &str,
        path: &Path,
    ) -> DeployResult<String> {
        let sum = code_sha256(path).map_err(|source| DeployError::Digest {
            path: path.to_path_buf(),
            source,
        })?;
        let layer_name = category.layer_name(app);

        if let Some(arn) = self.find_existing(&layer_name, &sum)? {
            return Ok(arn);
        }

        let key = layer_object_key(app, build_id, category);
        self.ensure_uploaded(&key, path)?;

        let published = self
            .cloud
            .publish_layer_version(&PublishLayerRequest {
                layer_name: layer_name.clone(),
                description: build_description(app, build_id),
                content: ObjectLocation::new(self.bucket, key.as_str()),
                compatible_runtimes: vec![runtime.to_string()],
            })
            .map_err(|source| DeployError::PublishLayer {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            name = %layer_name,
            arn = %published.layer_version_arn,
            sha = %published.content.code_sha256,
            sha_local = %sum,
            "published layer"
        );
        Ok(published.layer_version_arn)
    }

    /// Scan every version of the layer, newest first, for a digest match.
    /// A failed listing counts as "no versions".
    fn find_existing(&self, layer_name: &str, sum: &str) -> DeployResult<Option<String>> {
        let listed = self.cloud.list_layer_versions(layer_name);
        let mut versions: Vec<LayerVersionSummary> = match listed {
            Ok(versions) => versions,
            Err(e) => {
                warn!(layer = %layer_name, error = %e, "unable to list layer versions");
                return Ok(None);
            }
        };
        versions.sort_by(|a, b| b.version.cmp(&a.version));

        for summary in versions {
            let detail = self.cloud.get_layer_version(layer_name, summary.version)?;
            if detail.content.code_sha256 == sum {
                info!(layer = %layer_name, version = summary.version, "found existing layer");
                return Ok(Some(detail.layer_version_arn));
            }
        }
        Ok(None)
    }

    /// Upload the archive unless an object already sits at `key`.
    fn ensure_uploaded(&self, key: &str, path: &Path) -> DeployResult<()> {
        match self.cloud.head_object(self.bucket, key) {
            Ok(meta) => {
                info!(key, etag = %meta.etag, "reusing existing key");
                return Ok(());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        upload_file(self.cloud, self.bucket, key, path)?;
        Ok(())
    }
}

/// Stream a local file into blob storage.
pub(crate) fn upload_file<B: BlobStore + ?Sized>(
    blobs: &B,
    bucket: &str,
    key: &str,
    path: &Path,
) -> DeployResult<()> {
    let artifact_err = |source| DeployError::Artifact {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(artifact_err)?;
    let size = file.metadata().map_err(artifact_err)?.len();

    info!(bucket, key, size, "uploading artifact");
    let meta = blobs.put_object(bucket, key, &mut file)?;
    debug!(key, etag = %meta.etag, "upload complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambdeploy_cloud::LocalCloud;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn names_and_keys() {
        assert_eq!(LayerCategory::Lib.layer_name("api"), "api-lib");
        assert_eq!(LayerCategory::Pre.layer_name("api"), "api-pre");
        assert_eq!(
            layer_object_key("api", "b1", LayerCategory::Pre),
            "api-b1-pre.zip"
        );
        assert_eq!(build_description("api", "b1"), "lambdeploy app api - b1");
    }

    #[test]
    fn first_publish_creates_version_one() {
        let dir = tempfile::tempdir().unwrap();
        let cloud = LocalCloud::open_in_memory().unwrap();
        let publisher = LayerPublisher::new(&cloud, "bucket");
        let path = write(dir.path(), "lib.zip", b"gems");

        let arn = publisher
            .publish(LayerCategory::Lib, "api", "b1", "ruby2.5", &path)
            .unwrap();
        assert!(arn.ends_with(":layer:api-lib:1"));

        let layer = cloud.get_layer_version("api-lib", 1).unwrap();
        assert_eq!(layer.compatible_runtimes, vec!["ruby2.5".to_string()]);
        assert_eq!(layer.description, "lambdeploy app api - b1");
        assert!(cloud.head_object("bucket", "api-b1-lib.zip").is_ok());
    }

    #[test]
    fn matching_digest_in_older_version_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let cloud = LocalCloud::open_in_memory().unwrap();
        let publisher = LayerPublisher::new(&cloud, "bucket");
        let v1 = write(dir.path(), "v1.zip", b"one");
        let v2 = write(dir.path(), "v2.zip", b"two");

        let first = publisher.publish(LayerCategory::Lib, "api", "b1", "rt", &v1).unwrap();
        publisher.publish(LayerCategory::Lib, "api", "b2", "rt", &v2).unwrap();
        let again = publisher.publish(LayerCategory::Lib, "api", "b3", "rt", &v1).unwrap();

        assert_eq!(first, again);
        assert_eq!(cloud.list_layer_versions("api-lib").unwrap().len(), 2);
        assert!(cloud.head_object("bucket", "api-b3-lib.zip").is_err());
    }

    #[test]
    fn existing_object_is_not_uploaded_again() {
        let dir = tempfile::tempdir().unwrap();
        let cloud = LocalCloud::open_in_memory().unwrap();
        cloud
            .put_object("bucket", "api-b1-pre.zip", &mut &b"already there"[..])
            .unwrap();
        let path = write(dir.path(), "pre.zip", b"local bytes");

        LayerPublisher::new(&cloud, "bucket")
            .publish(LayerCategory::Pre, "api", "b1", "rt", &path)
            .unwrap();

        // The layer is built from the object already in the bucket.
        let layer = cloud.get_layer_version("api-pre", 1).unwrap();
        assert_eq!(layer.content.code_size, b"already there".len() as u64);
    }

    #[test]
    fn missing_artifact_fails_before_any_remote_call() {
        let dir = tempfile::tempdir().unwrap();
        let cloud = LocalCloud::open_in_memory().unwrap();
        let err = LayerPublisher::new(&cloud, "bucket")
            .publish(LayerCategory::Lib, "api", "b1", "rt", &dir.path().join("missing.zip"))
            .unwrap_err();
        assert!(matches!(err, DeployError::Digest { .. }));
        assert!(cloud.list_layer_versions("api-lib").unwrap().is_empty());
    }
}

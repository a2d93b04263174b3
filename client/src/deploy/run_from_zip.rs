//! Run-from-zip deployment of a local directory

use std::path::Path;

use tracing::info;

use crate::deploy::identity::{site_version_path, DeploymentIdentity};
use crate::deploy::validator::PostDeployValidator;
use crate::encoding::TextEncoding;
use crate::errors::{ensure_not_blank, KuduError};
use crate::filesys::archive::ArchiveBuilder;
use crate::http::client::KuduClient;
use crate::vfs::path::RemotePath;

/// Marker file written into every run-from-zip package
pub const DEFAULT_VALIDATION_PATH: &str = "KuduClientZipRunFromDirectoryVersion.txt";

/// Options for [`KuduClient::zip_run_from_directory`]
#[derive(Debug, Clone)]
pub struct ZipRunOptions {
    /// Do not fetch the marker back after deploying
    pub skip_validation: bool,

    /// Archive entry name of the marker, also the URL path it is fetched from
    pub validation_relative_path: String,

    /// Value the marker must return, defaults to the package file name
    pub expected_value: Option<String>,
}

impl Default for ZipRunOptions {
    fn default() -> Self {
        Self {
            skip_validation: false,
            validation_relative_path: DEFAULT_VALIDATION_PATH.to_string(),
            expected_value: None,
        }
    }
}

impl ZipRunOptions {
    /// Defaults with validation disabled
    pub fn skip_validation() -> Self {
        Self {
            skip_validation: true,
            ..Default::default()
        }
    }
}

impl KuduClient {
    /// Deploy a local directory as a read-only run-from-zip package
    ///
    /// Zips `local_path` in memory with a marker entry holding the package
    /// name, uploads it under `d:/home/data/SitePackages`, points
    /// `siteversion.txt` at it and, unless skipped, fetches the marker
    /// through the site to confirm the new package is live. Returns the
    /// remote package path.
    ///
    /// Concurrent deployments to one site race on `siteversion.txt`.
    pub async fn zip_run_from_directory(
        &self,
        local_path: impl AsRef<Path>,
        options: &ZipRunOptions,
    ) -> Result<RemotePath, KuduError> {
        ensure_not_blank(&options.validation_relative_path, "validation_relative_path")?;
        if let Some(expected) = &options.expected_value {
            ensure_not_blank(expected, "expected_value")?;
        }

        let identity = DeploymentIdentity::generate(self.clock());
        let artifact_path = identity.artifact_path()?;
        let version_path = site_version_path()?;
        let marker_name = options
            .validation_relative_path
            .trim_start_matches('/')
            .to_string();

        info!(
            "Deploying {} as {}",
            local_path.as_ref().display(),
            artifact_path
        );

        let root = local_path.as_ref().to_path_buf();
        let marker = identity.file_name().to_string();
        let archive = tokio::task::spawn_blocking(move || {
            ensure_marker_free(&root, &marker_name)?;
            let mut builder = ArchiveBuilder::from_directory(root)?;
            builder.add_entry(&marker_name, &TextEncoding::Ascii.encode(&marker))?;
            builder.finish()
        })
        .await??;

        self.vfs_upload_bytes(archive.into_inner(), &artifact_path)
            .await?;
        self.vfs_upload_string(identity.file_name(), &version_path, TextEncoding::Utf8)
            .await?;
        info!("Pointed {} at {}", version_path, identity.file_name());

        let mut validator = PostDeployValidator::new(self);
        if options.skip_validation {
            validator.skip()?;
            return Ok(artifact_path);
        }

        let expected = options
            .expected_value
            .as_deref()
            .unwrap_or(identity.file_name());
        validator
            .validate(&options.validation_relative_path, expected)
            .await?;

        info!("Deployed {}", artifact_path);
        Ok(artifact_path)
    }
}

/// The marker entry must not collide with a file in the tree
fn ensure_marker_free(root: &Path, marker_name: &str) -> Result<(), KuduError> {
    let on_disk = root.join(marker_name);
    if root.is_dir() && on_disk.exists() {
        return Err(KuduError::UnsupportedOperation(format!(
            "{} already exists, it would collide with the validation marker {}",
            on_disk.display(),
            marker_name
        )));
    }
    Ok(())
}

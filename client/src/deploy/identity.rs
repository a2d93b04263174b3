//! Deployment identity for run-from-zip deployments

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::KuduError;
use crate::utils::Clock;
use crate::vfs::path::RemotePath;

/// Remote directory holding run-from-zip packages
pub const SITE_PACKAGES_PATH: &str = "d:/home/data/SitePackages";

/// Name of the file pointing at the active package
pub const SITE_VERSION_FILE: &str = "siteversion.txt";

/// Unique name of one deployed package, `<yyyyMMdd_HHmmss>_<32 hex>.zip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentIdentity {
    file_name: String,
}

impl DeploymentIdentity {
    pub fn new(timestamp: DateTime<Utc>, token: Uuid) -> Self {
        Self {
            file_name: format!("{}_{}.zip", timestamp.format("%Y%m%d_%H%M%S"), token.simple()),
        }
    }

    /// Fresh identity stamped with the clock's current time
    pub fn generate(clock: &dyn Clock) -> Self {
        Self::new(clock.now(), Uuid::new_v4())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Remote path the package is uploaded to
    pub fn artifact_path(&self) -> Result<RemotePath, KuduError> {
        RemotePath::directory(SITE_PACKAGES_PATH)?.join_file(&self.file_name)
    }
}

/// Remote path of the version pointer file
pub fn site_version_path() -> Result<RemotePath, KuduError> {
    RemotePath::directory(SITE_PACKAGES_PATH)?.join_file(SITE_VERSION_FILE)
}

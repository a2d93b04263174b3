//! Zip upload, download and deployment

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::KuduError;
use crate::filesys::archive::ArchiveBuilder;
use crate::filesys::file::File;
use crate::http::client::KuduClient;
use crate::vfs::path::{RemotePath, ZIP_DEPLOY_PATH};

impl KuduClient {
    /// Download a remote directory as a zip archive
    pub async fn zip_download_bytes(&self, remote_path: &RemotePath) -> Result<Vec<u8>, KuduError> {
        self.get_bytes(&remote_path.encode_zip()?).await
    }

    /// Download a remote directory to a local zip file
    pub async fn zip_download_file(
        &self,
        remote_path: &RemotePath,
        local_path: impl AsRef<Path>,
    ) -> Result<(), KuduError> {
        let bytes = self.zip_download_bytes(remote_path).await?;
        File::new(local_path.as_ref()).write_bytes(&bytes).await
    }

    /// Expand a zip archive into a remote directory
    pub async fn zip_upload_bytes(
        &self,
        bytes: Vec<u8>,
        remote_path: &RemotePath,
    ) -> Result<(), KuduError> {
        self.put_bytes(&remote_path.encode_zip()?, Some(bytes)).await
    }

    /// Expand a local zip file into a remote directory
    pub async fn zip_upload_file(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &RemotePath,
    ) -> Result<(), KuduError> {
        let encoded = remote_path.encode_zip()?;
        let bytes = File::new(local_path.as_ref()).read_bytes().await?;
        self.put_bytes(&encoded, Some(bytes)).await
    }

    /// Zip a local directory in memory and expand it into a remote directory
    pub async fn zip_upload_directory(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &RemotePath,
    ) -> Result<(), KuduError> {
        let encoded = remote_path.encode_zip()?;
        let archive = zip_directory(local_path.as_ref().to_path_buf()).await?;
        self.put_bytes(&encoded, Some(archive.into_inner())).await?;
        info!("Uploaded {} to {}", local_path.as_ref().display(), remote_path);
        Ok(())
    }

    /// Deploy a zip archive to the site root
    pub async fn zip_deploy_bytes(&self, bytes: Vec<u8>) -> Result<(), KuduError> {
        self.post_bytes(ZIP_DEPLOY_PATH, bytes).await
    }

    /// Deploy a local zip file to the site root
    pub async fn zip_deploy_file(&self, local_path: impl AsRef<Path>) -> Result<(), KuduError> {
        let bytes = File::new(local_path.as_ref()).read_bytes().await?;
        self.zip_deploy_bytes(bytes).await
    }

    /// Zip a local directory in memory and deploy it to the site root
    pub async fn zip_deploy_directory(&self, local_path: impl AsRef<Path>) -> Result<(), KuduError> {
        let archive = zip_directory(local_path.as_ref().to_path_buf()).await?;
        self.zip_deploy_bytes(archive.into_inner()).await?;
        info!("Deployed {}", local_path.as_ref().display());
        Ok(())
    }
}

/// Build an archive of `root` on the blocking pool
async fn zip_directory(root: PathBuf) -> Result<Cursor<Vec<u8>>, KuduError> {
    tokio::task::spawn_blocking(move || ArchiveBuilder::from_directory(root)?.finish()).await?
}

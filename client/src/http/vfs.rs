//! Virtual file system operations

use std::path::Path;

use tracing::info;

use crate::encoding::TextEncoding;
use crate::errors::KuduError;
use crate::filesys::file::File;
use crate::http::client::KuduClient;
use crate::models::vfs::{KuduVfs, VfsEntry};
use crate::vfs::path::RemotePath;

impl KuduClient {
    /// List a remote directory
    pub async fn vfs_list(&self, remote_path: &RemotePath) -> Result<KuduVfs, KuduError> {
        require_directory(remote_path)?;
        let entries: Vec<VfsEntry> = self.get_json(&remote_path.encode_vfs()).await?;
        Ok(KuduVfs::new(remote_path.clone(), entries))
    }

    /// Download a remote file into memory
    pub async fn vfs_download_bytes(&self, remote_path: &RemotePath) -> Result<Vec<u8>, KuduError> {
        require_file(remote_path)?;
        self.get_bytes(&remote_path.encode_vfs()).await
    }

    /// Download a remote file as text
    pub async fn vfs_download_string(
        &self,
        remote_path: &RemotePath,
        encoding: TextEncoding,
    ) -> Result<String, KuduError> {
        let bytes = self.vfs_download_bytes(remote_path).await?;
        Ok(encoding.decode(&bytes))
    }

    /// Download a remote file to a local file
    pub async fn vfs_download_file(
        &self,
        remote_path: &RemotePath,
        local_path: impl AsRef<Path>,
    ) -> Result<(), KuduError> {
        let bytes = self.vfs_download_bytes(remote_path).await?;
        File::new(local_path.as_ref()).write_bytes(&bytes).await?;
        info!("Downloaded {} to {}", remote_path, local_path.as_ref().display());
        Ok(())
    }

    /// Upload bytes to a remote file, replacing it
    pub async fn vfs_upload_bytes(
        &self,
        bytes: Vec<u8>,
        remote_path: &RemotePath,
    ) -> Result<(), KuduError> {
        require_file(remote_path)?;
        self.put_bytes(&remote_path.encode_vfs(), Some(bytes)).await
    }

    /// Upload text to a remote file, replacing it
    pub async fn vfs_upload_string(
        &self,
        text: &str,
        remote_path: &RemotePath,
        encoding: TextEncoding,
    ) -> Result<(), KuduError> {
        require_file(remote_path)?;
        self.put_string(&remote_path.encode_vfs(), text, encoding)
            .await
    }

    /// Upload a local file to a remote file
    pub async fn vfs_upload_file(
        &self,
        local_path: impl AsRef<Path>,
        remote_path: &RemotePath,
    ) -> Result<(), KuduError> {
        let bytes = File::new(local_path.as_ref()).read_bytes().await?;
        self.vfs_upload_bytes(bytes, remote_path).await?;
        info!("Uploaded {} to {}", local_path.as_ref().display(), remote_path);
        Ok(())
    }

    /// Create a remote directory
    pub async fn vfs_create_directory(&self, remote_path: &RemotePath) -> Result<(), KuduError> {
        require_directory(remote_path)?;
        self.put_bytes(&remote_path.encode_vfs(), None).await
    }

    /// Delete a remote file or empty directory
    pub async fn vfs_delete(&self, remote_path: &RemotePath) -> Result<(), KuduError> {
        self.delete(&remote_path.encode_vfs()).await
    }
}

fn require_file(remote_path: &RemotePath) -> Result<(), KuduError> {
    if remote_path.is_directory() {
        return Err(KuduError::UnsupportedOperation(format!(
            "expected a file path, got directory {remote_path}"
        )));
    }
    Ok(())
}

fn require_directory(remote_path: &RemotePath) -> Result<(), KuduError> {
    if !remote_path.is_directory() {
        return Err(KuduError::UnsupportedOperation(format!(
            "expected a directory path, got file {remote_path}"
        )));
    }
    Ok(())
}

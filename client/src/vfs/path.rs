//! Remote paths and their wire encodings

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::errors::KuduError;

/// Prefix of the virtual file system API
pub const VFS_API_PREFIX: &str = "/api/vfs/";
/// Prefix of the zip expand/download API
pub const ZIP_API_PREFIX: &str = "/api/zip/";
/// Whole-site zip deployment endpoint
pub const ZIP_DEPLOY_PATH: &str = "/api/zipdeploy";

/// Characters escaped in remote paths
const PATH_ESCAPE: &AsciiSet = &CONTROLS.add(b' ');

/// A logical path on the remote site, either file or directory shaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePath {
    File(String),
    Directory(String),
}

impl RemotePath {
    /// File-shaped remote path, e.g. `site/wwwroot/index.html`
    pub fn file(path: impl AsRef<str>) -> Result<Self, KuduError> {
        let path = normalize(path.as_ref());
        if path.trim_start_matches('/').is_empty() {
            return Err(KuduError::invalid_argument("remote file path"));
        }
        Ok(RemotePath::File(path))
    }

    /// Directory-shaped remote path, e.g. `site/wwwroot`
    pub fn directory(path: impl AsRef<str>) -> Result<Self, KuduError> {
        if path.as_ref().trim().is_empty() {
            return Err(KuduError::invalid_argument("remote directory path"));
        }
        Ok(RemotePath::Directory(normalize(path.as_ref())))
    }

    /// The logical path without trailing separator
    pub fn as_str(&self) -> &str {
        match self {
            RemotePath::File(path) | RemotePath::Directory(path) => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, RemotePath::Directory(_))
    }

    /// File named `name` inside this directory
    pub fn join_file(&self, name: &str) -> Result<RemotePath, KuduError> {
        match self {
            RemotePath::Directory(dir) if dir.is_empty() || dir == "/" => {
                RemotePath::file(format!("/{name}"))
            }
            RemotePath::Directory(dir) => RemotePath::file(format!("{dir}/{name}")),
            RemotePath::File(_) => Err(KuduError::UnsupportedOperation(format!(
                "cannot join {name} onto file path {self}"
            ))),
        }
    }

    /// Last path segment
    pub fn file_name(&self) -> &str {
        let path = self.as_str();
        path.rsplit('/').next().unwrap_or(path)
    }

    /// VFS wire path: trailing `/` iff directory shaped
    pub fn encode_vfs(&self) -> String {
        let mut encoded = format!("{VFS_API_PREFIX}{}", encode_segment(self.as_str()));
        if self.is_directory() && !encoded.ends_with('/') {
            encoded.push('/');
        }
        encoded
    }

    /// Zip wire path: always directory shaped
    pub fn encode_zip(&self) -> Result<String, KuduError> {
        if !self.is_directory() {
            return Err(KuduError::UnsupportedOperation(format!(
                "file paths are not supported by the zip API: {self}"
            )));
        }
        let mut encoded = format!("{ZIP_API_PREFIX}{}", encode_segment(self.as_str()));
        if !encoded.ends_with('/') {
            encoded.push('/');
        }
        Ok(encoded)
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward slashes only, no trailing separator (the root stays `/`)
fn normalize(path: &str) -> String {
    let path = path.trim().replace('\\', "/");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn encode_segment(path: &str) -> String {
    utf8_percent_encode(path.trim_start_matches('/'), PATH_ESCAPE).to_string()
}

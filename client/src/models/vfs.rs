//! Virtual file system listing models

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::vfs::path::RemotePath;

/// One entry of a VFS directory listing as returned by `/api/vfs/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VfsEntry {
    pub name: String,

    #[serde(default)]
    pub size: u64,

    /// Last modified
    pub mtime: DateTime<FixedOffset>,

    /// Created
    pub crtime: DateTime<FixedOffset>,

    #[serde(default)]
    pub mime: String,

    /// Absolute API URL of the entry, ends with `/` for directories
    pub href: String,

    /// Path on the remote host
    pub path: String,
}

impl VfsEntry {
    pub fn is_directory(&self) -> bool {
        self.href.ends_with('/')
    }

    pub fn is_file(&self) -> bool {
        !self.is_directory()
    }
}

/// A listed remote directory split into sub directories and files
#[derive(Debug, Clone)]
pub struct KuduVfs {
    /// The directory that was listed
    pub path: RemotePath,

    /// All entries in listing order
    pub entries: Vec<VfsEntry>,
}

impl KuduVfs {
    pub fn new(path: RemotePath, entries: Vec<VfsEntry>) -> Self {
        Self { path, entries }
    }

    pub fn directories(&self) -> impl Iterator<Item = &VfsEntry> {
        self.entries.iter().filter(|e| e.is_directory())
    }

    pub fn files(&self) -> impl Iterator<Item = &VfsEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }
}

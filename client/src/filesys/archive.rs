//! In-memory zip archives built from local directories

use std::fmt;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::KuduError;

/// Archive being built in memory
///
/// Created from a directory with [`ArchiveBuilder::from_directory`], which
/// writes every file below the root. Extra entries that do not exist on disk
/// can be appended with [`ArchiveBuilder::add_entry`] until
/// [`ArchiveBuilder::finish`] seals the archive.
pub struct ArchiveBuilder {
    root: PathBuf,
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    file_count: usize,
    bytes_in: u64,
}

impl fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("root", &self.root)
            .field("file_count", &self.file_count)
            .field("bytes_in", &self.bytes_in)
            .finish()
    }
}

impl ArchiveBuilder {
    /// Zip every file below `root`
    ///
    /// Entry names are paths relative to `root` joined with `/`. Symlinks
    /// are followed. Names that are not valid UTF-8 are rejected.
    pub fn from_directory(root: impl AsRef<Path>) -> Result<Self, KuduError> {
        let root = std::path::absolute(root.as_ref())?;
        if !root.is_dir() {
            return Err(KuduError::DirectoryNotFound(root));
        }

        let mut builder = Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            file_count: 0,
            bytes_in: 0,
            root,
        };

        info!("Zipping directory {}...", builder.root.display());

        let walker = WalkDir::new(&builder.root)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| KuduError::IoError(io::Error::from(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let entry_name = entry_name(&builder.root, entry.path())?;
            debug!("Zipping file {} to {}", entry.path().display(), entry_name);

            let mut input = std::fs::File::open(entry.path())?;
            builder.writer.start_file(entry_name, builder.options)?;
            let copied = io::copy(&mut input, &mut builder.writer)?;

            builder.file_count += 1;
            builder.bytes_in += copied;
        }

        Ok(builder)
    }

    /// Append an entry that does not exist on disk
    pub fn add_entry(&mut self, name: &str, contents: &[u8]) -> Result<(), KuduError> {
        debug!("Adding entry {} ({} bytes)", name, contents.len());
        self.writer.start_file(name, self.options)?;
        self.writer.write_all(contents)?;
        Ok(())
    }

    /// Number of files copied from disk
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Total uncompressed size of the files copied from disk
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Seal the archive and return it positioned at the start
    pub fn finish(self) -> Result<Cursor<Vec<u8>>, KuduError> {
        let mut output = self.writer.finish()?;
        output.set_position(0);

        info!(
            "Done zipping directory {} (Files: {}, InBytes: {}, OutBytes: {})",
            self.root.display(),
            self.file_count,
            self.bytes_in,
            output.get_ref().len()
        );

        Ok(output)
    }
}

/// Relative, slash-separated entry name for `path` below `root`
fn entry_name(root: &Path, path: &Path) -> Result<String, KuduError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        KuduError::Internal(format!(
            "{} is not below {}",
            path.display(),
            root.display()
        ))
    })?;

    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                KuduError::UnsupportedOperation(format!(
                    "file name is not valid UTF-8: {}",
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<&str>, KuduError>>()?;
    Ok(parts.join("/"))
}

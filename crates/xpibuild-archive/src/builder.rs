//! Archive creation utilities.
//!
//! The [`XpiBuilder`] snapshots a directory tree and writes it as a `.xpi`
//! archive, preserving relative paths the same way `zip -r <xpi> .` run from
//! the tree root would.

use crate::{ArchiveError, ArchiveResult};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for creating XPI archives from a directory tree.
///
/// # Example
///
/// ```no_run
/// use xpibuild_archive::XpiBuilder;
///
/// let builder = XpiBuilder::from_dir("build/zotero")?;
/// println!("{} entries", builder.len());
/// builder.write("build/zotero-build.xpi")?;
/// # Ok::<(), xpibuild_archive::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct XpiBuilder {
    entries: Vec<XpiEntry>,
}

/// A filesystem entry to include in the archive.
#[derive(Debug)]
struct XpiEntry {
    /// Path within the archive, `/`-separated and relative to the root.
    archive_path: String,
    /// Absolute path on disk.
    source: PathBuf,
    is_dir: bool,
}

impl XpiBuilder {
    /// Scan `root` recursively and record every file and directory beneath it.
    ///
    /// Entries are visited in file-name order so archives built from the same
    /// tree list their contents identically. Symlinks are followed.
    pub fn from_dir<P: AsRef<Path>>(root: P) -> ArchiveResult<Self> {
        let root = root.as_ref();

        if !root.is_dir() {
            return Err(ArchiveError::SourceNotFound(root.display().to_string()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| ArchiveError::InvalidPath(entry.path().display().to_string()))?;

            entries.push(XpiEntry {
                archive_path: archive_path(relative)?,
                source: entry.path().to_path_buf(),
                is_dir: entry.file_type().is_dir(),
            });
        }

        if entries.is_empty() {
            return Err(ArchiveError::EmptySource(root.display().to_string()));
        }

        Ok(Self { entries })
    }

    /// Number of entries (files and directories) that will be written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the builder holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive paths in write order.
    pub fn archive_paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.archive_path.as_str())
    }

    /// Write the archive to a file.
    pub fn write<P: AsRef<Path>>(self, output_path: P) -> ArchiveResult<()> {
        let output_path = output_path.as_ref();

        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in &self.entries {
            if entry.is_dir {
                zip.add_directory(entry.archive_path.as_str(), options)?;
                continue;
            }

            zip.start_file(entry.archive_path.as_str(), options)?;
            let mut source = File::open(&entry.source)?;
            io::copy(&mut source, &mut zip)?;
        }

        zip.finish()?;

        Ok(())
    }
}

/// Convert a relative filesystem path into a `/`-separated archive path.
fn archive_path(relative: &Path) -> ArchiveResult<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| ArchiveError::InvalidPath(relative.display().to_string()))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Compute SHA-1 hash of a file's raw bytes and return as lowercase hex string.
pub fn file_sha1<P: AsRef<Path>>(path: P) -> ArchiveResult<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

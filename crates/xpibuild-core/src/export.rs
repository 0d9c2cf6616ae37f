//! Clean export of a working copy
//!
//! Mirrors `rsync -a --exclude '.git*'`: every entry whose name starts with
//! `.git` is skipped together with everything beneath it.

use crate::{BuildError, BuildResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Directory that must be present in every exported tree
pub const CONTENT_DIR: &str = "chrome";

/// Copy `src_dir` into `dest_dir` without version control metadata.
///
/// `dest_dir` is created if needed. Fails when the copy lacks
/// [`CONTENT_DIR`], which means the export did not capture a real checkout.
pub fn export_tree(src_dir: &Path, dest_dir: &Path) -> BuildResult<()> {
    if !src_dir.is_dir() {
        return Err(BuildError::MissingDirectory(src_dir.to_path_buf()));
    }

    info!(
        "Exporting {} to {}",
        src_dir.display(),
        dest_dir.display()
    );
    fs::create_dir_all(dest_dir).map_err(|e| BuildError::io_at(dest_dir, e))?;

    let mut copied = 0usize;
    let walker = WalkDir::new(src_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_vcs_metadata(e));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|_| {
                BuildError::Io(std::io::Error::other(format!(
                    "{} is outside {}",
                    entry.path().display(),
                    src_dir.display()
                )))
            })?;
        let target = dest_dir.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::io_at(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| BuildError::io_at(entry.path(), e))?;
            copied += 1;
        }
    }
    debug!("Exported {copied} files");

    let content = dest_dir.join(CONTENT_DIR);
    if !content.is_dir() {
        return Err(BuildError::MissingDirectory(content));
    }

    Ok(())
}

fn is_vcs_metadata(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with(".git")
}

#[cfg(unix)]
fn copy_symlink(src: &Path, target: &Path) -> BuildResult<()> {
    let link = fs::read_link(src).map_err(|e| BuildError::io_at(src, e))?;
    std::os::unix::fs::symlink(&link, target).map_err(|e| BuildError::io_at(target, e))?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, target: &Path) -> BuildResult<()> {
    fs::copy(src, target).map_err(|e| BuildError::io_at(src, e))?;
    Ok(())
}

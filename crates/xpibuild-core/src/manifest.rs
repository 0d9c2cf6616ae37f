//! Install and update descriptor rewriting
//!
//! Both descriptors are treated as text. The only structure read from them is
//! the version number in front of the `.SOURCE` marker; everything else is
//! literal substitution.

use crate::{BuildConfig, BuildError, BuildResult};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Install descriptor at the tree root
pub const INSTALL_RDF: &str = "install.rdf";

/// Update descriptor at the tree root
pub const UPDATE_RDF: &str = "update.rdf";

/// Marker following the version number in both descriptors
pub const SOURCE_MARKER: &str = ".SOURCE";

/// Placeholder reference to the update descriptor in install.rdf
pub const UPDATE_RDF_PLACEHOLDER: &str = "update-source.rdf";

/// Placeholder reference to the package in update.rdf
pub const XPI_PLACEHOLDER: &str = "zotero.xpi";

/// Token the package digest is appended to in update.rdf
pub const CHECKSUM_PREFIX: &str = "sha1:";

#[allow(clippy::expect_used)] // Safe: the pattern is a literal
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"version>([0-9].+)\.SOURCE</").expect("valid version pattern"));

/// Find the version declared in install.rdf text, e.g. `4.0.1` in
/// `<em:version>4.0.1.SOURCE</em:version>`
pub fn extract_version(install_rdf: &str) -> Option<&str> {
    VERSION_PATTERN
        .captures(install_rdf)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Read the declared version from an install.rdf file
pub fn read_version(install_rdf: &Path) -> BuildResult<String> {
    let text = fs::read_to_string(install_rdf).map_err(|e| BuildError::io_at(install_rdf, e))?;
    extract_version(&text)
        .map(str::to_string)
        .ok_or_else(|| BuildError::VersionNotFound(install_rdf.to_path_buf()))
}

/// Text that replaces `.SOURCE`
///
/// Empty on the release channel; `-<channel>.r<revision>+<commit>` otherwise,
/// e.g. `-beta.r3+1a2b3c4`.
pub fn revision_suffix(config: &BuildConfig, revision: u64, commit: &str) -> String {
    if config.is_release() {
        String::new()
    } else {
        format!("-{}.r{revision}+{commit}", config.channel)
    }
}

/// Substitute the version suffix and update descriptor reference in install.rdf
pub fn rewrite_install_rdf(path: &Path, config: &BuildConfig, suffix: &str) -> BuildResult<()> {
    let update_ref = config.update_rdf_reference();
    rewrite_lines(path, |line| {
        line.replace(SOURCE_MARKER, suffix)
            .replace(UPDATE_RDF_PLACEHOLDER, &update_ref)
    })
}

/// Substitute the version suffix and package reference in update.rdf
pub fn rewrite_update_rdf(path: &Path, config: &BuildConfig, suffix: &str) -> BuildResult<()> {
    let xpi_ref = config.xpi_reference();
    rewrite_lines(path, |line| {
        line.replace(SOURCE_MARKER, suffix)
            .replace(XPI_PLACEHOLDER, &xpi_ref)
    })
}

/// Append `digest` directly after every `sha1:` token in update.rdf
pub fn inject_checksum(path: &Path, digest: &str) -> BuildResult<()> {
    let with_digest = format!("{CHECKSUM_PREFIX}{digest}");
    rewrite_lines(path, |line| line.replace(CHECKSUM_PREFIX, &with_digest))
}

/// Log a descriptor's contents at debug level
pub fn dump_descriptor(title: &str, path: &Path) {
    match fs::read_to_string(path) {
        Ok(text) => debug!("{title} {}:\n{text}", path.display()),
        Err(e) => debug!("{title} {}: unreadable ({e})", path.display()),
    }
}

/// Transform a text file line by line and replace it atomically.
///
/// Line terminators are passed to `transform` with their line and must be
/// returned unchanged. The original file is only replaced after the whole
/// output has been written.
pub fn rewrite_lines<F>(path: &Path, mut transform: F) -> BuildResult<()>
where
    F: FnMut(&str) -> String,
{
    if !path.is_file() {
        return Err(BuildError::MissingFile(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|e| BuildError::io_at(path, e))?;
    let mut output = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        output.push_str(&transform(line));
    }

    write_atomic(path, output.as_bytes())
}

/// Write `contents` to a temp file beside `path`, then rename it over `path`.
///
/// The temp file is deleted if anything fails before the rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> BuildResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| BuildError::io_at(dir, e))?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions())?;
    }

    tmp.persist(path)
        .map_err(|e| BuildError::io_at(path, e.error))?;
    Ok(())
}

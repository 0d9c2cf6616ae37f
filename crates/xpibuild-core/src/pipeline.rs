//! Build driver and artifact publication
//!
//! One call to [`run_build`] performs the whole build: sync the working copy,
//! export it to a scratch directory, transform the export, package it and
//! publish the results. The scratch directory is removed on every exit path;
//! nothing is published unless every step succeeded.

use crate::export::{CONTENT_DIR, export_tree};
use crate::locales::prune_csl_locales;
use crate::manifest::{
    INSTALL_RDF, UPDATE_RDF, dump_descriptor, inject_checksum, read_version, revision_suffix,
    rewrite_install_rdf, rewrite_update_rdf,
};
use crate::revision::RevisionCounter;
use crate::source::{SourceControl, fetch_source};
use crate::translators::{TRANSLATOR_INDEX_FILE, reindex_translators};
use crate::{BuildConfig, BuildError, BuildResult, PACKAGE_NAME};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use xpibuild_archive::{XpiBuilder, XpiReader, file_sha1};

/// Prefix of the per-invocation scratch directory
pub const SCRATCH_PREFIX: &str = "zotero-build";

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Version declared in install.rdf, without the marker
    pub version: String,

    /// Text that replaced `.SOURCE` (empty for release builds)
    pub revision_suffix: String,

    /// Development revision number, if one was assigned
    pub revision: Option<u64>,

    /// Number of translators packaged
    pub translators: usize,

    /// SHA-1 of the published package
    pub sha1: String,

    /// Published package
    pub xpi_path: PathBuf,

    /// Published update descriptor
    pub update_path: PathBuf,
}

/// Sources resolved before the scratch directory is created
struct Checkout<'a> {
    src_dir: &'a Path,
    version: &'a str,
    commit: &'a str,
}

/// Run a complete build.
pub fn run_build(config: &BuildConfig, vcs: &dyn SourceControl) -> BuildResult<BuildReport> {
    config.validate()?;

    let src_dir = fetch_source(config, vcs)?;
    let version = read_version(&src_dir.join(INSTALL_RDF))?;
    let commit = vcs.short_revision(&src_dir)?;
    info!("Building {PACKAGE_NAME} {version} ({commit}) on channel {}", config.channel);

    if !config.tmp_dir.is_dir() {
        return Err(BuildError::MissingDirectory(config.tmp_dir.clone()));
    }
    let scratch = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(&config.tmp_dir)
        .map_err(|e| BuildError::io_at(&config.tmp_dir, e))?;

    let checkout = Checkout {
        src_dir: &src_dir,
        version: &version,
        commit: &commit,
    };
    let report = build_in_scratch(config, &checkout, scratch.path())?;

    if let Err(e) = scratch.close() {
        warn!("Failed to remove scratch directory: {e}");
    }

    Ok(report)
}

fn build_in_scratch(
    config: &BuildConfig,
    checkout: &Checkout<'_>,
    scratch: &Path,
) -> BuildResult<BuildReport> {
    let tree = scratch.join(PACKAGE_NAME);
    export_tree(checkout.src_dir, &tree)?;

    prune_csl_locales(&tree)?;
    let index = reindex_translators(&tree)?;

    let install_rdf = tree.join(INSTALL_RDF);
    let update_rdf = tree.join(UPDATE_RDF);
    if !update_rdf.is_file() {
        return Err(BuildError::MissingFile(update_rdf));
    }
    dump_descriptor("Original", &install_rdf);
    dump_descriptor("Original", &update_rdf);

    let counter = if config.is_release() {
        None
    } else {
        Some(RevisionCounter::load(&config.build_dir, checkout.version)?)
    };
    let revision = counter.as_ref().map(RevisionCounter::revision);
    let suffix = revision_suffix(config, revision.unwrap_or_default(), checkout.commit);

    rewrite_install_rdf(&install_rdf, config, &suffix)?;
    rewrite_update_rdf(&update_rdf, config, &suffix)?;

    // update.rdf is published beside the package, not inside it
    let staged_update = scratch.join(UPDATE_RDF);
    fs::rename(&update_rdf, &staged_update).map_err(|e| BuildError::io_at(&update_rdf, e))?;

    let staged_xpi = scratch.join(config.output_xpi_name());
    let builder = XpiBuilder::from_dir(&tree)?;
    info!(
        "Creating {} ({} entries)",
        staged_xpi.display(),
        builder.len()
    );
    builder.write(&staged_xpi)?;
    XpiReader::open(&staged_xpi)?.require_files(&[
        INSTALL_RDF,
        CONTENT_DIR,
        TRANSLATOR_INDEX_FILE,
    ])?;

    let sha1 = file_sha1(&staged_xpi)?;
    inject_checksum(&staged_update, &sha1)?;

    dump_descriptor("Modified", &install_rdf);
    dump_descriptor("Modified", &staged_update);

    let (xpi_path, update_path) = publish(config, &staged_xpi, &staged_update)?;

    if let Some(counter) = &counter {
        counter.persist()?;
    }

    info!(
        "{} and {} saved to {}",
        config.output_xpi_name(),
        config.output_update_name(),
        config.build_dir.display()
    );

    Ok(BuildReport {
        version: checkout.version.to_string(),
        revision_suffix: suffix,
        revision,
        translators: index.len(),
        sha1,
        xpi_path,
        update_path,
    })
}

/// Move both artifacts into the build directory under their published names.
///
/// If the second move fails the first is undone.
fn publish(
    config: &BuildConfig,
    staged_xpi: &Path,
    staged_update: &Path,
) -> BuildResult<(PathBuf, PathBuf)> {
    let xpi_path = config.build_dir.join(config.output_xpi_name());
    let update_path = config.build_dir.join(config.output_update_name());

    move_file(staged_xpi, &xpi_path)?;
    if let Err(e) = move_file(staged_update, &update_path) {
        if let Err(cleanup) = fs::remove_file(&xpi_path) {
            warn!("Failed to remove {}: {cleanup}", xpi_path.display());
        }
        return Err(e);
    }

    Ok((xpi_path, update_path))
}

/// Rename, falling back to copy and delete when the scratch directory is on
/// another filesystem.
fn move_file(from: &Path, to: &Path) -> BuildResult<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).map_err(|e| BuildError::io_at(to, e))?;
    fs::remove_file(from).map_err(|e| BuildError::io_at(from, e))?;
    Ok(())
}

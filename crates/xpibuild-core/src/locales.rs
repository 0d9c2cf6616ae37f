//! CSL locale pruning

use crate::{BuildError, BuildResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// CSL locale subtree, relative to the tree root
pub const CSL_LOCALE_DIR: &str = "chrome/content/zotero/locale/csl";

/// Locale index kept alongside the XML locale files
pub const LOCALES_INDEX: &str = "locales.json";

/// Whether a file in the locale subtree survives pruning
pub fn is_kept_locale_file(name: &str) -> bool {
    name == LOCALES_INDEX || name.ends_with(".xml")
}

/// Delete everything under `<root>/chrome/content/zotero/locale/csl` except
/// `*.xml` files and `locales.json`.
///
/// Subdirectories are removed once empty; a directory still holding kept
/// files stays. Returns the number of entries removed.
pub fn prune_csl_locales(root: &Path) -> BuildResult<usize> {
    let locale_dir = root.join(CSL_LOCALE_DIR);
    if !locale_dir.is_dir() {
        return Err(BuildError::MissingDirectory(locale_dir));
    }

    info!("Deleting CSL locale support files");

    let mut removed = 0usize;
    for entry in WalkDir::new(&locale_dir).min_depth(1).contents_first(true) {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type().is_dir() {
            let is_empty = fs::read_dir(path)
                .map_err(|e| BuildError::io_at(path, e))?
                .next()
                .is_none();
            if is_empty {
                fs::remove_dir(path).map_err(|e| BuildError::io_at(path, e))?;
                debug!("{}", path.display());
                removed += 1;
            }
            continue;
        }

        if is_kept_locale_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        fs::remove_file(path).map_err(|e| BuildError::io_at(path, e))?;
        debug!("{}", path.display());
        removed += 1;
    }

    Ok(removed)
}

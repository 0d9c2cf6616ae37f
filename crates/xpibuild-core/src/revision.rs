//! Development build revision counter
//!
//! Each source version has its own counter in `<build_dir>/lastrev-<version>`.
//! The file is not locked; concurrent builds of the same version race.

use crate::manifest::write_atomic;
use crate::{BuildError, BuildResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const COUNTER_PREFIX: &str = "lastrev-";

/// Revision number for the current build of one source version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionCounter {
    path: PathBuf,
    revision: u64,
}

impl RevisionCounter {
    /// Counter file for `version`
    pub fn path_for(build_dir: &Path, version: &str) -> PathBuf {
        build_dir.join(format!("{COUNTER_PREFIX}{version}"))
    }

    /// Read the last persisted revision and claim the next one.
    ///
    /// The first build of a version gets revision 1. Nothing is written until
    /// [`persist`](Self::persist).
    pub fn load(build_dir: &Path, version: &str) -> BuildResult<Self> {
        let path = Self::path_for(build_dir, version);

        let last = match fs::read_to_string(&path) {
            Ok(content) => content.trim().parse::<u64>().map_err(|_| {
                BuildError::InvalidRevisionCounter {
                    path: path.clone(),
                    content: content.clone(),
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(BuildError::io_at(&path, e)),
        };

        debug!("Last revision for {version}: {last}");
        let Some(revision) = last.checked_add(1) else {
            return Err(BuildError::InvalidRevisionCounter {
                content: last.to_string(),
                path,
            });
        };
        Ok(Self { path, revision })
    }

    /// Revision number of this build
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record this build's revision so the next build continues from it
    pub fn persist(&self) -> BuildResult<()> {
        write_atomic(&self.path, self.revision.to_string().as_bytes())
    }
}

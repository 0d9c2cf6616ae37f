//! Error types for the build pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Error type for build operations
///
/// Every variant is fatal: the pipeline stops at the first error, removes
/// its scratch directory and publishes nothing.
#[derive(Error, Debug)]
pub enum BuildError {
    /// An expected directory is absent
    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// An expected file is absent
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// An external command could not be started
    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully
    #[error("`{command}` failed with exit code {}", describe_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// The install descriptor carries no `<version>.SOURCE` marker
    #[error("version number not found in {}", .0.display())]
    VersionNotFound(PathBuf),

    /// A translator file has no parseable metadata block
    #[error("invalid translator metadata in {}: {reason}", .path.display())]
    InvalidMetadata { path: PathBuf, reason: String },

    /// The persisted revision counter is not an integer
    #[error("invalid revision counter in {}: {content:?}", .path.display())]
    InvalidRevisionCounter { path: PathBuf, content: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error
    #[error("traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Archive error
    #[error("archive error: {0}")]
    Archive(#[from] xpibuild_archive::ArchiveError),
}

impl BuildError {
    /// Wrap an I/O error with the path it concerns
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        BuildError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl From<toml::de::Error> for BuildError {
    fn from(err: toml::de::Error) -> Self {
        BuildError::Config(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;

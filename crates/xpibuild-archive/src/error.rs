//! Error types for archive operations.

use thiserror::Error;

/// Errors that can occur during archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Source directory does not exist or is not a directory.
    #[error("Source directory not found: {0}")]
    SourceNotFound(String),

    /// Source directory has nothing to archive.
    #[error("Nothing to archive in {0}")]
    EmptySource(String),

    /// Path inside the source tree cannot be stored in the archive.
    #[error("Invalid archive path: {0}")]
    InvalidPath(String),

    /// Missing required file in archive.
    #[error("Missing required file: {0}")]
    MissingFile(String),
}

//! XPI archive format for xpibuild
//!
//! This crate provides types and utilities for creating and inspecting `.xpi`
//! packages - plain ZIP archives holding an extension tree rooted at the
//! directory that contains `install.rdf`.
//!
//! # Archive Structure
//!
//! ```text
//! zotero-build.xpi
//! ├── install.rdf
//! ├── chrome.manifest
//! ├── translators.json
//! ├── chrome/
//! │   └── content/...
//! └── translators/
//!     ├── 0.js
//!     └── 1.js
//! ```
//!
//! # Example
//!
//! ```no_run
//! use xpibuild_archive::{XpiBuilder, file_sha1};
//!
//! let builder = XpiBuilder::from_dir("/tmp/zotero-build/zotero")?;
//! builder.write("/tmp/zotero-build/zotero-build.xpi")?;
//!
//! let digest = file_sha1("/tmp/zotero-build/zotero-build.xpi")?;
//! println!("sha1:{digest}");
//! # Ok::<(), xpibuild_archive::ArchiveError>(())
//! ```

mod error;

pub mod builder;
pub mod reader;

pub use builder::{XpiBuilder, file_sha1};
pub use error::ArchiveError;
pub use reader::XpiReader;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Archive file extension.
pub const XPI_EXTENSION: &str = "xpi";

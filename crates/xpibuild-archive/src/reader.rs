//! Archive inspection utilities.
//!
//! The [`XpiReader`] opens a finished `.xpi` to verify what was packaged.

use crate::{ArchiveError, ArchiveResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Read-only view over an XPI archive.
///
/// # Example
///
/// ```no_run
/// use xpibuild_archive::XpiReader;
///
/// let mut reader = XpiReader::open("build/zotero-build.xpi")?;
/// let install_rdf = reader.read_file_string("install.rdf")?;
/// # Ok::<(), xpibuild_archive::ArchiveError>(())
/// ```
#[derive(Debug)]
pub struct XpiReader {
    archive: ZipArchive<File>,
}

impl XpiReader {
    /// Open an archive file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> ArchiveResult<Self> {
        let file = File::open(path.as_ref())?;
        let archive = ZipArchive::new(file)?;
        Ok(Self { archive })
    }

    /// List all entry names in the archive.
    #[must_use]
    pub fn list_files(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }

    /// Check if an entry exists in the archive.
    ///
    /// Directory entries are matched with or without their trailing `/`.
    #[must_use]
    pub fn has_file(&self, path: &str) -> bool {
        let dir_name = format!("{}/", path.trim_end_matches('/'));
        self.archive
            .file_names()
            .any(|name| name == path || name == dir_name)
    }

    /// Read an entry as UTF-8 text.
    pub fn read_file_string(&mut self, path: &str) -> ArchiveResult<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| ArchiveError::MissingFile(path.to_string()))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Fail unless every path in `required` is present.
    pub fn require_files(&self, required: &[&str]) -> ArchiveResult<()> {
        for path in required {
            if !self.has_file(path) {
                return Err(ArchiveError::MissingFile((*path).to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::XpiBuilder;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_xpi(temp_dir: &TempDir) -> PathBuf {
        let root = temp_dir.path().join("zotero");
        fs::create_dir_all(root.join("translators")).unwrap();
        fs::write(root.join("install.rdf"), "<em:version>4.0.1</em:version>").unwrap();
        fs::write(root.join("translators/0.js"), "{}\n").unwrap();

        let output = temp_dir.path().join("test.xpi");
        XpiBuilder::from_dir(&root).unwrap().write(&output).unwrap();
        output
    }

    #[test]
    fn XpiReader___open___nonexistent_file___returns_error() {
        let result = XpiReader::open("/nonexistent/test.xpi");

        assert!(result.is_err());
    }

    #[test]
    fn XpiReader___open___not_a_zip___returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bogus.xpi");
        fs::write(&path, b"not a zip file").unwrap();

        let result = XpiReader::open(&path);

        assert!(matches!(result, Err(ArchiveError::Zip(_))));
    }

    #[test]
    fn XpiReader___list_files___returns_all_entries() {
        let temp_dir = TempDir::new().unwrap();
        let reader = XpiReader::open(create_test_xpi(&temp_dir)).unwrap();

        let files = reader.list_files();

        assert_eq!(files.len(), 3);
        assert!(files.contains(&"install.rdf".to_string()));
        assert!(files.contains(&"translators/0.js".to_string()));
    }

    #[test]
    fn XpiReader___has_file___matches_directories_without_slash() {
        let temp_dir = TempDir::new().unwrap();
        let reader = XpiReader::open(create_test_xpi(&temp_dir)).unwrap();

        assert!(reader.has_file("translators"));
        assert!(reader.has_file("translators/"));
        assert!(!reader.has_file("chrome"));
    }

    #[test]
    fn XpiReader___read_file_string___returns_contents() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = XpiReader::open(create_test_xpi(&temp_dir)).unwrap();

        let contents = reader.read_file_string("install.rdf").unwrap();

        assert_eq!(contents, "<em:version>4.0.1</em:version>");
    }

    #[test]
    fn XpiReader___read_file_string___missing_file___returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut reader = XpiReader::open(create_test_xpi(&temp_dir)).unwrap();

        let result = reader.read_file_string("update.rdf");

        assert!(matches!(result, Err(ArchiveError::MissingFile(_))));
    }

    #[test]
    fn XpiReader___require_files___reports_first_missing() {
        let temp_dir = TempDir::new().unwrap();
        let reader = XpiReader::open(create_test_xpi(&temp_dir)).unwrap();

        assert!(reader.require_files(&["install.rdf", "translators"]).is_ok());

        let err = reader
            .require_files(&["install.rdf", "chrome"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required file: chrome");
    }
}

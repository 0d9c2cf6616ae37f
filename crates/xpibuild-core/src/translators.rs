//! Translator re-indexing
//!
//! Translators ship inside the XPI as `0.js`, `1.js`, ... together with a
//! `translators.json` lookup index, rather than under their descriptive file
//! names. Each translator starts with a JSON metadata header:
//!
//! ```text
//! {
//!     "translatorID": "b6e39b57-8942-4d11-8259-342c46ce395f",
//!     "label": "arXiv.org",
//!     "lastUpdated": "2013-01-20 10:14:26"
//! }
//!
//! function detectWeb(doc, url) { ... }
//! ```

use crate::{BuildError, BuildResult};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Translator directory, relative to the tree root
pub const TRANSLATORS_DIR: &str = "translators";

/// Index written to the tree root
pub const TRANSLATOR_INDEX_FILE: &str = "translators.json";

/// Deletion-tracking sidecar that is never renumbered
pub const DELETED_FILE: &str = "deleted.txt";

const TRANSLATOR_EXTENSION: &str = "js";

/// Identity fields read from a translator's metadata header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorMetadata {
    #[serde(rename = "translatorID")]
    pub translator_id: String,

    pub label: String,

    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl TranslatorMetadata {
    /// Parse the metadata header at the start of a translator's source
    pub fn parse(contents: &str) -> Result<Self, String> {
        let block = metadata_block(contents)?;
        serde_json::from_str(block).map_err(|e| e.to_string())
    }
}

/// Ordered mapping from numbered file name to translator metadata
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatorIndex {
    entries: Vec<(String, TranslatorMetadata)>,
}

impl TranslatorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next entry
    pub fn push(&mut self, file_name: String, metadata: TranslatorMetadata) {
        self.entries.push((file_name, metadata));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ordinal order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TranslatorMetadata)> {
        self.entries.iter().map(|(name, m)| (name.as_str(), m))
    }

    /// Write the index as JSON indented by one space, non-ASCII kept literal
    pub fn write_json<W: Write>(&self, writer: W) -> BuildResult<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }
}

impl Serialize for TranslatorIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, metadata) in &self.entries {
            map.serialize_entry(name, metadata)?;
        }
        map.end()
    }
}

/// Renumber `<root>/translators` and write `<root>/translators.json`.
///
/// Files are visited in case-insensitive name order and copied to a staging
/// directory as `<ordinal>.js`. The original directory is only replaced once
/// every translator has a valid metadata header; on error it is left as it
/// was. `deleted.txt`, if present, is moved to `root` instead of being
/// numbered.
pub fn reindex_translators(root: &Path) -> BuildResult<TranslatorIndex> {
    let translators_dir = root.join(TRANSLATORS_DIR);
    if !translators_dir.is_dir() {
        return Err(BuildError::MissingDirectory(translators_dir));
    }

    let sources = list_translators(&translators_dir)?;

    let staging = tempfile::Builder::new()
        .prefix(TRANSLATORS_DIR)
        .tempdir_in(root)
        .map_err(|e| BuildError::io_at(root, e))?;

    let mut index = TranslatorIndex::new();
    for (ordinal, (_, path)) in sources.iter().enumerate() {
        let numbered = format!("{ordinal}.{TRANSLATOR_EXTENSION}");

        let contents = fs::read_to_string(path).map_err(|e| BuildError::io_at(path, e))?;
        let metadata =
            TranslatorMetadata::parse(&contents).map_err(|reason| BuildError::InvalidMetadata {
                path: path.clone(),
                reason,
            })?;

        let target = staging.path().join(&numbered);
        fs::copy(path, &target).map_err(|e| BuildError::io_at(path, e))?;
        debug!("{} -> {numbered}", path.display());

        index.push(numbered, metadata);
    }

    let deleted = translators_dir.join(DELETED_FILE);
    if deleted.is_file() {
        let moved = root.join(DELETED_FILE);
        fs::rename(&deleted, &moved).map_err(|e| BuildError::io_at(&deleted, e))?;
    }

    let index_path = root.join(TRANSLATOR_INDEX_FILE);
    let file = File::create(&index_path).map_err(|e| BuildError::io_at(&index_path, e))?;
    let mut writer = BufWriter::new(file);
    index.write_json(&mut writer)?;
    writer.flush()?;

    fs::remove_dir_all(&translators_dir).map_err(|e| BuildError::io_at(&translators_dir, e))?;
    let staged = staging.keep();
    fs::rename(&staged, &translators_dir).map_err(|e| BuildError::io_at(&staged, e))?;

    info!("Re-indexed {} translators", index.len());
    Ok(index)
}

/// Regular files in the translator directory, sorted case-insensitively.
///
/// Names differing only in case are ordered by their exact spelling. Any
/// entry that does not resolve to a regular file is an error.
fn list_translators(dir: &Path) -> BuildResult<Vec<(String, PathBuf)>> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BuildError::io_at(dir, e))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == DELETED_FILE {
            continue;
        }
        let path = entry.path();
        // follows symlinks, which the exporter recreates as links
        let metadata = fs::metadata(&path).map_err(|e| BuildError::io_at(&path, e))?;
        if !metadata.is_file() {
            return Err(BuildError::InvalidMetadata {
                path,
                reason: "not a regular file".into(),
            });
        }
        sources.push((name, path));
    }
    sources.sort_by_cached_key(|(name, _)| (name.to_lowercase(), name.clone()));
    Ok(sources)
}

/// Locate the leading JSON object of a translator.
///
/// The block runs from the first non-whitespace character, which must be
/// `{`, to its matching `}`; braces inside string literals are ignored. The
/// closing brace must end its line.
fn metadata_block(contents: &str) -> Result<&str, String> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let body = contents.trim_start();
    if !body.starts_with('{') {
        return Err("metadata block not found".into());
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = i + c.len_utf8();
                    let rest = body[end..].trim_start_matches([' ', '\t']);
                    if rest.is_empty() || rest.starts_with(['\r', '\n']) {
                        return Ok(&body[..end]);
                    }
                    return Err("metadata block is not followed by a line break".into());
                }
            }
            _ => {}
        }
    }

    Err("metadata block is not terminated".into())
}

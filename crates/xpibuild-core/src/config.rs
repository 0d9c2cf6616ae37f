//! Build configuration types

use crate::{BuildError, BuildResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xpibuild_archive::XPI_EXTENSION;

/// Channel name that produces builds without a development revision tag
pub const RELEASE_CHANNEL: &str = "release";

/// Repository cloned when none is configured
pub const DEFAULT_REPO_URL: &str = "https://github.com/zotero/zotero";

/// Base name of the packaged extension and of its update descriptor reference
pub const PACKAGE_NAME: &str = "zotero";

/// Settings for one build invocation
///
/// Resolved once (defaults, then an optional TOML file, then command-line
/// overrides) and passed by reference to every pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Git branch or tag to build from
    pub branch: String,

    /// Release track; anything other than `release` gets a dev revision tag
    pub channel: String,

    /// Suffix of the XPI referenced in update.rdf
    pub xpi_suffix: String,

    /// Suffix of the update.rdf referenced in install.rdf
    pub rdf_suffix: String,

    /// Extra hosting directory prepended to both cross references
    pub xpi_dir: String,

    /// Suffix of the published artifacts
    pub build_suffix: String,

    /// Git URL to clone from
    pub repo_url: String,

    /// Parent of the per-invocation scratch directory
    pub tmp_dir: PathBuf,

    /// Persistent directory holding the working copy, revision counters and
    /// published artifacts
    pub build_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            branch: "master".to_string(),
            channel: RELEASE_CHANNEL.to_string(),
            xpi_suffix: "build".to_string(),
            rdf_suffix: String::new(),
            xpi_dir: String::new(),
            build_suffix: "build".to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            tmp_dir: std::env::temp_dir(),
            build_dir: PathBuf::from("build"),
        }
    }
}

impl BuildConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> BuildResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BuildError::io_at(path, e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> BuildResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> BuildResult<()> {
        if self.branch.trim().is_empty() {
            return Err(BuildError::Config("branch cannot be empty".into()));
        }

        if self.channel.trim().is_empty() {
            return Err(BuildError::Config("channel cannot be empty".into()));
        }

        if self.repo_url.trim().is_empty() {
            return Err(BuildError::Config("repository URL cannot be empty".into()));
        }

        for (name, value) in [
            ("xpi suffix", &self.xpi_suffix),
            ("rdf suffix", &self.rdf_suffix),
            ("build suffix", &self.build_suffix),
        ] {
            if value.contains(['/', '\\']) {
                return Err(BuildError::Config(format!(
                    "{name} cannot contain path separators: {value}"
                )));
            }
        }

        Ok(())
    }

    /// Whether this build is on the release channel
    pub fn is_release(&self) -> bool {
        self.channel == RELEASE_CHANNEL
    }

    /// Location of the git working copy
    pub fn source_dir(&self) -> PathBuf {
        self.build_dir.join(PACKAGE_NAME)
    }

    /// Reference to the update descriptor written into install.rdf
    ///
    /// `update-beta.rdf`, or `dev/update-beta.rdf` with a hosting directory.
    pub fn update_rdf_reference(&self) -> String {
        format!(
            "{}update{}.rdf",
            hosting_prefix(&self.xpi_dir),
            dashed(&self.rdf_suffix)
        )
    }

    /// Reference to the package written into update.rdf
    pub fn xpi_reference(&self) -> String {
        format!(
            "{}{PACKAGE_NAME}{}.{XPI_EXTENSION}",
            hosting_prefix(&self.xpi_dir),
            dashed(&self.xpi_suffix)
        )
    }

    /// File name of the published package
    pub fn output_xpi_name(&self) -> String {
        format!(
            "{PACKAGE_NAME}{}.{XPI_EXTENSION}",
            dashed(&self.build_suffix)
        )
    }

    /// File name of the published update descriptor
    pub fn output_update_name(&self) -> String {
        format!("update{}.rdf", dashed(&self.build_suffix))
    }
}

/// Command-line values that take precedence over file and default settings
#[derive(Debug, Clone, Default)]
pub struct BuildConfigOverrides {
    pub branch: Option<String>,
    pub channel: Option<String>,
    pub xpi_suffix: Option<String>,
    pub rdf_suffix: Option<String>,
    pub xpi_dir: Option<String>,
    pub build_suffix: Option<String>,
    pub repo_url: Option<String>,
    pub tmp_dir: Option<PathBuf>,
    pub build_dir: Option<PathBuf>,
}

impl BuildConfigOverrides {
    /// Apply every set override on top of `config`
    pub fn apply(self, mut config: BuildConfig) -> BuildConfig {
        if let Some(v) = self.branch {
            config.branch = v;
        }
        if let Some(v) = self.channel {
            config.channel = v;
        }
        if let Some(v) = self.xpi_suffix {
            config.xpi_suffix = v;
        }
        if let Some(v) = self.rdf_suffix {
            config.rdf_suffix = v;
        }
        if let Some(v) = self.xpi_dir {
            config.xpi_dir = v;
        }
        if let Some(v) = self.build_suffix {
            config.build_suffix = v;
        }
        if let Some(v) = self.repo_url {
            config.repo_url = v;
        }
        if let Some(v) = self.tmp_dir {
            config.tmp_dir = v;
        }
        if let Some(v) = self.build_dir {
            config.build_dir = v;
        }
        config
    }
}

/// `-suffix`, or nothing for an empty suffix
fn dashed(suffix: &str) -> String {
    if suffix.is_empty() {
        String::new()
    } else {
        format!("-{suffix}")
    }
}

fn hosting_prefix(dir: &str) -> String {
    if dir.is_empty() {
        String::new()
    } else {
        format!("{dir}/")
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;

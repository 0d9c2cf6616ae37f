//! Working copy management
//!
//! The git client is driven through its command line. Submodules always float
//! to the tip of their upstream branch rather than the commits pinned by the
//! superproject.

use crate::manifest::INSTALL_RDF;
use crate::{BuildConfig, BuildError, BuildResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Version control operations the pipeline depends on
pub trait SourceControl {
    /// Make `work_dir` a working copy of `repo_url` checked out at `branch`,
    /// with every submodule updated to its upstream tip.
    fn sync(&self, repo_url: &str, branch: &str, work_dir: &Path) -> BuildResult<()>;

    /// Abbreviated identifier of the checked-out commit
    fn short_revision(&self, work_dir: &Path) -> BuildResult<String>;
}

/// [`SourceControl`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    fn git(&self, work_dir: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(work_dir);
        cmd
    }
}

impl SourceControl for GitCli {
    fn sync(&self, repo_url: &str, branch: &str, work_dir: &Path) -> BuildResult<()> {
        if !work_dir.join(".git").exists() {
            info!("Cloning {} into {}", repo_url, work_dir.display());
            let mut clone = Command::new(&self.program);
            clone
                .arg("clone")
                .arg("--recursive")
                .arg(repo_url)
                .arg(work_dir);
            run_command(&mut clone)?;
        }

        run_command(&mut self.git(work_dir, &["checkout", branch]))?;
        run_command(&mut self.git(work_dir, &["pull"]))?;
        run_command(&mut self.git(work_dir, &["submodule", "init"]))?;
        run_command(&mut self.git(work_dir, &["submodule", "update"]))?;
        run_command(&mut self.git(
            work_dir,
            &["submodule", "foreach", "git pull origin master"],
        ))?;

        Ok(())
    }

    fn short_revision(&self, work_dir: &Path) -> BuildResult<String> {
        let output = capture_command(&mut self.git(work_dir, &["rev-parse", "--short", "HEAD"]))?;
        Ok(output.trim().to_string())
    }
}

/// Ensure the working copy exists, is synced, and holds an install descriptor.
///
/// Returns the working copy path.
pub fn fetch_source(config: &BuildConfig, vcs: &dyn SourceControl) -> BuildResult<PathBuf> {
    if !config.build_dir.is_dir() {
        return Err(BuildError::MissingDirectory(config.build_dir.clone()));
    }

    let src_dir = config.source_dir();
    if !src_dir.is_dir() {
        info!("{} does not exist -- creating", src_dir.display());
        std::fs::create_dir(&src_dir).map_err(|e| BuildError::io_at(&src_dir, e))?;
    }

    vcs.sync(&config.repo_url, &config.branch, &src_dir)?;

    if !src_dir.join(INSTALL_RDF).is_file() {
        return Err(BuildError::MissingFile(src_dir.join(INSTALL_RDF)));
    }

    Ok(src_dir)
}

/// Run a command with inherited stdio; a non-zero exit is an error.
pub fn run_command(cmd: &mut Command) -> BuildResult<()> {
    let command = describe(cmd);
    info!("$ {command}");

    let status = cmd.status().map_err(|source| BuildError::CommandSpawn {
        command: command.clone(),
        source,
    })?;

    if !status.success() {
        return Err(BuildError::CommandFailed {
            command,
            code: status.code(),
        });
    }

    Ok(())
}

/// Run a command and return its standard output.
pub fn capture_command(cmd: &mut Command) -> BuildResult<String> {
    let command = describe(cmd);

    let output = cmd.output().map_err(|source| BuildError::CommandSpawn {
        command: command.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(BuildError::CommandFailed {
            command,
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

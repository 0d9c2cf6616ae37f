//! xpibuild CLI - Build a Zotero XPI
//!
//! Syncs the Zotero working copy under `--build-dir`, transforms a clean
//! export of it and publishes `zotero<suffix>.xpi` and `update<suffix>.rdf`
//! next to the working copy.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use xpibuild_core::{BuildConfig, BuildConfigOverrides, GitCli, run_build};

mod logging;

const EXAMPLES: &str = "\
Example: xpibuild -b 4.0 -x 4.0.1
  - Builds from the 4.0 branch
  - Builds zotero-build.xpi and update-build.rdf in ./build
  - Points install.rdf to zotero.org/download/update.rdf
  - Points update-build.rdf to zotero.org/download/zotero-4.0.1.xpi

Example: xpibuild -b 4.0 -x 4.0b2 -r beta -c beta
  - Builds from the 4.0 branch with a beta revision tag
  - Points install.rdf to zotero.org/download/update-beta.rdf
  - Points update-build.rdf to zotero.org/download/zotero-4.0b2.xpi

Example: xpibuild -x trunk -r trunk --xpi-dir dev
  - Points install.rdf to zotero.org/download/dev/update-trunk.rdf
  - Points update-build.rdf to zotero.org/download/dev/zotero-trunk.xpi";

#[derive(Parser, Debug)]
#[command(name = "xpibuild")]
#[command(author, version, about = "Build a Zotero XPI", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Git branch or tag to build from [default: master]
    #[arg(short, long)]
    branch: Option<String>,

    /// Channel to add to dev build version numbers (e.g., "beta") [default: release]
    #[arg(short, long)]
    channel: Option<String>,

    /// Suffix of XPI referenced in update.rdf [default: build]
    #[arg(short = 'x', long, value_name = "SUFFIX")]
    xpi_suffix: Option<String>,

    /// Suffix of update.rdf file to reference in install.rdf (e.g., "beta" for "update-beta.rdf")
    #[arg(short = 'r', long, value_name = "SUFFIX")]
    rdf_suffix: Option<String>,

    /// Extra directory to point to when referencing the XPI in update.rdf
    #[arg(long, value_name = "DIR")]
    xpi_dir: Option<String>,

    /// Suffix of output XPI [default: build]
    #[arg(long, value_name = "SUFFIX")]
    build_suffix: Option<String>,

    /// Git URL to pull from [default: https://github.com/zotero/zotero]
    #[arg(long, value_name = "URL")]
    repo_url: Option<String>,

    /// Temp directory [default: system temp directory]
    #[arg(long, value_name = "DIR")]
    tmp_dir: Option<PathBuf>,

    /// Directory holding the working copy, revision counters and output [default: ./build]
    #[arg(long, value_name = "DIR")]
    build_dir: Option<PathBuf>,

    /// TOML file with default settings; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Resolve defaults, the optional config file and flags into one config
    fn resolve(self) -> Result<BuildConfig> {
        let base = match &self.config {
            Some(path) => BuildConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => BuildConfig::default(),
        };

        let overrides = BuildConfigOverrides {
            branch: self.branch,
            channel: self.channel,
            xpi_suffix: self.xpi_suffix,
            rdf_suffix: self.rdf_suffix,
            xpi_dir: self.xpi_dir,
            build_suffix: self.build_suffix,
            repo_url: self.repo_url,
            tmp_dir: self.tmp_dir,
            build_dir: self.build_dir,
        };

        let config = overrides.apply(base);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.resolve()?;
    let report = run_build(&config, &GitCli::new()).context("Build failed")?;

    println!();
    println!(
        "{} and {} saved to {}",
        config.output_xpi_name(),
        config.output_update_name(),
        config.build_dir.display()
    );
    println!("Version: {}{}", report.version, report.revision_suffix);
    println!("SHA-1: {}", report.sha1);

    Ok(())
}

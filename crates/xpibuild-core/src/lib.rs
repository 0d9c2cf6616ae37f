//! xpibuild-core - Source transformations and build pipeline for Zotero XPIs
//!
//! This crate provides the steps between a git checkout and a published
//! package:
//! - [`fetch_source`] / [`SourceControl`] to sync the working copy
//! - [`export_tree`] for a clean copy without version control metadata
//! - [`reindex_translators`] to renumber translators and build their index
//! - [`prune_csl_locales`] to strip CSL locale support files
//! - [`manifest`] rewriting of install.rdf and update.rdf
//! - [`RevisionCounter`] for development build numbering
//! - [`run_build`] to drive all of the above and publish the results

mod config;
mod error;

pub mod export;
pub mod locales;
pub mod manifest;
pub mod pipeline;
pub mod revision;
pub mod source;
pub mod translators;

pub use config::{
    BuildConfig, BuildConfigOverrides, DEFAULT_REPO_URL, PACKAGE_NAME, RELEASE_CHANNEL,
};
pub use error::{BuildError, BuildResult};
pub use export::export_tree;
pub use locales::prune_csl_locales;
pub use pipeline::{BuildReport, run_build};
pub use revision::RevisionCounter;
pub use source::{GitCli, SourceControl, fetch_source};
pub use translators::{TranslatorIndex, TranslatorMetadata, reindex_translators};

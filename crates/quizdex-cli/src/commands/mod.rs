//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::Result;

use quizdex_core::config::QuizdexConfig;
use quizdex_core::model::Catalog;
use quizdex_core::parser::load_catalogs;

pub mod facets;
pub mod init;
pub mod query;
pub mod suggest;
pub mod validate;

/// The catalog path from the command line, falling back to the config.
pub(crate) fn catalog_path(explicit: Option<PathBuf>, config: &QuizdexConfig) -> Result<PathBuf> {
    explicit.or_else(|| config.catalog.clone()).ok_or_else(|| {
        anyhow::anyhow!("no catalog given; pass --catalog or set `catalog` in quizdex.toml")
    })
}

/// Load the catalog at `path`, merging directories.
pub(crate) fn load(path: &Path) -> Result<Catalog> {
    let catalog = load_catalogs(path)?;
    tracing::debug!(quizzes = catalog.len(), "loaded {}", path.display());
    Ok(catalog)
}

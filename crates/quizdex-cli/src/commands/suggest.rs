//! The `quizdex suggest` command.

use std::path::PathBuf;

use anyhow::Result;

use quizdex_core::config::load_config_from;
use quizdex_core::search::suggest;

pub fn execute(
    term: String,
    catalog_path: Option<PathBuf>,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let limit = limit.unwrap_or(config.suggestion_limit);

    // Configured suggestions win; otherwise offer catalog titles.
    let candidates: Vec<String> = if config.suggestions.is_empty() {
        let path = super::catalog_path(catalog_path, &config)?;
        super::load(&path)?
            .quizzes
            .into_iter()
            .map(|q| q.title)
            .collect()
    } else {
        config.suggestions.clone()
    };

    let suggestions = suggest(&term, &candidates, limit);
    if suggestions.is_empty() {
        println!("No suggestions.");
    } else {
        for s in suggestions {
            println!("{s}");
        }
    }

    Ok(())
}

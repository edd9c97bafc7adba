//! The `quizdex query` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdex_core::config::load_config_from;
use quizdex_core::engine::{query, QueryResult};
use quizdex_core::model::{Facet, QueryState, SortKey};
use quizdex_core::report::QueryReport;

/// Arguments of `quizdex query`.
pub struct QueryArgs {
    pub catalog: Option<PathBuf>,
    pub search: String,
    pub language: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl QueryArgs {
    fn state(&self, default_sort: SortKey) -> QueryState {
        let mut state = QueryState::new().with_search(self.search.clone());
        let selections = [
            (Facet::Language, &self.language),
            (Facet::Difficulty, &self.difficulty),
            (Facet::Duration, &self.duration),
            (Facet::Category, &self.category),
        ];
        for (facet, raw) in selections {
            if let Some(raw) = raw {
                state.facets.select(facet, raw);
            }
        }
        state.sort = match &self.sort {
            Some(key) => key.parse().unwrap_or_default(),
            None => default_sort,
        };
        state
    }
}

pub fn execute(args: QueryArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let path = super::catalog_path(args.catalog.clone(), &config)?;
    let catalog = super::load(&path)?;

    let state = args.state(config.default_sort);
    if state.sort == SortKey::Unsorted {
        if let Some(raw) = &args.sort {
            tracing::warn!("unknown sort key '{raw}', keeping catalog order");
        }
    }

    let result = query(&catalog.quizzes, &state);

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "markdown" | "md" => {
            println!("{}", QueryReport::new(&catalog, &state, &result).to_markdown());
        }
        _ => {
            print_filters(&state);
            if result.total > 0 {
                println!("{}", results_table(&result));
            }
            println!("{}", result.summary());
            if result.total == 0 {
                println!("No quizzes found. Try adjusting your search or filters.");
            }
        }
    }

    if let Some(output) = &args.output {
        QueryReport::new(&catalog, &state, &result).save_json(output)?;
        eprintln!("Report saved to: {}", output.display());
    }

    Ok(())
}

fn print_filters(state: &QueryState) {
    let mut parts = Vec::new();
    if !state.search.trim().is_empty() {
        parts.push(format!("search \"{}\"", state.search));
    }
    let active = state.facets.active();
    for (facet, label) in &active {
        parts.push(format!("{facet}: {label}"));
    }
    if !parts.is_empty() {
        println!("Filters ({}): {}", active.len(), parts.join(", "));
    }
    println!("Sort: {}", state.sort.label());
}

fn results_table(result: &QueryResult<'_>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Language",
        "Difficulty",
        "Duration",
        "Category",
        "Rating",
        "Popularity",
        "Completion",
        "Created",
    ]);

    for quiz in &result.results {
        table.add_row(vec![
            Cell::new(&quiz.id),
            Cell::new(&quiz.title),
            Cell::new(&quiz.language),
            Cell::new(quiz.difficulty.label()),
            Cell::new(format!("{} min", quiz.duration_minutes)),
            Cell::new(&quiz.category),
            Cell::new(format!("{:.1}", quiz.rating)),
            Cell::new(quiz.popularity),
            Cell::new(format!("{:.0}%", quiz.completion_rate)),
            Cell::new(quiz.created_at.format("%Y-%m-%d")),
        ]);
    }

    table
}

//! Query reports with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::QueryResult;
use crate::model::{Catalog, QueryState, QuizRecord};
use crate::statistics::{catalog_stats, CatalogStats};

/// A snapshot of one query over one catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the catalog that was queried.
    pub catalog: CatalogSummary,
    /// The query that produced the results.
    pub state: QueryState,
    /// Number of matching quizzes.
    pub total: usize,
    /// Matching quizzes, in result order.
    pub results: Vec<QuizRecord>,
    /// Aggregates over the matching quizzes.
    pub stats: CatalogStats,
}

/// Summary of a catalog (without the quiz records).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub id: String,
    pub name: String,
    pub quiz_count: usize,
}

impl CatalogSummary {
    /// Summarize `catalog` without copying its quizzes.
    pub fn of(catalog: &Catalog) -> Self {
        Self {
            id: catalog.id.clone(),
            name: catalog.name.clone(),
            quiz_count: catalog.len(),
        }
    }
}

impl QueryReport {
    /// Capture a query result.
    pub fn new(catalog: &Catalog, state: &QueryState, result: &QueryResult<'_>) -> Self {
        Self {
            created_at: Utc::now(),
            catalog: CatalogSummary::of(catalog),
            state: state.clone(),
            total: result.total,
            results: result.to_owned_records(),
            stats: catalog_stats(result.results.iter().copied()),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QueryReport = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse report from {}", path.display()))?;
        Ok(report)
    }

    /// Format the report as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.catalog.name));

        let mut criteria = Vec::new();
        if !self.state.search.trim().is_empty() {
            criteria.push(format!("search \"{}\"", self.state.search));
        }
        for (facet, label) in self.state.facets.active() {
            criteria.push(format!("{facet}: {label}"));
        }
        if !criteria.is_empty() {
            md.push_str(&format!("**Filters:** {}\n\n", criteria.join(", ")));
        }
        md.push_str(&format!("**Sort:** {}\n\n", self.state.sort.label()));

        let noun = if self.total == 1 { "quiz" } else { "quizzes" };
        md.push_str(&format!(
            "**Summary:** {} of {} {noun}\n\n",
            self.total, self.catalog.quiz_count
        ));

        if !self.results.is_empty() {
            md.push_str("| Quiz | Language | Difficulty | Duration | Rating | Popularity |\n");
            md.push_str("|------|----------|------------|----------|--------|------------|\n");
            for q in &self.results {
                md.push_str(&format!(
                    "| {} | {} | {} | {} min | {:.1} | {} |\n",
                    escape_cell(&q.title),
                    escape_cell(&q.language),
                    q.difficulty.label(),
                    q.duration_minutes,
                    q.rating,
                    q.popularity
                ));
            }
        }

        md
    }
}

/// Escape `|` so a value stays inside one markdown table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

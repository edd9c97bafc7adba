//! The `quizdex facets` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdex_core::config::load_config_from;
use quizdex_core::model::Facet;
use quizdex_core::statistics::{catalog_stats, facet_counts};

pub fn execute(
    catalog_path: Option<PathBuf>,
    facet_filter: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let facets: Vec<Facet> = match &facet_filter {
        Some(name) => vec![name.parse()?],
        None => Facet::ALL.to_vec(),
    };

    let config = load_config_from(config_path.as_deref())?;
    let path = super::catalog_path(catalog_path, &config)?;
    let catalog = super::load(&path)?;

    let stats = catalog_stats(&catalog.quizzes);
    println!(
        "Catalog: {} ({} quizzes, avg rating {:.1}, avg completion {:.0}%)",
        catalog.name, stats.quiz_count, stats.avg_rating, stats.avg_completion_rate
    );

    for facet in facets {
        let mut table = Table::new();
        table.set_header(vec!["Value", "Label", "Quizzes"]);
        for count in facet_counts(&catalog.quizzes, facet) {
            table.add_row(vec![
                Cell::new(&count.value),
                Cell::new(&count.label),
                Cell::new(count.count),
            ]);
        }
        println!("\nFacet: {facet}");
        println!("{table}");
    }

    Ok(())
}

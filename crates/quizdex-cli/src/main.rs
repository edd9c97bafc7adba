//! quizdex CLI: search, filter and rank quiz catalogs from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizdex", version, about = "Quiz catalog search and filtering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, filter and sort a catalog
    Query {
        /// Path to a .toml/.json catalog or a directory of catalogs
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Free-text search over title, description and tags
        #[arg(long, default_value = "")]
        search: String,

        /// Language facet (e.g. "Spanish"), or "all"
        #[arg(long)]
        language: Option<String>,

        /// Difficulty facet: beginner, intermediate, advanced, expert, or "all"
        #[arg(long)]
        difficulty: Option<String>,

        /// Duration facet: short, medium, long, or "all"
        #[arg(long)]
        duration: Option<String>,

        /// Category facet (e.g. "grammar"), or "all"
        #[arg(long, alias = "topic")]
        category: Option<String>,

        /// Sort key: popularity, rating, difficulty, duration, newest, completion
        #[arg(long)]
        sort: Option<String>,

        /// Output format: table, json, markdown
        #[arg(long, default_value = "table")]
        format: String,

        /// Also save the result as a JSON report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show how many quizzes carry each facet value
    Facets {
        /// Path to a catalog file or directory
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only show one facet (language, difficulty, duration, category)
        #[arg(long)]
        facet: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Suggest searches for a partial term
    Suggest {
        /// The partial search term
        term: String,

        /// Path to a catalog file or directory
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate catalog files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create starter config and example catalog
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizdex=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Query {
            catalog,
            search,
            language,
            difficulty,
            duration,
            category,
            sort,
            format,
            output,
            config,
        } => commands::query::execute(commands::query::QueryArgs {
            catalog,
            search,
            language,
            difficulty,
            duration,
            category,
            sort,
            format,
            output,
            config,
        }),
        Commands::Facets {
            catalog,
            facet,
            config,
        } => commands::facets::execute(catalog, facet, config),
        Commands::Suggest {
            term,
            catalog,
            limit,
            config,
        } => commands::suggest::execute(term, catalog, limit, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

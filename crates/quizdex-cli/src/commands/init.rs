//! The `quizdex init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizdex.toml
    if std::path::Path::new("quizdex.toml").exists() {
        println!("quizdex.toml already exists, skipping.");
    } else {
        std::fs::write("quizdex.toml", SAMPLE_CONFIG)?;
        println!("Created quizdex.toml");
    }

    // Create example catalog
    std::fs::create_dir_all("catalogs")?;
    let example_path = std::path::Path::new("catalogs/example.toml");
    if example_path.exists() {
        println!("catalogs/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created catalogs/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your quizzes to catalogs/example.toml");
    println!("  2. Run: quizdex validate --catalog catalogs/example.toml");
    println!("  3. Run: quizdex query --search grammar --sort rating");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdex configuration

catalog = "catalogs"
default_sort = "popularity"
suggestion_limit = 5
suggestions = [
    "Spanish grammar",
    "French vocabulary",
    "German listening",
    "Italian conversation",
    "Japanese writing",
    "Chinese pronunciation",
    "English grammar",
    "Portuguese basics",
]
"#;

const EXAMPLE_CATALOG: &str = r#"[catalog]
id = "example"
name = "Example Catalog"
description = "A small catalog to get started"

[[quizzes]]
id = "spanish-grammar"
title = "Spanish Grammar Fundamentals"
description = "Verb conjugations, articles and sentence structure."
language = "Spanish"
difficulty = "beginner"
duration_minutes = 30
category = "grammar"
tags = ["verbs", "articles", "conjugation"]
popularity = 95
rating = 4.5
completion_rate = 85
created_at = "2024-01-15"

[[quizzes]]
id = "french-vocabulary"
title = "French Vocabulary Building"
description = "Everyday words and phrases used in common conversations."
language = "French"
difficulty = "intermediate"
duration_minutes = 25
category = "vocabulary"
tags = ["conversation", "daily-life", "phrases"]
popularity = 87
rating = 4.2
completion_rate = 72
created_at = "2024-02-01"
"#;

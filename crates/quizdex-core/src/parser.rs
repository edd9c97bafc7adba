//! Catalog file parser.
//!
//! Loads catalogs from TOML or JSON files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::CatalogError;
use crate::model::{next_version, Catalog, Difficulty, QuizRecord};

/// On-disk catalog encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(CatalogFormat::Toml),
            Some("json") => Some(CatalogFormat::Json),
            _ => None,
        }
    }
}

/// Intermediate structure shared by both encodings.
#[derive(Debug, Deserialize)]
struct RawCatalogFile {
    catalog: RawCatalogHeader,
    #[serde(default)]
    quizzes: Vec<RawQuiz>,
}

#[derive(Debug, Deserialize)]
struct RawCatalogHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawQuiz {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    language: String,
    difficulty: String,
    #[serde(default)]
    duration_minutes: u32,
    #[serde(default, alias = "topic")]
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, alias = "completions")]
    popularity: u64,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    student_ratings: Vec<u8>,
    #[serde(default)]
    completion_rate: f64,
    #[serde(default)]
    created_at: Option<String>,
}

impl RawQuiz {
    fn into_record(self) -> Result<QuizRecord, CatalogError> {
        let difficulty: Difficulty = self.difficulty.parse()?;

        let created_at = match &self.created_at {
            Some(value) => parse_timestamp(value).ok_or_else(|| CatalogError::InvalidTimestamp {
                id: self.id.clone(),
                value: value.clone(),
            })?,
            None => DateTime::<Utc>::default(),
        };

        let rating = match self.rating {
            Some(rating) => rating,
            None => average_rating(&self.id, &self.student_ratings)?,
        };

        Ok(QuizRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            language: self.language,
            difficulty,
            duration_minutes: self.duration_minutes,
            category: self.category,
            tags: self.tags,
            popularity: self.popularity,
            rating,
            completion_rate: self.completion_rate,
            created_at,
        })
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Mean of individual 1 to 5 student ratings; zero when there are none.
fn average_rating(id: &str, ratings: &[u8]) -> Result<f64, CatalogError> {
    if let Some(&bad) = ratings.iter().find(|r| !(1..=5).contains(*r)) {
        return Err(CatalogError::RatingOutOfRange {
            id: id.to_string(),
            rating: bad,
        });
    }
    if ratings.is_empty() {
        return Ok(0.0);
    }
    let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
    Ok(f64::from(sum) / ratings.len() as f64)
}

/// Parse a single catalog file. The format comes from the extension.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let format = CatalogFormat::from_path(path).with_context(|| {
        format!(
            "unsupported catalog format (expected .toml or .json): {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, format, path)
}

/// Parse catalog text (useful for testing).
pub fn parse_catalog_str(content: &str, format: CatalogFormat, source_path: &Path) -> Result<Catalog> {
    let parsed: RawCatalogFile = match format {
        CatalogFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        CatalogFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };

    let quizzes = parsed
        .quizzes
        .into_iter()
        .map(|q| {
            q.into_record()
                .with_context(|| format!("invalid quiz in {}", source_path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        catalog = %parsed.catalog.id,
        quizzes = quizzes.len(),
        "parsed catalog"
    );

    Ok(Catalog {
        id: parsed.catalog.id,
        name: parsed.catalog.name,
        description: parsed.catalog.description,
        quizzes,
        version: next_version(),
    })
}

/// Recursively load every `.toml`/`.json` catalog under a directory.
///
/// Files that fail to parse are skipped with a warning. Results are sorted by
/// path so the merged quiz order is stable across platforms.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let mut catalogs = Vec::new();
    for path in entries {
        if path.is_dir() {
            catalogs.extend(load_catalog_directory(&path)?);
        } else if CatalogFormat::from_path(&path).is_some() {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// Load a catalog file, or merge every catalog in a directory into one.
pub fn load_catalogs(path: &Path) -> Result<Catalog> {
    if !path.is_dir() {
        return parse_catalog(path);
    }

    let catalogs = load_catalog_directory(path)?;
    let mut merged = Catalog::new(
        path.display().to_string(),
        format!("{} catalog(s) from {}", catalogs.len(), path.display()),
        Vec::new(),
    );
    for catalog in catalogs {
        merged.merge(catalog);
    }
    Ok(merged)
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The quiz ID (if applicable).
    pub quiz_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common data issues.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalog.quizzes.is_empty() {
        warnings.push(ValidationWarning {
            quiz_id: None,
            message: "catalog has no quizzes".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for quiz in &catalog.quizzes {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                quiz_id: Some(quiz.id.clone()),
                message,
            })
        };

        if !seen_ids.insert(&quiz.id) {
            warn(format!("duplicate quiz ID: {}", quiz.id));
        }
        if quiz.title.trim().is_empty() {
            warn("title is empty".into());
        }
        if !(0.0..=5.0).contains(&quiz.rating) {
            warn(format!("rating {} is outside 0-5", quiz.rating));
        }
        if !(0.0..=100.0).contains(&quiz.completion_rate) {
            warn(format!(
                "completion rate {} is outside 0-100",
                quiz.completion_rate
            ));
        }
        if quiz.duration_minutes == 0 {
            warn("duration is zero minutes".into());
        }
    }

    warnings
}

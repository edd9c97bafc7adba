//! Core data model types for quizdex.
//!
//! These are the types the filter, matcher, ranker and engine share: quiz
//! records, the catalog that owns them, and the caller-owned query state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CatalogError;

/// A single quiz in the catalog. Read-only to the engine.
///
/// Numeric fields missing from a catalog file deserialize to zero and a
/// missing `created_at` becomes the Unix epoch, so such records sort last for
/// the descending keys and first for the ascending ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    /// Unique identifier.
    pub id: String,
    /// Display title (searched).
    pub title: String,
    /// Longer description (searched).
    #[serde(default)]
    pub description: String,
    /// Language taught, e.g. "Spanish".
    pub language: String,
    /// Difficulty level.
    pub difficulty: Difficulty,
    /// Expected time to complete, in minutes.
    #[serde(default)]
    pub duration_minutes: u32,
    /// Topic or category, e.g. "grammar".
    #[serde(default, alias = "topic")]
    pub category: String,
    /// Free-form tags (searched, not faceted).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Popularity score or completion count.
    #[serde(default, alias = "completions")]
    pub popularity: u64,
    /// Average rating in [0, 5].
    #[serde(default)]
    pub rating: f64,
    /// Completion rate as a percentage in [0, 100].
    #[serde(default)]
    pub completion_rate: f64,
    /// When the quiz was published.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl QuizRecord {
    /// The duration bucket this quiz falls into.
    pub fn duration_bucket(&self) -> DurationBucket {
        DurationBucket::from_minutes(self.duration_minutes)
    }
}

/// Quiz difficulty, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Position in the fixed beginner < intermediate < advanced < expert order.
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
            Difficulty::Expert => 4,
        }
    }

    /// Capitalized display name, e.g. "Beginner".
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(CatalogError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Longest duration, in minutes, that still counts as short.
pub const SHORT_MAX_MINUTES: u32 = 20;
/// Longest duration, in minutes, that still counts as medium.
pub const MEDIUM_MAX_MINUTES: u32 = 40;

/// Derived duration category used by the duration facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    /// Map a duration onto its bucket. Every value lands in exactly one
    /// bucket: `..=20` short, `21..=40` medium, `41..` long.
    pub fn from_minutes(minutes: u32) -> Self {
        if minutes <= SHORT_MAX_MINUTES {
            DurationBucket::Short
        } else if minutes <= MEDIUM_MAX_MINUTES {
            DurationBucket::Medium
        } else {
            DurationBucket::Long
        }
    }

    /// Display name including the minute range, e.g. "Short (≤20 min)".
    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::Short => "Short (≤20 min)",
            DurationBucket::Medium => "Medium (21-40 min)",
            DurationBucket::Long => "Long (>40 min)",
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationBucket::Short => write!(f, "short"),
            DurationBucket::Medium => write!(f, "medium"),
            DurationBucket::Long => write!(f, "long"),
        }
    }
}

impl FromStr for DurationBucket {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(DurationBucket::Short),
            "medium" => Ok(DurationBucket::Medium),
            "long" => Ok(DurationBucket::Long),
            _ => Err(CatalogError::UnknownDuration(s.to_string())),
        }
    }
}

/// A filterable attribute of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Language,
    Difficulty,
    Duration,
    Category,
}

impl Facet {
    /// Every facet, in display order.
    pub const ALL: [Facet; 4] = [
        Facet::Language,
        Facet::Difficulty,
        Facet::Duration,
        Facet::Category,
    ];
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::Language => write!(f, "language"),
            Facet::Difficulty => write!(f, "difficulty"),
            Facet::Duration => write!(f, "duration"),
            Facet::Category => write!(f, "category"),
        }
    }
}

impl FromStr for Facet {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "language" | "lang" => Ok(Facet::Language),
            "difficulty" | "level" => Ok(Facet::Difficulty),
            "duration" => Ok(Facet::Duration),
            "category" | "topic" => Ok(Facet::Category),
            _ => Err(CatalogError::UnknownFacet(s.to_string())),
        }
    }
}

/// The selected value of one facet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    /// No filter: admits every record.
    All,
    /// Admits records whose facet value equals this one.
    Only(T),
    /// Raw input that names no value of this facet. Admits nothing.
    Unmatched(String),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    /// Whether this selection admits every record.
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

/// Returns `true` for the inputs that mean "no filter": empty text and "all".
pub fn is_no_filter(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all")
}

fn parse_selection<T: FromStr>(raw: &str) -> Selection<T> {
    if is_no_filter(raw) {
        return Selection::All;
    }
    match raw.parse() {
        Ok(value) => Selection::Only(value),
        Err(_) => Selection::Unmatched(raw.to_string()),
    }
}

/// The active facet selections of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facets {
    #[serde(default)]
    pub language: Selection<String>,
    #[serde(default)]
    pub difficulty: Selection<Difficulty>,
    #[serde(default)]
    pub duration: Selection<DurationBucket>,
    #[serde(default)]
    pub category: Selection<String>,
}

impl Facets {
    /// Set a facet from raw user input. Empty text and "all" clear it.
    pub fn select(&mut self, facet: Facet, raw: &str) {
        match facet {
            Facet::Language => self.language = parse_selection(raw),
            Facet::Difficulty => self.difficulty = parse_selection(raw),
            Facet::Duration => self.duration = parse_selection(raw),
            Facet::Category => self.category = parse_selection(raw),
        }
    }

    /// Builder form of [`Facets::select`].
    pub fn with(mut self, facet: Facet, raw: &str) -> Self {
        self.select(facet, raw);
        self
    }

    /// Reset every facet to `All`.
    pub fn clear(&mut self) {
        *self = Facets::default();
    }

    /// Number of facets that currently filter.
    pub fn active_count(&self) -> usize {
        [
            self.language.is_all(),
            self.difficulty.is_all(),
            self.duration.is_all(),
            self.category.is_all(),
        ]
        .iter()
        .filter(|all| !**all)
        .count()
    }

    /// The filtering facets with a display label for each selection.
    pub fn active(&self) -> Vec<(Facet, String)> {
        fn label<T>(selection: &Selection<T>, show: impl Fn(&T) -> String) -> Option<String> {
            match selection {
                Selection::All => None,
                Selection::Only(value) => Some(show(value)),
                Selection::Unmatched(raw) => Some(raw.clone()),
            }
        }

        [
            (Facet::Language, label(&self.language, |v| v.clone())),
            (Facet::Difficulty, label(&self.difficulty, |d| d.label().to_string())),
            (Facet::Duration, label(&self.duration, |b| b.label().to_string())),
            (Facet::Category, label(&self.category, |v| v.clone())),
        ]
        .into_iter()
        .filter_map(|(facet, label)| label.map(|l| (facet, l)))
        .collect()
    }
}

/// Ordering strategy for query results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    Popularity,
    Rating,
    Difficulty,
    Duration,
    Newest,
    Completion,
    /// Keep the input order.
    #[default]
    Unsorted,
}

impl SortKey {
    /// Display name shown next to the results, e.g. "Most Popular".
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Popularity => "Most Popular",
            SortKey::Rating => "Highest Rated",
            SortKey::Difficulty => "Difficulty",
            SortKey::Duration => "Duration",
            SortKey::Newest => "Newest First",
            SortKey::Completion => "Completion Rate",
            SortKey::Unsorted => "Unsorted",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Popularity => write!(f, "popularity"),
            SortKey::Rating => write!(f, "rating"),
            SortKey::Difficulty => write!(f, "difficulty"),
            SortKey::Duration => write!(f, "duration"),
            SortKey::Newest => write!(f, "newest"),
            SortKey::Completion => write!(f, "completion"),
            SortKey::Unsorted => write!(f, "unsorted"),
        }
    }
}

/// Unknown keys parse to [`SortKey::Unsorted`] rather than failing.
impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "popularity" | "popular" => SortKey::Popularity,
            "rating" => SortKey::Rating,
            "difficulty" => SortKey::Difficulty,
            "duration" => SortKey::Duration,
            "newest" => SortKey::Newest,
            "completion" => SortKey::Completion,
            _ => SortKey::Unsorted,
        })
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(key) => key,
            Err(never) => match never {},
        }
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

/// Everything a caller passes to the engine for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryState {
    /// Free-text search term. Empty matches everything.
    #[serde(default)]
    pub search: String,
    /// Facet selections.
    #[serde(default)]
    pub facets: Facets,
    /// Result ordering.
    #[serde(default)]
    pub sort: SortKey,
}

impl QueryState {
    /// Empty search, every facet `All`, unsorted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Select a facet from raw input, as [`Facets::select`] does.
    pub fn with_facet(mut self, facet: Facet, raw: &str) -> Self {
        self.facets.select(facet, raw);
        self
    }

    /// Replace the sort key.
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// A named collection of quizzes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Unique identifier for this catalog.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this catalog.
    #[serde(default)]
    pub description: String,
    /// The quizzes, in source order.
    #[serde(default)]
    pub quizzes: Vec<QuizRecord>,
    /// Process-wide unique tag for the current contents of `quizzes`; keys
    /// the query cache. Call [`Catalog::bump_version`] after mutating `quizzes`.
    #[serde(skip, default = "next_version")]
    pub version: u64,
}

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// A catalog version that no other catalog in this process has held.
pub(crate) fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

impl Catalog {
    /// Create a catalog with a fresh version.
    pub fn new(id: impl Into<String>, name: impl Into<String>, quizzes: Vec<QuizRecord>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            quizzes,
            version: next_version(),
        }
    }

    /// Mark the quiz list as changed by moving to a fresh version.
    pub fn bump_version(&mut self) {
        self.version = next_version();
    }

    /// Append another catalog's quizzes to this one.
    pub fn merge(&mut self, other: Catalog) {
        self.quizzes.extend(other.quizzes);
        self.bump_version();
    }

    /// Number of quizzes.
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Beginner.to_string(), "beginner");
        assert_eq!("Beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!("EXPERT".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("master".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_order() {
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Intermediate < Difficulty::Advanced);
        assert!(Difficulty::Advanced < Difficulty::Expert);
        assert_eq!(Difficulty::Expert.rank(), 4);
    }

    #[test]
    fn duration_bucket_boundaries() {
        assert_eq!(DurationBucket::from_minutes(0), DurationBucket::Short);
        assert_eq!(DurationBucket::from_minutes(20), DurationBucket::Short);
        assert_eq!(DurationBucket::from_minutes(21), DurationBucket::Medium);
        assert_eq!(DurationBucket::from_minutes(40), DurationBucket::Medium);
        assert_eq!(DurationBucket::from_minutes(41), DurationBucket::Long);
        assert_eq!(DurationBucket::from_minutes(u32::MAX), DurationBucket::Long);
    }

    #[test]
    fn duration_buckets_partition() {
        for minutes in 0..=200 {
            let hits = [
                minutes <= 20,
                (21..=40).contains(&minutes),
                minutes > 40,
            ]
            .iter()
            .filter(|hit| **hit)
            .count();
            assert_eq!(hits, 1, "{minutes} minutes");
            let expected = if minutes <= 20 {
                DurationBucket::Short
            } else if minutes <= 40 {
                DurationBucket::Medium
            } else {
                DurationBucket::Long
            };
            assert_eq!(DurationBucket::from_minutes(minutes), expected);
        }
    }

    #[test]
    fn sort_key_parse_is_lenient() {
        assert_eq!("popularity".parse::<SortKey>().unwrap(), SortKey::Popularity);
        assert_eq!("Newest".parse::<SortKey>().unwrap(), SortKey::Newest);
        assert_eq!("alphabetical".parse::<SortKey>().unwrap(), SortKey::Unsorted);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::Unsorted);
        assert_eq!(SortKey::default(), SortKey::Unsorted);
    }

    #[test]
    fn sort_key_serde_uses_names() {
        let json = serde_json::to_string(&SortKey::Completion).unwrap();
        assert_eq!(json, "\"completion\"");
        let parsed: SortKey = serde_json::from_str("\"shuffle\"").unwrap();
        assert_eq!(parsed, SortKey::Unsorted);
    }

    #[test]
    fn facet_names() {
        assert_eq!("topic".parse::<Facet>().unwrap(), Facet::Category);
        assert_eq!("Language".parse::<Facet>().unwrap(), Facet::Language);
        assert!("color".parse::<Facet>().is_err());
    }

    #[test]
    fn empty_and_all_normalize_to_no_filter() {
        let mut facets = Facets::default();
        facets.select(Facet::Language, "");
        assert!(facets.language.is_all());
        facets.select(Facet::Language, "ALL");
        assert!(facets.language.is_all());
        facets.select(Facet::Difficulty, "  all ");
        assert!(facets.difficulty.is_all());
        assert_eq!(facets.active_count(), 0);
    }

    #[test]
    fn select_typed_and_unmatched() {
        let facets = Facets::default()
            .with(Facet::Difficulty, "Advanced")
            .with(Facet::Duration, "forever")
            .with(Facet::Language, "Spanish");
        assert_eq!(facets.difficulty, Selection::Only(Difficulty::Advanced));
        assert_eq!(facets.duration, Selection::Unmatched("forever".into()));
        assert_eq!(facets.language, Selection::Only("Spanish".into()));
        assert_eq!(facets.active_count(), 3);
    }

    #[test]
    fn active_labels_and_clear() {
        let mut facets = Facets::default()
            .with(Facet::Duration, "short")
            .with(Facet::Category, "grammar");
        assert_eq!(
            facets.active(),
            vec![
                (Facet::Duration, "Short (≤20 min)".to_string()),
                (Facet::Category, "grammar".to_string()),
            ]
        );
        facets.clear();
        assert!(facets.active().is_empty());
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let json = r#"{
            "id": "q1",
            "title": "Bare",
            "language": "French",
            "difficulty": "beginner"
        }"#;
        let record: QuizRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.duration_minutes, 0);
        assert_eq!(record.popularity, 0);
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.completion_rate, 0.0);
        assert_eq!(record.created_at.timestamp(), 0);
        assert_eq!(record.duration_bucket(), DurationBucket::Short);
    }

    #[test]
    fn catalog_merge_bumps_version() {
        let mut a = Catalog::new("a", "A", vec![]);
        let b = Catalog::new("b", "B", vec![]);
        let before = a.version;
        a.merge(b);
        assert_ne!(a.version, before);
        assert!(a.is_empty());
    }

    #[test]
    fn catalogs_never_share_a_version() {
        let a = Catalog::new("same", "Same", vec![]);
        let b = Catalog::new("same", "Same", vec![]);
        assert_ne!(a.version, b.version);

        let json = r#"{"id": "c", "name": "C"}"#;
        let c: Catalog = serde_json::from_str(json).unwrap();
        let d: Catalog = serde_json::from_str(json).unwrap();
        assert_ne!(c.version, d.version);
        assert_ne!(c.version, 0);
    }
}

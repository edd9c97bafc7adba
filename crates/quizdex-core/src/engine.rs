//! Query engine.
//!
//! Composes the facet filter, the text matcher and the ranker into one pure
//! function from `(records, state)` to an ordered view. The engine keeps no
//! state between calls; [`QueryCache`] is an optional memoization layer on top.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::filter::{filter_by_facets, matches_facets};
use crate::model::{Catalog, QueryState, QuizRecord};
use crate::rank::{rank, rank_by};
use crate::search::matches_search;

/// The ordered result of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult<'a> {
    /// Matching records, ordered by the query's sort key.
    pub results: Vec<&'a QuizRecord>,
    /// Number of matching records.
    pub total: usize,
}

impl<'a> QueryResult<'a> {
    fn new(results: Vec<&'a QuizRecord>) -> Self {
        let total = results.len();
        Self { results, total }
    }

    /// Human-readable count, e.g. "Showing 3 quizzes".
    pub fn summary(&self) -> String {
        let noun = if self.total == 1 { "quiz" } else { "quizzes" };
        format!("Showing {} {noun}", self.total)
    }

    /// Owned copies of the matching records.
    pub fn to_owned_records(&self) -> Vec<QuizRecord> {
        self.results.iter().map(|r| (*r).clone()).collect()
    }
}

/// Whether `record` passes both the facet filter and the search term.
pub fn is_match(record: &QuizRecord, state: &QueryState) -> bool {
    matches_facets(record, &state.facets) && matches_search(record, &state.search)
}

/// Run a query: filter by facets, then by search term, then rank.
///
/// Never mutates `records` and never fails.
pub fn query<'a>(records: &'a [QuizRecord], state: &QueryState) -> QueryResult<'a> {
    let by_facets = filter_by_facets(records, &state.facets);
    let after_facets = by_facets.len();

    let matched: Vec<&QuizRecord> = by_facets
        .into_iter()
        .filter(|r| matches_search(r, &state.search))
        .collect();

    tracing::debug!(
        total = records.len(),
        after_facets,
        after_search = matched.len(),
        sort = %state.sort,
        "query evaluated"
    );

    QueryResult::new(rank(matched, state.sort))
}

/// Default number of query states a [`QueryCache`] keeps per catalog version.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Memoizes query results per `(catalog version, state)`.
///
/// Stores record positions rather than references, so one cache can serve
/// successive versions of the same catalog. Catalog versions are unique per
/// process, so entries never leak between catalogs. Entries for an older
/// version are dropped as soon as another version is queried, and once
/// `capacity` states are cached the oldest entry is evicted first.
#[derive(Debug)]
pub struct QueryCache {
    version: Option<u64>,
    entries: HashMap<QueryState, Vec<usize>>,
    order: VecDeque<QueryState>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl QueryCache {
    /// A cache holding up to [`DEFAULT_CACHE_CAPACITY`] states.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding up to `capacity` states (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            version: None,
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Same result as [`query`] over `catalog.quizzes`.
    pub fn query<'a>(&mut self, catalog: &'a Catalog, state: &QueryState) -> QueryResult<'a> {
        if self.version != Some(catalog.version) {
            self.entries.clear();
            self.order.clear();
            self.version = Some(catalog.version);
        }

        let positions = match self.entries.get(state) {
            Some(positions) => {
                self.hits += 1;
                tracing::debug!(version = catalog.version, "query cache hit");
                positions.clone()
            }
            None => {
                self.misses += 1;
                tracing::debug!(version = catalog.version, "query cache miss");
                let positions = evaluate_positions(&catalog.quizzes, state);
                self.insert(state.clone(), positions.clone());
                positions
            }
        };

        QueryResult::new(
            positions
                .into_iter()
                .filter_map(|i| catalog.quizzes.get(i))
                .collect(),
        )
    }

    fn insert(&mut self, state: QueryState, positions: Vec<usize>) {
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(state.clone());
        self.entries.insert(state, positions);
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to evaluate the query.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of cached states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn evaluate_positions(records: &[QuizRecord], state: &QueryState) -> Vec<usize> {
    let mut matched: Vec<(usize, &QuizRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| is_match(r, state))
        .collect();
    rank_by(&mut matched, state.sort, |(_, r)| *r);
    matched.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Facet, SortKey};
    use chrono::{TimeZone, Utc};

    fn spanish() -> QuizRecord {
        QuizRecord {
            id: "es".into(),
            title: "Spanish Grammar".into(),
            description: String::new(),
            language: "Spanish".into(),
            difficulty: Difficulty::Beginner,
            duration_minutes: 15,
            category: "grammar".into(),
            tags: vec![],
            popularity: 100,
            rating: 4.5,
            completion_rate: 85.0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    fn french() -> QuizRecord {
        QuizRecord {
            id: "fr".into(),
            title: "French Vocabulary".into(),
            description: String::new(),
            language: "French".into(),
            difficulty: Difficulty::Intermediate,
            duration_minutes: 25,
            category: "vocabulary".into(),
            tags: vec![],
            popularity: 50,
            rating: 4.2,
            completion_rate: 72.0,
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn language_facet_with_popularity() {
        let records = vec![spanish(), french()];
        let state = QueryState::new()
            .with_facet(Facet::Language, "Spanish")
            .with_sort(SortKey::Popularity);
        let result = query(&records, &state);
        assert_eq!(result.total, 1);
        assert_eq!(result.results[0].id, "es");
    }

    #[test]
    fn search_with_newest() {
        let records = vec![spanish(), french()];
        let state = QueryState::new()
            .with_search("vocab")
            .with_sort(SortKey::Newest);
        let result = query(&records, &state);
        assert_eq!(result.total, 1);
        assert_eq!(result.results[0].id, "fr");
    }

    #[test]
    fn empty_state_returns_everything_in_order() {
        let records = vec![spanish(), french()];
        let result = query(&records, &QueryState::default());
        assert_eq!(result.total, 2);
        assert_eq!(result.results[0].id, "es");
        assert_eq!(result.results[1].id, "fr");
    }

    #[test]
    fn rank_runs_over_filtered_set() {
        let records = vec![spanish(), french()];
        let state = QueryState::new().with_sort(SortKey::Newest);
        let result = query(&records, &state);
        let ids: Vec<_> = result.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["fr", "es"]);
    }

    #[test]
    fn query_is_idempotent_and_leaves_input_alone() {
        let records = vec![spanish(), french()];
        let before = records.clone();
        let state = QueryState::new().with_sort(SortKey::Duration);
        let first = query(&records, &state);
        let second = query(&records, &state);
        assert_eq!(first, second);
        assert_eq!(records, before);
    }

    #[test]
    fn total_matches_results() {
        let records = vec![spanish(), french()];
        let state = QueryState::new().with_search("nothing matches this");
        let result = query(&records, &state);
        assert_eq!(result.total, 0);
        assert!(result.results.is_empty());
        assert_eq!(result.summary(), "Showing 0 quizzes");
    }

    #[test]
    fn summary_singular() {
        let records = vec![spanish()];
        assert_eq!(query(&records, &QueryState::default()).summary(), "Showing 1 quiz");
    }

    #[test]
    fn cache_matches_uncached_query() {
        let catalog = Catalog::new("c", "C", vec![spanish(), french()]);
        let mut cache = QueryCache::new();
        let state = QueryState::new().with_sort(SortKey::Rating);

        let cached = cache.query(&catalog, &state);
        assert_eq!(cached, query(&catalog.quizzes, &state));
        let again = cache.query(&catalog, &state);
        assert_eq!(again, cached);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn cache_invalidates_on_new_version() {
        let mut catalog = Catalog::new("c", "C", vec![spanish()]);
        let mut cache = QueryCache::new();
        let state = QueryState::default();

        assert_eq!(cache.query(&catalog, &state).total, 1);

        catalog.quizzes.push(french());
        catalog.bump_version();
        assert_eq!(cache.query(&catalog, &state).total, 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn one_cache_serves_two_catalogs() {
        let mut german = spanish();
        german.id = "b2".into();
        german.language = "German".into();
        let mut other_spanish = spanish();
        other_spanish.id = "b1".into();

        let a = Catalog::new("a", "A", vec![french(), spanish()]);
        let b = Catalog::new("b", "B", vec![other_spanish, german]);
        let state = QueryState::new().with_facet(Facet::Language, "Spanish");

        let ids = |result: QueryResult<'_>| -> Vec<String> {
            result.results.iter().map(|r| r.id.clone()).collect()
        };

        let mut cache = QueryCache::new();
        let from_a = ids(cache.query(&a, &state));
        let from_b = ids(cache.query(&b, &state));
        assert_eq!(from_a, vec!["es"]);
        assert_eq!(from_b, vec!["b1"]);
        assert_eq!(cache.query(&b, &state), query(&b.quizzes, &state));
    }

    #[test]
    fn cache_evicts_oldest_state_when_full() {
        let catalog = Catalog::new("c", "C", vec![spanish(), french()]);
        let mut cache = QueryCache::with_capacity(2);
        let first = QueryState::new().with_search("s");
        let second = QueryState::new().with_search("sp");
        let third = QueryState::new().with_search("spa");

        cache.query(&catalog, &first);
        cache.query(&catalog, &second);
        cache.query(&catalog, &third);
        assert_eq!(cache.len(), 2);

        // `second` survived, `first` was evicted.
        cache.query(&catalog, &second);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.query(&catalog, &first), query(&catalog.quizzes, &first));
        assert_eq!(cache.misses(), 4);
        assert_eq!(cache.len(), 2);
    }
}

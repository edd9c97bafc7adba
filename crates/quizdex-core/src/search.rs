//! Free-text matching and search suggestions.
//!
//! Matching is plain case-insensitive substring containment over the title,
//! the description and each tag. There is no tokenization and no fuzziness.

use crate::model::QuizRecord;

/// Default number of suggestions returned by [`suggest`].
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Shortest term, in characters, that produces suggestions.
const MIN_SUGGEST_CHARS: usize = 2;

/// Whether `record` matches the search `term`.
///
/// An empty or whitespace-only term matches every record. Otherwise the
/// lowercased term must occur in the lowercased title, description or any tag.
pub fn matches_search(record: &QuizRecord, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    contains_lower(&record.title, &needle)
        || contains_lower(&record.description, &needle)
        || record.tags.iter().any(|tag| contains_lower(tag, &needle))
}

fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Up to `limit` candidates that contain `term`, in candidate order.
///
/// Terms shorter than two characters yield no suggestions.
pub fn suggest<'a, S: AsRef<str>>(term: &str, candidates: &'a [S], limit: usize) -> Vec<&'a str> {
    if term.chars().count() < MIN_SUGGEST_CHARS {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    candidates
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|c| contains_lower(c, &needle))
        .take(limit)
        .collect()
}

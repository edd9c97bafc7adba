//! Facet filter.
//!
//! A record passes when every facet that is not `All` admits it. Language and
//! category compare with case-sensitive string equality, difficulty with enum
//! equality, and duration through the fixed [`DurationBucket`](crate::model::DurationBucket) mapping.

use crate::model::{Facets, QuizRecord, Selection};

/// Whether a single selection admits `value`.
pub fn admits<T: PartialEq>(selection: &Selection<T>, value: &T) -> bool {
    match selection {
        Selection::All => true,
        Selection::Only(selected) => selected == value,
        Selection::Unmatched(_) => false,
    }
}

/// Whether `record` satisfies all active facets. With no active facets every
/// record passes.
pub fn matches_facets(record: &QuizRecord, facets: &Facets) -> bool {
    admits(&facets.language, &record.language)
        && admits(&facets.difficulty, &record.difficulty)
        && admits(&facets.duration, &record.duration_bucket())
        && admits(&facets.category, &record.category)
}

/// Keep the records that satisfy `facets`, preserving their order.
pub fn filter_by_facets<'a, I>(records: I, facets: &Facets) -> Vec<&'a QuizRecord>
where
    I: IntoIterator<Item = &'a QuizRecord>,
{
    records
        .into_iter()
        .filter(|r| matches_facets(r, facets))
        .collect()
}

//! Result ordering.
//!
//! All orderings use the stable `slice::sort_by`, so records that compare
//! equal under the chosen key keep their input order.

use std::cmp::Ordering;

use crate::model::{QuizRecord, SortKey};

/// Compare two records under `key`. [`SortKey::Unsorted`] treats every pair
/// as equal.
pub fn compare(a: &QuizRecord, b: &QuizRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Popularity => b.popularity.cmp(&a.popularity),
        SortKey::Rating => b.rating.total_cmp(&a.rating),
        SortKey::Difficulty => a.difficulty.rank().cmp(&b.difficulty.rank()),
        SortKey::Duration => a.duration_minutes.cmp(&b.duration_minutes),
        SortKey::Newest => b.created_at.cmp(&a.created_at),
        SortKey::Completion => b.completion_rate.total_cmp(&a.completion_rate),
        SortKey::Unsorted => Ordering::Equal,
    }
}

/// Sort any slice whose items can be viewed as quiz records.
pub fn rank_by<T>(items: &mut [T], key: SortKey, record: impl Fn(&T) -> &QuizRecord) {
    if key == SortKey::Unsorted {
        return;
    }
    items.sort_by(|a, b| compare(record(a), record(b), key));
}

/// Return `records` ordered by `key`.
pub fn rank(mut records: Vec<&QuizRecord>, key: SortKey) -> Vec<&QuizRecord> {
    rank_by(&mut records, key, |r| *r);
    records
}

//! Facet counts and catalog-level aggregates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{Facet, QuizRecord};

/// Number of records sharing one facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    /// The facet value as it would be passed to a filter.
    pub value: String,
    /// Display label for the value.
    pub label: String,
    pub count: usize,
}

/// The value a record has for `facet`, in filter syntax.
pub fn facet_value(record: &QuizRecord, facet: Facet) -> String {
    match facet {
        Facet::Language => record.language.clone(),
        Facet::Difficulty => record.difficulty.to_string(),
        Facet::Duration => record.duration_bucket().to_string(),
        Facet::Category => record.category.clone(),
    }
}

fn facet_label(record: &QuizRecord, facet: Facet) -> String {
    match facet {
        Facet::Difficulty => record.difficulty.label().to_string(),
        Facet::Duration => record.duration_bucket().label().to_string(),
        Facet::Language | Facet::Category => facet_value(record, facet),
    }
}

/// Count records per distinct value of `facet`, most common first, ties by value.
pub fn facet_counts<'a, I>(records: I, facet: Facet) -> Vec<FacetCount>
where
    I: IntoIterator<Item = &'a QuizRecord>,
{
    let mut counts: HashMap<String, FacetCount> = HashMap::new();
    for record in records {
        let value = facet_value(record, facet);
        counts
            .entry(value.clone())
            .or_insert_with(|| FacetCount {
                value,
                label: facet_label(record, facet),
                count: 0,
            })
            .count += 1;
    }

    let mut counts: Vec<FacetCount> = counts.into_values().collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

/// Aggregates over a set of quizzes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub quiz_count: usize,
    /// Mean rating; zero for an empty set.
    pub avg_rating: f64,
    /// Mean completion rate; zero for an empty set.
    pub avg_completion_rate: f64,
    pub total_popularity: u64,
    /// Mean duration in minutes; zero for an empty set.
    pub avg_duration_minutes: f64,
}

/// Compute [`CatalogStats`] over `records`.
pub fn catalog_stats<'a, I>(records: I) -> CatalogStats
where
    I: IntoIterator<Item = &'a QuizRecord>,
{
    let mut quiz_count = 0usize;
    let mut rating_sum = 0.0;
    let mut completion_sum = 0.0;
    let mut duration_sum = 0u64;
    let mut total_popularity = 0u64;

    for record in records {
        quiz_count += 1;
        rating_sum += record.rating;
        completion_sum += record.completion_rate;
        duration_sum += u64::from(record.duration_minutes);
        total_popularity = total_popularity.saturating_add(record.popularity);
    }

    let mean = |sum: f64| {
        if quiz_count == 0 {
            0.0
        } else {
            sum / quiz_count as f64
        }
    };

    CatalogStats {
        quiz_count,
        avg_rating: mean(rating_sum),
        avg_completion_rate: mean(completion_sum),
        total_popularity,
        avg_duration_minutes: mean(duration_sum as f64),
    }
}

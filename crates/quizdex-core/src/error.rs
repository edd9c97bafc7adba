//! Catalog error types.
//!
//! These errors describe catalog data that cannot be interpreted. They are
//! raised while parsing catalog files or user-supplied facet names, never by
//! the query engine itself.

use thiserror::Error;

/// Errors that can occur when interpreting catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A difficulty value outside beginner/intermediate/advanced/expert.
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// A duration bucket other than short/medium/long.
    #[error("unknown duration bucket: {0}")]
    UnknownDuration(String),

    /// A facet name that the filter does not know about.
    #[error("unknown facet: {0}")]
    UnknownFacet(String),

    /// A creation timestamp that is neither RFC 3339 nor `YYYY-MM-DD`.
    #[error("invalid timestamp for quiz {id}: {value}")]
    InvalidTimestamp { id: String, value: String },

    /// A student rating outside 1..=5.
    #[error("student rating out of range for quiz {id}: {rating}")]
    RatingOutOfRange { id: String, rating: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CatalogError::UnknownDifficulty("master".into()).to_string(),
            "unknown difficulty: master"
        );
        assert_eq!(
            CatalogError::InvalidTimestamp {
                id: "q1".into(),
                value: "yesterday".into()
            }
            .to_string(),
            "invalid timestamp for quiz q1: yesterday"
        );
    }
}

//! quizdex-core: quiz catalog filtering, search and ranking.
//!
//! This crate defines the quiz data model, the facet filter, the text
//! matcher, the ranker and the query engine that composes them, plus catalog
//! loading and the configuration shared by the `quizdex` CLI.

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod rank;
pub mod report;
pub mod search;
pub mod statistics;

//! Pair Match - outfit pairing service
//!
//! Given two shoppers' joint preferences this library proposes ranked
//! two-item bundles from a product catalog. Ranking is a pure pipeline in
//! [`core`]; [`services`] adds catalog access and persistence of each run.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{budget_fit, style_similarity, Matcher, MatchResult};
pub use models::{MatchBundlesRequest, MatchBundlesResponse, MatchCriteria, PairBundle, Product, ScoringWeights};
pub use services::{InMemoryStore, MatchError, MatchService};

// Core algorithm exports
pub mod budget;
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod similarity;

pub use budget::budget_fit;
pub use filters::{is_eligible, pair_filter, sizes_available};
pub use matcher::{Matcher, MatchResult, MAX_BUNDLES};
pub use scoring::{build_reason, score_pair, PairScore};
pub use similarity::style_similarity;

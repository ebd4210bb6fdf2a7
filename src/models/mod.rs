// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BundleCandidate, GenderLabel, MatchCriteria, MatchRequest, MatchRun, NewPairBundle,
    PairBundle, PairingCategory, Product, ProductFilter, SavedBundle, ScoringWeights,
};
pub use requests::{MatchBundlesRequest, ProductQuery, SaveBundleRequest, SavedBundlesQuery};
pub use responses::{
    ErrorResponse, FieldIssue, HealthResponse, MatchBundlesResponse, ValidationErrorResponse,
};

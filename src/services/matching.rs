use std::sync::Arc;
use thiserror::Error;

use crate::core::Matcher;
use crate::models::{MatchCriteria, MatchRun, NewPairBundle};
use crate::services::store::{BundleStore, CatalogStore, StoreError};

/// Errors surfaced by a matching run
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[source] StoreError),

    #[error("Failed to persist match run: {0}")]
    PersistenceFailure(#[source] StoreError),
}

/// Runs the matcher against the live catalog and records the run
///
/// The ranking itself is `Matcher::rank_bundles`; this type only adds the
/// catalog read before it and the all-or-nothing write after it.
#[derive(Clone)]
pub struct MatchService {
    catalog: Arc<dyn CatalogStore>,
    bundles: Arc<dyn BundleStore>,
    matcher: Matcher,
}

impl MatchService {
    pub fn new(catalog: Arc<dyn CatalogStore>, bundles: Arc<dyn BundleStore>, matcher: Matcher) -> Self {
        Self {
            catalog,
            bundles,
            matcher,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Compute, persist and return ranked bundles for one request
    pub async fn match_bundles(&self, criteria: &MatchCriteria) -> Result<MatchRun, MatchError> {
        let products = self
            .catalog
            .list_active_products()
            .await
            .map_err(MatchError::CatalogUnavailable)?;

        let result = self.matcher.rank_bundles(criteria, products);

        let inputs: Vec<NewPairBundle> = result.bundles.iter().map(|b| b.to_input()).collect();

        let run = self
            .bundles
            .create_match_request_with_bundles(criteria, &inputs)
            .await
            .map_err(MatchError::PersistenceFailure)?;

        tracing::info!(
            request_id = %run.request.id,
            pairing_category = criteria.pairing_category.as_str(),
            candidates = result.total_candidates,
            eligible = result.eligible_candidates,
            bundles = run.bundles.len(),
            "Match run completed"
        );

        Ok(run)
    }
}

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MatchCriteria, MatchRun, NewPairBundle, Product, ProductFilter, SavedBundle};

/// Errors that can occur when talking to a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Read access to the product catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every product with `active = true`, in catalog order
    async fn list_active_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Active products matching a name/brand/tag query and gender label, newest first
    async fn search_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// A single active product
    async fn get_product(&self, id: &str) -> Result<Option<Product>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Persistence of match runs and bookmarks
#[async_trait]
pub trait BundleStore: Send + Sync {
    /// Create the request and all of its bundles in one all-or-nothing write
    ///
    /// The returned run lists bundles by score desc, total price asc,
    /// product A name asc.
    async fn create_match_request_with_bundles(
        &self,
        criteria: &MatchCriteria,
        bundles: &[NewPairBundle],
    ) -> Result<MatchRun, StoreError>;

    async fn get_match_run(&self, id: Uuid) -> Result<Option<MatchRun>, StoreError>;

    /// Bookmark a bundle; saving twice is a no-op
    async fn save_bundle(&self, user_id: &str, bundle_id: Uuid) -> Result<(), StoreError>;

    /// A user's bookmarks, most recent first
    async fn list_saved_bundles(&self, user_id: &str) -> Result<Vec<SavedBundle>, StoreError>;
}

/// Case-insensitive name/brand/tag match used by product search
pub fn matches_query(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product
            .brand
            .as_deref()
            .is_some_and(|brand| brand.to_lowercase().contains(&needle))
        || product.tags.iter().any(|tag| *tag == needle)
}

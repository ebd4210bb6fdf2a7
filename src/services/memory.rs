use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{matcher::compare_names, MAX_BUNDLES};
use crate::models::{
    MatchCriteria, MatchRequest, MatchRun, NewPairBundle, PairBundle, Product, ProductFilter,
    SavedBundle,
};
use crate::services::store::{matches_query, BundleStore, CatalogStore, StoreError};

#[derive(Debug, Clone)]
struct BundleRow {
    id: Uuid,
    request_id: Uuid,
    product_a_id: String,
    product_b_id: String,
    total_price: i64,
    score: f64,
    reason: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SavedRow {
    user_id: String,
    bundle_id: Uuid,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    requests: Vec<MatchRequest>,
    bundles: Vec<BundleRow>,
    saved: Vec<SavedRow>,
}

impl Tables {
    fn product(&self, id: &str) -> Result<&Product, StoreError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("product {}", id)))
    }

    fn expand(&self, row: &BundleRow) -> Result<PairBundle, StoreError> {
        Ok(PairBundle {
            id: row.id,
            request_id: row.request_id,
            product_a: self.product(&row.product_a_id)?.clone(),
            product_b: self.product(&row.product_b_id)?.clone(),
            total_price: row.total_price,
            score: row.score,
            reason: row.reason.clone(),
            created_at: row.created_at,
        })
    }

    fn run(&self, request: MatchRequest) -> Result<MatchRun, StoreError> {
        let mut bundles = self
            .bundles
            .iter()
            .filter(|row| row.request_id == request.id)
            .map(|row| self.expand(row))
            .collect::<Result<Vec<_>, _>>()?;

        bundles.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.total_price.cmp(&b.total_price))
                .then_with(|| compare_names(&a.product_a.name, &b.product_a.name))
        });
        bundles.truncate(MAX_BUNDLES);

        Ok(MatchRun { request, bundles })
    }
}

/// In-process store for tests and local development
///
/// All tables sit behind one lock, so a match run is inserted atomically.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                products,
                ..Tables::default()
            }),
        }
    }

    /// Insert or replace a catalog entry
    pub async fn upsert_product(&self, product: Product) {
        let mut tables = self.tables.write().await;
        match tables.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => tables.products.push(product),
        }
    }

    pub async fn request_count(&self) -> usize {
        self.tables.read().await.requests.len()
    }

    pub async fn bundle_count(&self) -> usize {
        self.tables.read().await.bundles.len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_active_products(&self) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().filter(|p| p.active).cloned().collect())
    }

    async fn search_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| p.active)
            .filter(|p| filter.query.as_deref().map_or(true, |q| matches_query(p, q)))
            .filter(|p| filter.gender_label.map_or(true, |g| p.gender_label == g))
            .cloned()
            .collect();

        // Newest first; undated entries last
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(filter.limit);

        Ok(products)
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id && p.active).cloned())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[async_trait]
impl BundleStore for InMemoryStore {
    async fn create_match_request_with_bundles(
        &self,
        criteria: &MatchCriteria,
        bundles: &[NewPairBundle],
    ) -> Result<MatchRun, StoreError> {
        let mut tables = self.tables.write().await;

        for bundle in bundles {
            if bundle.product_a_id == bundle.product_b_id {
                return Err(StoreError::InvalidInput(format!(
                    "bundle pairs product {} with itself",
                    bundle.product_a_id
                )));
            }
            tables.product(&bundle.product_a_id)?;
            tables.product(&bundle.product_b_id)?;
        }

        let request = MatchRequest {
            id: Uuid::new_v4(),
            criteria: criteria.clone(),
            created_at: Utc::now(),
        };

        let rows: Vec<BundleRow> = bundles
            .iter()
            .map(|bundle| BundleRow {
                id: Uuid::new_v4(),
                request_id: request.id,
                product_a_id: bundle.product_a_id.clone(),
                product_b_id: bundle.product_b_id.clone(),
                total_price: bundle.total_price,
                score: bundle.score,
                reason: bundle.reason.clone(),
                created_at: request.created_at,
            })
            .collect();

        let bundles_before = tables.bundles.len();
        tables.requests.push(request.clone());
        tables.bundles.extend(rows);

        match tables.run(request) {
            Ok(run) => Ok(run),
            Err(e) => {
                tables.requests.pop();
                tables.bundles.truncate(bundles_before);
                Err(e)
            }
        }
    }

    async fn get_match_run(&self, id: Uuid) -> Result<Option<MatchRun>, StoreError> {
        let tables = self.tables.read().await;
        match tables.requests.iter().find(|r| r.id == id) {
            Some(request) => Ok(Some(tables.run(request.clone())?)),
            None => Ok(None),
        }
    }

    async fn save_bundle(&self, user_id: &str, bundle_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.bundles.iter().any(|b| b.id == bundle_id) {
            return Err(StoreError::NotFound(format!("bundle {}", bundle_id)));
        }

        let already_saved = tables
            .saved
            .iter()
            .any(|s| s.user_id == user_id && s.bundle_id == bundle_id);

        if !already_saved {
            tables.saved.push(SavedRow {
                user_id: user_id.to_string(),
                bundle_id,
                saved_at: Utc::now(),
            });
        }

        Ok(())
    }

    async fn list_saved_bundles(&self, user_id: &str) -> Result<Vec<SavedBundle>, StoreError> {
        let tables = self.tables.read().await;

        tables
            .saved
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .map(|s| -> Result<SavedBundle, StoreError> {
                let row = tables
                    .bundles
                    .iter()
                    .find(|b| b.id == s.bundle_id)
                    .ok_or_else(|| StoreError::NotFound(format!("bundle {}", s.bundle_id)))?;
                Ok(SavedBundle {
                    user_id: s.user_id.clone(),
                    bundle: tables.expand(row)?,
                    saved_at: s.saved_at,
                })
            })
            .collect()
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::core::MAX_BUNDLES;
use crate::models::{
    MatchCriteria, MatchRequest, MatchRun, NewPairBundle, PairBundle, Product, ProductFilter,
    SavedBundle,
};
use crate::services::store::{BundleStore, CatalogStore, StoreError};

/// Ranked bundle order; names compare lowercased, then byte-wise, like `compare_names`
const RUN_ORDER: &str =
    r#"b.score DESC, b.total_price ASC, LOWER(pa.name) COLLATE "C" ASC, pa.name COLLATE "C" ASC"#;

/// Search predicate on `$1`; substring matches are literal, so `%` and `_` match themselves
const PRODUCT_QUERY_MATCH: &str = "($1::TEXT IS NULL \
     OR strpos(LOWER(p.name), LOWER($1)) > 0 \
     OR strpos(LOWER(COALESCE(p.brand, '')), LOWER($1)) > 0 \
     OR LOWER($1) = ANY(p.tags))";

const PRODUCT_COLUMNS: [&str; 12] = [
    "id", "name", "brand", "price", "stock", "gender_label", "collection", "tags", "sizes",
    "images", "active", "created_at",
];

/// PostgreSQL client for the catalog and match runs
///
/// A match run (request plus bundles) is written in a single transaction and
/// read back inside it, so callers never observe a request without its bundles.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool (migrations are not run)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `alias.column AS prefixcolumn, ...` for every product column
fn product_select(alias: &str, prefix: &str) -> String {
    PRODUCT_COLUMNS
        .iter()
        .map(|column| format!("{alias}.{column} AS {prefix}{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bundle rows joined with both products; `extra` adds leading columns
fn bundle_select(extra: &str) -> String {
    format!(
        r#"
        SELECT {}b.id, b.request_id, b.total_price, b.score, b.reason, b.created_at,
               {}, {}
        FROM pair_bundles b
        JOIN products pa ON pa.id = b.product_a_id
        JOIN products pb ON pb.id = b.product_b_id
        "#,
        extra,
        product_select("pa", "a_"),
        product_select("pb", "b_"),
    )
}

fn column(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

fn product_from_row(row: &PgRow, prefix: &str) -> Result<Product, StoreError> {
    let gender_label: String = row.try_get(column(prefix, "gender_label").as_str())?;
    let created_at: DateTime<Utc> = row.try_get(column(prefix, "created_at").as_str())?;

    Ok(Product {
        id: row.try_get(column(prefix, "id").as_str())?,
        name: row.try_get(column(prefix, "name").as_str())?,
        brand: row.try_get(column(prefix, "brand").as_str())?,
        price: row.try_get(column(prefix, "price").as_str())?,
        stock: row.try_get(column(prefix, "stock").as_str())?,
        gender_label: gender_label.parse().map_err(StoreError::Decode)?,
        collection: row.try_get(column(prefix, "collection").as_str())?,
        tags: row.try_get(column(prefix, "tags").as_str())?,
        sizes: row.try_get(column(prefix, "sizes").as_str())?,
        images: row.try_get(column(prefix, "images").as_str())?,
        active: row.try_get(column(prefix, "active").as_str())?,
        created_at: Some(created_at),
    })
}

fn bundle_from_row(row: &PgRow) -> Result<PairBundle, StoreError> {
    Ok(PairBundle {
        id: row.try_get("id")?,
        request_id: row.try_get("request_id")?,
        product_a: product_from_row(row, "a_")?,
        product_b: product_from_row(row, "b_")?,
        total_price: row.try_get("total_price")?,
        score: row.try_get("score")?,
        reason: row.try_get("reason")?,
        created_at: row.try_get("created_at")?,
    })
}

fn request_from_row(row: &PgRow) -> Result<MatchRequest, StoreError> {
    let pairing_category: String = row.try_get("pairing_category")?;

    Ok(MatchRequest {
        id: row.try_get("id")?,
        criteria: MatchCriteria {
            pairing_category: pairing_category.parse().map_err(StoreError::Decode)?,
            style_tags: row.try_get("style_tags")?,
            sizes_a: row.try_get("sizes_a")?,
            sizes_b: row.try_get("sizes_b")?,
            budget_min: row.try_get("budget_min")?,
            budget_max: row.try_get("budget_max")?,
            occasion: row.try_get("occasion")?,
            user_id: row.try_get("user_id")?,
        },
        created_at: row.try_get("created_at")?,
    })
}

async fn fetch_run<'e, E>(executor: E, request: MatchRequest) -> Result<MatchRun, StoreError>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let query = format!(
        "{} WHERE b.request_id = $1 ORDER BY {} LIMIT $2",
        bundle_select(""),
        RUN_ORDER
    );

    let rows = sqlx::query(&query)
        .bind(request.id)
        .bind(MAX_BUNDLES as i64)
        .fetch_all(executor)
        .await?;

    let bundles = rows.iter().map(bundle_from_row).collect::<Result<Vec<_>, _>>()?;

    Ok(MatchRun { request, bundles })
}

#[async_trait]
impl CatalogStore for PostgresClient {
    async fn list_active_products(&self) -> Result<Vec<Product>, StoreError> {
        let query = format!(
            "SELECT {} FROM products p WHERE p.active = TRUE ORDER BY p.created_at ASC, p.id ASC",
            product_select("p", "")
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let products = rows
            .iter()
            .map(|row| product_from_row(row, ""))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} active products", products.len());

        Ok(products)
    }

    async fn search_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let query = format!(
            r#"
            SELECT {} FROM products p
            WHERE p.active = TRUE
              AND {}
              AND ($2::TEXT IS NULL OR p.gender_label = $2)
            ORDER BY p.created_at DESC
            LIMIT $3
            "#,
            product_select("p", ""),
            PRODUCT_QUERY_MATCH
        );

        let rows = sqlx::query(&query)
            .bind(filter.query.as_deref())
            .bind(filter.gender_label.map(|g| g.as_str()))
            .bind(filter.limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| product_from_row(row, "")).collect()
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let query = format!(
            "SELECT {} FROM products p WHERE p.id = $1 AND p.active = TRUE",
            product_select("p", "")
        );

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        row.map(|row| product_from_row(&row, "")).transpose()
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl BundleStore for PostgresClient {
    async fn create_match_request_with_bundles(
        &self,
        criteria: &MatchCriteria,
        bundles: &[NewPairBundle],
    ) -> Result<MatchRun, StoreError> {
        let request = MatchRequest {
            id: Uuid::new_v4(),
            criteria: criteria.clone(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO match_requests
                (id, pairing_category, style_tags, sizes_a, sizes_b,
                 budget_min, budget_max, occasion, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(criteria.pairing_category.as_str())
        .bind(&criteria.style_tags)
        .bind(&criteria.sizes_a)
        .bind(&criteria.sizes_b)
        .bind(criteria.budget_min)
        .bind(criteria.budget_max)
        .bind(criteria.occasion.as_deref())
        .bind(criteria.user_id.as_deref())
        .bind(request.created_at)
        .execute(&mut *tx)
        .await?;

        for bundle in bundles {
            sqlx::query(
                r#"
                INSERT INTO pair_bundles
                    (id, request_id, product_a_id, product_b_id, total_price, score, reason, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(request.id)
            .bind(&bundle.product_a_id)
            .bind(&bundle.product_b_id)
            .bind(bundle.total_price)
            .bind(bundle.score)
            .bind(&bundle.reason)
            .bind(request.created_at)
            .execute(&mut *tx)
            .await?;
        }

        let run = fetch_run(&mut *tx, request).await?;
        tx.commit().await?;

        tracing::debug!(
            request_id = %run.request.id,
            bundles = run.bundles.len(),
            "Stored match run"
        );

        Ok(run)
    }

    async fn get_match_run(&self, id: Uuid) -> Result<Option<MatchRun>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, pairing_category, style_tags, sizes_a, sizes_b,
                   budget_min, budget_max, occasion, user_id, created_at
            FROM match_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let request = request_from_row(&row)?;
                Ok(Some(fetch_run(&self.pool, request).await?))
            }
            None => Ok(None),
        }
    }

    async fn save_bundle(&self, user_id: &str, bundle_id: Uuid) -> Result<(), StoreError> {
        let exists = sqlx::query("SELECT 1 FROM pair_bundles WHERE id = $1")
            .bind(bundle_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();

        if !exists {
            return Err(StoreError::NotFound(format!("bundle {}", bundle_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO saved_bundles (user_id, bundle_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, bundle_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(bundle_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved bundle {} for {}", bundle_id, user_id);

        Ok(())
    }

    async fn list_saved_bundles(&self, user_id: &str) -> Result<Vec<SavedBundle>, StoreError> {
        let query = format!(
            "{} JOIN saved_bundles s ON s.bundle_id = b.id \
             WHERE s.user_id = $1 \
             ORDER BY s.created_at DESC",
            bundle_select("s.created_at AS saved_at, ")
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<SavedBundle, StoreError> {
                Ok(SavedBundle {
                    user_id: user_id.to_string(),
                    bundle: bundle_from_row(row)?,
                    saved_at: row.try_get("saved_at")?,
                })
            })
            .collect()
    }
}

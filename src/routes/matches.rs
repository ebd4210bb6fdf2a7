use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{
    ErrorResponse, HealthResponse, MatchBundlesRequest, MatchBundlesResponse,
    ValidationErrorResponse,
};
use crate::services::{BundleStore, CatalogStore, MatchError, MatchService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub bundles: Arc<dyn BundleStore>,
    pub matching: MatchService,
    /// Whether bookmarking bundles is enabled
    pub saves_enabled: bool,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/match", web::post().to(match_bundles))
        .route("/match/{id}", web::get().to(get_match_run));
}

pub(crate) fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Server error".to_string(),
        message: "The request could not be completed".to_string(),
        status_code: 500,
    })
}

pub(crate) fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Not found".to_string(),
        message: format!("{} not found", what),
        status_code: 404,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.catalog.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match bundles endpoint
///
/// POST /api/v1/match
///
/// Request body:
/// ```json
/// {
///   "pairingCategory": "MM|WW|UNISEX|CUSTOM",
///   "styleTags": ["minimal"],
///   "sizesA": ["M"],
///   "sizesB": [],
///   "budgetMin": 16000,
///   "budgetMax": 28000,
///   "occasion": "date",
///   "userId": "optional"
/// }
/// ```
async fn match_bundles(
    state: web::Data<AppState>,
    req: web::Json<MatchBundlesRequest>,
) -> impl Responder {
    let criteria = match req.into_inner().into_criteria() {
        Ok(criteria) => criteria,
        Err(errors) => {
            tracing::info!("Validation failed for match request: {}", errors);
            return HttpResponse::BadRequest().json(ValidationErrorResponse::from(&errors));
        }
    };

    tracing::info!(
        pairing_category = criteria.pairing_category.as_str(),
        style_tags = criteria.style_tags.len(),
        budget_min = criteria.budget_min,
        budget_max = criteria.budget_max,
        "Matching bundles"
    );

    match state.matching.match_bundles(&criteria).await {
        Ok(run) => HttpResponse::Ok().json(MatchBundlesResponse::from(run)),
        Err(e @ MatchError::CatalogUnavailable(_)) => {
            tracing::error!("Match aborted: {}", e);
            server_error()
        }
        Err(e @ MatchError::PersistenceFailure(_)) => {
            tracing::error!("Match run not stored: {}", e);
            server_error()
        }
    }
}

/// Fetch a stored match run
///
/// GET /api/v1/match/{id}
async fn get_match_run(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    match state.bundles.get_match_run(id).await {
        Ok(Some(run)) => HttpResponse::Ok().json(run),
        Ok(None) => not_found("Match request"),
        Err(e) => {
            tracing::error!("Failed to load match run {}: {}", id, e);
            server_error()
        }
    }
}

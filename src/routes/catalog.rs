use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, ProductFilter, ProductQuery, SaveBundleRequest, SavedBundlesQuery,
    ValidationErrorResponse,
};
use crate::routes::matches::{not_found, server_error, AppState};
use crate::services::StoreError;

/// Most products a search returns
const PRODUCT_PAGE_SIZE: usize = 60;

/// Configure catalog and bookmark routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/products", web::get().to(search_products))
        .route("/products/{id}", web::get().to(get_product))
        .route("/saved", web::post().to(save_bundle))
        .route("/saved", web::get().to(list_saved_bundles));
}

fn saves_disabled() -> HttpResponse {
    HttpResponse::Forbidden().json(ErrorResponse {
        error: "Saving is disabled".to_string(),
        message: "Bundle bookmarks are turned off for this deployment".to_string(),
        status_code: 403,
    })
}

/// Product search
///
/// GET /api/v1/products?query={text}&genderLabel={mens|womens|unisex}
async fn search_products(
    state: web::Data<AppState>,
    query: web::Query<ProductQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ValidationErrorResponse::from(&errors));
    }

    let query = query.into_inner();
    let filter = ProductFilter {
        query: query.query.filter(|q| !q.trim().is_empty()),
        gender_label: query.gender_label,
        limit: PRODUCT_PAGE_SIZE,
    };

    match state.catalog.search_products(&filter).await {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(e) => {
            tracing::error!("Product query failed: {}", e);
            server_error()
        }
    }
}

/// GET /api/v1/products/{id}
async fn get_product(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.catalog.get_product(&id).await {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => not_found("Product"),
        Err(e) => {
            tracing::error!("Failed to load product {}: {}", id, e);
            server_error()
        }
    }
}

/// Bookmark a bundle
///
/// POST /api/v1/saved
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "bundleId": "uuid"
/// }
/// ```
async fn save_bundle(
    state: web::Data<AppState>,
    req: web::Json<SaveBundleRequest>,
) -> impl Responder {
    if !state.saves_enabled {
        return saves_disabled();
    }

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ValidationErrorResponse::from(&errors));
    }

    match state.bundles.save_bundle(&req.user_id, req.bundle_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(StoreError::NotFound(_)) => not_found("Bundle"),
        Err(e) => {
            tracing::error!("Failed to save bundle {} for {}: {}", req.bundle_id, req.user_id, e);
            server_error()
        }
    }
}

/// GET /api/v1/saved?userId={userId}
async fn list_saved_bundles(
    state: web::Data<AppState>,
    query: web::Query<SavedBundlesQuery>,
) -> impl Responder {
    if !state.saves_enabled {
        return saves_disabled();
    }

    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ValidationErrorResponse::from(&errors));
    }

    match state.bundles.list_saved_bundles(&query.user_id).await {
        Ok(saved) => HttpResponse::Ok().json(serde_json::json!({
            "userId": query.user_id,
            "saved": saved,
            "count": saved.len(),
        })),
        Err(e) => {
            tracing::error!("Failed to list saved bundles for {}: {}", query.user_id, e);
            server_error()
        }
    }
}

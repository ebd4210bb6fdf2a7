// HTTP tests for Pair Match routes

use actix_web::{http::StatusCode, test, web, App};
use pair_match::core::Matcher;
use pair_match::models::{GenderLabel, MatchBundlesResponse, Product};
use pair_match::routes::{self, AppState};
use pair_match::services::{BundleStore, CatalogStore, InMemoryStore, MatchService};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_product(id: &str, name: &str, price: i64, gender: GenderLabel, tags: &[&str]) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        brand: Some("Kaze".to_string()),
        price,
        stock: 3,
        gender_label: gender,
        collection: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        sizes: vec!["M".to_string(), "L".to_string()],
        images: vec![],
        active: true,
        created_at: None,
    }
}

fn create_state(saves_enabled: bool) -> AppState {
    let store = Arc::new(InMemoryStore::with_products(vec![
        create_product("p1", "Linen Shirt", 9800, GenderLabel::Mens, &["minimal"]),
        create_product("p2", "Pleated Skirt", 11200, GenderLabel::Womens, &["minimal", "formal"]),
        create_product("p3", "Track Jacket", 14500, GenderLabel::Unisex, &["street"]),
        create_product("p4", "White Tee", 4200, GenderLabel::Unisex, &["minimal"]),
    ]));
    let catalog: Arc<dyn CatalogStore> = store.clone();
    let bundles: Arc<dyn BundleStore> = store;

    AppState {
        catalog: catalog.clone(),
        bundles: bundles.clone(),
        matching: MatchService::new(catalog, bundles, Matcher::with_default_weights()),
        saves_enabled,
    }
}

fn match_body() -> Value {
    json!({
        "pairingCategory": "CUSTOM",
        "styleTags": ["minimal"],
        "sizesA": ["M"],
        "sizesB": [],
        "budgetMin": 16000,
        "budgetMax": 28000,
        "occasion": "date"
    })
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(routes::json_config())
                .app_data(routes::query_config())
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_match_returns_ranked_bundles() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::post()
        .uri("/api/v1/match")
        .set_json(match_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: MatchBundlesResponse = test::read_body_json(resp).await;
    assert!(!body.bundles.is_empty());
    assert_eq!(body.total_results, body.bundles.len());
    assert!(body.bundles.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(body.bundles.iter().all(|b| b.reason.ends_with("also great for date")));
}

#[actix_web::test]
async fn test_match_accepts_pair_type_alias() {
    let app = init_app!(create_state(true));

    let mut body = match_body();
    let category = body["pairingCategory"].take();
    let object = body.as_object_mut().unwrap();
    object.remove("pairingCategory");
    object.insert("pairType".to_string(), category);

    let req = test::TestRequest::post().uri("/api/v1/match").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_match_validation_failure() {
    let app = init_app!(create_state(true));

    let mut body = match_body();
    body["budgetMin"] = json!(30000);
    body["budgetMax"] = json!(10000);

    let req = test::TestRequest::post().uri("/api/v1/match").set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["issues"][0]["field"], "budgetMax");
    assert_eq!(
        body["issues"][0]["message"],
        "budgetMax must be greater than or equal to budgetMin"
    );
}

#[actix_web::test]
async fn test_match_reports_bad_fields_by_wire_name() {
    let app = init_app!(create_state(true));

    let mut unknown_category = match_body();
    unknown_category["pairingCategory"] = json!("MW");

    let mut mistyped_budget = match_body();
    mistyped_budget["budgetMin"] = json!("cheap");

    let mut too_many_tags = match_body();
    too_many_tags["styleTags"] = json!(vec!["minimal"; 9]);

    let cases = [
        (unknown_category, "pairingCategory", "pairingCategory must be one of MM, WW, UNISEX, CUSTOM"),
        (mistyped_budget, "budgetMin", "budgetMin must be an integer"),
        (too_many_tags, "styleTags", "styleTags accepts at most 8 tags"),
    ];

    for (payload, field, message) in cases {
        let req = test::TestRequest::post().uri("/api/v1/match").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["issues"][0]["field"], field);
        assert_eq!(body["issues"][0]["message"], message);
    }
}

#[actix_web::test]
async fn test_match_rejects_malformed_json() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::post()
        .uri("/api/v1/match")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"pairingCategory\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_stored_run_is_retrievable() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::post()
        .uri("/api/v1/match")
        .set_json(match_body())
        .to_request();
    let created: MatchBundlesResponse = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/match/{}", created.request_id))
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["bundles"].as_array().map(Vec::len), Some(created.bundles.len()));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/match/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_product_search_and_lookup() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::get()
        .uri("/api/v1/products?query=minimal&genderLabel=unisex")
        .to_request();
    let products: Vec<Product> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, "p4");

    let req = test::TestRequest::get().uri("/api/v1/products/p2").to_request();
    let product: Product = test::call_and_read_body_json(&app, req).await;
    assert_eq!(product.name, "Pleated Skirt");

    let req = test::TestRequest::get().uri("/api/v1/products/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_save_and_list_bundles() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::post()
        .uri("/api/v1/match")
        .set_json(match_body())
        .to_request();
    let created: MatchBundlesResponse = test::call_and_read_body_json(&app, req).await;
    let bundle_id = created.bundles[0].id;

    let req = test::TestRequest::post()
        .uri("/api/v1/saved")
        .set_json(json!({ "userId": "user-1", "bundleId": bundle_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/v1/saved?userId=user-1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["saved"][0]["bundle"]["id"], json!(bundle_id));
}

#[actix_web::test]
async fn test_save_unknown_bundle_is_not_found() {
    let app = init_app!(create_state(true));

    let req = test::TestRequest::post()
        .uri("/api/v1/saved")
        .set_json(json!({ "userId": "user-1", "bundleId": uuid::Uuid::new_v4() }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_saves_disabled() {
    let app = init_app!(create_state(false));

    let req = test::TestRequest::post()
        .uri("/api/v1/saved")
        .set_json(json!({ "userId": "user-1", "bundleId": uuid::Uuid::new_v4() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get().uri("/api/v1/saved?userId=user-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

use std::path::PathBuf;
use std::sync::Arc;

use plantify_api::{app, config::ApiConfig};
use reqwest::StatusCode;
use serde_json::{json, Value};

const ADMIN_TOKEN: &str = "test-admin-token";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Seeded catalog, admin token required on write routes.
    async fn spawn() -> Self {
        Self::spawn_with(ApiConfig {
            seed_file: Some(seed_path()),
            admin_token: Some(ADMIN_TOKEN.to_string()),
            ..ApiConfig::default()
        })
        .await
    }

    async fn spawn_with(config: ApiConfig) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let services = app::services::build_services(&config)
            .await
            .expect("failed to build services");
        let app = app::build_app(Arc::new(services), &config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/seed_products.json")
}

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

fn new_product(sku: &str) -> Value {
    json!({
        "name": "Fiddle Leaf Fig",
        "description": "Glossy violin-shaped leaves",
        "price": 1299,
        "category": "Indoor Plants",
        "images": { "main": "/assets/fiddle/main.jpg" },
        "sku": sku,
        "tags": ["statement", "tall"]
    })
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn default_listing_returns_envelope_and_pagination() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/api/products")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 9);
    assert_eq!(body["pagination"], json!({ "page": 1, "limit": 12, "total": 9, "pages": 1 }));
    assert!(body["data"][0].get("reviews").is_none());
}

#[tokio::test]
async fn category_price_and_sort_filters_apply() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, body) = get_json(
        &client,
        srv.url("/api/products?category=Indoor%20Plants&minPrice=300&maxPrice=1500&sort=price-low"),
    )
    .await;

    assert_eq!(
        names(&body),
        ["Lucky Bamboo Plant - 3 Layer", "Brazilian Wood Plant", "Monstera Deliciosa Plant"]
    );
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn search_is_ranked_by_relevance() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/api/products?search=monstera&sort=rating")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        names(&body),
        [
            "Monstera Deliciosa Plant",
            "Monstera Deliciosa Plant - XL",
            "Broken Heart Plant"
        ]
    );
    assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn tag_only_matches_count_toward_total() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Five products are tagged "tropical"; only one also says it in its description.
    let (_, body) = get_json(&client, srv.url("/api/products?search=tropical")).await;

    assert_eq!(names(&body), ["Bamboo Palm Plant"]);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["pages"], 1);
}

#[tokio::test]
async fn nonsense_listing_params_are_coerced() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(
        &client,
        srv.url("/api/products?page=zero&limit=-3&minPrice=abc&maxPrice=&sort=upside-down"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 12);
    assert_eq!(body["pagination"]["total"], 9);
}

#[tokio::test]
async fn pagination_windows_results() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, body) = get_json(&client, srv.url("/api/products?limit=4&page=3&sort=price-high")).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"], json!({ "page": 3, "limit": 4, "total": 9, "pages": 3 }));
}

#[tokio::test]
async fn admin_routes_require_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/products"))
        .json(&new_product("FLF001"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(srv.url("/api/products"))
        .bearer_auth("wrong")
        .json(&new_product("FLF001"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Reads stay public.
    let (status, _) = get_json(&client, srv.url("/api/products")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle_create_update_review_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(srv.url("/api/products"))
        .bearer_auth(ADMIN_TOKEN)
        .json(&new_product("FLF001"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["message"], "Product created successfully");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Same SKU again
    let res = client
        .post(srv.url("/api/products"))
        .bearer_auth(ADMIN_TOKEN)
        .json(&new_product("FLF001"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Update
    let res = client
        .put(srv.url(&format!("/api/products/{id}")))
        .bearer_auth(ADMIN_TOKEN)
        .json(&json!({ "price": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["data"]["price"], 999.0);
    assert_eq!(updated["data"]["name"], "Fiddle Leaf Fig");

    // Review twice from the same shopper
    let review = json!({ "user": "0190c2b4-8a2c-7d4e-9f00-000000000001", "rating": 4, "comment": "Lovely" });
    let res = client
        .post(srv.url(&format!("/api/products/{id}/reviews")))
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = client
        .post(srv.url(&format!("/api/products/{id}/reviews")))
        .json(&review)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "You have already reviewed this product");

    let (status, body) = get_json(&client, srv.url(&format!("/api/products/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rating"], json!({ "average": 4.0, "count": 1 }));
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 1);

    // Soft delete
    let res = client
        .delete(srv.url(&format!("/api/products/{id}")))
        .bearer_auth(ADMIN_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let (status, body) = get_json(&client, srv.url(&format!("/api/products/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn invalid_create_reports_every_message() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/products"))
        .bearer_auth(ADMIN_TOKEN)
        .json(&json!({ "price": -1, "category": "Trees" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Validation error");
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(errors.contains(&"Product name is required"));
    assert!(errors.contains(&"Price cannot be negative"));
    assert!(errors.contains(&"Trees is not a valid category"));
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/products"))
        .bearer_auth(ADMIN_TOKEN)
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, _) = get_json(&client, srv.url("/api/products/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get_json(
        &client,
        srv.url("/api/products/0190c2b4-8a2c-7d4e-9f00-00000000beef"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn banner_health_and_fallback() {
    let srv = TestServer::spawn_with(ApiConfig::default()).await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, srv.url("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["products"], "/api/products");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, body) = get_json(&client, srv.url("/api/nothing-here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Route not found" }));
}

#[tokio::test]
async fn write_routes_are_open_without_configured_token() {
    let srv = TestServer::spawn_with(ApiConfig::default()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/products"))
        .json(&new_product("FLF002"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

//! End-to-end tests driving the router in-process over in-memory storage.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use podhub_config::{SecurityConfig, ServerConfig};
use podhub_repository::memory::MemoryDatabase;
use podhub_rest::{create_router, middleware::RateLimitState, AppState};
use podhub_security::{PasswordHasher, TokenProvider};
use podhub_service::{
    AuthServiceImpl, CacheService, CategoryServiceImpl, EpisodeServiceImpl, InMemoryCacheStore,
    LoggingResetNotifier, PasswordResetServiceImpl, PodcastServiceImpl, DEFAULT_TTL,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let db = MemoryDatabase::new();
    let cache = CacheService::new(Arc::new(InMemoryCacheStore::new()), DEFAULT_TTL);
    let hasher = Arc::new(PasswordHasher::with_cost(1));
    let tokens = Arc::new(TokenProvider::new(Arc::new(SecurityConfig {
        jwt_secret: "api-test-secret-key-long-enough".to_string(),
        ..SecurityConfig::default()
    })));

    let state = AppState::new(
        Arc::new(AuthServiceImpl::new(
            Arc::new(db.users()),
            hasher.clone(),
            tokens,
        )),
        Arc::new(PasswordResetServiceImpl::new(
            Arc::new(db.users()),
            Arc::new(db.password_resets()),
            hasher,
            Arc::new(LoggingResetNotifier),
            Duration::from_secs(3600),
        )),
        Arc::new(CategoryServiceImpl::new(Arc::new(db.categories()), cache.clone())),
        Arc::new(PodcastServiceImpl::new(
            Arc::new(db.podcasts()),
            Arc::new(db.categories()),
            Arc::new(db.episodes()),
            cache.clone(),
        )),
        Arc::new(EpisodeServiceImpl::new(
            Arc::new(db.episodes()),
            Arc::new(db.podcasts()),
            cache,
        )),
    );

    create_router(state, RateLimitState::per_minute(60), &ServerConfig::default())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>) -> (StatusCode, Value,
) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "password123",
            "password_confirmation": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["token"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_catalog_requires_token() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/categories", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/podcasts", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_failure_is_401() {
    let app = app();
    register(&app).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = app();
    let token = register(&app).await;
    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_category_lifecycle() {
    let app = app();
    let token = register(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(&token),
        Some(json!({ "name": "Technology" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category created successfully");
    assert_eq!(body["data"]["slug"], "technology");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/categories", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/categories/{id}"),
        Some(&token),
        Some(json!({ "name": "Tech News" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category updated successfully");

    // The unfiltered list was evicted by the update.
    let (_, body) = send(&app, Method::GET, "/api/categories", Some(&token), None).await;
    assert_eq!(body["data"][0]["name"], "Tech News");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/categories/slug/tech-news",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);
}

#[tokio::test]
async fn test_podcast_listing_and_category_guard() {
    let app = app();
    let token = register(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/podcasts", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No podcasts found");

    let (_, category) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(&token),
        Some(json!({ "name": "History" })),
    )
    .await;
    let category_id = category["data"]["id"].as_i64().unwrap();

    let (status, podcast) = send(
        &app,
        Method::POST,
        "/api/podcasts",
        Some(&token),
        Some(json!({
            "title": "Ancient Worlds",
            "description": "Stories from antiquity, told slowly",
            "category_id": category_id,
            "is_featured": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let podcast_id = podcast["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/podcasts?featured=true&category=history",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meta"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["category"]["slug"], "history");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/podcasts?category=comedy",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Category not found");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/categories/{category_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "Cannot delete category with associated podcasts");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/podcasts/{podcast_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Podcast deleted successfully");
}

#[tokio::test]
async fn test_invalid_request_reports_fields() {
    let app = app();
    let token = register(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/podcasts",
        Some(&token),
        Some(json!({ "title": "ab", "description": "short", "category_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"description"));

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/podcasts?sort=random",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let app = app();
    register(&app).await;

    let (known_status, known) = send(
        &app,
        Method::POST,
        "/api/auth/forgot-password",
        None,
        Some(json!({ "email": "ada@example.com" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/api/auth/forgot-password",
        None,
        Some(json!({ "email": "nobody@example.com" })),
    )
    .await;

    assert_eq!(known_status, StatusCode::OK);
    assert_eq!(unknown_status, StatusCode::OK);
    assert_eq!(known, unknown);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/reset-password",
        None,
        Some(json!({
            "token": "guess",
            "email": "ada@example.com",
            "password": "new-password",
            "password_confirmation": "new-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid password reset token");
}

#[tokio::test]
async fn test_api_responses_carry_rate_limit_headers() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "192.0.2.10")
        .body(Body::from(json!({ "email": "x@example.com", "password": "secret123" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-ratelimit-limit"], "60");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "59");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/podcasts"].is_object());
}

//! Shared helpers for API integration tests.
//!
//! Builds the production router with a [`MemoryStore`] object store, so
//! tests can assert what was uploaded and deleted without a real provider.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use folio_api::auth::jwt::{generate_access_token, JwtConfig};
use folio_api::config::ServerConfig;
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_core::types::DbId;
use folio_db::models::template::CreateTemplate;
use folio_db::repositories::{TemplateRepo, UserRepo};
use folio_storage::MemoryStore;

/// Smallest valid 1x1 PNG, used as the upload payload in image tests.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
///
/// The staging directory is unique per call so parallel tests never share
/// temp files.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        staging_dir: std::env::temp_dir().join(format!("folio-test-{}", uuid::Uuid::new_v4())),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, backed by
/// an in-memory object store.
///
/// Returns the store handle so tests can assert upload/delete behaviour.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<MemoryStore>) {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: store.clone(),
    };

    (build_app_router(state, &config), store)
}

/// Insert a user and mint an access token for them.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> (DbId, String) {
    let user = UserRepo::create(pool, email, Some("Test User"), role)
        .await
        .expect("failed to seed user");
    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("failed to mint test token");
    (user.id, token)
}

/// Insert a published template with two layouts, theme options, and section
/// defaults. Returns its id.
pub async fn seed_template(pool: &PgPool) -> DbId {
    let structure = serde_json::from_value(serde_json::json!({
        "default_sections": ["about", "projects", "contact"],
        "layouts": [
            { "id": "classic", "sections": ["about", "projects", "contact"], "grid_system": "12-col" },
            { "id": "compact", "sections": ["about", "contact"], "grid_system": "8-col" }
        ],
        "theme_options": {
            "color_schemes": [
                { "id": "slate", "colors": { "primary": "#334155" } },
                { "id": "amber", "colors": { "primary": "#f59e0b" } }
            ],
            "font_pairings": [
                { "id": "serif-sans", "fonts": { "heading": "Lora", "body": "Inter" } }
            ]
        },
        "section_definitions": {
            "about": { "heading": "About me", "body": "" },
            "projects": { "items": [] },
            "contact": { "email": "" }
        }
    }))
    .expect("invalid template structure fixture");

    let dto = CreateTemplate {
        name: "Clean Slate".to_string(),
        description: Some("A minimal starting point".to_string()),
        category: "minimal".to_string(),
        structure,
        is_published: Some(true),
        featured: None,
    };
    TemplateRepo::create(pool, &dto, None)
        .await
        .expect("failed to seed template")
        .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(json)).await
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(json)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(json)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a single-file `multipart/form-data` body with an `image` field.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: &str,
    filename: &str,
    bytes: &[u8],
) -> Response<Body> {
    let boundary = "folio-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body is not JSON ({e}): {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

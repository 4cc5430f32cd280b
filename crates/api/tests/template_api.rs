//! HTTP-level integration tests for the template catalog and reviews.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

fn minimal_structure() -> serde_json::Value {
    serde_json::json!({
        "default_sections": ["about"],
        "section_definitions": { "about": { "heading": "About" } }
    })
}

// ---------------------------------------------------------------------------
// Admin CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_create_a_template(pool: PgPool) {
    let (_, admin_token) = common::seed_user(&pool, "admin@example.com", "admin").await;
    let (app, _store) = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/templates",
        &admin_token,
        serde_json::json!({
            "name": "Bold",
            "category": "creative",
            "structure": minimal_structure(),
            "is_published": true
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Bold");
    assert_eq!(json["rating_count"], 0);
    assert_eq!(json["usage_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_write_the_catalog(pool: PgPool) {
    let (_, user_token) = common::seed_user(&pool, "user@example.com", "user").await;
    let (app, _store) = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/templates",
        &user_token,
        serde_json::json!({
            "name": "Sneaky",
            "category": "minimal",
            "structure": minimal_structure()
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_category_is_rejected(pool: PgPool) {
    let (_, admin_token) = common::seed_user(&pool, "admin@example.com", "admin").await;
    let (app, _store) = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/templates",
        &admin_token,
        serde_json::json!({
            "name": "Weird",
            "category": "vintage",
            "structure": minimal_structure()
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_update_a_template(pool: PgPool) {
    let (_, admin_token) = common::seed_user(&pool, "admin@example.com", "admin").await;
    let template_id = common::seed_template(&pool).await;

    let (app, _store) = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/templates/{template_id}"),
        &admin_token,
        serde_json::json!({ "name": "Renamed", "featured": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Renamed");
    assert_eq!(json["featured"], true);
    // Untouched fields survive the partial update.
    assert_eq!(json["category"], "minimal");
}

// ---------------------------------------------------------------------------
// Catalog listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_lists_only_published_templates(pool: PgPool) {
    let (_, admin_token) = common::seed_user(&pool, "admin@example.com", "admin").await;
    common::seed_template(&pool).await;

    let (app, _store) = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/templates",
        &admin_token,
        serde_json::json!({
            "name": "Hidden Draft",
            "category": "modern",
            "structure": minimal_structure(),
            "is_published": false
        }),
    )
    .await;

    let (app, _store) = common::build_test_app(pool);
    let response = get(app, "/api/v1/templates").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Clean Slate");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_filters_by_category(pool: PgPool) {
    common::seed_template(&pool).await;

    let (app, _store) = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/templates?category=minimal").await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (app, _store) = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/templates?category=creative").await;
    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());

    // Filter values are validated like any other category input.
    let (app, _store) = common::build_test_app(pool);
    let response = get(app, "/api/v1/templates?category=bogus").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_template_is_404(pool: PgPool) {
    let (app, _store) = common::build_test_app(pool);
    let response = get(app, "/api/v1/templates/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Deletion guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_in_use_cannot_be_deleted(pool: PgPool) {
    let (_, admin_token) = common::seed_user(&pool, "admin@example.com", "admin").await;
    let (_, user_token) = common::seed_user(&pool, "user@example.com", "user").await;
    let template_id = common::seed_template(&pool).await;

    let (app, _store) = common::build_test_app(pool.clone());
    let created = post_json(
        app,
        "/api/v1/portfolios",
        &user_token,
        serde_json::json!({ "title": "T", "subdomain": "uses-template", "template_id": template_id }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let portfolio_id = body_json(created).await["id"].as_i64().unwrap();

    // Referenced: refused with 409 and usage_count reports the reference.
    let (app, _store) = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/templates/{template_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let (app, _store) = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/templates/{template_id}")).await;
    assert_eq!(body_json(response).await["usage_count"], 1);

    // Last reference gone: deletion succeeds.
    let (app, _store) = common::build_test_app(pool.clone());
    delete(app, &format!("/api/v1/portfolios/{portfolio_id}"), &user_token).await;

    let (app, _store) = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/templates/{template_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (app, _store) = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/templates/{template_id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn reviews_update_the_rating_summary(pool: PgPool) {
    let (_, jane_token) = common::seed_user(&pool, "jane@example.com", "user").await;
    let (_, john_token) = common::seed_user(&pool, "john@example.com", "user").await;
    let template_id = common::seed_template(&pool).await;

    let (app, _store) = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/reviews"),
        &jane_token,
        serde_json::json!({ "rating": 5, "comment": "Lovely defaults" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (app, _store) = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/reviews"),
        &john_token,
        serde_json::json!({ "rating": 4 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let (app, _store) = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/templates/{template_id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["rating_average"], 4.5);
    assert_eq!(json["rating_count"], 2);

    let (app, _store) = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/templates/{template_id}/reviews")).await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_review_per_user_per_template(pool: PgPool) {
    let (_, token) = common::seed_user(&pool, "jane@example.com", "user").await;
    let template_id = common::seed_template(&pool).await;

    let (app, _store) = common::build_test_app(pool.clone());
    let first = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/reviews"),
        &token,
        serde_json::json!({ "rating": 4 }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let (app, _store) = common::build_test_app(pool);
    let second = post_json(
        app,
        &format!("/api/v1/templates/{template_id}/reviews"),
        &token,
        serde_json::json!({ "rating": 2 }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_rating_must_be_in_range(pool: PgPool) {
    let (_, token) = common::seed_user(&pool, "jane@example.com", "user").await;
    let template_id = common::seed_template(&pool).await;

    for rating in [0, 6] {
        let (app, _store) = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/v1/templates/{template_id}/reviews"),
            &token,
            serde_json::json!({ "rating": rating }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

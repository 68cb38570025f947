//! HTTP-level integration tests for categories, genres and titles.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, patch_json_auth, post_json, post_json_auth, TEST_YEAR,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn admin_token(pool: &PgPool) -> String {
    let admin = common::create_user(pool, "admin", "admin").await;
    common::token_for(&admin)
}

async fn seed_catalog(pool: &PgPool, token: &str) {
    for (path, name, slug) in [
        ("/api/v1/categories", "Books", "books"),
        ("/api/v1/genres", "Fantasy", "fantasy"),
        ("/api/v1/genres", "Adventure", "adventure"),
    ] {
        let body = serde_json::json!({"name": name, "slug": slug});
        let response = post_json_auth(common::build_test_app(pool.clone()), path, body, token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn create_title(pool: &PgPool, token: &str, body: serde_json::Value) -> axum::response::Response {
    post_json_auth(common::build_test_app(pool.clone()), "/api/v1/titles", body, token).await
}

// ---------------------------------------------------------------------------
// Categories & genres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn categories_list_exposes_name_and_slug_only(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;

    let response = get(common::build_test_app(pool), "/api/v1/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0], serde_json::json!({"name": "Books", "slug": "books"}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn genres_can_be_searched_by_name(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;

    let response = get(common::build_test_app(pool), "/api/v1/genres?search=fant").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["slug"], "fantasy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creating_category_requires_admin(pool: PgPool) {
    let user = common::create_user(&pool, "alice", "user").await;
    let body = serde_json::json!({"name": "Films", "slug": "films"});

    let response = post_json(common::build_test_app(pool.clone()), "/api/v1/categories", body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/categories",
        body,
        &common::token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_slug_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let body = serde_json::json!({"name": "Sci Fi", "slug": "sci fi"});
    let response = post_json_auth(common::build_test_app(pool), "/api/v1/genres", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_slug_conflicts(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;
    let body = serde_json::json!({"name": "Other books", "slug": "books"});
    let response =
        post_json_auth(common::build_test_app(pool), "/api/v1/categories", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_genre_by_slug(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;

    let response =
        delete_auth(common::build_test_app(pool.clone()), "/api/v1/genres/fantasy", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response =
        delete_auth(common::build_test_app(pool), "/api/v1/genres/fantasy", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn slugs_written_are_read_back_as_objects(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;

    let body = serde_json::json!({
        "name": "The Hobbit",
        "year": 1937,
        "category": "books",
        "genre": ["fantasy", "adventure"],
    });
    let response = create_title(&pool, &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(common::build_test_app(pool), &format!("/api/v1/titles/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category"], serde_json::json!({"name": "Books", "slug": "books"}));
    assert_eq!(
        json["genre"],
        serde_json::json!([
            {"name": "Adventure", "slug": "adventure"},
            {"name": "Fantasy", "slug": "fantasy"},
        ])
    );
    assert!(json["rating"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn year_bounds_are_enforced(pool: PgPool) {
    let token = admin_token(&pool).await;

    for (year, expected) in [
        (999, StatusCode::BAD_REQUEST),
        (TEST_YEAR + 1, StatusCode::BAD_REQUEST),
        (1000, StatusCode::CREATED),
        (TEST_YEAR, StatusCode::CREATED),
    ] {
        let body = serde_json::json!({"name": format!("Title {year}"), "year": year});
        let response = create_title(&pool, &token, body).await;
        assert_eq!(response.status(), expected, "year {year}");
        if expected == StatusCode::BAD_REQUEST {
            assert_eq!(body_json(response).await["code"], "YEAR_OUT_OF_RANGE");
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_genre_slug_is_rejected(pool: PgPool) {
    let token = admin_token(&pool).await;
    let body = serde_json::json!({"name": "Nowhere", "year": 2000, "genre": ["missing"]});
    let response = create_title(&pool, &token, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_is_mean_of_review_scores(pool: PgPool) {
    let token = admin_token(&pool).await;
    let response = create_title(&pool, &token, serde_json::json!({"name": "Dune", "year": 1965})).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    for (username, score) in [("alice", 3), ("bob", 5)] {
        let user = common::create_user(&pool, username, "user").await;
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/titles/{id}/reviews"),
            serde_json::json!({"text": "Thoughts", "score": score}),
            &common::token_for(&user),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(common::build_test_app(pool), &format!("/api/v1/titles/{id}")).await;
    assert_eq!(body_json(response).await["rating"], 4.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_category_and_year(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;
    create_title(&pool, &token, serde_json::json!({"name": "Dune", "year": 1965, "category": "books"})).await;
    create_title(&pool, &token, serde_json::json!({"name": "Alien", "year": 1979})).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/titles?category=books").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["name"], "Dune");

    let response = get(common::build_test_app(pool), "/api/v1/titles?year=1979").await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["name"], "Alien");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_updates_only_given_fields(pool: PgPool) {
    let token = admin_token(&pool).await;
    seed_catalog(&pool, &token).await;
    let response = create_title(
        &pool,
        &token,
        serde_json::json!({"name": "Dune", "year": 1965, "genre": ["fantasy"]}),
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/titles/{id}"),
        serde_json::json!({"description": "Spice", "genre": ["adventure"]}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Dune");
    assert_eq!(json["description"], "Spice");
    assert_eq!(json["genre"][0]["slug"], "adventure");

    let response = patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/titles/{id}"),
        serde_json::json!({"year": TEST_YEAR + 1}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_title_is_not_found(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/titles/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

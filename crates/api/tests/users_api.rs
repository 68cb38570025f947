//! HTTP-level integration tests for user administration and `/users/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, patch_json_auth, post_json_auth};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_is_read_only_on_me(pool: PgPool) {
    let alice = common::create_user(&pool, "alice", "user").await;
    let token = common::token_for(&alice);

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/me",
        serde_json::json!({"bio": "Film buff", "role": "admin"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["bio"], "Film buff");
    assert_eq!(json["role"], "user");

    let response = get_auth(common::build_test_app(pool), "/api/v1/users/me", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["role"], "user");
    assert_eq!(json["username"], "alice");
    assert!(json.get("confirmation_code").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_cannot_be_renamed_to_reserved_name(pool: PgPool) {
    let alice = common::create_user(&pool, "alice", "user").await;
    let response = patch_json_auth(
        common::build_test_app(pool),
        "/api/v1/users/me",
        serde_json::json!({"username": "me"}),
        &common::token_for(&alice),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "RESERVED_USERNAME");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_list_is_admin_only(pool: PgPool) {
    let alice = common::create_user(&pool, "alice", "user").await;
    let admin = common::create_user(&pool, "root", "admin").await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        &common::token_for(&alice),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/users?search=ali",
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["username"], "alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_manages_users_by_username(pool: PgPool) {
    let admin = common::create_user(&pool, "root", "admin").await;
    let token = common::token_for(&admin);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        serde_json::json!({"username": "carol", "email": "carol@example.com", "role": "moderator"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["role"], "moderator");

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/carol",
        serde_json::json!({"role": "admin", "first_name": "Carol"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "admin");
    assert_eq!(json["first_name"], "Carol");

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/carol",
        serde_json::json!({"role": "superuser"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response =
        delete_auth(common::build_test_app(pool.clone()), "/api/v1/users/carol", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), "/api/v1/users/carol", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

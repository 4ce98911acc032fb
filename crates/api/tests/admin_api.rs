//! Integration tests for the `/admin` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, put_json_auth, seed_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn member_management_is_admin_only(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/users", &alice.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", alice.id),
        &alice.token,
        serde_json::json!({"is_admin": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_lists_members(pool: PgPool) {
    let admin = seed_user(&pool, "root", true).await;
    seed_user(&pool, "alice", false).await;
    seed_user(&pool, "bob", false).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/users", &admin.token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    for row in json["data"].as_array().unwrap() {
        assert!(row.get("password_hash").is_none());
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_toggles_flags(pool: PgPool) {
    let admin = seed_user(&pool, "root", true).await;
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", alice.id),
        &admin.token,
        serde_json::json!({"is_active": false}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_active"], false);

    // Deactivated accounts cannot log in anymore.
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({"email": "alice@example.com", "password": "password123"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_cannot_deactivate_self(pool: PgPool) {
    let admin = seed_user(&pool, "root", true).await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{}", admin.id),
        &admin.token,
        serde_json::json!({"is_active": false}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

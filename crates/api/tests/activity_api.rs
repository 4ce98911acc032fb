//! Integration tests for the `/activity` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, seed_user};
use sqlx::PgPool;
use shareit_core::types::DbId;
use shareit_db::repositories::ActivityRepo;

async fn seed_activity(pool: &PgPool, user_id: DbId, action: &str, item_type: Option<&str>) {
    ActivityRepo::insert(
        pool,
        user_id,
        action,
        item_type,
        Some(1),
        Some(&serde_json::json!({"seed": true})),
    )
    .await
    .expect("activity insert should succeed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_sees_only_their_own_rows(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    let bob = seed_user(&pool, "bob", false).await;
    seed_activity(&pool, alice.id, "requested", Some("book")).await;
    seed_activity(&pool, bob.id, "approved", Some("book")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/activity", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["username"], "alice");
    assert_eq!(json["data"][0]["action"], "requested");

    // The user_id filter is ignored for non-admins.
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/activity?user_id={}", bob.id);
    let response = get_auth(app, &uri, &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["username"], "alice");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_sees_everything_and_may_filter(pool: PgPool) {
    let admin = seed_user(&pool, "root", true).await;
    let alice = seed_user(&pool, "alice", false).await;
    let bob = seed_user(&pool, "bob", false).await;
    seed_activity(&pool, alice.id, "requested", Some("book")).await;
    seed_activity(&pool, bob.id, "created", Some("boardgame")).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/activity", &admin.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/activity?user_id={}", bob.id);
    let response = get_auth(app, &uri, &admin.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["username"], "bob");

    // Action and item-type filters compose.
    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        "/api/v1/activity?action=requested&item_type=book",
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["action"], "requested");
}

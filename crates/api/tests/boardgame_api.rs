//! Integration tests for the `/boardgames` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_board_game_returns_201(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/boardgames",
        &alice.token,
        serde_json::json!({
            "title": "Brass: Birmingham",
            "designer": "Wallace",
            "min_players": 2,
            "max_players": 4,
            "complexity": "Hard",
            "categories": ["economic"],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Brass: Birmingham");
    assert_eq!(json["data"]["is_available"], true);
    assert_eq!(json["data"]["max_players"], 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_inverted_player_range(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/boardgames",
        &alice.token,
        serde_json::json!({
            "title": "Broken",
            "min_players": 4,
            "max_players": 2,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_unknown_complexity(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/boardgames",
        &alice.token,
        serde_json::json!({"title": "X", "complexity": "Brutal"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_complexity(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    for (title, complexity) in [("Light One", "Easy"), ("Heavy One", "Hard")] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(
            app,
            "/api/v1/boardgames",
            &alice.token,
            serde_json::json!({"title": title, "complexity": complexity}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/boardgames?complexity=Hard", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["title"], "Heavy One");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_and_delete_are_owner_only(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    let bob = seed_user(&pool, "bob", false).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/boardgames",
        &alice.token,
        serde_json::json!({"title": "Cascadia"}),
    )
    .await;
    let json = body_json(response).await;
    let game_id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/boardgames/{game_id}"),
        &bob.token,
        serde_json::json!({"designer": "Hijack"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/boardgames/{game_id}"), &bob.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/boardgames/{game_id}"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

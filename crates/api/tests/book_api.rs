//! Integration tests for the `/books` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, created_id, delete_auth, get_auth, post_json_auth, put_json_auth, seed_user,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_book_returns_201_and_starts_available(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/books",
        &alice.token,
        serde_json::json!({
            "title": "The Dispossessed",
            "author": "Ursula K. Le Guin",
            "genre": "Science Fiction",
            "tags": ["classic", "utopia"],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "The Dispossessed");
    assert_eq!(json["data"]["is_available"], true);
    assert_eq!(json["data"]["owner_id"], alice.id);
    assert_eq!(json["data"]["tags"][0], "classic");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_book_rejects_empty_title(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/books",
        &alice.token,
        serde_json::json!({"title": "", "author": "Nobody"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_books_filters_by_search_and_availability(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    common::seed_book(&pool, alice.id, "Dune").await;
    let hobbit = common::seed_book(&pool, alice.id, "The Hobbit").await;
    sqlx::query("UPDATE books SET is_available = false WHERE id = $1")
        .bind(hobbit)
        .execute(&pool)
        .await
        .unwrap();

    // Substring search matches case-insensitively.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/books?search=dune", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["title"], "Dune");

    // Availability filter.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/books?available=true", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["title"], "Dune");

    // Owner filter plus pagination fields present.
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/books?owner_id={}&limit=1", alice.id);
    let response = get_auth(app, &uri, &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["limit"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_book_returns_404(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/books/999999", &alice.token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_book_is_owner_only(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    let bob = seed_user(&pool, "bob", false).await;
    let book = common::seed_book(&pool, alice.id, "Dune").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/books/{book}"),
        &bob.token,
        serde_json::json!({"title": "Hijacked"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/books/{book}"),
        &alice.token,
        serde_json::json!({"genre": "Science Fiction"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["genre"], "Science Fiction");
    // Untouched fields survive a partial update.
    assert_eq!(json["data"]["title"], "Dune");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn metadata_update_cannot_flip_availability(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    let book = common::seed_book(&pool, alice.id, "Dune").await;

    // An is_available field in the body is simply ignored.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/books/{book}"),
        &alice.token,
        serde_json::json!({"is_available": false, "title": "Dune (2nd ed.)"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let available: bool = sqlx::query_scalar("SELECT is_available FROM books WHERE id = $1")
        .bind(book)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(available, "availability belongs to the ledger, not metadata updates");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_book_flow(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    let bob = seed_user(&pool, "bob", false).await;
    let book = common::seed_book(&pool, alice.id, "Dune").await;

    // Non-owner cannot delete.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/books/{book}"), &bob.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Owner can.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/books/{book}"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/books/{book}"), &alice.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_may_delete_someone_elses_book(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;
    let admin = seed_user(&pool, "root", true).await;
    let book = common::seed_book(&pool, alice.id, "Dune").await;

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/books/{book}"), &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn genres_lists_distinct_values(pool: PgPool) {
    let alice = seed_user(&pool, "alice", false).await;

    for (title, genre) in [("A", "Fantasy"), ("B", "Fantasy"), ("C", "History")] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(
            app,
            "/api/v1/books",
            &alice.token,
            serde_json::json!({"title": title, "author": "X", "genre": genre}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        created_id(response).await;
    }

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/books/genres", &alice.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!(["Fantasy", "History"]));
}

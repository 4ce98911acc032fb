//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the full router (same middleware stack as production) via
//! `tower::ServiceExt::oneshot`, with no TCP listener involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use shareit_api::auth::jwt::{generate_access_token, JwtConfig};
use shareit_api::auth::password::hash_password;
use shareit_api::config::ServerConfig;
use shareit_api::router::build_app_router;
use shareit_api::state::AppState;
use shareit_core::types::DbId;
use shareit_db::models::user::CreateUser;
use shareit_db::repositories::UserRepo;
use shareit_events::EventBus;

/// Fixed JWT secret for tests.
const TEST_JWT_SECRET: &str = "integration-test-secret-not-for-production";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The event bus has no consumers
/// attached: side effects are tested deterministically at the events-crate
/// level.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// A seeded user plus a valid bearer token for them.
pub struct TestUser {
    pub id: DbId,
    pub username: String,
    pub token: String,
}

/// Insert a user and mint a token signed with the test secret.
pub async fn seed_user(pool: &PgPool, username: &str, is_admin: bool) -> TestUser {
    let password_hash = hash_password("password123").expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash,
            full_name: None,
            flat_number: None,
            phone_number: None,
            preferred_contact: None,
        },
    )
    .await
    .expect("user insert should succeed");

    if is_admin {
        sqlx::query("UPDATE users SET is_admin = true WHERE id = $1")
            .bind(user.id)
            .execute(pool)
            .await
            .expect("admin flag update should succeed");
    }

    let config = test_config();
    let token =
        generate_access_token(user.id, is_admin, &config.jwt).expect("token generation");

    TestUser {
        id: user.id,
        username: user.username,
        token,
    }
}

/// Insert a book owned by `owner_id`, returning its id.
pub async fn seed_book(pool: &PgPool, owner_id: DbId, title: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO books (owner_id, title, author) VALUES ($1, $2, 'Author') RETURNING id",
    )
    .bind(owner_id)
    .bind(title)
    .fetch_one(pool)
    .await
    .expect("book insert should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// Send an authenticated GET request.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::get(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Send an authenticated POST request with a JSON body.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::post(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Send an authenticated PUT request with a JSON body.
pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(
        app,
        Request::put(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// Send an authenticated PUT request with no body.
pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::put(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Send an authenticated DELETE request.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::delete(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Read `data.id` from a creation response body.
pub async fn created_id(response: Response<Body>) -> i64 {
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("data.id should be a number")
}

//! Migration and pool bootstrap tests.

use sqlx::PgPool;

#[sqlx::test]
async fn health_check_passes_on_fresh_database(pool: PgPool) {
    shareit_db::health_check(&pool)
        .await
        .expect("health check should pass");
}

#[sqlx::test]
async fn migrations_create_expected_tables(pool: PgPool) {
    for table in [
        "users",
        "books",
        "board_games",
        "requests",
        "notifications",
        "activity_log",
    ] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("query should succeed");
        assert!(exists, "table {table} should exist after migrations");
    }
}

#[sqlx::test]
async fn request_status_check_constraint_rejects_unknown_status(pool: PgPool) {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash) \
         VALUES ('constraint_probe', 'probe@example.com', 'x') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO requests (item_type, item_id, requester_id, owner_id, \
                               status, pickup_date, return_date) \
         VALUES ('book', 1, $1, $1, 'loaned', '2025-06-01', '2025-06-10')",
    )
    .bind(user_id)
    .execute(&pool)
    .await;

    assert!(result.is_err(), "unknown status must violate the CHECK constraint");
}

//! Repository for the append-only `activity_log` table.

use sqlx::PgPool;
use shareit_core::types::DbId;

use crate::models::activity::{ActivityEntry, ActivityFilter};

/// Shared WHERE clause for filtered listing and counting.
const FILTER: &str = "($1::bigint IS NULL OR al.user_id = $1) \
                  AND ($2::text IS NULL OR al.action = $2) \
                  AND ($3::text IS NULL OR al.item_type = $3)";

/// Provides insert and query operations for the activity log.
///
/// Rows are never updated or deleted.
pub struct ActivityRepo;

impl ActivityRepo {
    /// Append an activity entry, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
        item_type: Option<&str>,
        item_id: Option<DbId>,
        details: Option<&serde_json::Value>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_log (user_id, action, item_type, item_id, details) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(user_id)
        .bind(action)
        .bind(item_type)
        .bind(item_id)
        .bind(details)
        .fetch_one(pool)
        .await
    }

    /// List activity entries matching the filter, newest first, joined
    /// with the actor's username.
    pub async fn list(
        pool: &PgPool,
        filter: &ActivityFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT al.id, al.user_id, u.username, al.action, al.item_type, al.item_id, \
                    al.details, al.created_at \
             FROM activity_log al \
             JOIN users u ON al.user_id = u.id \
             WHERE {FILTER} \
             ORDER BY al.created_at DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(filter.user_id)
            .bind(&filter.action)
            .bind(&filter.item_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count activity entries matching the filter.
    pub async fn count(pool: &PgPool, filter: &ActivityFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM activity_log al WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(filter.user_id)
            .bind(&filter.action)
            .bind(&filter.item_type)
            .fetch_one(pool)
            .await
    }
}

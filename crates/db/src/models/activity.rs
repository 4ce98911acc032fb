//! Activity log entity model.

use serde::Serialize;
use sqlx::FromRow;
use shareit_core::types::{DbId, Timestamp};

/// A row from the `activity_log` table, joined with the actor's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub action: String,
    pub item_type: Option<String>,
    pub item_id: Option<DbId>,
    pub details: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for listing activity with filters.
#[derive(Debug, Default)]
pub struct ActivityFilter {
    /// Restrict to a single actor. Non-admin callers are always restricted
    /// to themselves by the handler.
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub item_type: Option<String>,
}

//! Handlers for the `/activity` resource (read-only audit trail).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use shareit_core::types::DbId;
use shareit_db::models::activity::{ActivityEntry, ActivityFilter};
use shareit_db::repositories::ActivityRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::clamp_page;
use crate::response::PageResponse;
use crate::state::AppState;

/// Query parameters for `GET /activity`.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    /// Filter by actor. Admin only; non-admins always see their own rows.
    pub user_id: Option<DbId>,
    pub action: Option<String>,
    pub item_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/activity
///
/// List activity entries. Non-admin callers are restricted to their own
/// actions; admins may filter by any user or see everything.
pub async fn list_activity(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<PageResponse<ActivityEntry>>> {
    let (limit, offset) = clamp_page(params.limit, params.offset);

    let user_id = if auth.is_admin {
        params.user_id
    } else {
        Some(auth.user_id)
    };
    let filter = ActivityFilter {
        user_id,
        action: params.action,
        item_type: params.item_type,
    };

    let data = ActivityRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = ActivityRepo::count(&state.pool, &filter).await?;

    Ok(Json(PageResponse {
        data,
        total,
        limit,
        offset,
    }))
}

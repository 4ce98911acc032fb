//! Handlers for the `/admin` resource (member management).

use axum::extract::{Path, Query, State};
use axum::Json;
use shareit_core::authorize;
use shareit_core::error::CoreError;
use shareit_core::types::DbId;
use shareit_db::models::user::{UpdateUserFlags, UserResponse};
use shareit_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// GET /api/v1/admin/users
///
/// List all member accounts (admin only).
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<UserResponse>>> {
    authorize::require_admin(auth.is_admin)?;
    let (limit, offset) = page.clamp();

    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(Json(PageResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Toggle a member's `is_admin` / `is_active` flags (admin only).
/// Admins cannot deactivate their own account.
pub async fn update_user_flags(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateUserFlags>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    authorize::require_admin(auth.is_admin)?;

    if user_id == auth.user_id && input.is_active == Some(false) {
        return Err(CoreError::Conflict("Cannot deactivate your own account".into()).into());
    }

    let user = UserRepo::update_flags(&state.pool, user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    Ok(Json(DataResponse { data: user.into() }))
}

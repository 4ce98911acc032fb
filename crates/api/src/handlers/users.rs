//! Handlers for the `/users` resource (own profile + public profiles).

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use shareit_core::error::CoreError;
use shareit_core::types::DbId;
use shareit_db::models::user::{PublicProfile, UpdateProfile, UserResponse};
use shareit_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /users/me/password`.
#[derive(Debug, Deserialize)]
pub struct PasswordUpdate {
    pub old_password: String,
    pub new_password: String,
}

/// Validated profile update body (mirrors [`UpdateProfile`]).
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileBody {
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 20))]
    pub flat_number: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub preferred_contact: Option<String>,
}

/// GET /api/v1/users/me
///
/// Return the authenticated user's own profile.
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/users/me
///
/// Update the authenticated user's profile fields.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProfileBody>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;

    if let Some(contact) = &input.preferred_contact {
        if !matches!(contact.as_str(), "email" | "phone" | "both") {
            return Err(CoreError::Validation(
                "preferred_contact must be one of: email, phone, both".into(),
            )
            .into());
        }
    }

    let user = UserRepo::update_profile(
        &state.pool,
        auth.user_id,
        &UpdateProfile {
            full_name: input.full_name,
            flat_number: input.flat_number,
            phone_number: input.phone_number,
            preferred_contact: input.preferred_contact,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "User",
        id: auth.user_id,
    })?;

    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/users/me/password
///
/// Change the authenticated user's password after verifying the old one.
pub async fn update_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PasswordUpdate>,
) -> AppResult<Json<serde_json::Value>> {
    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    let old_valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(CoreError::Validation("Current password is incorrect".into()).into());
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, auth.user_id, &new_hash).await?;

    Ok(Json(serde_json::json!({
        "data": { "updated": true }
    })))
}

/// GET /api/v1/users/{id}
///
/// Return another member's public profile (active accounts only).
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let profile = UserRepo::public_profile(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    Ok(Json(DataResponse { data: profile }))
}

//! Handlers for the `/requests` resource.
//!
//! All lifecycle mutations go through the
//! [`RequestLedger`](crate::ledger::RequestLedger); handlers only parse
//! input and shape responses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;
use shareit_core::authorize;
use shareit_core::error::CoreError;
use shareit_core::item::ItemType;
use shareit_core::lifecycle::RequestStatus;
use shareit_core::types::DbId;
use shareit_db::models::request::{RequestDetail, RequestDirection, RequestFilter, UpdateRequest};
use shareit_db::repositories::RequestRepo;

use crate::error::AppResult;
use crate::ledger::RequestLedger;
use crate::middleware::auth::AuthUser;
use crate::query::clamp_page;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / body types
// ---------------------------------------------------------------------------

/// Body for `POST /requests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRequestBody {
    pub item_type: ItemType,
    pub item_id: DbId,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Query parameters for `GET /requests`.
#[derive(Debug, Deserialize)]
pub struct RequestQuery {
    /// `sent` (requests I made) or `received` (requests on my items);
    /// both when omitted.
    #[serde(rename = "type")]
    pub direction: Option<RequestDirection>,
    pub status: Option<RequestStatus>,
    pub item_type: Option<ItemType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Flag a detail row with the caller's relationship to it, matching what
/// list/detail consumers render.
fn with_role_flags(detail: RequestDetail, user_id: DbId) -> serde_json::Value {
    let is_owner = detail.request.owner_id == user_id;
    let is_requester = detail.request.requester_id == user_id;
    let mut value = serde_json::to_value(detail).unwrap_or_else(|_| json!({}));
    if let Some(obj) = value.as_object_mut() {
        obj.insert("is_owner".into(), json!(is_owner));
        obj.insert("is_requester".into(), json!(is_requester));
    }
    value
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/requests
///
/// List requests the authenticated user is a party to.
pub async fn list_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RequestQuery>,
) -> AppResult<Json<PageResponse<serde_json::Value>>> {
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let filter = RequestFilter {
        direction: params.direction,
        status: params.status,
        item_type: params.item_type,
    };

    let rows = RequestRepo::list_for_user(&state.pool, auth.user_id, &filter, limit, offset).await?;
    let total = RequestRepo::count_for_user(&state.pool, auth.user_id, &filter).await?;

    let data = rows
        .into_iter()
        .map(|detail| with_role_flags(detail, auth.user_id))
        .collect();

    Ok(Json(PageResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// POST /api/v1/requests
///
/// Create a borrow request against an available item.
pub async fn create_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRequestBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let request = RequestLedger::new(&state).create(auth.user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "id": request.id } })),
    ))
}

/// GET /api/v1/requests/{id}
///
/// Request detail, restricted to the requester, the owner, and admins.
pub async fn get_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let detail = RequestRepo::find_detail_by_id(&state.pool, request_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Request",
            id: request_id,
        })?;

    authorize::require_participant(
        auth.user_id,
        detail.request.requester_id,
        detail.request.owner_id,
        auth.is_admin,
    )?;

    Ok(Json(DataResponse {
        data: with_role_flags(detail, auth.user_id),
    }))
}

/// PUT /api/v1/requests/{id}
///
/// Amend a still-pending request's dates or notes (requester only).
pub async fn update_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(input): Json<UpdateRequest>,
) -> AppResult<Json<DataResponse<shareit_db::models::request::Request>>> {
    let request = RequestLedger::new(&state)
        .update(auth.user_id, request_id, &input)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/requests/{id}/approve
///
/// Approve a pending request (owner only).
pub async fn approve_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<shareit_db::models::request::Request>>> {
    let request = RequestLedger::new(&state)
        .approve(auth.user_id, request_id)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/requests/{id}/reject
///
/// Reject a pending request (owner only).
pub async fn reject_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<shareit_db::models::request::Request>>> {
    let request = RequestLedger::new(&state)
        .reject(auth.user_id, request_id)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/requests/{id}/cancel
///
/// Withdraw a pending request (requester only).
pub async fn cancel_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<shareit_db::models::request::Request>>> {
    let request = RequestLedger::new(&state)
        .cancel(auth.user_id, request_id)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/requests/{id}/return
///
/// Mark an approved request's item as physically returned (owner only).
pub async fn return_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<shareit_db::models::request::Request>>> {
    let request = RequestLedger::new(&state)
        .return_item(auth.user_id, request_id)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

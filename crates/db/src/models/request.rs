//! Borrow request entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shareit_core::item::ItemType;
use shareit_core::lifecycle::RequestStatus;
use shareit_core::types::{DbId, Timestamp};

/// A row from the `requests` table.
///
/// `item_type` and `status` decode through their core enums, so an
/// out-of-vocabulary value in the database surfaces as a decode error
/// rather than leaking into handlers as a free-form string.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Request {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub item_type: ItemType,
    pub item_id: DbId,
    pub requester_id: DbId,
    /// Denormalized copy of the item's owner at creation time.
    pub owner_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub notes: Option<String>,
    pub request_date: Timestamp,
    pub response_date: Option<Timestamp>,
}

/// A request joined with counterpart names and item metadata, as shown in
/// request lists and detail views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequestDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: Request,
    pub requester_name: String,
    pub owner_name: String,
    pub item_title: Option<String>,
    /// Author for books, designer for board games.
    pub item_creator: Option<String>,
    pub item_image: Option<String>,
}

/// DTO for inserting a request row.
#[derive(Debug)]
pub struct CreateRequest {
    pub item_type: ItemType,
    pub item_id: DbId,
    pub requester_id: DbId,
    pub owner_id: DbId,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub notes: Option<String>,
}

/// DTO for amending a still-pending request.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub pickup_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Direction of a request relative to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDirection {
    /// Requests the user made.
    Sent,
    /// Requests against the user's items.
    Received,
}

/// DTO for listing requests with filters.
#[derive(Debug, Default)]
pub struct RequestFilter {
    pub direction: Option<RequestDirection>,
    pub status: Option<RequestStatus>,
    pub item_type: Option<ItemType>,
}

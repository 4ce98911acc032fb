//! Handlers for the `/books` resource.
//!
//! Books are one half of the item registry. Creation and metadata updates
//! belong to the owner; availability belongs to the request ledger and is
//! not reachable from any handler here.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;
use shareit_core::authorize;
use shareit_core::error::CoreError;
use shareit_core::item::ItemType;
use shareit_core::types::DbId;
use shareit_db::models::book::{BookDetail, BookFilter, CreateBook, UpdateBook};
use shareit_db::repositories::{BookRepo, DeleteOutcome, ItemRepo};
use shareit_events::{events, DomainEvent};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::clamp_page;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / body types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /books`.
#[derive(Debug, Deserialize)]
pub struct BookQuery {
    /// Case-insensitive substring match on title or author.
    pub search: Option<String>,
    pub genre: Option<String>,
    pub available: Option<bool>,
    pub owner_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated body for `POST /books`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookBody {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(length(max = 20))]
    pub isbn: Option<String>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    #[validate(range(min = 1000, max = 2100))]
    pub publication_year: Option<i32>,
    #[validate(length(max = 20))]
    pub language: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub cover_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<CreateBookBody> for CreateBook {
    fn from(body: CreateBookBody) -> Self {
        CreateBook {
            title: body.title,
            author: body.author,
            isbn: body.isbn,
            genre: body.genre,
            publication_year: body.publication_year,
            language: body.language,
            description: body.description,
            cover_url: body.cover_url,
            tags: body.tags,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/books
///
/// List books with optional filters and pagination.
pub async fn list_books(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookQuery>,
) -> AppResult<Json<PageResponse<BookDetail>>> {
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let filter = BookFilter {
        search: params.search,
        genre: params.genre,
        available: params.available,
        owner_id: params.owner_id,
    };

    let data = BookRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = BookRepo::count(&state.pool, &filter).await?;

    Ok(Json(PageResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// POST /api/v1/books
///
/// Add a book to the catalog. The new book starts available.
pub async fn create_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBookBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let book = BookRepo::create(&state.pool, auth.user_id, &input.into()).await?;

    state.event_bus.publish(
        DomainEvent::new(events::ITEM_CREATED)
            .with_item(ItemType::Book, book.id)
            .with_actor(auth.user_id)
            .with_payload(json!({ "title": book.title })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// GET /api/v1/books/{id}
pub async fn get_book(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookDetail>>> {
    let book = BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        })?;
    Ok(Json(DataResponse { data: book }))
}

/// PUT /api/v1/books/{id}
///
/// Update a book's metadata (owner only). Availability cannot be changed
/// through this endpoint.
pub async fn update_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Json(input): Json<UpdateBook>,
) -> AppResult<Json<DataResponse<shareit_db::models::book::Book>>> {
    let existing = BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        })?;
    authorize::require_owner(auth.user_id, existing.book.owner_id)?;

    let book = BookRepo::update(&state.pool, book_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        })?;

    state.event_bus.publish(
        DomainEvent::new(events::ITEM_UPDATED)
            .with_item(ItemType::Book, book.id)
            .with_actor(auth.user_id)
            .with_payload(json!({ "title": book.title })),
    );

    Ok(Json(DataResponse { data: book }))
}

/// DELETE /api/v1/books/{id}
///
/// Remove a book (owner or admin only). Refused with `Conflict` while any
/// request on it is pending or approved.
pub async fn delete_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = BookRepo::find_by_id(&state.pool, book_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        })?;
    authorize::require_owner_or_admin(auth.user_id, existing.book.owner_id, auth.is_admin)?;

    match ItemRepo::delete_checked(&state.pool, ItemType::Book, book_id).await? {
        DeleteOutcome::Deleted => {
            state.event_bus.publish(
                DomainEvent::new(events::ITEM_DELETED)
                    .with_item(ItemType::Book, book_id)
                    .with_actor(auth.user_id)
                    .with_payload(json!({ "title": existing.book.title })),
            );
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotFound => Err(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }
        .into()),
        DeleteOutcome::ActiveRequests => Err(CoreError::Conflict(
            "Cannot delete an item with pending or approved requests".into(),
        )
        .into()),
    }
}

/// GET /api/v1/books/genres
///
/// List the distinct genres currently in the catalog.
pub async fn list_genres(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let genres = BookRepo::genres(&state.pool).await?;
    Ok(Json(DataResponse { data: genres }))
}

//! Book entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shareit_core::types::{DbId, Timestamp};

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub tags: serde_json::Value,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A book joined with its owner's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub book: Book,
    pub owner_name: String,
}

/// DTO for listing books with filters.
#[derive(Debug, Default)]
pub struct BookFilter {
    /// Case-insensitive substring match on title or author.
    pub search: Option<String>,
    pub genre: Option<String>,
    pub available: Option<bool>,
    pub owner_id: Option<DbId>,
}

/// DTO for creating a book.
#[derive(Debug, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// DTO for updating a book's metadata.
///
/// Deliberately has no `is_available` field: availability is owned by the
/// request ledger and only flips through [`ItemRepo::set_availability`]
/// (crate::repositories::item_repo::ItemRepo).
#[derive(Debug, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publication_year: Option<i32>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

//! Repository for the `books` table.

use sqlx::PgPool;
use shareit_core::types::DbId;

use crate::models::book::{Book, BookDetail, BookFilter, CreateBook, UpdateBook};

/// Column list for `books` queries (prefixed for joined queries).
const COLUMNS: &str = "b.id, b.owner_id, b.title, b.author, b.isbn, b.genre, \
                       b.publication_year, b.language, b.description, b.cover_url, \
                       b.tags, b.is_available, b.created_at, b.updated_at";

/// Shared WHERE clause for filtered listing and counting.
///
/// Optional filters are expressed as `($n IS NULL OR ...)` so a single
/// static query covers every filter combination.
const FILTER: &str = "($1::text IS NULL OR b.title ILIKE '%' || $1 || '%' \
                                       OR b.author ILIKE '%' || $1 || '%') \
                  AND ($2::text IS NULL OR b.genre = $2) \
                  AND ($3::boolean IS NULL OR b.is_available = $3) \
                  AND ($4::bigint IS NULL OR b.owner_id = $4)";

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row. New books start
    /// available.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateBook,
    ) -> Result<Book, sqlx::Error> {
        let tags = serde_json::json!(input.tags.clone().unwrap_or_default());
        let query = format!(
            "INSERT INTO books (owner_id, title, author, isbn, genre, publication_year, \
                                language, description, cover_url, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {columns}",
            columns = COLUMNS.replace("b.", "")
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.isbn)
            .bind(&input.genre)
            .bind(input.publication_year)
            .bind(&input.language)
            .bind(&input.description)
            .bind(&input.cover_url)
            .bind(tags)
            .fetch_one(pool)
            .await
    }

    /// Find a book by ID, joined with the owner's username.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BookDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, u.username AS owner_name \
             FROM books b JOIN users u ON b.owner_id = u.id \
             WHERE b.id = $1"
        );
        sqlx::query_as::<_, BookDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List books matching the filter, most recent first.
    pub async fn list(
        pool: &PgPool,
        filter: &BookFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, u.username AS owner_name \
             FROM books b JOIN users u ON b.owner_id = u.id \
             WHERE {FILTER} \
             ORDER BY b.created_at DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, BookDetail>(&query)
            .bind(&filter.search)
            .bind(&filter.genre)
            .bind(filter.available)
            .bind(filter.owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count books matching the filter.
    pub async fn count(pool: &PgPool, filter: &BookFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM books b WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.search)
            .bind(&filter.genre)
            .bind(filter.available)
            .bind(filter.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Update a book's metadata. Only non-`None` fields are applied;
    /// availability is untouchable here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let tags = input.tags.clone().map(|t| serde_json::json!(t));
        let query = format!(
            "UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn),
                genre = COALESCE($5, genre),
                publication_year = COALESCE($6, publication_year),
                language = COALESCE($7, language),
                description = COALESCE($8, description),
                cover_url = COALESCE($9, cover_url),
                tags = COALESCE($10, tags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {columns}",
            columns = COLUMNS.replace("b.", "")
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.isbn)
            .bind(&input.genre)
            .bind(input.publication_year)
            .bind(&input.language)
            .bind(&input.description)
            .bind(&input.cover_url)
            .bind(tags)
            .fetch_optional(pool)
            .await
    }

    /// List the distinct genres currently in the catalog.
    pub async fn genres(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT genre FROM books WHERE genre IS NOT NULL ORDER BY genre",
        )
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `board_games` table.

use sqlx::PgPool;
use shareit_core::types::DbId;

use crate::models::board_game::{
    BoardGame, BoardGameDetail, BoardGameFilter, CreateBoardGame, UpdateBoardGame,
};

/// Column list for `board_games` queries (prefixed for joined queries).
const COLUMNS: &str = "g.id, g.owner_id, g.title, g.designer, g.min_players, g.max_players, \
                       g.play_time, g.complexity, g.description, g.image_url, \
                       g.categories, g.is_available, g.created_at, g.updated_at";

/// Shared WHERE clause for filtered listing and counting.
const FILTER: &str = "($1::text IS NULL OR g.title ILIKE '%' || $1 || '%' \
                                       OR g.designer ILIKE '%' || $1 || '%') \
                  AND ($2::text IS NULL OR g.complexity = $2) \
                  AND ($3::boolean IS NULL OR g.is_available = $3) \
                  AND ($4::bigint IS NULL OR g.owner_id = $4)";

/// Provides CRUD operations for board games.
pub struct BoardGameRepo;

impl BoardGameRepo {
    /// Insert a new board game, returning the created row. New games start
    /// available.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateBoardGame,
    ) -> Result<BoardGame, sqlx::Error> {
        let categories = serde_json::json!(input.categories.clone().unwrap_or_default());
        let query = format!(
            "INSERT INTO board_games (owner_id, title, designer, min_players, max_players, \
                                      play_time, complexity, description, image_url, categories)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {columns}",
            columns = COLUMNS.replace("g.", "")
        );
        sqlx::query_as::<_, BoardGame>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.designer)
            .bind(input.min_players)
            .bind(input.max_players)
            .bind(&input.play_time)
            .bind(&input.complexity)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(categories)
            .fetch_one(pool)
            .await
    }

    /// Find a board game by ID, joined with the owner's username.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BoardGameDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, u.username AS owner_name \
             FROM board_games g JOIN users u ON g.owner_id = u.id \
             WHERE g.id = $1"
        );
        sqlx::query_as::<_, BoardGameDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List board games matching the filter, most recent first.
    pub async fn list(
        pool: &PgPool,
        filter: &BoardGameFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BoardGameDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, u.username AS owner_name \
             FROM board_games g JOIN users u ON g.owner_id = u.id \
             WHERE {FILTER} \
             ORDER BY g.created_at DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, BoardGameDetail>(&query)
            .bind(&filter.search)
            .bind(&filter.complexity)
            .bind(filter.available)
            .bind(filter.owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count board games matching the filter.
    pub async fn count(pool: &PgPool, filter: &BoardGameFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM board_games g WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.search)
            .bind(&filter.complexity)
            .bind(filter.available)
            .bind(filter.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Update a board game's metadata. Only non-`None` fields are applied;
    /// availability is untouchable here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBoardGame,
    ) -> Result<Option<BoardGame>, sqlx::Error> {
        let categories = input.categories.clone().map(|c| serde_json::json!(c));
        let query = format!(
            "UPDATE board_games SET
                title = COALESCE($2, title),
                designer = COALESCE($3, designer),
                min_players = COALESCE($4, min_players),
                max_players = COALESCE($5, max_players),
                play_time = COALESCE($6, play_time),
                complexity = COALESCE($7, complexity),
                description = COALESCE($8, description),
                image_url = COALESCE($9, image_url),
                categories = COALESCE($10, categories),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {columns}",
            columns = COLUMNS.replace("g.", "")
        );
        sqlx::query_as::<_, BoardGame>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.designer)
            .bind(input.min_players)
            .bind(input.max_players)
            .bind(&input.play_time)
            .bind(&input.complexity)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(categories)
            .fetch_optional(pool)
            .await
    }
}

//! Board game entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use shareit_core::types::{DbId, Timestamp};

/// A row from the `board_games` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardGame {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub designer: Option<String>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub play_time: Option<String>,
    pub complexity: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: serde_json::Value,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A board game joined with its owner's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardGameDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub board_game: BoardGame,
    pub owner_name: String,
}

/// DTO for listing board games with filters.
#[derive(Debug, Default)]
pub struct BoardGameFilter {
    /// Case-insensitive substring match on title or designer.
    pub search: Option<String>,
    pub complexity: Option<String>,
    pub available: Option<bool>,
    pub owner_id: Option<DbId>,
}

/// DTO for creating a board game.
#[derive(Debug, Deserialize)]
pub struct CreateBoardGame {
    pub title: String,
    pub designer: Option<String>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub play_time: Option<String>,
    pub complexity: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// DTO for updating a board game's metadata.
///
/// As with books, availability is absent on purpose -- it belongs to the
/// request ledger.
#[derive(Debug, Deserialize)]
pub struct UpdateBoardGame {
    pub title: Option<String>,
    pub designer: Option<String>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub play_time: Option<String>,
    pub complexity: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub categories: Option<Vec<String>>,
}

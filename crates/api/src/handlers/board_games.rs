//! Handlers for the `/boardgames` resource.
//!
//! Mirrors the book handlers; the only board-game-specific rule is the
//! player count ordering check.

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
use shareit_db::models::board_game::{
    BoardGame, BoardGameDetail, BoardGameFilter, CreateBoardGame, UpdateBoardGame,
};
use shareit_db::repositories::{BoardGameRepo, DeleteOutcome, ItemRepo};
use shareit_events::{events, DomainEvent};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::clamp_page;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / body types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /boardgames`.
#[derive(Debug, Deserialize)]
pub struct BoardGameQuery {
    /// Case-insensitive substring match on title or designer.
    pub search: Option<String>,
    pub complexity: Option<String>,
    pub available: Option<bool>,
    pub owner_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated body for `POST /boardgames`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardGameBody {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 100))]
    pub designer: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub min_players: Option<i32>,
    #[validate(range(min = 1, max = 20))]
    pub max_players: Option<i32>,
    #[validate(length(max = 50))]
    pub play_time: Option<String>,
    pub complexity: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// Cross-field check: max_players must not undercut min_players.
fn validate_player_range(min: Option<i32>, max: Option<i32>) -> Result<(), CoreError> {
    if let (Some(min), Some(max)) = (min, max) {
        if max < min {
            return Err(CoreError::Validation(
                "max_players must be greater than or equal to min_players".into(),
            ));
        }
    }
    Ok(())
}

impl From<CreateBoardGameBody> for CreateBoardGame {
    fn from(body: CreateBoardGameBody) -> Self {
        CreateBoardGame {
            title: body.title,
            designer: body.designer,
            min_players: body.min_players,
            max_players: body.max_players,
            play_time: body.play_time,
            complexity: body.complexity,
            description: body.description,
            image_url: body.image_url,
            categories: body.categories,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/boardgames
pub async fn list_board_games(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BoardGameQuery>,
) -> AppResult<Json<PageResponse<BoardGameDetail>>> {
    let (limit, offset) = clamp_page(params.limit, params.offset);
    let filter = BoardGameFilter {
        search: params.search,
        complexity: params.complexity,
        available: params.available,
        owner_id: params.owner_id,
    };

    let data = BoardGameRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = BoardGameRepo::count(&state.pool, &filter).await?;

    Ok(Json(PageResponse {
        data,
        total,
        limit,
        offset,
    }))
}

/// POST /api/v1/boardgames
pub async fn create_board_game(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBoardGameBody>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_player_range(input.min_players, input.max_players)?;

    if let Some(complexity) = &input.complexity {
        if !matches!(complexity.as_str(), "Easy" | "Medium" | "Hard") {
            return Err(CoreError::Validation(
                "complexity must be one of: Easy, Medium, Hard".into(),
            )
            .into());
        }
    }

    let game = BoardGameRepo::create(&state.pool, auth.user_id, &input.into()).await?;

    state.event_bus.publish(
        DomainEvent::new(events::ITEM_CREATED)
            .with_item(ItemType::BoardGame, game.id)
            .with_actor(auth.user_id)
            .with_payload(json!({ "title": game.title })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: game })))
}

/// GET /api/v1/boardgames/{id}
pub async fn get_board_game(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(game_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BoardGameDetail>>> {
    let game = BoardGameRepo::find_by_id(&state.pool, game_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BoardGame",
            id: game_id,
        })?;
    Ok(Json(DataResponse { data: game }))
}

/// PUT /api/v1/boardgames/{id}
///
/// Update a board game's metadata (owner only).
pub async fn update_board_game(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(game_id): Path<DbId>,
    Json(input): Json<UpdateBoardGame>,
) -> AppResult<Json<DataResponse<BoardGame>>> {
    let existing = BoardGameRepo::find_by_id(&state.pool, game_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BoardGame",
            id: game_id,
        })?;
    authorize::require_owner(auth.user_id, existing.board_game.owner_id)?;

    if let Some(complexity) = &input.complexity {
        if !matches!(complexity.as_str(), "Easy" | "Medium" | "Hard") {
            return Err(CoreError::Validation(
                "complexity must be one of: Easy, Medium, Hard".into(),
            )
            .into());
        }
    }
    validate_player_range(
        input.min_players.or(existing.board_game.min_players),
        input.max_players.or(existing.board_game.max_players),
    )?;

    let game = BoardGameRepo::update(&state.pool, game_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BoardGame",
            id: game_id,
        })?;

    state.event_bus.publish(
        DomainEvent::new(events::ITEM_UPDATED)
            .with_item(ItemType::BoardGame, game.id)
            .with_actor(auth.user_id)
            .with_payload(json!({ "title": game.title })),
    );

    Ok(Json(DataResponse { data: game }))
}

/// DELETE /api/v1/boardgames/{id}
///
/// Remove a board game (owner or admin only). Refused with `Conflict`
/// while any request on it is pending or approved.
pub async fn delete_board_game(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(game_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let existing = BoardGameRepo::find_by_id(&state.pool, game_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BoardGame",
            id: game_id,
        })?;
    authorize::require_owner_or_admin(auth.user_id, existing.board_game.owner_id, auth.is_admin)?;

    match ItemRepo::delete_checked(&state.pool, ItemType::BoardGame, game_id).await? {
        DeleteOutcome::Deleted => {
            state.event_bus.publish(
                DomainEvent::new(events::ITEM_DELETED)
                    .with_item(ItemType::BoardGame, game_id)
                    .with_actor(auth.user_id)
                    .with_payload(json!({ "title": existing.board_game.title })),
            );
            Ok(StatusCode::NO_CONTENT)
        }
        DeleteOutcome::NotFound => Err(CoreError::NotFound {
            entity: "BoardGame",
            id: game_id,
        }
        .into()),
        DeleteOutcome::ActiveRequests => Err(CoreError::Conflict(
            "Cannot delete an item with pending or approved requests".into(),
        )
        .into()),
    }
}

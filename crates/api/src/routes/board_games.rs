//! Route definitions for the `/boardgames` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::board_games;
use crate::state::AppState;

/// Routes mounted at `/boardgames`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(board_games::list_board_games).post(board_games::create_board_game),
        )
        .route(
            "/{id}",
            get(board_games::get_board_game)
                .put(board_games::update_board_game)
                .delete(board_games::delete_board_game),
        )
}

//! Route definitions for the `/requests` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET    /               -> list_requests
/// POST   /               -> create_request
/// GET    /{id}           -> get_request
/// PUT    /{id}           -> update_request (pending only)
/// PUT    /{id}/approve   -> approve_request (owner)
/// PUT    /{id}/reject    -> reject_request (owner)
/// PUT    /{id}/cancel    -> cancel_request (requester)
/// PUT    /{id}/return    -> return_request (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requests::list_requests).post(requests::create_request),
        )
        .route(
            "/{id}",
            get(requests::get_request).put(requests::update_request),
        )
        .route("/{id}/approve", put(requests::approve_request))
        .route("/{id}/reject", put(requests::reject_request))
        .route("/{id}/cancel", put(requests::cancel_request))
        .route("/{id}/return", put(requests::return_request))
}

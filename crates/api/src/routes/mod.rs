//! Route tree for the `/api/v1` prefix.

pub mod activity;
pub mod admin;
pub mod auth;
pub mod board_games;
pub mod books;
pub mod health;
pub mod notifications;
pub mod requests;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
///
/// /users/me                         get, update own profile
/// /users/me/password                change password
/// /users/{id}                       public profile
///
/// /books                            list, create
/// /books/genres                     distinct genres
/// /books/{id}                       get, update, delete
///
/// /boardgames                       list, create
/// /boardgames/{id}                  get, update, delete
///
/// /requests                         list, create
/// /requests/{id}                    get, update (pending only)
/// /requests/{id}/approve            owner approves (PUT)
/// /requests/{id}/reject             owner rejects (PUT)
/// /requests/{id}/cancel             requester withdraws (PUT)
/// /requests/{id}/return             owner marks returned (PUT)
///
/// /notifications                    list, delete-all
/// /notifications/unread-count       unread counter
/// /notifications/read-all           mark all read (PUT)
/// /notifications/{id}/read          mark one read (PUT)
/// /notifications/{id}               delete one
///
/// /activity                         audit trail (own rows; admin sees all)
///
/// /admin/users                      list members (admin only)
/// /admin/users/{id}                 toggle flags (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (public endpoints).
        .nest("/auth", auth::router())
        // Own profile and public member profiles.
        .nest("/users", users::router())
        // Item registry.
        .nest("/books", books::router())
        .nest("/boardgames", board_games::router())
        // Request ledger.
        .nest("/requests", requests::router())
        // Notification inbox.
        .nest("/notifications", notifications::router())
        // Activity audit trail.
        .nest("/activity", activity::router())
        // Member administration.
        .nest("/admin", admin::router())
}

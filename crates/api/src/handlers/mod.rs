//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers stay thin: they validate input, delegate to the ledger or the
//! corresponding repository in `shareit_db`, and map errors via
//! [`AppError`](crate::error::AppError).

pub mod activity;
pub mod admin;
pub mod auth;
pub mod board_games;
pub mod books;
pub mod health;
pub mod notifications;
pub mod requests;
pub mod users;

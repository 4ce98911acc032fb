//! Domain logic for the sharing platform.
//!
//! This crate holds everything that can be expressed without touching the
//! database: the request lifecycle state machine, the item type union, the
//! error taxonomy, authorization predicates, and borrow-window validation.
//! It is consumed by both the repository layer (`shareit-db`) and the API
//! layer (`shareit-api`).

pub mod activity;
pub mod authorize;
pub mod error;
pub mod item;
pub mod lifecycle;
pub mod notification;
pub mod types;
pub mod validation;

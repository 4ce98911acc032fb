use crate::types::DbId;

/// Domain error taxonomy.
///
/// Every variant maps to a distinct, user-actionable HTTP response in the
/// API layer. Mutating operations return these as typed results; they are
/// never collapsed into an opaque error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Item unavailable: {0}")]
    Unavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for list endpoints.
pub const MAX_LIMIT: i64 = 100;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Resolve to a clamped `(limit, offset)` pair.
    pub fn clamp(&self) -> (i64, i64) {
        clamp_page(self.limit, self.offset)
    }
}

/// Clamp raw `limit`/`offset` query values to sane bounds.
///
/// Query structs embed `limit`/`offset` as plain optional fields (rather
/// than flattening [`PaginationParams`]) because `serde_urlencoded` cannot
/// deserialize numbers through `#[serde(flatten)]`.
pub fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let (limit, offset) = PaginationParams::default().clamp();
        assert_eq!(limit, DEFAULT_LIMIT);
        assert_eq!(offset, 0);
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        let (limit, offset) = params.clamp();
        assert_eq!(limit, MAX_LIMIT);
        assert_eq!(offset, 0);

        let params = PaginationParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.clamp().0, 1);
    }
}

//! Notification kind constants.

/// Severity/styling kinds for notifications, matching the CHECK constraint
/// on `notifications.kind`.
pub mod kinds {
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

/// All valid notification kinds.
pub const VALID_KINDS: &[&str] = &[
    kinds::INFO,
    kinds::SUCCESS,
    kinds::WARNING,
    kinds::ERROR,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_kinds_contains_all_four() {
        assert_eq!(VALID_KINDS.len(), 4);
        assert!(VALID_KINDS.contains(&"info"));
        assert!(VALID_KINDS.contains(&"success"));
        assert!(VALID_KINDS.contains(&"warning"));
        assert!(VALID_KINDS.contains(&"error"));
    }
}

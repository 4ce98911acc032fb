//! Activity log action constants.
//!
//! The activity log is append-only; rows are written by the activity
//! recorder in reaction to domain events. Action strings are a closed
//! vocabulary so dashboards and filters can rely on exact matches.

/// Known action values for activity log entries.
pub mod actions {
    /// A borrow request was created.
    pub const REQUESTED: &str = "requested";
    /// A borrow request was approved by the item owner.
    pub const APPROVED: &str = "approved";
    /// A borrow request was rejected by the item owner.
    pub const REJECTED: &str = "rejected";
    /// A borrow request was withdrawn by the requester.
    pub const CANCELLED: &str = "cancelled";
    /// A borrowed item was marked returned.
    pub const RETURNED: &str = "returned";
    /// A pending request's dates or notes were amended.
    pub const UPDATED_REQUEST: &str = "updated_request";
    /// A catalog item was created.
    pub const CREATED: &str = "created";
    /// A catalog item's metadata was updated.
    pub const UPDATED: &str = "updated";
    /// A catalog item was deleted.
    pub const DELETED: &str = "deleted";
    /// A new member registered.
    pub const REGISTERED: &str = "registered";
}

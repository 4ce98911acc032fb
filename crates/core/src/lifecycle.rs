//! Borrow request lifecycle state machine.
//!
//! A request moves through a fixed set of states:
//!
//! ```text
//!             ┌──────────┐  approve   ┌──────────┐  return   ┌──────────┐
//!             │ pending  │ ─────────> │ approved │ ────────> │ returned │
//!             └──────────┘            └──────────┘           └──────────┘
//!               │      │
//!        reject │      │ cancel
//!               v      v
//!        ┌──────────┐ ┌───────────┐
//!        │ rejected │ │ cancelled │
//!        └──────────┘ └───────────┘
//! ```
//!
//! `rejected`, `cancelled`, and `returned` are terminal. Any other
//! transition is illegal and must surface as [`CoreError::InvalidState`] to
//! the caller — never be silently ignored. The repository layer enforces
//! the same rules with status-guarded conditional updates; the functions
//! here exist so callers can diagnose a refused transition precisely.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a borrow request.
///
/// Stored as lowercase text in the database; the CHECK constraint on the
/// `requests.status` column mirrors this enum exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Returned,
}

impl RequestStatus {
    /// All states, in lifecycle order.
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Cancelled,
        RequestStatus::Returned,
    ];

    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
            RequestStatus::Returned => "returned",
        }
    }

    /// Whether no further transition is possible from this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestStatus::Rejected | RequestStatus::Cancelled | RequestStatus::Returned
        )
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
                | (RequestStatus::Pending, RequestStatus::Cancelled)
                | (RequestStatus::Approved, RequestStatus::Returned)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            "returned" => Ok(RequestStatus::Returned),
            other => Err(format!("unknown request status '{other}'")),
        }
    }
}

// Used by sqlx's `#[sqlx(try_from = "String")]`, which needs a real error
// type on the conversion.
impl TryFrom<String> for RequestStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(CoreError::Validation)
    }
}

/// Validate a transition, producing a caller-facing error on refusal.
///
/// Used by the ledger before attempting the status-guarded update so that
/// a refused transition reports the current state rather than a bare
/// "not found".
pub fn validate_transition(current: RequestStatus, next: RequestStatus) -> Result<(), CoreError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "request is {current}, cannot move to {next}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_permits_owner_and_requester_transitions() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Rejected));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Cancelled));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Returned));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Pending));
    }

    #[test]
    fn approved_only_transitions_to_returned() {
        assert!(RequestStatus::Approved.can_transition_to(RequestStatus::Returned));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Pending));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Rejected));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Cancelled));
        assert!(!RequestStatus::Approved.can_transition_to(RequestStatus::Approved));
    }

    #[test]
    fn terminal_states_permit_nothing() {
        for terminal in [
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
            RequestStatus::Returned,
        ] {
            assert!(terminal.is_terminal());
            for next in RequestStatus::ALL {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be refused"
                );
            }
        }
    }

    #[test]
    fn pending_and_approved_are_not_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
    }

    #[test]
    fn validate_transition_reports_current_and_target() {
        let err = validate_transition(RequestStatus::Returned, RequestStatus::Approved)
            .expect_err("returned is terminal");
        match err {
            CoreError::InvalidState(msg) => {
                assert!(msg.contains("returned"));
                assert!(msg.contains("approved"));
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in RequestStatus::ALL {
            let parsed: RequestStatus = status.as_str().parse().expect("must parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!("loaned".parse::<RequestStatus>().is_err());
        assert!("".parse::<RequestStatus>().is_err());
        assert!("Pending".parse::<RequestStatus>().is_err());
    }
}

//! Authorization guard predicates.
//!
//! Pure functions consulted by the ledger and registry before every
//! mutating operation. Callers pass ownership data freshly loaded from the
//! database — results are never cached across calls.

use crate::error::CoreError;
use crate::types::DbId;

/// Whether `actor_id` owns the entity owned by `owner_id`.
pub fn is_owner(actor_id: DbId, owner_id: DbId) -> bool {
    actor_id == owner_id
}

/// Whether `actor_id` is the requester of a request.
pub fn is_requester(actor_id: DbId, requester_id: DbId) -> bool {
    actor_id == requester_id
}

/// Require that the actor owns the item/request, or fail with `Forbidden`.
pub fn require_owner(actor_id: DbId, owner_id: DbId) -> Result<(), CoreError> {
    if is_owner(actor_id, owner_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the owner may perform this action".into(),
        ))
    }
}

/// Require that the actor is the requester, or fail with `Forbidden`.
pub fn require_requester(actor_id: DbId, requester_id: DbId) -> Result<(), CoreError> {
    if is_requester(actor_id, requester_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the requester may perform this action".into(),
        ))
    }
}

/// Require that the actor is a party to the request (owner or requester),
/// or an admin.
pub fn require_participant(
    actor_id: DbId,
    requester_id: DbId,
    owner_id: DbId,
    is_admin: bool,
) -> Result<(), CoreError> {
    if is_admin || actor_id == requester_id || actor_id == owner_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Not authorized to view this request".into(),
        ))
    }
}

/// Require the admin flag, or fail with `Forbidden`.
pub fn require_admin(is_admin: bool) -> Result<(), CoreError> {
    if is_admin {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Admin access required".into()))
    }
}

/// Require that the actor owns the entity or is an admin.
pub fn require_owner_or_admin(
    actor_id: DbId,
    owner_id: DbId,
    is_admin: bool,
) -> Result<(), CoreError> {
    if is_admin {
        Ok(())
    } else {
        require_owner(actor_id, owner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_check_matches_ids() {
        assert!(require_owner(7, 7).is_ok());
        assert!(matches!(
            require_owner(7, 8),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn requester_check_matches_ids() {
        assert!(require_requester(3, 3).is_ok());
        assert!(require_requester(3, 4).is_err());
    }

    #[test]
    fn participant_allows_both_parties_and_admins() {
        // requester
        assert!(require_participant(1, 1, 2, false).is_ok());
        // owner
        assert!(require_participant(2, 1, 2, false).is_ok());
        // admin bystander
        assert!(require_participant(9, 1, 2, true).is_ok());
        // non-admin bystander
        assert!(require_participant(9, 1, 2, false).is_err());
    }

    #[test]
    fn admin_gate() {
        assert!(require_admin(true).is_ok());
        assert!(require_admin(false).is_err());
    }

    #[test]
    fn owner_or_admin_accepts_either() {
        assert!(require_owner_or_admin(5, 5, false).is_ok());
        assert!(require_owner_or_admin(6, 5, true).is_ok());
        assert!(require_owner_or_admin(6, 5, false).is_err());
    }
}

//! Event bus and best-effort side-effect consumers.
//!
//! The ledger and registry publish [`DomainEvent`]s after their
//! transactions commit; two background consumers react to them:
//!
//! - [`Notifier`] — writes one notification row per lifecycle event,
//!   addressed to the counterpart user.
//! - [`ActivityRecorder`] — appends one activity-log row per
//!   state-changing event.
//!
//! Both are fire-and-forget: a consumer failure is logged and swallowed,
//! never propagated back into the transition that triggered it. A lost
//! notification is acceptable; a lost state transition is not.

pub mod bus;
pub mod notifier;
pub mod recorder;

pub use bus::{events, DomainEvent, EventBus};
pub use notifier::Notifier;
pub use recorder::ActivityRecorder;

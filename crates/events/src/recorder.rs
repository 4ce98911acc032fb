//! Event-to-activity-log routing.
//!
//! [`ActivityRecorder`] subscribes to the event bus and appends one
//! activity row per state-changing event, keyed by the acting user.

use tokio::sync::broadcast;
use shareit_core::activity::actions;
use shareit_db::repositories::ActivityRepo;
use shareit_db::DbPool;

use crate::bus::{events, DomainEvent};

/// Map an event type to its activity-log action, if it records one.
pub fn action_for(event_type: &str) -> Option<&'static str> {
    match event_type {
        events::REQUEST_CREATED => Some(actions::REQUESTED),
        events::REQUEST_APPROVED => Some(actions::APPROVED),
        events::REQUEST_REJECTED => Some(actions::REJECTED),
        events::REQUEST_CANCELLED => Some(actions::CANCELLED),
        events::REQUEST_RETURNED => Some(actions::RETURNED),
        events::REQUEST_UPDATED => Some(actions::UPDATED_REQUEST),
        events::ITEM_CREATED => Some(actions::CREATED),
        events::ITEM_UPDATED => Some(actions::UPDATED),
        events::ITEM_DELETED => Some(actions::DELETED),
        events::USER_REGISTERED => Some(actions::REGISTERED),
        _ => None,
    }
}

/// Background consumer appending activity-log rows.
pub struct ActivityRecorder {
    pool: DbPool,
}

impl ActivityRecorder {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the main recording loop until the bus closes.
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::handle_event(&self.pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to record activity"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Activity recorder lagged, entries were lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity recorder shutting down");
                    break;
                }
            }
        }
    }

    /// Append the activity row for a single event, if it records one.
    ///
    /// Events without an actor (or an unmapped type) are skipped.
    /// Returns `true` when a row was written.
    pub async fn handle_event(pool: &DbPool, event: &DomainEvent) -> Result<bool, sqlx::Error> {
        let Some(action) = action_for(&event.event_type) else {
            return Ok(false);
        };
        let Some(actor_id) = event.actor_id else {
            return Ok(false);
        };

        ActivityRepo::insert(
            pool,
            actor_id,
            action,
            event.item_type.map(|t| t.as_str()),
            event.item_id,
            Some(&event.payload),
        )
        .await?;
        Ok(true)
    }
}

//! Event-to-notification routing.
//!
//! [`Notifier`] subscribes to the event bus and writes one notification
//! row per request lifecycle event, addressed to the counterpart user:
//! the owner learns about created/cancelled requests, the requester about
//! owner decisions and returns. Item and user events produce no
//! notification.

use tokio::sync::broadcast;
use shareit_core::notification::kinds;
use shareit_core::types::DbId;
use shareit_db::repositories::NotificationRepo;
use shareit_db::DbPool;

use crate::bus::{events, DomainEvent};

/// A notification about to be written.
#[derive(Debug, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub kind: &'static str,
}

/// Map an event to the notification it produces, if any.
///
/// Returns `None` for event types that carry no notification and for
/// events whose payload is missing the recipient -- a malformed payload
/// must not bring the consumer down.
pub fn notification_for(event: &DomainEvent) -> Option<NotificationDraft> {
    let title = event.payload_str("item_title").unwrap_or("your item");

    match event.event_type.as_str() {
        events::REQUEST_CREATED => Some(NotificationDraft {
            user_id: event.payload_id("owner_id")?,
            title: "New Request".into(),
            message: format!(
                "{} has requested \"{title}\"",
                event.payload_str("requester_name").unwrap_or("A member")
            ),
            kind: kinds::INFO,
        }),
        events::REQUEST_APPROVED => Some(NotificationDraft {
            user_id: event.payload_id("requester_id")?,
            title: "Request Approved".into(),
            message: format!("Your request for \"{title}\" has been approved!"),
            kind: kinds::SUCCESS,
        }),
        events::REQUEST_REJECTED => Some(NotificationDraft {
            user_id: event.payload_id("requester_id")?,
            title: "Request Rejected".into(),
            message: format!("Your request for \"{title}\" has been rejected."),
            kind: kinds::ERROR,
        }),
        events::REQUEST_CANCELLED => Some(NotificationDraft {
            user_id: event.payload_id("owner_id")?,
            title: "Request Cancelled".into(),
            message: format!(
                "{} has cancelled their request for \"{title}\"",
                event.payload_str("requester_name").unwrap_or("A member")
            ),
            kind: kinds::INFO,
        }),
        events::REQUEST_RETURNED => Some(NotificationDraft {
            user_id: event.payload_id("requester_id")?,
            title: "Item Returned".into(),
            message: format!("Thank you for returning \"{title}\"!"),
            kind: kinds::SUCCESS,
        }),
        _ => None,
    }
}

/// Background consumer writing notification rows for lifecycle events.
pub struct Notifier {
    pool: DbPool,
}

impl Notifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each
    /// event. The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::handle_event(&self.pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to write notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged, some notifications were lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Write the notification for a single event, if it produces one.
    ///
    /// Returns `true` when a row was written.
    pub async fn handle_event(pool: &DbPool, event: &DomainEvent) -> Result<bool, sqlx::Error> {
        let Some(draft) = notification_for(event) else {
            return Ok(false);
        };
        NotificationRepo::create(pool, draft.user_id, &draft.title, &draft.message, draft.kind)
            .await?;
        Ok(true)
    }
}

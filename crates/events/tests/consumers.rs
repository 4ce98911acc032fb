//! Database-backed tests for the notifier and activity recorder.
//!
//! The consumers are invoked directly (no bus timing involved) so the
//! tests stay deterministic.

use sqlx::PgPool;
use shareit_core::item::ItemType;
use shareit_core::types::DbId;
use shareit_db::repositories::{ActivityRepo, NotificationRepo};
use shareit_events::bus::{events, DomainEvent};
use shareit_events::{ActivityRecorder, Notifier};

async fn seed_user(pool: &PgPool, username: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash) \
         VALUES ($1, $1 || '@example.com', 'hash') RETURNING id",
    )
    .bind(username)
    .fetch_one(pool)
    .await
    .expect("user insert should succeed")
}

fn approved_event(owner: DbId, requester: DbId, book: DbId) -> DomainEvent {
    DomainEvent::new(events::REQUEST_APPROVED)
        .with_item(ItemType::Book, book)
        .with_actor(owner)
        .with_payload(serde_json::json!({
            "request_id": 1,
            "item_title": "Dune",
            "requester_id": requester,
            "requester_name": "alice",
            "owner_id": owner,
        }))
}

#[sqlx::test(migrations = "../db/migrations")]
async fn notifier_writes_row_for_requester(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let alice = seed_user(&pool, "alice").await;

    let written = Notifier::handle_event(&pool, &approved_event(owner, alice, 11))
        .await
        .unwrap();
    assert!(written);

    let notifications = NotificationRepo::list_for_user(&pool, alice, None, 20, 0)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Request Approved");
    assert_eq!(notifications[0].kind, "success");
    assert!(!notifications[0].is_read);

    // The owner got nothing for an approval.
    let owner_rows = NotificationRepo::list_for_user(&pool, owner, None, 20, 0)
        .await
        .unwrap();
    assert!(owner_rows.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn notifier_skips_events_without_mapping(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;

    let event = DomainEvent::new(events::ITEM_CREATED)
        .with_item(ItemType::Book, 11)
        .with_actor(owner);
    let written = Notifier::handle_event(&pool, &event).await.unwrap();
    assert!(!written);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recorder_appends_activity_with_actor_and_item(pool: PgPool) {
    let owner = seed_user(&pool, "owner").await;
    let alice = seed_user(&pool, "alice").await;

    let written = ActivityRecorder::handle_event(&pool, &approved_event(owner, alice, 11))
        .await
        .unwrap();
    assert!(written);

    let entries = ActivityRepo::list(&pool, &Default::default(), 20, 0)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].user_id, owner);
    assert_eq!(entries[0].action, "approved");
    assert_eq!(entries[0].item_type.as_deref(), Some("book"));
    assert_eq!(entries[0].item_id, Some(11));
    let details = entries[0].details.as_ref().expect("details stored");
    assert_eq!(details["item_title"], "Dune");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn recorder_skips_events_without_actor(pool: PgPool) {
    let event = DomainEvent::new(events::REQUEST_APPROVED)
        .with_payload(serde_json::json!({"requester_id": 1}));
    let written = ActivityRecorder::handle_event(&pool, &event).await.unwrap();
    assert!(!written);
}

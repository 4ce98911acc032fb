//! The request ledger: owner of the borrow-request lifecycle.
//!
//! Every mutating operation follows the same shape: load current rows,
//! consult the authorization guard, validate the transition, run the
//! atomic repository operation, and finally publish domain events for the
//! notifier and activity recorder. Events are published only after the
//! transaction commits, so side effects never observe a rolled-back
//! transition.

use serde_json::json;
use shareit_core::authorize;
use shareit_core::error::CoreError;
use shareit_core::lifecycle::{validate_transition, RequestStatus};
use shareit_core::types::DbId;
use shareit_core::validation::{validate_borrow_window, validate_pickup_not_past};
use shareit_db::models::request::{CreateRequest, Request, UpdateRequest};
use shareit_db::repositories::{
    ApproveOutcome, ItemRepo, RequestRepo, ReturnOutcome, TransitionOutcome, UserRepo,
};
use shareit_events::{events, DomainEvent};

use crate::error::{AppError, AppResult};
use crate::handlers::requests::CreateRequestBody;
use crate::state::AppState;

/// Coordinates the registry, authorization guard, repositories, and event
/// bus for request lifecycle operations.
pub struct RequestLedger<'a> {
    state: &'a AppState,
}

impl<'a> RequestLedger<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a borrow request in `pending` state.
    ///
    /// Availability is deliberately NOT flipped here -- several members may
    /// ask for the same available item; the item is only checked out when
    /// the owner approves one of them.
    pub async fn create(&self, actor_id: DbId, input: &CreateRequestBody) -> AppResult<Request> {
        validate_borrow_window(input.pickup_date, input.return_date)?;
        validate_pickup_not_past(input.pickup_date, chrono::Utc::now().date_naive())?;

        let item = ItemRepo::summary(&self.state.pool, input.item_type, input.item_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Item",
                id: input.item_id,
            })?;

        if authorize::is_owner(actor_id, item.owner_id) {
            return Err(CoreError::Forbidden("Cannot request your own item".into()).into());
        }
        if !item.is_available {
            return Err(CoreError::Unavailable("Item is not available".into()).into());
        }
        if RequestRepo::has_pending_for_requester(
            &self.state.pool,
            input.item_type,
            input.item_id,
            actor_id,
        )
        .await?
        {
            return Err(CoreError::Conflict(
                "You already have a pending request for this item".into(),
            )
            .into());
        }

        let request = RequestRepo::create(
            &self.state.pool,
            &CreateRequest {
                item_type: input.item_type,
                item_id: input.item_id,
                requester_id: actor_id,
                owner_id: item.owner_id,
                pickup_date: input.pickup_date,
                return_date: input.return_date,
                notes: input.notes.clone(),
            },
        )
        .await?;

        self.publish(events::REQUEST_CREATED, actor_id, &request, &item.title)
            .await;
        Ok(request)
    }

    /// Amend a still-pending request's dates or notes (requester only).
    pub async fn update(
        &self,
        actor_id: DbId,
        request_id: DbId,
        input: &UpdateRequest,
    ) -> AppResult<Request> {
        let request = self.load(request_id).await?;
        authorize::require_requester(actor_id, request.requester_id)?;

        let pickup = input.pickup_date.unwrap_or(request.pickup_date);
        let ret = input.return_date.unwrap_or(request.return_date);
        validate_borrow_window(pickup, ret)?;

        match RequestRepo::update_pending(&self.state.pool, request_id, input).await? {
            TransitionOutcome::Done(updated) => {
                self.publish_for(events::REQUEST_UPDATED, actor_id, &updated).await;
                Ok(updated)
            }
            TransitionOutcome::NotFound => Err(self.not_found(request_id)),
            TransitionOutcome::WrongState(status) => Err(CoreError::InvalidState(format!(
                "request is {status}, only pending requests can be updated"
            ))
            .into()),
        }
    }

    /// Approve a pending request (owner only), atomically checking the
    /// item out and auto-rejecting sibling pending requests.
    pub async fn approve(&self, actor_id: DbId, request_id: DbId) -> AppResult<Request> {
        let request = self.load(request_id).await?;
        authorize::require_owner(actor_id, request.owner_id)?;
        validate_transition(request.status, RequestStatus::Approved)?;

        match RequestRepo::approve(&self.state.pool, request_id).await? {
            ApproveOutcome::Approved {
                request: approved,
                auto_rejected,
            } => {
                let title = self.item_title(&approved).await;
                self.publish(events::REQUEST_APPROVED, actor_id, &approved, &title)
                    .await;
                // Losing siblings get their own rejection events so their
                // requesters are notified that the item went elsewhere.
                for sibling in &auto_rejected {
                    self.publish(events::REQUEST_REJECTED, actor_id, sibling, &title)
                        .await;
                }
                Ok(approved)
            }
            ApproveOutcome::NotFound => Err(self.not_found(request_id)),
            ApproveOutcome::NotPending(status) => {
                Err(CoreError::InvalidState(format!("request is {status}, not pending")).into())
            }
            ApproveOutcome::ItemMissing => Err(CoreError::NotFound {
                entity: "Item",
                id: request.item_id,
            }
            .into()),
            ApproveOutcome::ItemUnavailable => Err(CoreError::Unavailable(
                "Item is no longer available".into(),
            )
            .into()),
        }
    }

    /// Reject a pending request (owner only). Availability is untouched.
    pub async fn reject(&self, actor_id: DbId, request_id: DbId) -> AppResult<Request> {
        let request = self.load(request_id).await?;
        authorize::require_owner(actor_id, request.owner_id)?;
        validate_transition(request.status, RequestStatus::Rejected)?;

        match RequestRepo::reject(&self.state.pool, request_id).await? {
            TransitionOutcome::Done(rejected) => {
                self.publish_for(events::REQUEST_REJECTED, actor_id, &rejected).await;
                Ok(rejected)
            }
            TransitionOutcome::NotFound => Err(self.not_found(request_id)),
            TransitionOutcome::WrongState(status) => {
                Err(CoreError::InvalidState(format!("request is {status}, not pending")).into())
            }
        }
    }

    /// Withdraw a pending request (requester only).
    pub async fn cancel(&self, actor_id: DbId, request_id: DbId) -> AppResult<Request> {
        let request = self.load(request_id).await?;
        authorize::require_requester(actor_id, request.requester_id)?;
        validate_transition(request.status, RequestStatus::Cancelled)?;

        match RequestRepo::cancel(&self.state.pool, request_id).await? {
            TransitionOutcome::Done(cancelled) => {
                self.publish_for(events::REQUEST_CANCELLED, actor_id, &cancelled).await;
                Ok(cancelled)
            }
            TransitionOutcome::NotFound => Err(self.not_found(request_id)),
            TransitionOutcome::WrongState(status) => {
                Err(CoreError::InvalidState(format!("request is {status}, not pending")).into())
            }
        }
    }

    /// Mark an approved request returned (owner only), atomically checking
    /// the item back in.
    pub async fn return_item(&self, actor_id: DbId, request_id: DbId) -> AppResult<Request> {
        let request = self.load(request_id).await?;
        authorize::require_owner(actor_id, request.owner_id)?;
        validate_transition(request.status, RequestStatus::Returned)?;

        match RequestRepo::mark_returned(&self.state.pool, request_id).await? {
            ReturnOutcome::Returned(returned) => {
                self.publish_for(events::REQUEST_RETURNED, actor_id, &returned).await;
                Ok(returned)
            }
            ReturnOutcome::NotFound => Err(self.not_found(request_id)),
            ReturnOutcome::NotApproved(status) => {
                Err(CoreError::InvalidState(format!("request is {status}, not approved")).into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn load(&self, request_id: DbId) -> AppResult<Request> {
        RequestRepo::find_by_id(&self.state.pool, request_id)
            .await?
            .ok_or_else(|| self.not_found(request_id))
    }

    fn not_found(&self, request_id: DbId) -> AppError {
        CoreError::NotFound {
            entity: "Request",
            id: request_id,
        }
        .into()
    }

    /// Best-effort title lookup for event payloads.
    async fn item_title(&self, request: &Request) -> String {
        ItemRepo::summary(&self.state.pool, request.item_type, request.item_id)
            .await
            .ok()
            .flatten()
            .map(|s| s.title)
            .unwrap_or_default()
    }

    /// Publish an event, resolving the item title first.
    async fn publish_for(&self, event_type: &str, actor_id: DbId, request: &Request) {
        let title = self.item_title(request).await;
        self.publish(event_type, actor_id, request, &title).await;
    }

    /// Publish a lifecycle event carrying everything consumers need.
    ///
    /// The requester's username is resolved here so the notifier can
    /// address owner-facing messages without extra reads; a failed lookup
    /// degrades the message, not the operation.
    async fn publish(&self, event_type: &str, actor_id: DbId, request: &Request, item_title: &str) {
        let requester_name = UserRepo::find_by_id(&self.state.pool, request.requester_id)
            .await
            .ok()
            .flatten()
            .map(|u| u.username)
            .unwrap_or_default();

        self.state.event_bus.publish(
            DomainEvent::new(event_type)
                .with_item(request.item_type, request.item_id)
                .with_actor(actor_id)
                .with_payload(json!({
                    "request_id": request.id,
                    "item_title": item_title,
                    "requester_id": request.requester_id,
                    "requester_name": requester_name,
                    "owner_id": request.owner_id,
                })),
        );
    }
}

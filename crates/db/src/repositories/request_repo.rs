//! Repository for the `requests` table.
//!
//! Lifecycle transitions are enforced at the SQL level: `approve` and
//! `mark_returned` run inside a transaction that locks the item row and
//! then the request row, and `reject`/`cancel` are single status-guarded
//! updates. The availability invariant -- an item is
//! unavailable iff a request on it is approved -- can therefore not be
//! broken by concurrent callers.

use sqlx::PgPool;
use shareit_core::item::ItemType;
use shareit_core::lifecycle::RequestStatus;
use shareit_core::types::DbId;

use crate::models::request::{
    CreateRequest, Request, RequestDetail, RequestDirection, RequestFilter, UpdateRequest,
};
use crate::repositories::item_repo::ItemRepo;

/// Column list for `requests` queries (prefixed for joined queries).
const COLUMNS: &str = "r.id, r.item_type, r.item_id, r.requester_id, r.owner_id, r.status, \
                       r.pickup_date, r.return_date, r.notes, r.request_date, r.response_date";

/// Joined SELECT used by list and detail queries: counterpart usernames
/// plus title/creator/image resolved from whichever item table applies.
const DETAIL_SELECT: &str = "SELECT r.id, r.item_type, r.item_id, r.requester_id, r.owner_id, \
            r.status, r.pickup_date, r.return_date, r.notes, r.request_date, r.response_date, \
            u1.username AS requester_name, \
            u2.username AS owner_name, \
            CASE WHEN r.item_type = 'book' THEN b.title ELSE g.title END AS item_title, \
            CASE WHEN r.item_type = 'book' THEN b.author ELSE g.designer END AS item_creator, \
            CASE WHEN r.item_type = 'book' THEN b.cover_url ELSE g.image_url END AS item_image \
     FROM requests r \
     JOIN users u1 ON r.requester_id = u1.id \
     JOIN users u2 ON r.owner_id = u2.id \
     LEFT JOIN books b ON r.item_type = 'book' AND r.item_id = b.id \
     LEFT JOIN board_games g ON r.item_type = 'boardgame' AND r.item_id = g.id";

/// Outcome of the transactional approve operation.
#[derive(Debug)]
pub enum ApproveOutcome {
    /// The request was approved; sibling pending requests on the same item
    /// were auto-rejected in the same transaction.
    Approved {
        request: Request,
        auto_rejected: Vec<Request>,
    },
    NotFound,
    /// The request was no longer pending (current status reported).
    NotPending(RequestStatus),
    /// The referenced item no longer exists.
    ItemMissing,
    /// The item was checked out through another request in the meantime.
    ItemUnavailable,
}

/// Outcome of a status-guarded reject/cancel update.
#[derive(Debug)]
pub enum TransitionOutcome {
    Done(Request),
    NotFound,
    /// The request was not in the state the transition requires.
    WrongState(RequestStatus),
}

/// Outcome of the transactional return operation.
#[derive(Debug)]
pub enum ReturnOutcome {
    Returned(Request),
    NotFound,
    NotApproved(RequestStatus),
}

/// Provides lifecycle and query operations for borrow requests.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a request row in `pending` state.
    ///
    /// Availability is NOT flipped here: a merely-pending request does not
    /// check the item out.
    pub async fn create(pool: &PgPool, input: &CreateRequest) -> Result<Request, sqlx::Error> {
        let query = format!(
            "INSERT INTO requests (item_type, item_id, requester_id, owner_id, \
                                   pickup_date, return_date, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(input.item_type.as_str())
            .bind(input.item_id)
            .bind(input.requester_id)
            .bind(input.owner_id)
            .bind(input.pickup_date)
            .bind(input.return_date)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a request by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {columns} FROM requests WHERE id = $1",
            columns = COLUMNS.replace("r.", "")
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a request by ID with counterpart names and item metadata.
    pub async fn find_detail_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RequestDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, RequestDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests the user is a party to, most recent first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &RequestFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequestDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE {condition} \
             ORDER BY r.request_date DESC \
             LIMIT $4 OFFSET $5",
            condition = Self::user_filter_condition(filter)
        );
        sqlx::query_as::<_, RequestDetail>(&query)
            .bind(user_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.item_type.map(|t| t.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count requests matching [`Self::list_for_user`]'s filter.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &RequestFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM requests r WHERE {condition}",
            condition = Self::user_filter_condition(filter)
        );
        sqlx::query_scalar(&query)
            .bind(user_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.item_type.map(|t| t.as_str()))
            .fetch_one(pool)
            .await
    }

    /// WHERE condition shared by list and count. `$1` = user id,
    /// `$2` = optional status, `$3` = optional item type.
    fn user_filter_condition(filter: &RequestFilter) -> &'static str {
        match filter.direction {
            Some(RequestDirection::Sent) => {
                "r.requester_id = $1 \
                 AND ($2::text IS NULL OR r.status = $2) \
                 AND ($3::text IS NULL OR r.item_type = $3)"
            }
            Some(RequestDirection::Received) => {
                "r.owner_id = $1 \
                 AND ($2::text IS NULL OR r.status = $2) \
                 AND ($3::text IS NULL OR r.item_type = $3)"
            }
            None => {
                "(r.requester_id = $1 OR r.owner_id = $1) \
                 AND ($2::text IS NULL OR r.status = $2) \
                 AND ($3::text IS NULL OR r.item_type = $3)"
            }
        }
    }

    /// Whether the requester already has a pending request for this item.
    pub async fn has_pending_for_requester(
        pool: &PgPool,
        item_type: ItemType,
        item_id: DbId,
        requester_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests \
             WHERE item_type = $1 AND item_id = $2 AND requester_id = $3 AND status = 'pending'",
        )
        .bind(item_type.as_str())
        .bind(item_id)
        .bind(requester_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Approve a pending request, atomically checking the item out.
    ///
    /// In one transaction: the item row is locked and re-verified
    /// available; the request row is locked and re-verified `pending`; the
    /// item is marked unavailable; the request becomes `approved`; and all
    /// sibling pending requests for the same item are auto-rejected. Any
    /// refusal rolls the whole transaction back.
    ///
    /// Lock order is always item row first, then request row(s) -- the
    /// same order used by `mark_returned` and `delete_checked` -- so
    /// concurrent lifecycle operations on one item serialize instead of
    /// deadlocking.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<ApproveOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Unlocked read to learn the item reference.
        let Some(preview) = Self::fetch_in_tx(&mut tx, id, false).await? else {
            return Ok(ApproveOutcome::NotFound);
        };
        if preview.status != RequestStatus::Pending {
            return Ok(ApproveOutcome::NotPending(preview.status));
        }

        match ItemRepo::lock_availability(&mut tx, preview.item_type, preview.item_id).await? {
            None => return Ok(ApproveOutcome::ItemMissing),
            Some(false) => return Ok(ApproveOutcome::ItemUnavailable),
            Some(true) => {}
        }

        // Re-verify under the lock: the status may have moved between the
        // unlocked read and acquiring the item lock.
        let Some(request) = Self::fetch_in_tx(&mut tx, id, true).await? else {
            return Ok(ApproveOutcome::NotFound);
        };
        if request.status != RequestStatus::Pending {
            return Ok(ApproveOutcome::NotPending(request.status));
        }

        ItemRepo::set_availability_tx(&mut tx, request.item_type, request.item_id, false).await?;

        let query = format!(
            "UPDATE requests SET status = 'approved', response_date = NOW() \
             WHERE id = $1 \
             RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        let approved = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE requests SET status = 'rejected', response_date = NOW() \
             WHERE item_type = $1 AND item_id = $2 AND status = 'pending' AND id <> $3 \
             RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        let auto_rejected = sqlx::query_as::<_, Request>(&query)
            .bind(request.item_type.as_str())
            .bind(request.item_id)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ApproveOutcome::Approved {
            request: approved,
            auto_rejected,
        })
    }

    /// Reject a pending request. Availability is untouched (a pending
    /// request never checked the item out).
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<TransitionOutcome, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET status = 'rejected', response_date = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        let updated = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Self::diagnose(pool, id, updated).await
    }

    /// Withdraw a pending request (requester action). No `response_date`:
    /// the owner never responded.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<TransitionOutcome, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET status = 'cancelled' \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        let updated = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Self::diagnose(pool, id, updated).await
    }

    /// Amend a still-pending request's dates/notes.
    pub async fn update_pending(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRequest,
    ) -> Result<TransitionOutcome, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET
                pickup_date = COALESCE($2, pickup_date),
                return_date = COALESCE($3, return_date),
                notes = COALESCE($4, notes)
             WHERE id = $1 AND status = 'pending'
             RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        let updated = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(input.pickup_date)
            .bind(input.return_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await?;
        Self::diagnose(pool, id, updated).await
    }

    /// Mark an approved request returned, atomically checking the item
    /// back in. Uses the same item-then-request lock order as `approve`.
    pub async fn mark_returned(pool: &PgPool, id: DbId) -> Result<ReturnOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(preview) = Self::fetch_in_tx(&mut tx, id, false).await? else {
            return Ok(ReturnOutcome::NotFound);
        };
        if preview.status != RequestStatus::Approved {
            return Ok(ReturnOutcome::NotApproved(preview.status));
        }

        // The item row may be gone only if it was deleted, which the
        // checked delete forbids while a request is approved; a missing
        // row here therefore reads as the request no longer being
        // approved either.
        if ItemRepo::lock_availability(&mut tx, preview.item_type, preview.item_id)
            .await?
            .is_none()
        {
            return Ok(ReturnOutcome::NotFound);
        }

        let Some(request) = Self::fetch_in_tx(&mut tx, id, true).await? else {
            return Ok(ReturnOutcome::NotFound);
        };
        if request.status != RequestStatus::Approved {
            return Ok(ReturnOutcome::NotApproved(request.status));
        }

        let query = format!(
            "UPDATE requests SET status = 'returned' WHERE id = $1 RETURNING {columns}",
            columns = COLUMNS.replace("r.", "")
        );
        let returned = sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        ItemRepo::set_availability_tx(&mut tx, request.item_type, request.item_id, true).await?;

        tx.commit().await?;
        Ok(ReturnOutcome::Returned(returned))
    }

    /// Fetch a request inside an open transaction, optionally taking its
    /// row lock.
    async fn fetch_in_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        for_update: bool,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {columns} FROM requests WHERE id = $1{lock}",
            columns = COLUMNS.replace("r.", ""),
            lock = if for_update { " FOR UPDATE" } else { "" }
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Turn a zero-row conditional update into a precise outcome by
    /// re-reading the current status.
    async fn diagnose(
        pool: &PgPool,
        id: DbId,
        updated: Option<Request>,
    ) -> Result<TransitionOutcome, sqlx::Error> {
        match updated {
            Some(request) => Ok(TransitionOutcome::Done(request)),
            None => match Self::find_by_id(pool, id).await? {
                None => Ok(TransitionOutcome::NotFound),
                Some(request) => Ok(TransitionOutcome::WrongState(request.status)),
            },
        }
    }
}

//! Polymorphic item operations shared by books and board games.
//!
//! The registry owns the `is_available` flag on both item tables. The
//! request ledger flips availability exclusively through the transactional
//! operations here and in [`RequestRepo`](super::request_repo::RequestRepo);
//! owner-facing metadata updates cannot touch it.

use sqlx::{PgPool, Postgres, Transaction};
use shareit_core::item::ItemType;
use shareit_core::types::DbId;

/// Map an item type to its table name.
pub(crate) fn item_table(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Book => "books",
        ItemType::BoardGame => "board_games",
    }
}

/// Minimal item view used by the ledger for authorization and
/// availability checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemSummary {
    pub owner_id: DbId,
    pub title: String,
    pub is_available: bool,
}

/// Outcome of a checked item deletion.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// The item still has `pending` or `approved` requests.
    ActiveRequests,
}

/// Availability and deletion operations spanning both item tables.
pub struct ItemRepo;

impl ItemRepo {
    /// Load owner, title, and availability for an item of either kind.
    pub async fn summary(
        pool: &PgPool,
        item_type: ItemType,
        item_id: DbId,
    ) -> Result<Option<ItemSummary>, sqlx::Error> {
        let table = item_table(item_type);
        let query =
            format!("SELECT owner_id, title, is_available FROM {table} WHERE id = $1");
        sqlx::query_as::<_, ItemSummary>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// Set an item's availability flag.
    ///
    /// Idempotent: setting the current value is a no-op success. Returns
    /// `false` if the item does not exist.
    pub async fn set_availability(
        pool: &PgPool,
        item_type: ItemType,
        item_id: DbId,
        available: bool,
    ) -> Result<bool, sqlx::Error> {
        let table = item_table(item_type);
        let query =
            format!("UPDATE {table} SET is_available = $2, updated_at = NOW() WHERE id = $1");
        let result = sqlx::query(&query)
            .bind(item_id)
            .bind(available)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lock an item row and read its availability inside a transaction.
    ///
    /// Serializes concurrent approve/return/delete calls touching the same
    /// item. Returns `None` if the item does not exist.
    pub(crate) async fn lock_availability(
        tx: &mut Transaction<'_, Postgres>,
        item_type: ItemType,
        item_id: DbId,
    ) -> Result<Option<bool>, sqlx::Error> {
        let table = item_table(item_type);
        let query = format!("SELECT is_available FROM {table} WHERE id = $1 FOR UPDATE");
        sqlx::query_scalar(&query)
            .bind(item_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Flip availability inside an open transaction.
    pub(crate) async fn set_availability_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_type: ItemType,
        item_id: DbId,
        available: bool,
    ) -> Result<(), sqlx::Error> {
        let table = item_table(item_type);
        let query =
            format!("UPDATE {table} SET is_available = $2, updated_at = NOW() WHERE id = $1");
        sqlx::query(&query)
            .bind(item_id)
            .bind(available)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Delete an item unless any request on it is still active.
    ///
    /// The item row is locked for the duration of the check so a
    /// concurrent approval cannot slip in between the count and the
    /// delete.
    pub async fn delete_checked(
        pool: &PgPool,
        item_type: ItemType,
        item_id: DbId,
    ) -> Result<DeleteOutcome, sqlx::Error> {
        let table = item_table(item_type);
        let mut tx = pool.begin().await?;

        let locked = Self::lock_availability(&mut tx, item_type, item_id).await?;
        if locked.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests \
             WHERE item_type = $1 AND item_id = $2 AND status IN ('pending', 'approved')",
        )
        .bind(item_type.as_str())
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Ok(DeleteOutcome::ActiveRequests);
        }

        let query = format!("DELETE FROM {table} WHERE id = $1");
        sqlx::query(&query).bind(item_id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

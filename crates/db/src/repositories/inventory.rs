//! Inventory access: locked reads and decrements of remaining stock.
//!
//! All mutation goes through `decrement`, which runs on the caller's open
//! transaction and re-reads the row under a pessimistic lock, so a
//! read-then-write is never based on a stale snapshot.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set,
};

use frigora_shared::types::{EntryItemId, Quantity};

use crate::entities::entry_items;

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Entry item not found.
    #[error("Entry item not found: {0}")]
    NotFound(EntryItemId),

    /// Decrement amount was zero or negative.
    #[error("Decrement amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Decrement exceeds the remaining quantity.
    #[error(
        "Insufficient stock on entry item {entry_item_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// The stock line that came up short.
        entry_item_id: EntryItemId,
        /// The quantity requested.
        requested: Decimal,
        /// The quantity actually remaining.
        available: Decimal,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Inventory operations on an open transaction.
///
/// Stateless: every method takes the transaction it must run on, because
/// stock reads that feed a decrement decision are only meaningful under
/// that transaction's row locks.
#[derive(Debug, Clone, Copy)]
pub struct InventoryRepository;

impl InventoryRepository {
    /// Reads the current remaining quantity of an entry item.
    ///
    /// Plain read on any connection, no lock; use `find_for_update` inside
    /// a transaction when the value feeds a decrement decision.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    pub async fn get_remaining<C: ConnectionTrait>(
        conn: &C,
        entry_item_id: EntryItemId,
    ) -> Result<Quantity, InventoryError> {
        let item = entry_items::Entity::find_by_id(entry_item_id.into_inner())
            .one(conn)
            .await?
            .ok_or(InventoryError::NotFound(entry_item_id))?;

        Ok(remaining_of(&item))
    }

    /// Reads an entry item under an exclusive row lock (`FOR UPDATE`),
    /// serializing conflicting writers on this row until commit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    pub async fn find_for_update(
        txn: &DatabaseTransaction,
        entry_item_id: EntryItemId,
    ) -> Result<entry_items::Model, InventoryError> {
        let item = entry_items::Entity::find()
            .filter(entry_items::Column::Id.eq(entry_item_id.into_inner()))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(InventoryError::NotFound(entry_item_id))?;

        Ok(item)
    }

    /// Decrements an entry item's remaining quantity. Re-reads the current
    /// value under a row lock; never trusts a pre-fetched snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a non-positive amount (primary or KJ),
    /// `NotFound` for a missing item, and `InsufficientStock` when the
    /// amount exceeds what remains (primary or KJ side).
    pub async fn decrement(
        txn: &DatabaseTransaction,
        entry_item_id: EntryItemId,
        amount: Decimal,
        kj_amount: Option<Decimal>,
    ) -> Result<Quantity, InventoryError> {
        validate_amounts(amount, kj_amount)?;

        let item = Self::find_for_update(txn, entry_item_id).await?;
        let remaining = remaining_of(&item);
        let requested = Quantity::new(amount, kj_amount);

        let after = remaining
            .checked_sub(&requested)
            .ok_or_else(|| insufficient(entry_item_id, &requested, &remaining))?;

        let mut active: entry_items::ActiveModel = item.into();
        active.remaining_quantity = Set(after.primary);
        active.remaining_kj_quantity = Set(after.kj);
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;

        Ok(after)
    }
}

/// The remaining quantity pair of an entry item row.
#[must_use]
pub fn remaining_of(item: &entry_items::Model) -> Quantity {
    Quantity::new(item.remaining_quantity, item.remaining_kj_quantity)
}

/// Rejects non-positive decrement amounts on either dimension. A negative
/// KJ amount would otherwise read as a decrement that grows the stock.
fn validate_amounts(amount: Decimal, kj_amount: Option<Decimal>) -> Result<(), InventoryError> {
    if amount <= Decimal::ZERO {
        return Err(InventoryError::InvalidAmount(amount));
    }
    if let Some(kj) = kj_amount {
        if kj <= Decimal::ZERO {
            return Err(InventoryError::InvalidAmount(kj));
        }
    }
    Ok(())
}

/// Builds the `InsufficientStock` error for a decrement that came up short,
/// reporting whichever dimension actually underflowed.
fn insufficient(
    entry_item_id: EntryItemId,
    requested: &Quantity,
    remaining: &Quantity,
) -> InventoryError {
    if requested.primary > remaining.primary {
        return InventoryError::InsufficientStock {
            entry_item_id,
            requested: requested.primary,
            available: remaining.primary,
        };
    }

    // Primary fits, so the KJ side is what underflowed.
    InventoryError::InsufficientStock {
        entry_item_id,
        requested: requested.kj.unwrap_or_default(),
        available: remaining.kj.unwrap_or_default(),
    }
}

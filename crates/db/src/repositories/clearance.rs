//! Clearance repository: the transactional coordinator.
//!
//! A clearance is one unit of work: validate the request, lock and decrement
//! the stock lines, write the immutable receipt and its cleared items, and
//! post the value to the ledger. Either all of it commits or none of it
//! does. Conflicting writers are retried a bounded number of times before
//! the request fails with a conflict.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use frigora_core::clearance::{
    ClearanceError, ClearanceOutcome, ClearancePlan, ClearanceRequest, ClearanceService,
    ReceiptContext,
};
use frigora_core::ledger::{Posting, PostingError};
use frigora_core::pricing::ClearanceValuer;
use frigora_shared::types::{
    ClearanceReceiptId, ClearedItemId, CustomerId, EntryItemId, EntryReceiptId,
};

use crate::entities::{clearance_receipts, cleared_items, customers, entry_items, entry_receipts};
use crate::repositories::inventory::{remaining_of, InventoryError, InventoryRepository};
use crate::repositories::ledger::LedgerRepository;

/// Maximum attempts before a persistent conflict is reported to the caller.
const MAX_ATTEMPTS: u32 = 3;

/// Clearance repository coordinating the clearance transaction.
#[derive(Clone)]
pub struct ClearanceRepository {
    db: DatabaseConnection,
    valuer: Arc<dyn ClearanceValuer>,
}

impl ClearanceRepository {
    /// Creates a new clearance repository with the given valuer.
    #[must_use]
    pub fn new(db: DatabaseConnection, valuer: Arc<dyn ClearanceValuer>) -> Self {
        Self { db, valuer }
    }

    /// Executes a clearance request end to end.
    ///
    /// Structural validation runs before any transaction is opened; it
    /// depends only on the request. Everything that reads or writes state
    /// runs inside one transaction with exclusive row locks on the touched
    /// stock lines. Retryable conflicts (deadlocks, serialization failures,
    /// receipt-number races) restart the whole transaction up to
    /// `MAX_ATTEMPTS` times.
    ///
    /// # Errors
    ///
    /// Returns a `ClearanceError` describing the first fatal failure, or
    /// `Conflict` once the retry budget is exhausted.
    pub async fn clear(&self, request: &ClearanceRequest) -> Result<ClearanceOutcome, ClearanceError> {
        ClearanceService::validate_request(request)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_clear(request).await {
                Ok(outcome) => {
                    tracing::info!(
                        receipt_no = outcome.receipt_no,
                        customer_id = %request.customer_id,
                        value = %outcome.value,
                        attempt,
                        "Clearance committed"
                    );
                    return Ok(outcome);
                }
                Err(err) if is_retryable(&err) => {
                    if attempt >= MAX_ATTEMPTS {
                        tracing::warn!(
                            attempts = attempt,
                            customer_id = %request.customer_id,
                            "Clearance conflict persisted, giving up"
                        );
                        return Err(ClearanceError::Conflict { attempts: attempt });
                    }
                    tracing::debug!(attempt, error = %err, "Clearance conflicted, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt: open a transaction, execute, commit or roll back.
    async fn try_clear(&self, request: &ClearanceRequest) -> Result<ClearanceOutcome, ClearanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match self.execute(&txn, request).await {
            Ok(outcome) => {
                txn.commit().await.map_err(db_err)?;
                Ok(outcome)
            }
            Err(err) => {
                // Rollback failure is secondary to the original error.
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Clearance rollback failed");
                }
                Err(err)
            }
        }
    }

    /// The unit of work, on an open transaction.
    async fn execute(
        &self,
        txn: &DatabaseTransaction,
        request: &ClearanceRequest,
    ) -> Result<ClearanceOutcome, ClearanceError> {
        // Resolve the entry receipt by its human-readable number.
        let receipt = entry_receipts::Entity::find()
            .filter(entry_receipts::Column::ReceiptNo.eq(request.entry_receipt_no))
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(ClearanceError::EntryReceiptNotFound(request.entry_receipt_no))?;

        customers::Entity::find_by_id(request.customer_id.into_inner())
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(ClearanceError::CustomerNotFound(request.customer_id))?;

        let context = ReceiptContext {
            entry_receipt_id: EntryReceiptId::from_uuid(receipt.id),
            owner: CustomerId::from_uuid(receipt.customer_id),
        };
        ClearanceService::verify_ownership(request, &context)?;

        // Lock every requested stock line, in request order. Quantities read
        // after this point cannot change under us until commit.
        let mut locked: HashMap<EntryItemId, entry_items::Model> =
            HashMap::with_capacity(request.lines.len());
        for line in &request.lines {
            let item = InventoryRepository::find_for_update(txn, line.entry_item_id)
                .await
                .map_err(inventory_err)?;
            if item.entry_receipt_id != receipt.id {
                return Err(ClearanceError::ItemOutsideReceipt {
                    entry_item_id: line.entry_item_id,
                    entry_receipt_no: request.entry_receipt_no,
                });
            }
            locked.insert(line.entry_item_id, item);
        }

        let plan = ClearanceService::plan(&request.lines, |id| {
            locked.get(&id).map(remaining_of)
        })?;

        // Apply the planned decrements. The rows are already locked, so the
        // re-read inside `decrement` sees exactly what the plan was checked
        // against.
        let now = Utc::now();
        for decrement in &plan.decrements {
            InventoryRepository::decrement(
                txn,
                decrement.entry_item_id,
                decrement.cleared.primary,
                decrement.cleared.kj,
            )
            .await
            .map_err(inventory_err)?;
        }

        // Allocate the next receipt number inside the transaction. Two
        // concurrent clearances can still race to the same number; the
        // unique constraint turns the loser into a retryable conflict.
        let receipt_no = next_receipt_no(txn).await.map_err(db_err)?;

        let clearance_receipt_id = ClearanceReceiptId::new();
        let clearance_date = request.date.unwrap_or_else(|| now.date_naive());
        let header = clearance_receipts::ActiveModel {
            id: Set(clearance_receipt_id.into_inner()),
            receipt_no: Set(receipt_no),
            customer_id: Set(request.customer_id.into_inner()),
            entry_receipt_id: Set(receipt.id),
            car_no: Set(request.car_no.clone()),
            clearance_date: Set(clearance_date),
            description: Set(request.description.clone()),
            created_at: Set(now.into()),
        };
        header.insert(txn).await.map_err(db_err)?;

        for decrement in &plan.decrements {
            let item = cleared_items::ActiveModel {
                id: Set(ClearedItemId::new().into_inner()),
                clearance_receipt_id: Set(clearance_receipt_id.into_inner()),
                entry_item_id: Set(decrement.entry_item_id.into_inner()),
                quantity_cleared: Set(decrement.cleared.primary),
                kj_quantity_cleared: Set(decrement.cleared.kj),
                created_at: Set(now.into()),
            };
            item.insert(txn).await.map_err(db_err)?;
        }

        // Value the plan and post it, in the same transaction as the
        // decrements: stock and ledger can never drift apart.
        let value = self.valuer.value_plan(&plan.decrements);
        let posting = Posting::clearance(
            request.customer_id,
            clearance_receipt_id,
            value,
            request.is_discount,
            request.description.clone(),
        )
        .map_err(posting_err)?;
        let ledger_row = LedgerRepository::insert_posting(txn, &posting)
            .await
            .map_err(db_err)?;

        Ok(ClearanceOutcome {
            clearance_receipt_id,
            receipt_no,
            ledger_row_id: frigora_shared::types::LedgerRowId::from_uuid(ledger_row.id),
            value,
            remaining: remaining_after(&plan),
        })
    }
}

/// Final remaining quantities per touched entry item, in plan order.
fn remaining_after(plan: &ClearancePlan) -> Vec<(EntryItemId, frigora_shared::types::Quantity)> {
    plan.decrements
        .iter()
        .map(|d| (d.entry_item_id, d.remaining_after))
        .collect()
}

/// Allocates the next sequential clearance receipt number.
async fn next_receipt_no(txn: &DatabaseTransaction) -> Result<i64, DbErr> {
    let max: Option<Option<i64>> = clearance_receipts::Entity::find()
        .select_only()
        .column_as(clearance_receipts::Column::ReceiptNo.max(), "max_no")
        .into_tuple()
        .one(txn)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}

fn db_err(err: DbErr) -> ClearanceError {
    ClearanceError::Database(err.to_string())
}

fn inventory_err(err: InventoryError) -> ClearanceError {
    match err {
        InventoryError::NotFound(id) => ClearanceError::EntryItemNotFound(id),
        InventoryError::InvalidAmount(amount) => ClearanceError::InvalidAmount(amount),
        InventoryError::InsufficientStock {
            entry_item_id,
            requested,
            available,
        } => ClearanceError::InsufficientStock {
            entry_item_id,
            requested,
            available,
        },
        InventoryError::Database(db) => db_err(db),
    }
}

fn posting_err(err: PostingError) -> ClearanceError {
    match err {
        PostingError::InvalidAmount(amount) => ClearanceError::InvalidAmount(amount),
    }
}

/// Returns true for failures worth restarting the transaction over:
/// deadlocks, serialization failures, and the receipt-number unique
/// constraint losing a race.
fn is_retryable(err: &ClearanceError) -> bool {
    let ClearanceError::Database(message) = err else {
        return false;
    };
    let message = message.to_lowercase();
    message.contains("deadlock")
        || message.contains("could not serialize")
        || message.contains("serialization failure")
        || message.contains("duplicate key")
        || message.contains("unique constraint")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn db_error(message: &str) -> ClearanceError {
        db_err(DbErr::Custom(message.to_string()))
    }

    #[test]
    fn test_retryable_classification() {
        assert!(is_retryable(&db_error(
            "deadlock detected while locking entry_items"
        )));
        assert!(is_retryable(&db_error(
            "ERROR: could not serialize access due to concurrent update"
        )));
        assert!(is_retryable(&db_error(
            "duplicate key value violates unique constraint \"clearance_receipts_receipt_no_key\""
        )));
        assert!(is_retryable(&db_error("UNIQUE constraint failed: clearance_receipts.receipt_no")));
    }

    #[test]
    fn test_fatal_errors_not_retryable() {
        assert!(!is_retryable(&db_error("connection refused")));
        assert!(!is_retryable(&ClearanceError::EntryReceiptNotFound(7)));
        assert!(!is_retryable(&ClearanceError::InsufficientStock {
            entry_item_id: EntryItemId::new(),
            requested: dec!(10),
            available: dec!(5),
        }));
        assert!(!is_retryable(&ClearanceError::Conflict { attempts: 3 }));
    }

    #[test]
    fn test_inventory_error_mapping() {
        let id = EntryItemId::new();
        let mapped = inventory_err(InventoryError::InsufficientStock {
            entry_item_id: id,
            requested: dec!(10),
            available: dec!(4),
        });
        assert!(matches!(
            mapped,
            ClearanceError::InsufficientStock { entry_item_id, .. } if entry_item_id == id
        ));

        let mapped = inventory_err(InventoryError::NotFound(id));
        assert!(matches!(
            mapped,
            ClearanceError::EntryItemNotFound(item) if item == id
        ));
    }
}

//! Entry repository: recording goods entering storage.
//!
//! An entry receipt is the mirror of a clearance: a header, one stock line
//! per product lot, and a debit posting for the declared value, all
//! committed in one transaction. The stock lines it creates are what later
//! clearances decrement.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use frigora_core::ledger::{Posting, PostingError};
use frigora_shared::types::{CustomerId, EntryItemId, EntryReceiptId, LedgerRowId};

use crate::entities::{customers, entry_items, entry_receipts};
use crate::repositories::ledger::LedgerRepository;

/// Maximum attempts before a receipt-number race is reported as a conflict.
const MAX_ATTEMPTS: u32 = 3;

/// One stock line of a new entry receipt.
#[derive(Debug, Clone)]
pub struct NewEntryItem {
    /// Product kind (apples, potatoes, ...).
    pub product_kind: String,
    /// Optional variety within the kind.
    pub product_variety: Option<String>,
    /// Packaging type (crate, sack, ...).
    pub pack_type: String,
    /// Cold room the lot is stored in.
    pub room: String,
    /// Unit the quantity is counted in.
    pub unit: String,
    /// Quantity entering storage (must be positive).
    pub quantity: Decimal,
    /// Optional secondary KJ quantity.
    pub kj_quantity: Option<Decimal>,
}

/// A request to record goods entering storage.
#[derive(Debug, Clone)]
pub struct NewEntryReceipt {
    /// The customer bringing goods in.
    pub customer_id: CustomerId,
    /// The stock lines (non-empty).
    pub items: Vec<NewEntryItem>,
    /// Declared value of the goods, posted as a debit.
    pub value: Decimal,
    /// Vehicle number delivering the goods.
    pub car_no: Option<String>,
    /// Entry date (defaults to today when absent).
    pub date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
}

/// The result of a committed entry.
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    /// The persisted entry receipt.
    pub entry_receipt_id: EntryReceiptId,
    /// Its sequential human-readable number.
    pub receipt_no: i64,
    /// The created stock lines, in request order.
    pub item_ids: Vec<EntryItemId>,
    /// The debit ledger row posted for this entry.
    pub ledger_row_id: LedgerRowId,
}

/// Error types for entry operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// The receipt had no stock lines.
    #[error("Entry receipt must contain at least one item")]
    EmptyReceipt,

    /// A line's quantity was zero or negative.
    #[error("Entry item {index} has non-positive quantity {quantity}")]
    NonPositiveQuantity {
        /// Zero-based index of the offending line.
        index: usize,
        /// The quantity submitted.
        quantity: Decimal,
    },

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The value posting could not be constructed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Conflicting writers exhausted the bounded retry budget.
    #[error("Transaction conflict persisted after {attempts} attempts")]
    Conflict {
        /// How many attempts were made before giving up.
        attempts: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Entry repository for recording incoming stock.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an entry receipt: header, stock lines, and the debit posting,
    /// atomically.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any transaction is opened, or
    /// `Conflict` if the receipt-number race persists past the retry budget.
    pub async fn record_entry(&self, request: &NewEntryReceipt) -> Result<EntryOutcome, EntryError> {
        validate(request)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_record(request).await {
                Ok(outcome) => {
                    tracing::info!(
                        receipt_no = outcome.receipt_no,
                        customer_id = %request.customer_id,
                        items = outcome.item_ids.len(),
                        "Entry receipt recorded"
                    );
                    return Ok(outcome);
                }
                Err(err) if is_retryable(&err) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(EntryError::Conflict { attempts: attempt });
                    }
                    tracing::debug!(attempt, error = %err, "Entry conflicted, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_record(&self, request: &NewEntryReceipt) -> Result<EntryOutcome, EntryError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        match Self::execute(&txn, request).await {
            Ok(outcome) => {
                txn.commit().await.map_err(db_err)?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Entry rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn execute(
        txn: &DatabaseTransaction,
        request: &NewEntryReceipt,
    ) -> Result<EntryOutcome, EntryError> {
        customers::Entity::find_by_id(request.customer_id.into_inner())
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or(EntryError::CustomerNotFound(request.customer_id))?;

        let now = Utc::now();
        let receipt_no = next_receipt_no(txn).await.map_err(db_err)?;
        let entry_receipt_id = EntryReceiptId::new();
        let entry_date = request.date.unwrap_or_else(|| now.date_naive());

        let header = entry_receipts::ActiveModel {
            id: Set(entry_receipt_id.into_inner()),
            receipt_no: Set(receipt_no),
            customer_id: Set(request.customer_id.into_inner()),
            car_no: Set(request.car_no.clone()),
            entry_date: Set(entry_date),
            description: Set(request.description.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        header.insert(txn).await.map_err(db_err)?;

        let mut item_ids = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let item_id = EntryItemId::new();
            let row = entry_items::ActiveModel {
                id: Set(item_id.into_inner()),
                entry_receipt_id: Set(entry_receipt_id.into_inner()),
                product_kind: Set(item.product_kind.clone()),
                product_variety: Set(item.product_variety.clone()),
                pack_type: Set(item.pack_type.clone()),
                room: Set(item.room.clone()),
                unit: Set(item.unit.clone()),
                original_quantity: Set(item.quantity),
                remaining_quantity: Set(item.quantity),
                kj_quantity: Set(item.kj_quantity),
                remaining_kj_quantity: Set(item.kj_quantity),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            row.insert(txn).await.map_err(db_err)?;
            item_ids.push(item_id);
        }

        let posting = Posting::inventory_added(
            request.customer_id,
            entry_receipt_id,
            request.value,
            request.description.clone(),
        )?;
        let ledger_row = LedgerRepository::insert_posting(txn, &posting)
            .await
            .map_err(db_err)?;

        Ok(EntryOutcome {
            entry_receipt_id,
            receipt_no,
            item_ids,
            ledger_row_id: LedgerRowId::from_uuid(ledger_row.id),
        })
    }

    /// Reads an entry receipt with its stock lines by receipt number.
    ///
    /// # Errors
    ///
    /// Returns `Ok(None)` for an unknown number.
    pub async fn find_by_receipt_no(
        &self,
        receipt_no: i64,
    ) -> Result<Option<(entry_receipts::Model, Vec<entry_items::Model>)>, EntryError> {
        let Some(receipt) = entry_receipts::Entity::find()
            .filter(entry_receipts::Column::ReceiptNo.eq(receipt_no))
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let items = entry_items::Entity::find()
            .filter(entry_items::Column::EntryReceiptId.eq(receipt.id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Some((receipt, items)))
    }
}

fn validate(request: &NewEntryReceipt) -> Result<(), EntryError> {
    if request.items.is_empty() {
        return Err(EntryError::EmptyReceipt);
    }
    for (index, item) in request.items.iter().enumerate() {
        if item.quantity <= Decimal::ZERO {
            return Err(EntryError::NonPositiveQuantity {
                index,
                quantity: item.quantity,
            });
        }
        if item.kj_quantity.is_some_and(|kj| kj <= Decimal::ZERO) {
            return Err(EntryError::NonPositiveQuantity {
                index,
                quantity: item.kj_quantity.unwrap_or_default(),
            });
        }
    }
    Ok(())
}

/// Allocates the next sequential entry receipt number.
async fn next_receipt_no(txn: &DatabaseTransaction) -> Result<i64, DbErr> {
    let max: Option<Option<i64>> = entry_receipts::Entity::find()
        .select_only()
        .column_as(entry_receipts::Column::ReceiptNo.max(), "max_no")
        .into_tuple()
        .one(txn)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}

fn db_err(err: DbErr) -> EntryError {
    EntryError::Database(err.to_string())
}

fn is_retryable(err: &EntryError) -> bool {
    let EntryError::Database(message) = err else {
        return false;
    };
    let message = message.to_lowercase();
    message.contains("deadlock")
        || message.contains("could not serialize")
        || message.contains("serialization failure")
        || message.contains("duplicate key")
        || message.contains("unique constraint")
}

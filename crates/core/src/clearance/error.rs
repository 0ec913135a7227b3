//! Clearance error types.
//!
//! Every failure inside the clearance transaction rolls the whole unit of
//! work back; these errors carry enough structure (offending item id,
//! requested vs. available amounts) for the caller to render a precise
//! message and decide whether to resubmit.

use rust_decimal::Decimal;
use thiserror::Error;

use frigora_shared::types::{CustomerId, EntryItemId};

use super::validation::Violation;

/// Errors that can occur during clearance operations.
#[derive(Debug, Error)]
pub enum ClearanceError {
    // ========== Validation Errors ==========
    /// The request failed structural validation. All violations found are
    /// collected so the caller can report every problem at once.
    #[error("Clearance request failed validation with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    // ========== Lookup Errors ==========
    /// No entry receipt exists with the given number.
    #[error("Entry receipt not found: {0}")]
    EntryReceiptNotFound(i64),

    /// A requested stock line does not exist.
    #[error("Entry item not found: {0}")]
    EntryItemNotFound(EntryItemId),

    /// A requested stock line belongs to a different entry receipt.
    #[error("Entry item {entry_item_id} does not belong to entry receipt {entry_receipt_no}")]
    ItemOutsideReceipt {
        /// The offending stock line.
        entry_item_id: EntryItemId,
        /// The receipt the request named.
        entry_receipt_no: i64,
    },

    /// The customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The entry receipt belongs to a different customer.
    #[error("Entry receipt {entry_receipt_no} belongs to customer {owner}, not {requested}")]
    OwnershipMismatch {
        /// The receipt the request named.
        entry_receipt_no: i64,
        /// The customer who owns the receipt.
        owner: CustomerId,
        /// The customer the request named.
        requested: CustomerId,
    },

    // ========== Stock Errors ==========
    /// The requested quantity exceeds what remains on the stock line.
    /// Always aborts the full transaction; no partial decrements survive.
    #[error(
        "Insufficient stock on entry item {entry_item_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        /// The stock line that came up short.
        entry_item_id: EntryItemId,
        /// The primary quantity requested.
        requested: Decimal,
        /// The primary quantity actually remaining.
        available: Decimal,
    },

    /// A monetary or quantity amount was zero or negative.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    // ========== Transaction Errors ==========
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

impl ClearanceError {
    /// Returns the violations of a validation failure, if any.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

//! Ledger domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use frigora_shared::types::{ClearanceReceiptId, CustomerId, EntryReceiptId, LedgerRowId};

/// The business event a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerRowKind {
    /// Goods entered storage; the customer owes for storage and handling.
    AddingInventory,
    /// Goods were cleared out of storage.
    Clearance,
    /// A direct cash movement outside any stock event.
    DirectCash,
}

impl LedgerRowKind {
    /// The wire/database string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddingInventory => "adding_inventory",
            Self::Clearance => "clearance",
            Self::DirectCash => "direct_cash",
        }
    }
}

impl std::str::FromStr for LedgerRowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adding_inventory" => Ok(Self::AddingInventory),
            "clearance" => Ok(Self::Clearance),
            "direct_cash" => Ok(Self::DirectCash),
            other => Err(format!("unknown ledger row kind: {other}")),
        }
    }
}

/// Which side of the ledger a direct cash movement lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashDirection {
    /// The customer owes more (cash paid out to them, or a charge).
    Debit,
    /// The customer owes less (cash received from them).
    Credit,
}

/// One immutable ledger row, as read back from storage.
///
/// Rows are append-only facts: never updated, never deleted. A customer's
/// balance is always a fold over these, ordered by `(created_at, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFact {
    /// The row's id (UUID v7, so id order breaks created-at ties).
    pub id: LedgerRowId,
    /// The customer whose balance this row affects.
    pub customer_id: CustomerId,
    /// The business event recorded.
    pub kind: LedgerRowKind,
    /// Debit amount; zero when the row is a credit.
    pub debit: Decimal,
    /// Credit amount; zero when the row is a debit.
    pub credit: Decimal,
    /// Whether this row represents a discount.
    pub is_discount: bool,
    /// Free-text description.
    pub description: Option<String>,
    /// The entry receipt that originated this row, if any.
    pub entry_receipt_id: Option<EntryReceiptId>,
    /// The clearance receipt that originated this row, if any.
    pub clearance_receipt_id: Option<ClearanceReceiptId>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl LedgerFact {
    /// The signed balance effect of this row (debit minus credit).
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if exactly one of debit/credit is non-zero.
    #[must_use]
    pub fn is_one_sided(&self) -> bool {
        (self.debit.is_zero()) != (self.credit.is_zero())
    }
}

//! Clearance domain types.
//!
//! A clearance withdraws stored goods against the open stock lines of one
//! entry receipt. The types here describe the request as the caller submits
//! it, and the fully-checked decrement plan the engine produces from it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use frigora_shared::types::{CustomerId, EntryItemId, Quantity};

/// One requested line of a clearance, referencing exactly one entry item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearanceLine {
    /// The stock line to clear from.
    pub entry_item_id: EntryItemId,
    /// The quantity to clear (must be positive).
    pub quantity: Decimal,
    /// Optional secondary KJ quantity to clear.
    pub kj_quantity: Option<Decimal>,
}

impl ClearanceLine {
    /// The requested quantities as a single pair.
    #[must_use]
    pub const fn requested(&self) -> Quantity {
        Quantity::new(self.quantity, self.kj_quantity)
    }
}

/// A clearance request as submitted by the caller.
#[derive(Debug, Clone)]
pub struct ClearanceRequest {
    /// The customer withdrawing goods.
    pub customer_id: CustomerId,
    /// Human-readable number of the entry receipt being cleared against.
    pub entry_receipt_no: i64,
    /// The lines to clear (non-empty, no duplicate entry items).
    pub lines: Vec<ClearanceLine>,
    /// Vehicle number collecting the goods.
    pub car_no: Option<String>,
    /// Clearance date (defaults to today when absent).
    pub date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
    /// Whether the posted value is a discount. Always explicit; never
    /// inferred from the description text.
    pub is_discount: bool,
}

/// One checked decrement within a clearance plan.
///
/// Holds a snapshot of the cleared amount and the remaining quantity after
/// it is applied. The entry item stays the sole owner of mutable stock
/// state; this is a read-only record of what the plan will do to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDecrement {
    /// The stock line being decremented.
    pub entry_item_id: EntryItemId,
    /// The amount being cleared from it.
    pub cleared: Quantity,
    /// The remaining quantity once the decrement is applied.
    pub remaining_after: Quantity,
}

/// A fully-validated clearance plan, ready to execute.
///
/// Produced only under the executing transaction from fresh reads, so the
/// quantities it was checked against cannot have changed before the
/// decrements are applied.
#[derive(Debug, Clone)]
pub struct ClearancePlan {
    /// One decrement per requested line, in request order.
    pub decrements: Vec<PlannedDecrement>,
    /// Sum of primary quantities cleared across all lines.
    pub total_quantity: Decimal,
}

impl ClearancePlan {
    /// Returns true if the plan clears nothing (never produced by planning;
    /// structural validation rejects empty requests first).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decrements.is_empty()
    }
}

/// Final remaining quantities per touched entry item, reported back to the
/// caller after a committed clearance.
pub type ClearedQuantities = Vec<(EntryItemId, Quantity)>;

/// The result of a committed clearance.
#[derive(Debug, Clone, Serialize)]
pub struct ClearanceOutcome {
    /// The persisted clearance receipt.
    pub clearance_receipt_id: frigora_shared::types::ClearanceReceiptId,
    /// Its sequential human-readable number.
    pub receipt_no: i64,
    /// The ledger row posted for this clearance.
    pub ledger_row_id: frigora_shared::types::LedgerRowId,
    /// The monetary value posted.
    pub value: Decimal,
    /// Final remaining quantities per touched entry item.
    pub remaining: ClearedQuantities,
}

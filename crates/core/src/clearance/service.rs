//! Clearance service for request validation and decrement planning.
//!
//! This service contains pure business logic with no database dependencies.
//! The execution layer resolves receipts and reads remaining quantities
//! (under its transaction's row locks) and feeds them in through closures.

use rust_decimal::Decimal;

use frigora_shared::types::{EntryItemId, Quantity};

use super::error::ClearanceError;
use super::types::{ClearanceLine, ClearancePlan, ClearanceRequest, PlannedDecrement};
use super::validation::validate_structure;

/// The resolved context of the entry receipt a clearance draws from.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptContext {
    /// The receipt's id.
    pub entry_receipt_id: frigora_shared::types::EntryReceiptId,
    /// The customer who owns the receipt and its stock.
    pub owner: frigora_shared::types::CustomerId,
}

/// Clearance service for validation and planning.
pub struct ClearanceService;

impl ClearanceService {
    /// Validates the structure of a clearance request.
    ///
    /// Cheap and pre-transaction: depends only on the request itself.
    /// Collects every violation found rather than failing on the first.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceError::Validation` listing all violations.
    pub fn validate_request(request: &ClearanceRequest) -> Result<(), ClearanceError> {
        let violations = validate_structure(&request.lines);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ClearanceError::Validation(violations))
        }
    }

    /// Confirms the resolved entry receipt belongs to the requesting customer.
    ///
    /// # Errors
    ///
    /// Returns `ClearanceError::OwnershipMismatch` if it does not.
    pub fn verify_ownership(
        request: &ClearanceRequest,
        context: &ReceiptContext,
    ) -> Result<(), ClearanceError> {
        if context.owner == request.customer_id {
            Ok(())
        } else {
            Err(ClearanceError::OwnershipMismatch {
                entry_receipt_no: request.entry_receipt_no,
                owner: context.owner,
                requested: request.customer_id,
            })
        }
    }

    /// Plans the decrements for a structurally-valid set of lines against
    /// fresh remaining quantities.
    ///
    /// MUST be called with quantities read under the executing transaction's
    /// isolation (row locks held), never from a pre-fetched snapshot: the
    /// whole point of planning inside the transaction is tolerating
    /// last-moment concurrent modifications.
    ///
    /// # Arguments
    ///
    /// * `lines` - The requested lines (already structurally validated)
    /// * `remaining_lookup` - Function returning the current remaining
    ///   quantity of an entry item, or `None` if the item does not exist
    ///
    /// # Errors
    ///
    /// Returns `EntryItemNotFound` for a missing item, or
    /// `InsufficientStock` the moment any line exceeds what remains — the
    /// caller aborts the whole transaction, so earlier valid lines are
    /// never partially applied.
    pub fn plan<R>(
        lines: &[ClearanceLine],
        remaining_lookup: R,
    ) -> Result<ClearancePlan, ClearanceError>
    where
        R: Fn(EntryItemId) -> Option<Quantity>,
    {
        let mut decrements = Vec::with_capacity(lines.len());
        let mut total_quantity = Decimal::ZERO;

        for line in lines {
            let remaining = remaining_lookup(line.entry_item_id)
                .ok_or(ClearanceError::EntryItemNotFound(line.entry_item_id))?;

            let requested = line.requested();
            let remaining_after = remaining
                .checked_sub(&requested)
                .ok_or_else(|| Self::insufficient(line, &remaining))?;

            total_quantity += line.quantity;
            decrements.push(PlannedDecrement {
                entry_item_id: line.entry_item_id,
                cleared: requested,
                remaining_after,
            });
        }

        Ok(ClearancePlan {
            decrements,
            total_quantity,
        })
    }

    /// Builds the `InsufficientStock` error for a line that came up short,
    /// reporting whichever dimension actually underflowed.
    fn insufficient(line: &ClearanceLine, remaining: &Quantity) -> ClearanceError {
        if line.quantity > remaining.primary {
            return ClearanceError::InsufficientStock {
                entry_item_id: line.entry_item_id,
                requested: line.quantity,
                available: remaining.primary,
            };
        }

        // Primary fits, so the KJ side is what underflowed.
        ClearanceError::InsufficientStock {
            entry_item_id: line.entry_item_id,
            requested: line.kj_quantity.unwrap_or_default(),
            available: remaining.kj.unwrap_or_default(),
        }
    }
}

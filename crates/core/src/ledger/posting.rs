//! One-sided ledger posting constructors.
//!
//! A posting is the write-side counterpart of a `LedgerFact`: exactly one
//! row to append, derived from a domain event. Every constructor enforces
//! the one-sided invariant at construction time — exactly one of
//! debit/credit is non-zero, never both, never neither — so rows can only
//! enter the ledger well-formed.

use rust_decimal::Decimal;
use thiserror::Error;

use frigora_shared::types::{ClearanceReceiptId, CustomerId, EntryReceiptId};

use super::types::{CashDirection, LedgerRowKind};

/// Errors raised while building a posting.
#[derive(Debug, Error)]
pub enum PostingError {
    /// The amount was zero or negative.
    #[error("Posting amount must be positive, got {0}")]
    InvalidAmount(Decimal),
}

/// One ledger row ready to be appended.
///
/// Construct only through the event constructors below; they are the write
/// gate that keeps every row one-sided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The customer whose balance the row affects.
    pub customer_id: CustomerId,
    /// The business event recorded.
    pub kind: LedgerRowKind,
    /// Debit amount; zero when the row is a credit.
    pub debit: Decimal,
    /// Credit amount; zero when the row is a debit.
    pub credit: Decimal,
    /// Whether this row represents a discount. Always explicit, never
    /// inferred from the description text.
    pub is_discount: bool,
    /// Free-text description.
    pub description: Option<String>,
    /// Originating entry receipt, if any.
    pub entry_receipt_id: Option<EntryReceiptId>,
    /// Originating clearance receipt, if any.
    pub clearance_receipt_id: Option<ClearanceReceiptId>,
}

impl Posting {
    /// Posts the value of goods entering storage as a debit: the customer
    /// owes storage and handling for what they brought in.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::InvalidAmount` if `value` is not positive.
    pub fn inventory_added(
        customer_id: CustomerId,
        entry_receipt_id: EntryReceiptId,
        value: Decimal,
        description: Option<String>,
    ) -> Result<Self, PostingError> {
        ensure_positive(value)?;
        Ok(Self {
            customer_id,
            kind: LedgerRowKind::AddingInventory,
            debit: value,
            credit: Decimal::ZERO,
            is_discount: false,
            description,
            entry_receipt_id: Some(entry_receipt_id),
            clearance_receipt_id: None,
        })
    }

    /// Posts the value realized by a clearance as a credit: goods released
    /// reduce what the customer owes.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::InvalidAmount` if `value` is not positive.
    pub fn clearance(
        customer_id: CustomerId,
        clearance_receipt_id: ClearanceReceiptId,
        value: Decimal,
        is_discount: bool,
        description: Option<String>,
    ) -> Result<Self, PostingError> {
        ensure_positive(value)?;
        Ok(Self {
            customer_id,
            kind: LedgerRowKind::Clearance,
            debit: Decimal::ZERO,
            credit: value,
            is_discount,
            description,
            entry_receipt_id: None,
            clearance_receipt_id: Some(clearance_receipt_id),
        })
    }

    /// Posts a direct cash movement on the given side of the ledger.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::InvalidAmount` if `amount` is not positive.
    pub fn direct_cash(
        customer_id: CustomerId,
        direction: CashDirection,
        amount: Decimal,
        description: Option<String>,
        is_discount: bool,
    ) -> Result<Self, PostingError> {
        ensure_positive(amount)?;
        let (debit, credit) = match direction {
            CashDirection::Debit => (amount, Decimal::ZERO),
            CashDirection::Credit => (Decimal::ZERO, amount),
        };
        Ok(Self {
            customer_id,
            kind: LedgerRowKind::DirectCash,
            debit,
            credit,
            is_discount,
            description,
            entry_receipt_id: None,
            clearance_receipt_id: None,
        })
    }

    /// Returns true if exactly one of debit/credit is non-zero.
    #[must_use]
    pub fn is_one_sided(&self) -> bool {
        (self.debit.is_zero()) != (self.credit.is_zero())
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), PostingError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(PostingError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_inventory_added_is_debit() {
        let posting = Posting::inventory_added(
            CustomerId::new(),
            EntryReceiptId::new(),
            dec!(1200),
            Some("Apples, 40 packs".to_string()),
        )
        .unwrap();

        assert_eq!(posting.kind, LedgerRowKind::AddingInventory);
        assert_eq!(posting.debit, dec!(1200));
        assert_eq!(posting.credit, dec!(0));
        assert!(posting.entry_receipt_id.is_some());
        assert!(posting.clearance_receipt_id.is_none());
        assert!(posting.is_one_sided());
    }

    #[test]
    fn test_clearance_is_credit() {
        let posting = Posting::clearance(
            CustomerId::new(),
            ClearanceReceiptId::new(),
            dec!(480),
            false,
            None,
        )
        .unwrap();

        assert_eq!(posting.kind, LedgerRowKind::Clearance);
        assert_eq!(posting.debit, dec!(0));
        assert_eq!(posting.credit, dec!(480));
        assert!(posting.clearance_receipt_id.is_some());
        assert!(posting.is_one_sided());
    }

    #[test]
    fn test_direct_cash_both_directions() {
        let debit = Posting::direct_cash(
            CustomerId::new(),
            CashDirection::Debit,
            dec!(50),
            None,
            false,
        )
        .unwrap();
        assert_eq!((debit.debit, debit.credit), (dec!(50), dec!(0)));

        let credit = Posting::direct_cash(
            CustomerId::new(),
            CashDirection::Credit,
            dec!(75),
            Some("cash received".to_string()),
            true,
        )
        .unwrap();
        assert_eq!((credit.debit, credit.credit), (dec!(0), dec!(75)));
        assert!(credit.is_discount);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        assert!(matches!(
            Posting::inventory_added(CustomerId::new(), EntryReceiptId::new(), dec!(0), None),
            Err(PostingError::InvalidAmount(_))
        ));
        assert!(matches!(
            Posting::clearance(
                CustomerId::new(),
                ClearanceReceiptId::new(),
                dec!(-10),
                false,
                None
            ),
            Err(PostingError::InvalidAmount(_))
        ));
        assert!(matches!(
            Posting::direct_cash(
                CustomerId::new(),
                CashDirection::Credit,
                dec!(0),
                None,
                false
            ),
            Err(PostingError::InvalidAmount(_))
        ));
    }

    /// Strategy for generating positive amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every constructor output is one-sided, for any positive amount.
        #[test]
        fn prop_postings_always_one_sided(amount in amount_strategy()) {
            let inventory = Posting::inventory_added(
                CustomerId::new(),
                EntryReceiptId::new(),
                amount,
                None,
            )
            .unwrap();
            prop_assert!(inventory.is_one_sided());

            let clearance = Posting::clearance(
                CustomerId::new(),
                ClearanceReceiptId::new(),
                amount,
                false,
                None,
            )
            .unwrap();
            prop_assert!(clearance.is_one_sided());

            for direction in [CashDirection::Debit, CashDirection::Credit] {
                let cash = Posting::direct_cash(
                    CustomerId::new(),
                    direction,
                    amount,
                    None,
                    false,
                )
                .unwrap();
                prop_assert!(cash.is_one_sided());
            }
        }

        /// Non-positive amounts are rejected by every constructor.
        #[test]
        fn prop_non_positive_rejected(n in -1_000_000i64..=0) {
            let amount = Decimal::new(n, 2);
            prop_assert!(Posting::inventory_added(
                CustomerId::new(),
                EntryReceiptId::new(),
                amount,
                None
            )
            .is_err());
            prop_assert!(Posting::clearance(
                CustomerId::new(),
                ClearanceReceiptId::new(),
                amount,
                false,
                None
            )
            .is_err());
            prop_assert!(Posting::direct_cash(
                CustomerId::new(),
                CashDirection::Debit,
                amount,
                None,
                false
            )
            .is_err());
        }
    }
}

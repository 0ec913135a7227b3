//! Pricing collaborator boundary.
//!
//! Valuing stored goods (rate tables, storage-duration pricing) is outside
//! the clearance core; the engine only guarantees that whatever value the
//! collaborator returns is posted to the ledger in the same transaction as
//! the stock decrement.

use rust_decimal::Decimal;

use frigora_shared::types::Quantity;

use crate::clearance::PlannedDecrement;

/// Values cleared stock for ledger posting.
pub trait ClearanceValuer: Send + Sync {
    /// Returns the monetary value of clearing `quantity` from one entry
    /// item. Implementations may consult rate tables keyed by item; the
    /// engine treats the result as opaque.
    fn value_cleared(&self, quantity: &Quantity) -> Decimal;

    /// Returns the total value of a clearance plan.
    fn value_plan(&self, decrements: &[PlannedDecrement]) -> Decimal {
        decrements
            .iter()
            .map(|d| self.value_cleared(&d.cleared))
            .sum()
    }
}

/// Flat per-unit valuer for wiring and tests.
#[derive(Debug, Clone)]
pub struct FlatRateValuer {
    /// Value per primary unit cleared.
    pub rate_per_unit: Decimal,
}

impl FlatRateValuer {
    /// Creates a flat-rate valuer.
    #[must_use]
    pub const fn new(rate_per_unit: Decimal) -> Self {
        Self { rate_per_unit }
    }
}

impl ClearanceValuer for FlatRateValuer {
    fn value_cleared(&self, quantity: &Quantity) -> Decimal {
        quantity.primary * self.rate_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use frigora_shared::types::EntryItemId;

    #[test]
    fn test_flat_rate_values_primary_units() {
        let valuer = FlatRateValuer::new(dec!(12));
        assert_eq!(
            valuer.value_cleared(&Quantity::primary_only(dec!(40))),
            dec!(480)
        );
    }

    #[test]
    fn test_plan_value_sums_lines() {
        let valuer = FlatRateValuer::new(dec!(10));
        let decrements = vec![
            PlannedDecrement {
                entry_item_id: EntryItemId::new(),
                cleared: Quantity::primary_only(dec!(4)),
                remaining_after: Quantity::primary_only(dec!(6)),
            },
            PlannedDecrement {
                entry_item_id: EntryItemId::new(),
                cleared: Quantity::primary_only(dec!(1.5)),
                remaining_after: Quantity::primary_only(dec!(0)),
            },
        ];
        assert_eq!(valuer.value_plan(&decrements), dec!(55));
    }
}

//! Structural validation of clearance requests.
//!
//! Runs before any transaction is opened: these checks depend only on the
//! request itself, never on current stock. Violations are collected rather
//! than returned one at a time, so the caller can surface every problem in
//! a single round trip.

use std::collections::HashSet;

use rust_decimal::Decimal;
use thiserror::Error;

use frigora_shared::types::EntryItemId;

use super::types::ClearanceLine;

/// One structural problem found in a clearance request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// The request contains no lines.
    #[error("Clearance request must contain at least one line")]
    EmptyRequest,

    /// The same entry item appears on more than one line.
    #[error("Entry item {0} appears more than once in the request")]
    DuplicateEntryItem(EntryItemId),

    /// A line requests a zero or negative quantity.
    #[error("Quantity for entry item {entry_item_id} must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// The offending stock line.
        entry_item_id: EntryItemId,
        /// The quantity the line carried.
        quantity: Decimal,
    },

    /// A line requests a zero or negative KJ quantity.
    #[error("KJ quantity for entry item {entry_item_id} must be positive, got {kj_quantity}")]
    NonPositiveKjQuantity {
        /// The offending stock line.
        entry_item_id: EntryItemId,
        /// The KJ quantity the line carried.
        kj_quantity: Decimal,
    },
}

/// Validates the structure of a clearance request's lines.
///
/// Collect-all: returns every violation found, in line order, with
/// `EmptyRequest` short-circuiting since no further checks apply.
#[must_use]
pub fn validate_structure(lines: &[ClearanceLine]) -> Vec<Violation> {
    if lines.is_empty() {
        return vec![Violation::EmptyRequest];
    }

    let mut violations = Vec::new();
    let mut seen: HashSet<EntryItemId> = HashSet::with_capacity(lines.len());

    for line in lines {
        if !seen.insert(line.entry_item_id) {
            violations.push(Violation::DuplicateEntryItem(line.entry_item_id));
        }

        if line.quantity <= Decimal::ZERO {
            violations.push(Violation::NonPositiveQuantity {
                entry_item_id: line.entry_item_id,
                quantity: line.quantity,
            });
        }

        if let Some(kj) = line.kj_quantity {
            if kj <= Decimal::ZERO {
                violations.push(Violation::NonPositiveKjQuantity {
                    entry_item_id: line.entry_item_id,
                    kj_quantity: kj,
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(entry_item_id: EntryItemId, quantity: Decimal) -> ClearanceLine {
        ClearanceLine {
            entry_item_id,
            quantity,
            kj_quantity: None,
        }
    }

    #[test]
    fn test_valid_lines_pass() {
        let lines = vec![
            line(EntryItemId::new(), dec!(40)),
            line(EntryItemId::new(), dec!(1.5)),
        ];
        assert!(validate_structure(&lines).is_empty());
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(validate_structure(&[]), vec![Violation::EmptyRequest]);
    }

    #[test]
    fn test_duplicate_entry_item() {
        let id = EntryItemId::new();
        let lines = vec![line(id, dec!(10)), line(id, dec!(20))];
        assert_eq!(
            validate_structure(&lines),
            vec![Violation::DuplicateEntryItem(id)]
        );
    }

    #[test]
    fn test_non_positive_quantity() {
        let id = EntryItemId::new();
        let lines = vec![line(id, dec!(0))];
        assert_eq!(
            validate_structure(&lines),
            vec![Violation::NonPositiveQuantity {
                entry_item_id: id,
                quantity: dec!(0),
            }]
        );
    }

    #[test]
    fn test_non_positive_kj_quantity() {
        let id = EntryItemId::new();
        let lines = vec![ClearanceLine {
            entry_item_id: id,
            quantity: dec!(10),
            kj_quantity: Some(dec!(-5)),
        }];
        assert_eq!(
            validate_structure(&lines),
            vec![Violation::NonPositiveKjQuantity {
                entry_item_id: id,
                kj_quantity: dec!(-5),
            }]
        );
    }

    #[test]
    fn test_collects_all_violations() {
        let dup = EntryItemId::new();
        let lines = vec![
            line(dup, dec!(10)),
            line(dup, dec!(-1)),
            line(EntryItemId::new(), dec!(0)),
        ];
        let violations = validate_structure(&lines);
        // Duplicate + negative on the second line, zero on the third.
        assert_eq!(violations.len(), 3);
        assert!(matches!(violations[0], Violation::DuplicateEntryItem(id) if id == dup));
        assert!(matches!(
            violations[1],
            Violation::NonPositiveQuantity { entry_item_id, .. } if entry_item_id == dup
        ));
        assert!(matches!(
            violations[2],
            Violation::NonPositiveQuantity { .. }
        ));
    }
}

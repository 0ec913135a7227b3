//! Property-based tests for clearance request validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use frigora_shared::types::EntryItemId;

use super::types::ClearanceLine;
use super::validation::{validate_structure, Violation};

/// Strategy for generating positive quantities.
fn positive_quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating non-positive quantities.
fn non_positive_quantity_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..=0i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating lines with distinct entry items and positive
/// quantities.
fn valid_lines_strategy(max_len: usize) -> impl Strategy<Value = Vec<ClearanceLine>> {
    prop::collection::vec(positive_quantity_strategy(), 1..=max_len).prop_map(|quantities| {
        quantities
            .into_iter()
            .map(|quantity| ClearanceLine {
                entry_item_id: EntryItemId::new(),
                quantity,
                kj_quantity: None,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Distinct items with positive quantities always pass validation.
    #[test]
    fn prop_valid_lines_have_no_violations(lines in valid_lines_strategy(10)) {
        prop_assert!(validate_structure(&lines).is_empty());
    }

    /// A non-positive quantity on any line is always reported, and the
    /// report names the offending line.
    #[test]
    fn prop_non_positive_quantity_always_reported(
        mut lines in valid_lines_strategy(10),
        bad_quantity in non_positive_quantity_strategy(),
        position in 0usize..10,
    ) {
        let index = position % lines.len();
        lines[index].quantity = bad_quantity;
        let bad_id = lines[index].entry_item_id;

        let violations = validate_structure(&lines);
        let reported = violations.iter().any(|v| matches!(
            v,
            Violation::NonPositiveQuantity { entry_item_id, quantity }
                if *entry_item_id == bad_id && *quantity == bad_quantity
        ));
        prop_assert!(reported);
    }

    /// Repeating any line is always reported as a duplicate.
    #[test]
    fn prop_duplicate_always_reported(
        lines in valid_lines_strategy(10),
        position in 0usize..10,
    ) {
        let index = position % lines.len();
        let mut with_dup = lines.clone();
        with_dup.push(lines[index].clone());
        let dup_id = lines[index].entry_item_id;

        let violations = validate_structure(&with_dup);
        prop_assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::DuplicateEntryItem(id) if *id == dup_id)));
    }

    /// Validation collects every violation: planting N bad quantities
    /// yields at least N reports.
    #[test]
    fn prop_collects_all_bad_quantities(
        mut lines in valid_lines_strategy(10),
        bad_count in 1usize..=5,
    ) {
        let bad_count = bad_count.min(lines.len());
        for line in lines.iter_mut().take(bad_count) {
            line.quantity = Decimal::ZERO;
        }

        let violations = validate_structure(&lines);
        prop_assert!(violations.len() >= bad_count);
    }

    /// Validation is deterministic: the same request yields the same
    /// violations.
    #[test]
    fn prop_validation_deterministic(lines in valid_lines_strategy(10)) {
        prop_assert_eq!(validate_structure(&lines), validate_structure(&lines));
    }
}

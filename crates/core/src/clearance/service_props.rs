//! Property-based tests for clearance decrement planning.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use frigora_shared::types::{EntryItemId, Quantity};

use super::error::ClearanceError;
use super::service::ClearanceService;
use super::types::ClearanceLine;

/// Strategy for generating positive integer-ish quantities.
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(Decimal::from)
}

/// Strategy for generating a stock line with its remaining quantity and a
/// request that fits within it.
fn fitting_line_strategy() -> impl Strategy<Value = (ClearanceLine, Decimal)> {
    (quantity_strategy(), quantity_strategy()).prop_map(|(a, b)| {
        let (requested, remaining) = if a <= b { (a, b) } else { (b, a) };
        (
            ClearanceLine {
                entry_item_id: EntryItemId::new(),
                quantity: requested,
                kj_quantity: None,
            },
            remaining,
        )
    })
}

/// Strategy for a whole fitting request: distinct lines, each within stock.
fn fitting_request_strategy(
    max_len: usize,
) -> impl Strategy<Value = (Vec<ClearanceLine>, HashMap<EntryItemId, Decimal>)> {
    prop::collection::vec(fitting_line_strategy(), 1..=max_len).prop_map(|pairs| {
        let mut lines = Vec::with_capacity(pairs.len());
        let mut stock = HashMap::with_capacity(pairs.len());
        for (line, remaining) in pairs {
            stock.insert(line.entry_item_id, remaining);
            lines.push(line);
        }
        (lines, stock)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any fitting request, every planned remaining quantity equals
    /// remaining-before minus quantity-cleared, and is never negative.
    #[test]
    fn prop_decrement_arithmetic((lines, stock) in fitting_request_strategy(8)) {
        let plan = ClearanceService::plan(&lines, |id| {
            stock.get(&id).map(|q| Quantity::primary_only(*q))
        })
        .unwrap();

        prop_assert_eq!(plan.decrements.len(), lines.len());
        for (line, decrement) in lines.iter().zip(&plan.decrements) {
            let before = stock[&line.entry_item_id];
            prop_assert_eq!(
                decrement.remaining_after.primary,
                before - line.quantity
            );
            prop_assert!(decrement.remaining_after.primary >= Decimal::ZERO);
        }
    }

    /// The plan total is the sum of the requested line quantities.
    #[test]
    fn prop_total_is_sum_of_lines((lines, stock) in fitting_request_strategy(8)) {
        let plan = ClearanceService::plan(&lines, |id| {
            stock.get(&id).map(|q| Quantity::primary_only(*q))
        })
        .unwrap();

        let expected: Decimal = lines.iter().map(|l| l.quantity).sum();
        prop_assert_eq!(plan.total_quantity, expected);
    }

    /// Requesting even one unit more than remains always fails with
    /// `InsufficientStock` carrying the exact requested/available figures.
    #[test]
    fn prop_overdraw_always_fails(
        (mut lines, stock) in fitting_request_strategy(8),
        position in 0usize..8,
        excess in 1i64..1_000,
    ) {
        let index = position % lines.len();
        let before = stock[&lines[index].entry_item_id];
        lines[index].quantity = before + Decimal::from(excess);
        let short_id = lines[index].entry_item_id;
        let over = lines[index].quantity;

        let result = ClearanceService::plan(&lines, |id| {
            stock.get(&id).map(|q| Quantity::primary_only(*q))
        });

        match result {
            Err(ClearanceError::InsufficientStock { entry_item_id, requested, available }) => {
                prop_assert_eq!(entry_item_id, short_id);
                prop_assert_eq!(requested, over);
                prop_assert_eq!(available, before);
            }
            other => prop_assert!(false, "expected InsufficientStock, got {:?}", other),
        }
    }

    /// Planning is a pure function: the same request against the same
    /// stock yields the same plan.
    #[test]
    fn prop_planning_deterministic((lines, stock) in fitting_request_strategy(8)) {
        let run = || {
            ClearanceService::plan(&lines, |id| {
                stock.get(&id).map(|q| Quantity::primary_only(*q))
            })
            .unwrap()
        };
        let first = run();
        let second = run();
        prop_assert_eq!(first.decrements, second.decrements);
        prop_assert_eq!(first.total_quantity, second.total_quantity);
    }

    /// Re-planning after applying a plan's decrements models two
    /// back-to-back clearances: the second succeeds only while stock
    /// remains, and stock never goes negative across the pair.
    #[test]
    fn prop_sequential_plans_never_go_negative(
        (lines, stock) in fitting_request_strategy(4),
    ) {
        let first = ClearanceService::plan(&lines, |id| {
            stock.get(&id).map(|q| Quantity::primary_only(*q))
        })
        .unwrap();

        // Apply the first plan, then replay the identical request.
        let mut after: HashMap<EntryItemId, Decimal> = stock.clone();
        for decrement in &first.decrements {
            after.insert(decrement.entry_item_id, decrement.remaining_after.primary);
        }

        let replay = ClearanceService::plan(&lines, |id| {
            after.get(&id).map(|q| Quantity::primary_only(*q))
        });

        match replay {
            Ok(plan) => {
                for decrement in &plan.decrements {
                    prop_assert!(decrement.remaining_after.primary >= Decimal::ZERO);
                }
            }
            Err(ClearanceError::InsufficientStock { available, .. }) => {
                prop_assert!(available >= Decimal::ZERO);
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }
}

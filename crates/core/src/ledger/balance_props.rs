//! Property-based tests for balance projection and statements.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use frigora_shared::types::{CustomerId, LedgerRowId};

use super::balance::{balance_as_of, BalanceTotals, Statement};
use super::types::{LedgerFact, LedgerRowKind};

/// Strategy for one ledger row: a positive amount on exactly one side, at
/// a small offset from a fixed epoch.
fn fact_strategy() -> impl Strategy<Value = LedgerFact> {
    (1i64..1_000_000i64, any::<bool>(), 0i64..100_000i64).prop_map(|(n, is_debit, offset)| {
        let amount = Decimal::new(n, 2);
        let (debit, credit) = if is_debit {
            (amount, Decimal::ZERO)
        } else {
            (Decimal::ZERO, amount)
        };
        LedgerFact {
            id: LedgerRowId::new(),
            customer_id: CustomerId::new(),
            kind: LedgerRowKind::DirectCash,
            debit,
            credit,
            is_discount: false,
            description: None,
            entry_receipt_id: None,
            clearance_receipt_id: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + offset, 0).unwrap(),
        }
    })
}

fn facts_strategy(max_len: usize) -> impl Strategy<Value = Vec<LedgerFact>> {
    prop::collection::vec(fact_strategy(), 0..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The balance equals the sum of deltas, regardless of input order.
    #[test]
    fn prop_balance_order_independent(mut facts in facts_strategy(20)) {
        let forward = balance_as_of(&facts, None);
        facts.reverse();
        prop_assert_eq!(balance_as_of(&facts, None), forward);
    }

    /// Recomputing the balance over the same rows is idempotent.
    #[test]
    fn prop_balance_idempotent(facts in facts_strategy(20)) {
        prop_assert_eq!(balance_as_of(&facts, None), balance_as_of(&facts, None));
    }

    /// Totals decompose the balance: debit_total - credit_total = balance.
    #[test]
    fn prop_totals_decompose_balance(facts in facts_strategy(20)) {
        let totals = BalanceTotals::from_facts(&facts);
        prop_assert_eq!(totals.balance, totals.debit_total - totals.credit_total);
        prop_assert_eq!(totals.balance, balance_as_of(&facts, None));
    }

    /// A cutoff before every row yields zero; a cutoff after every row
    /// yields the full balance.
    #[test]
    fn prop_cutoff_bounds(facts in facts_strategy(20)) {
        let before = Utc.timestamp_opt(1_600_000_000, 0).unwrap();
        let after = Utc.timestamp_opt(1_900_000_000, 0).unwrap();
        prop_assert_eq!(balance_as_of(&facts, Some(before)), Decimal::ZERO);
        prop_assert_eq!(
            balance_as_of(&facts, Some(after)),
            balance_as_of(&facts, None)
        );
    }

    /// Statement running balance: row i carries opening + cumulative sum
    /// of deltas through i, and the last row matches the closing balance.
    #[test]
    fn prop_running_balance_is_cumulative(
        opening in -1_000_000i64..1_000_000i64,
        facts in facts_strategy(20),
    ) {
        let opening = Decimal::new(opening, 2);
        let statement = Statement::new(opening, facts);

        let mut expected = opening;
        let mut last = opening;
        for row in statement.rows() {
            expected += row.delta;
            prop_assert_eq!(row.running_balance, expected);
            last = row.running_balance;
        }
        prop_assert_eq!(statement.closing_balance(), last);
    }

    /// Statements are restartable: two iterations yield identical rows.
    #[test]
    fn prop_statement_restartable(facts in facts_strategy(20)) {
        let statement = Statement::new(Decimal::ZERO, facts);
        let first: Vec<_> = statement.rows().collect();
        let second: Vec<_> = statement.rows().collect();
        prop_assert_eq!(first, second);
    }

    /// Statement ordering is deterministic under input shuffling: rows
    /// sort by (created_at, id) no matter how they arrive.
    #[test]
    fn prop_statement_order_canonical(mut facts in facts_strategy(20)) {
        let forward = Statement::new(Decimal::ZERO, facts.clone());
        facts.reverse();
        let reversed = Statement::new(Decimal::ZERO, facts);

        let a: Vec<_> = forward.rows().map(|r| (r.fact.id, r.running_balance)).collect();
        let b: Vec<_> = reversed.rows().map(|r| (r.fact.id, r.running_balance)).collect();
        prop_assert_eq!(a, b);
    }
}

//! Customer balance projection.
//!
//! A customer's balance is never stored: it is always a fold over the
//! immutable ledger rows, so there is no second source of truth that could
//! drift from the events. Rows are ordered by `(created_at, id)`; the id is
//! a UUID v7, which gives a deterministic tie-break within one timestamp.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::LedgerFact;

/// Aggregate totals behind a balance figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceTotals {
    /// Sum of all debit amounts.
    pub debit_total: Decimal,
    /// Sum of all credit amounts.
    pub credit_total: Decimal,
    /// Net balance (debits minus credits).
    pub balance: Decimal,
}

impl BalanceTotals {
    /// Folds totals out of a set of ledger rows.
    #[must_use]
    pub fn from_facts(facts: &[LedgerFact]) -> Self {
        let debit_total: Decimal = facts.iter().map(|f| f.debit).sum();
        let credit_total: Decimal = facts.iter().map(|f| f.credit).sum();
        Self {
            debit_total,
            credit_total,
            balance: debit_total - credit_total,
        }
    }
}

/// Computes a customer's balance as of a cutoff instant.
///
/// Sums `debit - credit` over rows with `created_at <= cutoff` (all rows
/// when `cutoff` is `None`). Addition commutes, so the result is
/// independent of input order and idempotent to recompute.
#[must_use]
pub fn balance_as_of(facts: &[LedgerFact], cutoff: Option<DateTime<Utc>>) -> Decimal {
    facts
        .iter()
        .filter(|f| cutoff.is_none_or(|c| f.created_at <= c))
        .map(LedgerFact::delta)
        .sum()
}

/// One statement line: a ledger row plus the running balance through it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementRow<'a> {
    /// The ledger row.
    pub fact: &'a LedgerFact,
    /// Balance effect of this row (debit minus credit).
    pub delta: Decimal,
    /// Opening balance plus the cumulative sum through this row.
    pub running_balance: Decimal,
}

/// A customer statement over a window of ledger rows.
///
/// Holds the opening balance (the balance before the window) and the
/// window's rows in ledger order. Iteration is lazy and restartable:
/// `rows()` can be called any number of times and always yields the same
/// sequence.
#[derive(Debug, Clone)]
pub struct Statement {
    opening_balance: Decimal,
    facts: Vec<LedgerFact>,
}

impl Statement {
    /// Builds a statement, sorting the rows into `(created_at, id)` order.
    #[must_use]
    pub fn new(opening_balance: Decimal, mut facts: Vec<LedgerFact>) -> Self {
        facts.sort_by_key(|f| (f.created_at, f.id.into_inner()));
        Self {
            opening_balance,
            facts,
        }
    }

    /// The balance before the first row of the window.
    #[must_use]
    pub const fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    /// Lazily yields the statement rows with their running balance.
    pub fn rows(&self) -> impl Iterator<Item = StatementRow<'_>> {
        self.facts.iter().scan(self.opening_balance, |running, fact| {
            let delta = fact.delta();
            *running += delta;
            Some(StatementRow {
                fact,
                delta,
                running_balance: *running,
            })
        })
    }

    /// The balance after the last row of the window.
    #[must_use]
    pub fn closing_balance(&self) -> Decimal {
        self.opening_balance + self.facts.iter().map(LedgerFact::delta).sum::<Decimal>()
    }

    /// Number of rows in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the window contains no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use frigora_shared::types::{CustomerId, LedgerRowId};

    use crate::ledger::types::LedgerRowKind;

    fn fact_at(secs: i64, debit: Decimal, credit: Decimal) -> LedgerFact {
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
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_balance_simple_fold() {
        let facts = vec![
            fact_at(0, dec!(1000), dec!(0)),
            fact_at(1, dec!(0), dec!(400)),
            fact_at(2, dec!(0), dec!(100)),
        ];
        assert_eq!(balance_as_of(&facts, None), dec!(500));
    }

    #[test]
    fn test_balance_respects_cutoff() {
        let facts = vec![
            fact_at(0, dec!(1000), dec!(0)),
            fact_at(100, dec!(0), dec!(400)),
        ];
        let cutoff = Utc.timestamp_opt(1_700_000_000 + 50, 0).unwrap();
        assert_eq!(balance_as_of(&facts, Some(cutoff)), dec!(1000));
    }

    #[test]
    fn test_balance_order_independent() {
        let mut facts = vec![
            fact_at(0, dec!(100), dec!(0)),
            fact_at(1, dec!(0), dec!(30)),
            fact_at(2, dec!(25), dec!(0)),
        ];
        let forward = balance_as_of(&facts, None);
        facts.reverse();
        assert_eq!(balance_as_of(&facts, None), forward);
    }

    #[test]
    fn test_totals() {
        let facts = vec![
            fact_at(0, dec!(1000), dec!(0)),
            fact_at(1, dec!(0), dec!(400)),
        ];
        let totals = BalanceTotals::from_facts(&facts);
        assert_eq!(totals.debit_total, dec!(1000));
        assert_eq!(totals.credit_total, dec!(400));
        assert_eq!(totals.balance, dec!(600));
    }

    #[test]
    fn test_statement_running_balance() {
        let statement = Statement::new(
            dec!(200),
            vec![
                fact_at(0, dec!(100), dec!(0)),
                fact_at(1, dec!(0), dec!(50)),
                fact_at(2, dec!(0), dec!(250)),
            ],
        );

        let running: Vec<Decimal> = statement.rows().map(|r| r.running_balance).collect();
        assert_eq!(running, vec![dec!(300), dec!(250), dec!(0)]);
        assert_eq!(statement.closing_balance(), dec!(0));
        assert_eq!(statement.opening_balance(), dec!(200));
    }

    #[test]
    fn test_statement_sorts_out_of_order_rows() {
        let statement = Statement::new(
            dec!(0),
            vec![
                fact_at(5, dec!(0), dec!(10)),
                fact_at(1, dec!(100), dec!(0)),
            ],
        );

        let deltas: Vec<Decimal> = statement.rows().map(|r| r.delta).collect();
        assert_eq!(deltas, vec![dec!(100), dec!(-10)]);
    }

    #[test]
    fn test_statement_restartable() {
        let statement = Statement::new(
            dec!(10),
            vec![fact_at(0, dec!(5), dec!(0)), fact_at(1, dec!(0), dec!(3))],
        );

        let first: Vec<Decimal> = statement.rows().map(|r| r.running_balance).collect();
        let second: Vec<Decimal> = statement.rows().map(|r| r.running_balance).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_statement() {
        let statement = Statement::new(dec!(42), vec![]);
        assert!(statement.is_empty());
        assert_eq!(statement.len(), 0);
        assert_eq!(statement.closing_balance(), dec!(42));
        assert_eq!(statement.rows().count(), 0);
    }
}

//! Ledger postings and customer balance projection.
//!
//! This module implements the financial half of the core:
//! - Ledger row kinds and the immutable row fact type
//! - One-sided posting constructors (debit XOR credit)
//! - Balance projection as a pure fold over ledger rows
//! - Statements with a running balance column

pub mod balance;
pub mod posting;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{balance_as_of, BalanceTotals, Statement, StatementRow};
pub use posting::{Posting, PostingError};
pub use types::{CashDirection, LedgerFact, LedgerRowKind};

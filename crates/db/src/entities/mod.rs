//! `SeaORM` entity definitions.

pub mod cleared_items;
pub mod clearance_receipts;
pub mod customers;
pub mod entry_items;
pub mod entry_receipts;
pub mod ledger_rows;

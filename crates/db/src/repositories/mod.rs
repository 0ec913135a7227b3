//! Repository abstractions for data access.

pub mod clearance;
pub mod customer;
pub mod entry;
pub mod inventory;
pub mod ledger;


pub use clearance::ClearanceRepository;
pub use customer::CustomerRepository;
pub use entry::EntryRepository;
pub use inventory::InventoryRepository;
pub use ledger::LedgerRepository;

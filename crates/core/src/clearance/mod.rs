//! Clearance request validation and stock decrement planning.
//!
//! This module implements the decision half of the clearance engine:
//! - Domain types for clearance requests and plans
//! - Structural validation (collect-all, pre-transaction)
//! - Decrement planning against fresh remaining quantities
//! - Error types for clearance operations
//!
//! The execution half (transactions, row locks, persistence) lives in the
//! database crate and feeds this module through lookup closures.

pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use error::ClearanceError;
pub use service::{ClearanceService, ReceiptContext};
pub use types::{
    ClearanceLine, ClearanceOutcome, ClearancePlan, ClearanceRequest, ClearedQuantities,
    PlannedDecrement,
};
pub use validation::{validate_structure, Violation};

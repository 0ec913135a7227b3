//! Core business logic for Frigora.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `clearance` - Clearance request validation and stock decrement planning
//! - `ledger` - One-sided ledger postings and customer balance projection
//! - `pricing` - Pricing collaborator boundary for valuing cleared stock

pub mod clearance;
pub mod ledger;
pub mod pricing;

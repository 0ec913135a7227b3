//! Common types used across the application.

pub mod id;
pub mod quantity;

pub use id::*;
pub use quantity::Quantity;

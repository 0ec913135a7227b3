//! Stock quantity type with an optional secondary KJ dimension.
//!
//! CRITICAL: Never use floating-point for stock quantities.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.
//!
//! Some goods are tracked in two units at once: a primary count (e.g. packs)
//! and a secondary "KJ" weight dimension. The KJ side is optional and only
//! carried for goods that use it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stock quantity with an optional secondary KJ dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// The primary quantity in the item's unit of measure.
    pub primary: Decimal,
    /// Optional secondary KJ quantity.
    pub kj: Option<Decimal>,
}

impl Quantity {
    /// Creates a new quantity.
    #[must_use]
    pub const fn new(primary: Decimal, kj: Option<Decimal>) -> Self {
        Self { primary, kj }
    }

    /// Creates a quantity with only a primary dimension.
    #[must_use]
    pub const fn primary_only(primary: Decimal) -> Self {
        Self { primary, kj: None }
    }

    /// A zero quantity with no KJ dimension.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            primary: Decimal::ZERO,
            kj: None,
        }
    }

    /// Returns true if the primary quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.primary.is_zero()
    }

    /// Returns true if the primary quantity is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.primary > Decimal::ZERO
    }

    /// Subtracts `other` from this quantity.
    ///
    /// Returns `None` if the primary quantity would go negative, if a KJ
    /// amount was requested and the KJ side would go negative, or if any
    /// component of `other` is negative (a negative subtrahend would grow
    /// the remaining stock). The KJ side is only reduced when `other`
    /// carries a KJ amount.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if other.primary < Decimal::ZERO {
            return None;
        }
        let primary = self.primary - other.primary;
        if primary < Decimal::ZERO {
            return None;
        }

        let kj = match (self.kj, other.kj) {
            (Some(have), Some(take)) => {
                if take < Decimal::ZERO {
                    return None;
                }
                let left = have - take;
                if left < Decimal::ZERO {
                    return None;
                }
                Some(left)
            }
            // Request did not touch the KJ side; carry it unchanged.
            (have, None) => have,
            // Item does not track KJ but the request asked for it.
            (None, Some(_)) => return None,
        };

        Some(Self { primary, kj })
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kj {
            Some(kj) => write!(f, "{} ({} KJ)", self.primary, kj),
            None => write!(f, "{}", self.primary),
        }
    }
}

//! Basis-point representation for fee multipliers.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::AmmError;

/// Value that represents 100%.
const MAX_BPS: u32 = 10_000;

/// A fraction expressed in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// Used for both the per-pair trading fee and the factory-wide protocol
/// fee multiplier.  Ceilings are enforced by the component that accepts
/// the value, not by the type.
///
/// # Examples
///
/// ```
/// use nft_amm::domain::{Amount, BasisPoints, Rounding};
///
/// let five_percent = BasisPoints::new(500);
/// let fee = five_percent.apply(Amount::new(11_000), Rounding::Down).expect("no overflow");
/// assert_eq!(fee, Amount::new(550));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u32);

impl BasisPoints {
    /// Zero basis points (0%).
    pub const ZERO: Self = Self(0);

    /// 100% expressed in basis points.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new `BasisPoints` from a raw `u32` value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying `u32` value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` for 0 bp.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is strictly below 100%.
    #[must_use]
    pub const fn is_below_full(&self) -> bool {
        self.0 < MAX_BPS
    }

    /// Computes `amount × self / 10 000` with explicit rounding.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the intermediate multiplication overflows.
    pub const fn apply(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        let product = match amount.get().checked_mul(self.0 as u128) {
            Some(v) => v,
            None => return Err(AmmError::Overflow("basis points apply overflow")),
        };
        match Amount::new(product).checked_div_u128(MAX_BPS as u128, rounding) {
            Some(v) => Ok(v),
            None => Err(AmmError::DivisionByZero),
        }
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

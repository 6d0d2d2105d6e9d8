//! Checked arithmetic trait for [`Amount`].
//!
//! The [`CheckedArithmetic`] trait lifts the `Option`-returning helpers
//! on [`Amount`] into [`Result`]s carrying a specific [`AmmError`] so
//! that `?` can be used throughout curve and settlement code.
//!
//! # Examples
//!
//! ```
//! use nft_amm::domain::Amount;
//! use nft_amm::math::CheckedArithmetic;
//!
//! let sum = Amount::new(100).safe_add(&Amount::new(200));
//! assert_eq!(sum, Ok(Amount::new(300)));
//! ```

use crate::domain::{Amount, Rounding};
use crate::error::AmmError;

/// Fallible arithmetic returning typed errors.
///
/// # Contract
///
/// - **No panics**: every error condition produces `Err`.
/// - **No saturation**: saturation hides bugs; errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication by a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] on overflow.
    fn safe_mul_u128(&self, factor: u128) -> Result<Self, AmmError>;

    /// Checked division by a scalar with explicit [`Rounding`].
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `divisor` is zero.
    fn safe_div_u128(&self, divisor: u128, rounding: Rounding) -> Result<Self, AmmError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul_u128(&self, factor: u128) -> Result<Self, AmmError> {
        self.checked_mul_u128(factor)
            .ok_or(AmmError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div_u128(&self, divisor: u128, rounding: Rounding) -> Result<Self, AmmError> {
        self.checked_div_u128(divisor, rounding)
            .ok_or(AmmError::DivisionByZero)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn add_ok_and_overflow() {
        assert_eq!(
            Amount::new(1).safe_add(&Amount::new(2)),
            Ok(Amount::new(3))
        );
        let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&Amount::new(1)) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn sub_underflow_is_distinct_from_overflow() {
        let Err(AmmError::Underflow(_)) = Amount::ZERO.safe_sub(&Amount::new(1)) else {
            panic!("expected Underflow");
        };
    }

    #[test]
    fn mul_and_div() {
        assert_eq!(Amount::new(6).safe_mul_u128(7), Ok(Amount::new(42)));
        assert_eq!(
            Amount::new(43).safe_div_u128(7, Rounding::Up),
            Ok(Amount::new(7))
        );
        assert_eq!(
            Amount::new(43).safe_div_u128(0, Rounding::Down),
            Err(AmmError::DivisionByZero)
        );
    }
}

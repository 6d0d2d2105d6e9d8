//! WAD (1e18) fixed-point helpers.
//!
//! Exponential curves store their multiplier as a WAD-scaled integer:
//! `1.1` is `1_100_000_000_000_000_000`.  Products are formed in a
//! 256-bit intermediate, so any result that fits in `u128` is returned
//! whatever the size of the operands.

use alloy_primitives::U256;

use crate::domain::Rounding;
use crate::error::AmmError;

/// `1.0` in WAD fixed point.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Computes `a × b / WAD` with explicit rounding.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the result does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use nft_amm::domain::Rounding;
/// use nft_amm::math::{mul_wad, WAD};
///
/// let price = 2 * WAD;
/// let growth = WAD + WAD / 10; // 1.1
/// assert_eq!(mul_wad(price, growth, Rounding::Down), Ok(2_200_000_000_000_000_000));
/// ```
pub fn mul_wad(a: u128, b: u128, rounding: Rounding) -> Result<u128, AmmError> {
    mul_div(a, b, WAD, rounding, "wad multiplication overflow")
}

/// Computes `a × WAD / b` with explicit rounding.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `b` is zero.
/// - [`AmmError::Overflow`] if the result does not fit in `u128`.
pub fn div_wad(a: u128, b: u128, rounding: Rounding) -> Result<u128, AmmError> {
    if b == 0 {
        return Err(AmmError::DivisionByZero);
    }
    mul_div(a, WAD, b, rounding, "wad division overflow")
}

/// `a × b / denominator` over a full-width product. `denominator` is non-zero.
fn mul_div(
    a: u128,
    b: u128,
    denominator: u128,
    rounding: Rounding,
    overflow: &'static str,
) -> Result<u128, AmmError> {
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let mut quotient = product / denominator;
    if rounding.is_up() && !(product % denominator).is_zero() {
        quotient += U256::from(1u8);
    }
    u128::try_from(quotient).map_err(|_| AmmError::Overflow(overflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_identity() {
        assert_eq!(mul_wad(12_345, WAD, Rounding::Down), Ok(12_345));
        assert_eq!(mul_wad(12_345 * WAD, WAD, Rounding::Up), Ok(12_345 * WAD));
    }

    #[test]
    fn mul_rounding() {
        // 3 × 0.5 = 1.5 → 1 / 2
        assert_eq!(mul_wad(3, WAD / 2, Rounding::Down), Ok(1));
        assert_eq!(mul_wad(3, WAD / 2, Rounding::Up), Ok(2));
    }

    #[test]
    fn mul_large_price_does_not_overflow_early() {
        // A naive `a × b` would overflow u128 here.
        let price = 1_000_000 * WAD;
        let growth = WAD + WAD / 10;
        assert_eq!(mul_wad(price, growth, Rounding::Down), Ok(1_100_000 * WAD));
    }

    #[test]
    fn mul_overflow_reported() {
        assert!(matches!(
            mul_wad(u128::MAX, 2 * WAD, Rounding::Down),
            Err(AmmError::Overflow(_))
        ));
    }

    #[test]
    fn div_inverse_of_mul() {
        let growth = WAD + WAD / 10;
        assert_eq!(mul_wad(10 * WAD, growth, Rounding::Down), Ok(11 * WAD));
        assert_eq!(div_wad(11 * WAD, growth, Rounding::Down), Ok(10 * WAD));
    }

    #[test]
    fn large_multiplier_with_small_result() {
        // 1.5 × 1000 and its inverse; the intermediates exceed u128.
        let delta = 1_000 * WAD;
        assert_eq!(
            mul_wad(WAD + WAD / 2, delta, Rounding::Up),
            Ok(1_500 * WAD)
        );
        assert_eq!(
            div_wad(1_500 * WAD + 1, delta, Rounding::Down),
            Ok(WAD + WAD / 2)
        );
        assert_eq!(
            div_wad(1_500 * WAD + 1, delta, Rounding::Up),
            Ok(WAD + WAD / 2 + 1)
        );
    }

    #[test]
    fn div_overflow_reported() {
        assert!(matches!(
            div_wad(u128::MAX, 1, Rounding::Down),
            Err(AmmError::Overflow(_))
        ));
    }

    #[test]
    fn div_rounding_and_zero() {
        // 1 / 3 in WAD
        assert_eq!(div_wad(1, 3, Rounding::Down), Ok(333_333_333_333_333_333));
        assert_eq!(div_wad(1, 3, Rounding::Up), Ok(333_333_333_333_333_334));
        assert_eq!(div_wad(1, 0, Rounding::Down), Err(AmmError::DivisionByZero));
    }
}

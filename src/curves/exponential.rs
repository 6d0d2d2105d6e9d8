//! Exponential bonding curve.
//!
//! `delta` is a WAD multiplier strictly greater than `1.0`.  Each NFT
//! bought multiplies the spot price by `delta`; each NFT sold divides it,
//! never going below [`MIN_PRICE`].
//!
//! Items are priced one step at a time so that an `n`-item quote is the
//! exact composition of `n` single-item quotes under the same rounding:
//! buys round the new price up, sells round it down.

use serde::{Deserialize, Serialize};

use super::fee_shares;
use crate::domain::{Amount, BasisPoints, BuyQuote, Delta, Rounding, SellQuote};
use crate::error::AmmError;
use crate::math::{div_wad, mul_wad, CheckedArithmetic, WAD};
use crate::traits::BondingCurve;

/// Lowest spot price an exponential pool may hold (1 gwei).
pub const MIN_PRICE: u128 = 1_000_000_000;

/// Multiplicative-step bonding curve.
///
/// # Examples
///
/// ```
/// use nft_amm::curves::ExponentialCurve;
/// use nft_amm::domain::{Amount, BasisPoints, Delta};
/// use nft_amm::math::WAD;
/// use nft_amm::traits::BondingCurve;
///
/// let curve = ExponentialCurve;
/// let quote = curve
///     .get_buy_info(
///         Amount::new(WAD),
///         Delta::new(2 * WAD),
///         2,
///         BasisPoints::ZERO,
///         BasisPoints::ZERO,
///     )
///     .expect("priced");
/// // 2 + 4
/// assert_eq!(quote.input_value(), Amount::new(6 * WAD));
/// assert_eq!(quote.new_spot_price(), Amount::new(4 * WAD));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExponentialCurve;

impl BondingCurve for ExponentialCurve {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn validate_delta(&self, delta: Delta) -> Result<(), AmmError> {
        if delta.get() <= WAD {
            return Err(AmmError::InvalidDelta("multiplier must exceed 1.0"));
        }
        Ok(())
    }

    fn validate_spot_price(&self, spot_price: Amount) -> Result<(), AmmError> {
        if spot_price.get() < MIN_PRICE {
            return Err(AmmError::InvalidSpotPrice("below minimum price"));
        }
        Ok(())
    }

    fn get_buy_info(
        &self,
        spot_price: Amount,
        delta: Delta,
        num_items: usize,
        fee: BasisPoints,
        protocol_fee: BasisPoints,
    ) -> Result<BuyQuote, AmmError> {
        if num_items == 0 {
            return Err(AmmError::InvalidNumItems);
        }

        let mut price = spot_price.get();
        let mut value = Amount::ZERO;
        for _ in 0..num_items {
            price = mul_wad(price, delta.get(), Rounding::Up)
                .map_err(|_| AmmError::SpotPriceOverflow)?;
            value = value.safe_add(&Amount::new(price))?;
        }

        let (trade_fee, protocol) = fee_shares(value, fee, protocol_fee)?;
        BuyQuote::new(
            num_items,
            Amount::new(price),
            delta,
            value,
            trade_fee,
            protocol,
        )
    }

    fn get_sell_info(
        &self,
        spot_price: Amount,
        delta: Delta,
        num_items: usize,
        fee: BasisPoints,
        protocol_fee: BasisPoints,
    ) -> Result<SellQuote, AmmError> {
        if num_items == 0 {
            return Err(AmmError::InvalidNumItems);
        }

        let mut price = spot_price.get();
        let mut value = Amount::ZERO;
        for _ in 0..num_items {
            value = value.safe_add(&Amount::new(price))?;
            price = div_wad(price, delta.get(), Rounding::Down)?.max(MIN_PRICE);
        }

        let (trade_fee, protocol) = fee_shares(value, fee, protocol_fee)?;
        SellQuote::new(
            num_items,
            Amount::new(price),
            delta,
            value,
            trade_fee,
            protocol,
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const GROWTH: Delta = Delta::new(WAD + WAD / 10); // 1.1

    #[test]
    fn validation_bounds() {
        let curve = ExponentialCurve;
        assert!(curve.validate_delta(GROWTH).is_ok());
        assert!(matches!(
            curve.validate_delta(Delta::new(WAD)),
            Err(AmmError::InvalidDelta(_))
        ));
        assert!(curve.validate_spot_price(Amount::new(MIN_PRICE)).is_ok());
        assert!(matches!(
            curve.validate_spot_price(Amount::new(MIN_PRICE - 1)),
            Err(AmmError::InvalidSpotPrice(_))
        ));
    }

    #[test]
    fn buy_compounds_per_item() {
        let Ok(q) = ExponentialCurve.get_buy_info(
            Amount::new(10 * WAD),
            GROWTH,
            2,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        ) else {
            panic!("expected buy quote");
        };
        // 11 + 12.1
        assert_eq!(q.new_spot_price(), Amount::new(12 * WAD + WAD / 10));
        assert_eq!(q.input_value(), Amount::new(23 * WAD + WAD / 10));
    }

    #[test]
    fn sell_pays_current_then_divides() {
        let Ok(q) = ExponentialCurve.get_sell_info(
            Amount::new(121 * WAD / 10),
            GROWTH,
            2,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        ) else {
            panic!("expected sell quote");
        };
        // 12.1 + 11
        assert_eq!(q.output_value(), Amount::new(23 * WAD + WAD / 10));
        assert_eq!(q.new_spot_price(), Amount::new(10 * WAD));
    }

    #[test]
    fn sell_floors_at_min_price() {
        let Ok(q) = ExponentialCurve.get_sell_info(
            Amount::new(MIN_PRICE),
            Delta::new(2 * WAD),
            3,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        ) else {
            panic!("expected sell quote");
        };
        assert_eq!(q.new_spot_price(), Amount::new(MIN_PRICE));
        assert_eq!(q.output_value(), Amount::new(3 * MIN_PRICE));
    }

    #[test]
    fn buy_overflow_is_spot_price_overflow() {
        let result = ExponentialCurve.get_buy_info(
            Amount::new(u128::MAX / 2),
            Delta::new(3 * WAD),
            1,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        );
        assert_eq!(result, Err(AmmError::SpotPriceOverflow));
    }

    #[test]
    fn steep_multiplier_prices_within_range() {
        let delta = Delta::new(1_000 * WAD);
        let Ok(buy) = ExponentialCurve.get_buy_info(
            Amount::new(WAD + WAD / 2),
            delta,
            1,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        ) else {
            panic!("expected buy quote");
        };
        assert_eq!(buy.new_spot_price(), Amount::new(1_500 * WAD));
        assert_eq!(buy.input_value(), Amount::new(1_500 * WAD));

        let Ok(sell) = ExponentialCurve.get_sell_info(
            Amount::new(1_500 * WAD + 1),
            delta,
            1,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        ) else {
            panic!("expected sell quote");
        };
        assert_eq!(sell.output_value(), Amount::new(1_500 * WAD + 1));
        assert_eq!(sell.new_spot_price(), Amount::new(WAD + WAD / 2));
    }

    #[test]
    fn fees_leave_price_untouched() {
        let spot = Amount::new(10 * WAD);
        let Ok(plain) =
            ExponentialCurve.get_buy_info(spot, GROWTH, 1, BasisPoints::ZERO, BasisPoints::ZERO)
        else {
            panic!("expected buy quote");
        };
        let Ok(charged) = ExponentialCurve.get_buy_info(
            spot,
            GROWTH,
            1,
            BasisPoints::new(250),
            BasisPoints::new(500),
        ) else {
            panic!("expected buy quote");
        };
        assert_eq!(plain.new_spot_price(), charged.new_spot_price());
        assert_eq!(charged.trade_fee(), Amount::new(11 * WAD / 40));
        assert_eq!(charged.protocol_fee(), Amount::new(11 * WAD / 20));
    }
}

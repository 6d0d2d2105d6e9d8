//! Linear bonding curve.
//!
//! Every NFT bought raises the spot price by `delta`; every NFT sold
//! lowers it by `delta`, clamped at a floor of zero.
//!
//! # Pricing (n items)
//!
//! ```text
//! buy:   new_spot = spot + n·δ
//!        value    = n·(spot + δ) + δ·n(n−1)/2      each item costs the next step
//! sell:  new_spot = spot − n·δ                      (floor 0)
//!        value    = n·spot − δ·n(n−1)/2             each item pays the current step
//! ```
//!
//! The step is additive, so the closed forms are exactly the sum of `n`
//! single-item steps.  When a sale would push the price below zero only
//! `⌊spot / δ⌋ + 1` items are priced (down to zero) and the rest are
//! taken at zero.

use serde::{Deserialize, Serialize};

use super::fee_shares;
use crate::domain::{Amount, BasisPoints, BuyQuote, Delta, SellQuote};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::BondingCurve;

/// Additive-step bonding curve.  Any delta and spot price are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearCurve;

/// `n(n−1)/2` for a step count, checked.
fn triangular(n: u128) -> Result<u128, AmmError> {
    let product = n
        .checked_mul(n.saturating_sub(1))
        .ok_or(AmmError::Overflow("item count overflow"))?;
    Ok(product / 2)
}

impl BondingCurve for LinearCurve {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn validate_delta(&self, _delta: Delta) -> Result<(), AmmError> {
        Ok(())
    }

    fn validate_spot_price(&self, _spot_price: Amount) -> Result<(), AmmError> {
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
        let n = num_items as u128;
        let step = Amount::new(delta.get());

        let new_spot_price = step
            .checked_mul_u128(n)
            .and_then(|rise| spot_price.checked_add(&rise))
            .ok_or(AmmError::SpotPriceOverflow)?;
        let buy_spot_price = spot_price
            .checked_add(&step)
            .ok_or(AmmError::SpotPriceOverflow)?;

        let value = buy_spot_price
            .safe_mul_u128(n)?
            .safe_add(&step.safe_mul_u128(triangular(n)?)?)?;

        let (trade_fee, protocol) = fee_shares(value, fee, protocol_fee)?;
        BuyQuote::new(num_items, new_spot_price, delta, value, trade_fee, protocol)
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
        let step = Amount::new(delta.get());
        let mut n = num_items as u128;

        // An overflowing decrease is necessarily larger than the spot price.
        let new_spot_price = match step.checked_mul_u128(n) {
            Some(decrease) if decrease <= spot_price => spot_price.safe_sub(&decrease)?,
            _ => {
                // Reaching this arm implies delta > 0.
                n = spot_price.get() / delta.get() + 1;
                Amount::ZERO
            }
        };

        let value = spot_price
            .safe_mul_u128(n)?
            .safe_sub(&step.safe_mul_u128(triangular(n)?)?)?;

        let priced_items = usize::try_from(n).unwrap_or(num_items).min(num_items);
        let (trade_fee, protocol) = fee_shares(value, fee, protocol_fee)?;
        SellQuote::new(
            priced_items,
            new_spot_price,
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

    const ETH: u128 = 1_000_000_000_000_000_000;
    const SPOT: Amount = Amount::new(ETH / 100); // 0.01
    const DELTA: Delta = Delta::new(ETH / 1_000); // 0.001

    fn buy(spot: Amount, delta: Delta, n: usize) -> BuyQuote {
        let Ok(q) = LinearCurve.get_buy_info(spot, delta, n, BasisPoints::ZERO, BasisPoints::ZERO)
        else {
            panic!("expected buy quote");
        };
        q
    }

    fn sell(spot: Amount, delta: Delta, n: usize) -> SellQuote {
        let Ok(q) =
            LinearCurve.get_sell_info(spot, delta, n, BasisPoints::ZERO, BasisPoints::ZERO)
        else {
            panic!("expected sell quote");
        };
        q
    }

    #[test]
    fn single_buy_costs_next_step() {
        let q = buy(SPOT, DELTA, 1);
        assert_eq!(q.new_spot_price(), Amount::new(11 * ETH / 1_000));
        assert_eq!(q.input_value(), Amount::new(11 * ETH / 1_000));
    }

    #[test]
    fn three_buys_sum_three_steps() {
        let q = buy(SPOT, DELTA, 3);
        // 0.011 + 0.012 + 0.013
        assert_eq!(q.input_value(), Amount::new(36 * ETH / 1_000));
        assert_eq!(q.new_spot_price(), Amount::new(13 * ETH / 1_000));
    }

    #[test]
    fn sell_pays_current_step() {
        let q = sell(SPOT, DELTA, 2);
        // 0.010 + 0.009
        assert_eq!(q.output_value(), Amount::new(19 * ETH / 1_000));
        assert_eq!(q.new_spot_price(), Amount::new(8 * ETH / 1_000));
        assert_eq!(q.num_items(), 2);
    }

    #[test]
    fn sell_clamps_at_zero() {
        // spot 25, delta 10: items priced 25, 15, 5, then zero.
        let q = sell(Amount::new(25), Delta::new(10), 5);
        assert_eq!(q.new_spot_price(), Amount::ZERO);
        assert_eq!(q.num_items(), 3);
        assert_eq!(q.output_value(), Amount::new(45));
    }

    #[test]
    fn sell_exactly_to_zero_is_not_clamped() {
        let q = sell(Amount::new(30), Delta::new(10), 3);
        assert_eq!(q.new_spot_price(), Amount::ZERO);
        assert_eq!(q.num_items(), 3);
        assert_eq!(q.output_value(), Amount::new(60));
    }

    #[test]
    fn zero_items_rejected() {
        let buy = LinearCurve.get_buy_info(SPOT, DELTA, 0, BasisPoints::ZERO, BasisPoints::ZERO);
        let sell =
            LinearCurve.get_sell_info(SPOT, DELTA, 0, BasisPoints::ZERO, BasisPoints::ZERO);
        assert_eq!(buy, Err(AmmError::InvalidNumItems));
        assert_eq!(sell, Err(AmmError::InvalidNumItems));
    }

    #[test]
    fn spot_price_overflow_rejected() {
        let result = LinearCurve.get_buy_info(
            Amount::MAX,
            Delta::new(1),
            1,
            BasisPoints::ZERO,
            BasisPoints::ZERO,
        );
        assert_eq!(result, Err(AmmError::SpotPriceOverflow));
    }

    #[test]
    fn fees_are_shares_of_curve_value() {
        let Ok(q) = LinearCurve.get_buy_info(
            SPOT,
            DELTA,
            1,
            BasisPoints::new(100),
            BasisPoints::new(500),
        ) else {
            panic!("expected buy quote");
        };
        let value = 11 * ETH / 1_000;
        assert_eq!(q.curve_value(), Amount::new(value));
        assert_eq!(q.trade_fee(), Amount::new(value / 100));
        assert_eq!(q.protocol_fee(), Amount::new(value / 20));
        assert_eq!(q.input_value(), Amount::new(value + value / 100 + value / 20));
        // Fees do not move the price.
        assert_eq!(q.new_spot_price(), Amount::new(value));
    }

    #[test]
    fn sell_fees_reduce_output() {
        let Ok(q) = LinearCurve.get_sell_info(
            Amount::new(10_000),
            Delta::new(100),
            1,
            BasisPoints::new(1_000),
            BasisPoints::new(500),
        ) else {
            panic!("expected sell quote");
        };
        assert_eq!(q.output_value(), Amount::new(8_500));
        assert_eq!(q.new_spot_price(), Amount::new(9_900));
    }

    #[test]
    fn buy_then_sell_round_trip_is_exact() {
        let up = buy(SPOT, DELTA, 4);
        let down = sell(up.new_spot_price(), DELTA, 4);
        assert_eq!(down.new_spot_price(), SPOT);
    }

    #[test]
    fn flat_curve_with_zero_delta() {
        let q = buy(SPOT, Delta::ZERO, 5);
        assert_eq!(q.input_value(), Amount::new(5 * SPOT.get()));
        assert_eq!(q.new_spot_price(), SPOT);
        let s = sell(SPOT, Delta::ZERO, 5);
        assert_eq!(s.output_value(), Amount::new(5 * SPOT.get()));
    }
}

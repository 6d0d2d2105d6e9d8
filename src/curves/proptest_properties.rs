//! Property-based tests using `proptest` for curve invariants.
//!
//! 1. **Linear reversibility**: buying then selling `n` items returns the
//!    spot price exactly.
//! 2. **Composition**: an `n`-item quote equals `n` single-item quotes
//!    chained on the new spot price.
//! 3. **Monotonicity**: buying never lowers the price, selling never
//!    raises it.
//! 4. **Fee bounds**: fees never exceed the raw curve value.

use proptest::prelude::*;

use super::{ExponentialCurve, LinearCurve};
use crate::domain::{Amount, BasisPoints, Delta};
use crate::math::WAD;
use crate::traits::BondingCurve;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn spot_strategy() -> impl Strategy<Value = u128> {
    1_000_000_000u128..1_000_000_000_000_000_000_000u128
}

fn linear_delta_strategy() -> impl Strategy<Value = u128> {
    0u128..1_000_000_000_000_000_000u128
}

fn growth_strategy() -> impl Strategy<Value = u128> {
    (WAD + 1)..(2 * WAD)
}

fn items_strategy() -> impl Strategy<Value = usize> {
    1usize..12
}

fn fee_strategy() -> impl Strategy<Value = u32> {
    0u32..9_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_linear_round_trip_restores_spot(
        spot in spot_strategy(),
        delta in linear_delta_strategy(),
        n in items_strategy(),
    ) {
        let curve = LinearCurve;
        let Ok(up) = curve.get_buy_info(
            Amount::new(spot), Delta::new(delta), n, BasisPoints::ZERO, BasisPoints::ZERO,
        ) else {
            return Ok(());
        };
        let Ok(down) = curve.get_sell_info(
            up.new_spot_price(), Delta::new(delta), n, BasisPoints::ZERO, BasisPoints::ZERO,
        ) else {
            return Ok(());
        };
        prop_assert_eq!(down.new_spot_price(), Amount::new(spot));
        prop_assert!(down.output_value() <= up.input_value());
    }

    #[test]
    fn prop_linear_buy_composes(
        spot in spot_strategy(),
        delta in linear_delta_strategy(),
        n in items_strategy(),
    ) {
        let curve = LinearCurve;
        let d = Delta::new(delta);
        let Ok(batch) = curve.get_buy_info(Amount::new(spot), d, n, BasisPoints::ZERO, BasisPoints::ZERO) else {
            return Ok(());
        };
        let mut price = Amount::new(spot);
        let mut total = 0u128;
        for _ in 0..n {
            let Ok(step) = curve.get_buy_info(price, d, 1, BasisPoints::ZERO, BasisPoints::ZERO) else {
                return Ok(());
            };
            total += step.curve_value().get();
            price = step.new_spot_price();
        }
        prop_assert_eq!(batch.new_spot_price(), price);
        prop_assert_eq!(batch.curve_value(), Amount::new(total));
    }

    #[test]
    fn prop_linear_sell_composes(
        spot in 0u128..1_000_000u128,
        delta in 1u128..10_000u128,
        n in items_strategy(),
    ) {
        let curve = LinearCurve;
        let d = Delta::new(delta);
        let Ok(batch) = curve.get_sell_info(Amount::new(spot), d, n, BasisPoints::ZERO, BasisPoints::ZERO) else {
            return Ok(());
        };
        let mut price = Amount::new(spot);
        let mut total = 0u128;
        for _ in 0..n {
            let Ok(step) = curve.get_sell_info(price, d, 1, BasisPoints::ZERO, BasisPoints::ZERO) else {
                return Ok(());
            };
            total += step.curve_value().get();
            price = step.new_spot_price();
        }
        prop_assert_eq!(batch.new_spot_price(), price);
        prop_assert_eq!(batch.curve_value(), Amount::new(total));
    }

    #[test]
    fn prop_exponential_composes(
        spot in spot_strategy(),
        growth in growth_strategy(),
        n in items_strategy(),
    ) {
        let curve = ExponentialCurve;
        let d = Delta::new(growth);
        let Ok(buy) = curve.get_buy_info(Amount::new(spot), d, n, BasisPoints::ZERO, BasisPoints::ZERO) else {
            return Ok(());
        };
        let Ok(sell) = curve.get_sell_info(Amount::new(spot), d, n, BasisPoints::ZERO, BasisPoints::ZERO) else {
            return Ok(());
        };

        let mut up = Amount::new(spot);
        let mut down = Amount::new(spot);
        let mut paid = 0u128;
        let mut received = 0u128;
        for _ in 0..n {
            let Ok(b) = curve.get_buy_info(up, d, 1, BasisPoints::ZERO, BasisPoints::ZERO) else {
                return Ok(());
            };
            let Ok(s) = curve.get_sell_info(down, d, 1, BasisPoints::ZERO, BasisPoints::ZERO) else {
                return Ok(());
            };
            paid += b.curve_value().get();
            received += s.curve_value().get();
            up = b.new_spot_price();
            down = s.new_spot_price();
        }
        prop_assert_eq!(buy.new_spot_price(), up);
        prop_assert_eq!(buy.curve_value(), Amount::new(paid));
        prop_assert_eq!(sell.new_spot_price(), down);
        prop_assert_eq!(sell.curve_value(), Amount::new(received));
    }

    #[test]
    fn prop_price_direction(
        spot in spot_strategy(),
        delta in linear_delta_strategy(),
        growth in growth_strategy(),
        n in items_strategy(),
    ) {
        let s = Amount::new(spot);
        let curves: [(&dyn BondingCurve, Delta); 2] =
            [(&LinearCurve, Delta::new(delta)), (&ExponentialCurve, Delta::new(growth))];
        for (curve, d) in curves {
            if let Ok(q) = curve.get_buy_info(s, d, n, BasisPoints::ZERO, BasisPoints::ZERO) {
                prop_assert!(q.new_spot_price() >= s, "{} buy lowered price", curve.name());
            }
            if let Ok(q) = curve.get_sell_info(s, d, n, BasisPoints::ZERO, BasisPoints::ZERO) {
                prop_assert!(q.new_spot_price() <= s, "{} sell raised price", curve.name());
            }
        }
    }

    #[test]
    fn prop_fees_bounded_by_value(
        spot in spot_strategy(),
        delta in linear_delta_strategy(),
        n in items_strategy(),
        fee in fee_strategy(),
        protocol in 0u32..1_000,
    ) {
        let curve = LinearCurve;
        let Ok(q) = curve.get_buy_info(
            Amount::new(spot), Delta::new(delta), n, BasisPoints::new(fee), BasisPoints::new(protocol),
        ) else {
            return Ok(());
        };
        let fees = q.trade_fee().get() + q.protocol_fee().get();
        prop_assert!(fees <= q.curve_value().get());
        prop_assert_eq!(q.input_value().get(), q.curve_value().get() + fees);
    }
}

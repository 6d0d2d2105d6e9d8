//! Priced outcomes of bonding-curve trades.

use core::fmt;

use super::{Amount, Delta};
use crate::error::AmmError;

/// The price of buying `num_items` NFTs from a pool.
///
/// # Invariants
///
/// - `input_value = curve_value + trade_fee + protocol_fee` never overflows.
/// - Fees are shares of `curve_value` and never move the spot price.
///
/// # Examples
///
/// ```
/// use nft_amm::domain::{Amount, BuyQuote, Delta};
///
/// let quote = BuyQuote::new(
///     1,
///     Amount::new(11),
///     Delta::new(1),
///     Amount::new(11),
///     Amount::ZERO,
///     Amount::new(1),
/// )
/// .expect("valid quote");
/// assert_eq!(quote.input_value(), Amount::new(12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuyQuote {
    num_items: usize,
    new_spot_price: Amount,
    new_delta: Delta,
    curve_value: Amount,
    trade_fee: Amount,
    protocol_fee: Amount,
    input_value: Amount,
}

impl BuyQuote {
    /// Builds a quote, computing the total input.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidNumItems`] if `num_items` is zero.
    /// - [`AmmError::Overflow`] if the total input overflows.
    pub fn new(
        num_items: usize,
        new_spot_price: Amount,
        new_delta: Delta,
        curve_value: Amount,
        trade_fee: Amount,
        protocol_fee: Amount,
    ) -> crate::error::Result<Self> {
        if num_items == 0 {
            return Err(AmmError::InvalidNumItems);
        }
        let input_value = curve_value
            .checked_add(&trade_fee)
            .and_then(|v| v.checked_add(&protocol_fee))
            .ok_or(AmmError::Overflow("buy input overflow"))?;
        Ok(Self {
            num_items,
            new_spot_price,
            new_delta,
            curve_value,
            trade_fee,
            protocol_fee,
            input_value,
        })
    }

    /// Number of items priced.
    #[must_use]
    pub const fn num_items(&self) -> usize {
        self.num_items
    }

    /// Spot price after the trade.
    pub const fn new_spot_price(&self) -> Amount {
        self.new_spot_price
    }

    /// Delta after the trade.
    #[must_use]
    pub const fn new_delta(&self) -> Delta {
        self.new_delta
    }

    /// Raw curve value before fees.
    pub const fn curve_value(&self) -> Amount {
        self.curve_value
    }

    /// Pool trading fee (Trade pools only).
    pub const fn trade_fee(&self) -> Amount {
        self.trade_fee
    }

    /// Share routed to the protocol fee recipient.
    pub const fn protocol_fee(&self) -> Amount {
        self.protocol_fee
    }

    /// Total the buyer pays.
    pub const fn input_value(&self) -> Amount {
        self.input_value
    }
}

impl fmt::Display for BuyQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuyQuote(items={}, in={}, protocol_fee={}, new_spot={})",
            self.num_items, self.input_value, self.protocol_fee, self.new_spot_price
        )
    }
}

/// The proceeds of selling `num_items` NFTs into a pool.
///
/// `num_items` may be smaller than the number requested when a curve
/// clamps at its price floor; the remaining items are taken for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SellQuote {
    num_items: usize,
    new_spot_price: Amount,
    new_delta: Delta,
    curve_value: Amount,
    trade_fee: Amount,
    protocol_fee: Amount,
    output_value: Amount,
}

impl SellQuote {
    /// Builds a quote, computing the net output.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidNumItems`] if `num_items` is zero.
    /// - [`AmmError::FeeTooHigh`] if the fees together exceed the curve value.
    pub fn new(
        num_items: usize,
        new_spot_price: Amount,
        new_delta: Delta,
        curve_value: Amount,
        trade_fee: Amount,
        protocol_fee: Amount,
    ) -> crate::error::Result<Self> {
        if num_items == 0 {
            return Err(AmmError::InvalidNumItems);
        }
        let output_value = curve_value
            .checked_sub(&trade_fee)
            .and_then(|v| v.checked_sub(&protocol_fee))
            .ok_or(AmmError::FeeTooHigh("fees exceed trade value"))?;
        Ok(Self {
            num_items,
            new_spot_price,
            new_delta,
            curve_value,
            trade_fee,
            protocol_fee,
            output_value,
        })
    }

    /// Number of items priced (after any floor clamp).
    #[must_use]
    pub const fn num_items(&self) -> usize {
        self.num_items
    }

    /// Spot price after the trade.
    pub const fn new_spot_price(&self) -> Amount {
        self.new_spot_price
    }

    /// Delta after the trade.
    #[must_use]
    pub const fn new_delta(&self) -> Delta {
        self.new_delta
    }

    /// Raw curve value before fees.
    pub const fn curve_value(&self) -> Amount {
        self.curve_value
    }

    /// Pool trading fee (Trade pools only).
    pub const fn trade_fee(&self) -> Amount {
        self.trade_fee
    }

    /// Share routed to the protocol fee recipient.
    pub const fn protocol_fee(&self) -> Amount {
        self.protocol_fee
    }

    /// Net amount the seller receives.
    pub const fn output_value(&self) -> Amount {
        self.output_value
    }
}

impl fmt::Display for SellQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SellQuote(items={}, out={}, protocol_fee={}, new_spot={})",
            self.num_items, self.output_value, self.protocol_fee, self.new_spot_price
        )
    }
}

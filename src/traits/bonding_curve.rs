//! Pricing strategy trait implemented by every bonding curve.
//!
//! [`BondingCurve`] is a pure function family: given a pool's spot price
//! and delta plus a trade size it returns the priced outcome and the
//! post-trade parameters.  Curves hold no storage of their own.
//!
//! # Fee Invariant
//!
//! Curves price the raw value `v` first and only then derive fees from it:
//!
//! ```text
//! trade_fee    = v × fee          / 10 000   (rounded down)
//! protocol_fee = v × protocol_fee / 10 000   (rounded down)
//! buy input    = v + trade_fee + protocol_fee
//! sell output  = v − trade_fee − protocol_fee
//! ```
//!
//! The new spot price depends only on `(spot_price, delta, num_items)`;
//! fees never move it.
//!
//! # Dispatch Model
//!
//! The set of curves is closed and enumerated in
//! [`CurveBox`](crate::curves::CurveBox); the factory keeps a runtime table
//! from curve address to `CurveBox`, so the pricing code a pair can run is
//! always one of the variants compiled into the crate.

use crate::domain::{Amount, BasisPoints, BuyQuote, Delta, SellQuote};
use crate::error::AmmError;

/// Stateless pricing strategy for NFT pools.
///
/// # Implementors
///
/// - `LinearCurve`: additive step, price floor at zero
/// - `ExponentialCurve`: multiplicative WAD step, price floor at 1 gwei
///
/// # Errors
///
/// - [`AmmError::InvalidNumItems`] when asked to price zero items.
/// - [`AmmError::SpotPriceOverflow`] when the new spot price would not fit.
/// - [`AmmError::Overflow`] when an intermediate total overflows.
pub trait BondingCurve {
    /// Short, stable name of the curve.
    #[must_use]
    fn name(&self) -> &'static str;

    /// Checks that `delta` is meaningful for this curve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidDelta`] if it is not.
    fn validate_delta(&self, delta: Delta) -> Result<(), AmmError>;

    /// Checks that `spot_price` is meaningful for this curve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidSpotPrice`] if it is not.
    fn validate_spot_price(&self, spot_price: Amount) -> Result<(), AmmError>;

    /// Prices buying `num_items` NFTs from a pool.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.
    fn get_buy_info(
        &self,
        spot_price: Amount,
        delta: Delta,
        num_items: usize,
        fee: BasisPoints,
        protocol_fee: BasisPoints,
    ) -> Result<BuyQuote, AmmError>;

    /// Prices selling `num_items` NFTs into a pool.
    ///
    /// # Errors
    ///
    /// See the trait-level documentation.  Additionally returns
    /// [`AmmError::FeeTooHigh`] when the combined fees exceed the value.
    fn get_sell_info(
        &self,
        spot_price: Amount,
        delta: Delta,
        num_items: usize,
        fee: BasisPoints,
        protocol_fee: BasisPoints,
    ) -> Result<SellQuote, AmmError>;
}

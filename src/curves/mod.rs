//! Feature-gated bonding curves and the [`CurveBox`] dispatch enum.
//!
//! Each curve is behind its own Cargo feature flag.  [`CurveBox`] gives
//! the factory a closed, statically dispatched set of strategies it can
//! bind to curve addresses at runtime.
//!
//! # Curves
//!
//! | Feature | Curve | Step |
//! |---------|-------|------|
//! | `linear` | [`LinearCurve`] | `spot ± δ` |
//! | `exponential` | [`ExponentialCurve`] | `spot ×/÷ δ` (WAD) |

#[cfg(feature = "exponential")]
pub mod exponential;
#[cfg(feature = "linear")]
pub mod linear;

mod curve_box;

#[cfg(all(test, feature = "linear", feature = "exponential"))]
mod proptest_properties;

pub use curve_box::{CurveBox, CurveKind};
#[cfg(feature = "exponential")]
pub use exponential::ExponentialCurve;
#[cfg(feature = "linear")]
pub use linear::LinearCurve;

use crate::domain::{Amount, BasisPoints, Rounding};
use crate::error::AmmError;

/// Splits `(trade_fee, protocol_fee)` off a raw curve value.
///
/// Both shares round down so a quote never charges more than the
/// configured rate.
#[cfg_attr(not(any(feature = "linear", feature = "exponential")), allow(dead_code))]
pub(crate) fn fee_shares(
    value: Amount,
    fee: BasisPoints,
    protocol_fee: BasisPoints,
) -> Result<(Amount, Amount), AmmError> {
    let trade = fee.apply(value, Rounding::Down)?;
    let protocol = protocol_fee.apply(value, Rounding::Down)?;
    Ok((trade, protocol))
}

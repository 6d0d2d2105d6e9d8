//! Enum dispatch wrapper for all bonding curves.
//!
//! [`CurveBox`] wraps every concrete curve behind a single enum so that
//! the factory can keep a heterogeneous curve table without `dyn`
//! trait objects.  Each variant is feature-gated to match its curve.

use core::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "exponential")]
use super::exponential::ExponentialCurve;
#[cfg(feature = "linear")]
use super::linear::LinearCurve;

use crate::domain::{Amount, BasisPoints, BuyQuote, Delta, SellQuote};
use crate::error::AmmError;
use crate::traits::BondingCurve;

/// Curve families known to the crate, independent of enabled features.
///
/// Used by configuration files to name the strategy a curve address is
/// bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Additive step.
    Linear,
    /// Multiplicative WAD step.
    Exponential,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Exponential => write!(f, "exponential"),
        }
    }
}

/// Static dispatch enum over the compiled-in curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveBox {
    /// [`LinearCurve`].
    #[cfg(feature = "linear")]
    Linear(LinearCurve),

    /// [`ExponentialCurve`].
    #[cfg(feature = "exponential")]
    Exponential(ExponentialCurve),
}

/// Delegates a method call to every enabled `CurveBox` variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            #[cfg(feature = "linear")]
            CurveBox::Linear(c) => c.$method($($arg),*),
            #[cfg(feature = "exponential")]
            CurveBox::Exponential(c) => c.$method($($arg),*),
        }
    };
}

impl CurveBox {
    /// Builds the curve for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] when the curve's
    /// feature is disabled.
    pub fn from_kind(kind: CurveKind) -> Result<Self, AmmError> {
        match kind {
            #[cfg(feature = "linear")]
            CurveKind::Linear => Ok(Self::Linear(LinearCurve)),
            #[cfg(feature = "exponential")]
            CurveKind::Exponential => Ok(Self::Exponential(ExponentialCurve)),
            #[allow(unreachable_patterns)]
            _ => Err(AmmError::InvalidConfiguration(
                "curve kind not enabled in this build",
            )),
        }
    }

    /// The family this curve belongs to.
    #[must_use]
    pub const fn kind(&self) -> CurveKind {
        match self {
            #[cfg(feature = "linear")]
            Self::Linear(_) => CurveKind::Linear,
            #[cfg(feature = "exponential")]
            Self::Exponential(_) => CurveKind::Exponential,
        }
    }
}

impl BondingCurve for CurveBox {
    fn name(&self) -> &'static str {
        delegate!(self, name())
    }

    fn validate_delta(&self, delta: Delta) -> Result<(), AmmError> {
        delegate!(self, validate_delta(delta))
    }

    fn validate_spot_price(&self, spot_price: Amount) -> Result<(), AmmError> {
        delegate!(self, validate_spot_price(spot_price))
    }

    fn get_buy_info(
        &self,
        spot_price: Amount,
        delta: Delta,
        num_items: usize,
        fee: BasisPoints,
        protocol_fee: BasisPoints,
    ) -> Result<BuyQuote, AmmError> {
        delegate!(
            self,
            get_buy_info(spot_price, delta, num_items, fee, protocol_fee)
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
        delegate!(
            self,
            get_sell_info(spot_price, delta, num_items, fee, protocol_fee)
        )
    }
}

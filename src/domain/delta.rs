//! Curve step parameter.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The per-item step of a bonding curve.
///
/// Its unit depends on the curve: an additive amount of quote asset for
/// the linear curve, a WAD-scaled (1e18 = 1.0) multiplier for the
/// exponential curve.  Curves validate the value they are given.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Delta(u128);

impl Delta {
    /// A zero step (flat price).
    pub const ZERO: Self = Self(0);

    /// Wraps a raw step value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw step value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Δ{}", self.0)
    }
}

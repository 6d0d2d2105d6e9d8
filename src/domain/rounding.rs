//! Explicit rounding direction for divisions.

/// Rounding direction for every division in the library.
///
/// Exponential curve steps round in the pool's favour: up while the price
/// climbs on buys, down while it decays on sells.  Fee shares round down.
///
/// # Examples
///
/// ```
/// use nft_amm::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

//! Deployment parameters of the pair factory.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, BasisPoints};
use crate::error::AmmError;

/// Parameters the factory is deployed with.
///
/// # Validation
///
/// - `owner` must not be the zero address.
/// - `protocol_fee_multiplier` must be strictly below 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    owner: Address,
    protocol_fee_multiplier: BasisPoints,
    protocol_fee_recipient: Address,
}

impl FactoryConfig {
    /// Creates a new `FactoryConfig`.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        owner: Address,
        protocol_fee_multiplier: BasisPoints,
        protocol_fee_recipient: Address,
    ) -> Result<Self, AmmError> {
        let config = Self {
            owner,
            protocol_fee_multiplier,
            protocol_fee_recipient,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] for a zero owner.
    /// - [`AmmError::FeeTooHigh`] for a multiplier of 100% or more.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.owner.is_zero() {
            return Err(AmmError::InvalidConfiguration("factory owner is unset"));
        }
        validate_protocol_fee(self.protocol_fee_multiplier)
    }

    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Share of every trade routed to the protocol.
    #[must_use]
    pub const fn protocol_fee_multiplier(&self) -> BasisPoints {
        self.protocol_fee_multiplier
    }

    #[must_use]
    pub const fn protocol_fee_recipient(&self) -> Address {
        self.protocol_fee_recipient
    }
}

/// Protocol fee rule shared by deployment and later changes.
pub(crate) const fn validate_protocol_fee(multiplier: BasisPoints) -> Result<(), AmmError> {
    if !multiplier.is_below_full() {
        return Err(AmmError::FeeTooHigh("protocol fee must be below 100%"));
    }
    Ok(())
}

/// A trade fee and the protocol fee together must stay below 100%.
pub(crate) const fn validate_combined_fee(
    fee: BasisPoints,
    multiplier: BasisPoints,
) -> Result<(), AmmError> {
    if fee.get() as u64 + multiplier.get() as u64 >= BasisPoints::MAX_PERCENT.get() as u64 {
        return Err(AmmError::FeeTooHigh("trade and protocol fees must total below 100%"));
    }
    Ok(())
}

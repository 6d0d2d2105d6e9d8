//! Unified error types for the NFT AMM library.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  Every variant belongs to exactly one [`ErrorKind`], which
//! tells the caller at which stage of an operation the failure happened:
//!
//! | Kind | Raised | Examples |
//! |------|--------|----------|
//! | [`ErrorKind::Expired`] | first, before pricing | [`AmmError::Expired`] |
//! | [`ErrorKind::Validation`] | before any state change | [`AmmError::BondingCurveNotAllowed`], [`AmmError::InvalidFee`] |
//! | [`ErrorKind::Permission`] | before any transfer | [`AmmError::NftNotPermitted`], [`AmmError::NotOwner`] |
//! | [`ErrorKind::Slippage`] | after pricing, before transfer | [`AmmError::SlippageExceeded`] |
//! | [`ErrorKind::Transfer`] | during settlement, rolls back the transaction | [`AmmError::InsufficientFunds`] |
//! | [`ErrorKind::Arithmetic`] | anywhere | [`AmmError::Overflow`] |

use thiserror::Error;

use crate::domain::{Address, NftId};

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the library can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    // -- expired --------------------------------------------------------------
    /// The caller-supplied deadline is earlier than the execution time.
    #[error("deadline passed")]
    Expired,

    // -- validation -----------------------------------------------------------
    /// A pair was requested with a curve that is not allowlisted.
    #[error("bonding curve not allowed")]
    BondingCurveNotAllowed,
    /// The curve address is not bound to any strategy.
    #[error("unknown bonding curve {0}")]
    UnknownCurve(Address),
    /// The fee is not valid for the pool type.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),
    /// A fee multiplier reaches or exceeds its ceiling.
    #[error("fee too high: {0}")]
    FeeTooHigh(&'static str),
    /// The curve rejected the delta parameter.
    #[error("invalid delta: {0}")]
    InvalidDelta(&'static str),
    /// The curve rejected the spot price.
    #[error("invalid spot price: {0}")]
    InvalidSpotPrice(&'static str),
    /// The item count of a trade is zero or otherwise unusable.
    #[error("invalid number of items")]
    InvalidNumItems,
    /// The new spot price would overflow or go negative.
    #[error("spot price overflow")]
    SpotPriceOverflow,
    /// The same id appears twice in one request.
    #[error("duplicate NFT id {0}")]
    DuplicateNftId(NftId),
    /// The pool type does not support the requested direction.
    #[error("wrong pool type: {0}")]
    WrongPoolType(&'static str),
    /// Trade pools keep their proceeds; they cannot redirect them.
    #[error("invalid asset recipient: {0}")]
    InvalidAssetRecipient(&'static str),
    /// A routed pair is quoted in another asset than the batch.
    #[error("quote asset mismatch for pair {0}")]
    QuoteAssetMismatch(Address),
    /// The address is not a pair deployed by the factory.
    #[error("unknown pair {0}")]
    UnknownPair(Address),
    /// The token contract does not exist in the ledger.
    #[error("unknown token {0}")]
    UnknownToken(Address),
    /// The NFT collection does not exist in the ledger.
    #[error("unknown collection {0}")]
    UnknownCollection(Address),
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    // -- permission -----------------------------------------------------------
    /// The pool does not hold (or list) the requested id.
    #[error("NFT not permitted!")]
    NftNotPermitted(NftId),
    /// A listed id is no longer owned or approved by the pool owner.
    #[error("NFT not owned by pool owner")]
    NftNotOwnedByPoolOwner(NftId),
    /// The caller is not the owner of the factory or pair.
    #[error("caller is not the owner")]
    NotOwner,
    /// An intermediary called a pair without being an allowlisted router.
    #[error("router not allowed")]
    RouterNotAllowed,

    // -- slippage -------------------------------------------------------------
    /// The computed price is outside the caller's bound.
    #[error("slippage exceeded: {0}")]
    SlippageExceeded(&'static str),

    // -- transfer -------------------------------------------------------------
    /// The payer balance cannot cover the transfer.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The spender's allowance cannot cover the transfer.
    #[error("insufficient allowance")]
    InsufficientAllowance,
    /// Spending exceeds the value attached to the transaction.
    #[error("insufficient input value")]
    InsufficientInput,
    /// The NFT is not owned by the account it is moved from.
    #[error("NFT {0} not owned by sender")]
    NftNotOwned(NftId),
    /// The spender is neither the NFT owner nor an approved operator.
    #[error("NFT {0} not approved for transfer")]
    NftNotApproved(NftId),
    /// The NFT id has already been minted.
    #[error("NFT {0} already exists")]
    NftAlreadyExists(NftId),

    // -- arithmetic -----------------------------------------------------------
    /// An intermediate value exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
    /// A subtraction went below zero.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),
    /// A division by zero was attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Coarse classification of [`AmmError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed parameters, rejected before any state change.
    Validation,
    /// Missing rights over an asset or an administrative action.
    Permission,
    /// The priced trade falls outside the caller's bound.
    Slippage,
    /// The deadline has passed.
    Expired,
    /// An asset movement failed; the whole unit of work is rolled back.
    Transfer,
    /// Checked arithmetic failed.
    Arithmetic,
}

impl AmmError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Expired => ErrorKind::Expired,
            Self::BondingCurveNotAllowed
            | Self::UnknownCurve(_)
            | Self::InvalidFee(_)
            | Self::FeeTooHigh(_)
            | Self::InvalidDelta(_)
            | Self::InvalidSpotPrice(_)
            | Self::InvalidNumItems
            | Self::SpotPriceOverflow
            | Self::DuplicateNftId(_)
            | Self::WrongPoolType(_)
            | Self::InvalidAssetRecipient(_)
            | Self::QuoteAssetMismatch(_)
            | Self::UnknownPair(_)
            | Self::UnknownToken(_)
            | Self::UnknownCollection(_)
            | Self::InvalidConfiguration(_) => ErrorKind::Validation,
            Self::NftNotPermitted(_)
            | Self::NftNotOwnedByPoolOwner(_)
            | Self::NotOwner
            | Self::RouterNotAllowed => ErrorKind::Permission,
            Self::SlippageExceeded(_) => ErrorKind::Slippage,
            Self::InsufficientFunds
            | Self::InsufficientAllowance
            | Self::InsufficientInput
            | Self::NftNotOwned(_)
            | Self::NftNotApproved(_)
            | Self::NftAlreadyExists(_) => ErrorKind::Transfer,
            Self::Overflow(_) | Self::Underflow(_) | Self::DivisionByZero => ErrorKind::Arithmetic,
        }
    }
}

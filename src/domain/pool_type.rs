//! Trading direction supported by a pair.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// The direction(s) in which a pair trades.
///
/// The discriminants match the on-wire encoding used by pair creation
/// parameters (`0` = token, `1` = NFT, `2` = trade).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    /// Holds quote asset and buys NFTs from traders.
    Token = 0,
    /// Holds NFTs and sells them to traders.
    Nft = 1,
    /// Buys and sells, charging a trading fee that stays in the pool.
    Trade = 2,
}

impl PoolType {
    /// Decodes the wire discriminant.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] for values above `2`.
    pub const fn from_u8(value: u8) -> Result<Self, AmmError> {
        match value {
            0 => Ok(Self::Token),
            1 => Ok(Self::Nft),
            2 => Ok(Self::Trade),
            _ => Err(AmmError::InvalidConfiguration("unknown pool type")),
        }
    }

    /// Returns `true` if traders can buy NFTs from the pool.
    #[must_use]
    pub const fn sells_nfts(&self) -> bool {
        matches!(self, Self::Nft | Self::Trade)
    }

    /// Returns `true` if traders can sell NFTs into the pool.
    #[must_use]
    pub const fn buys_nfts(&self) -> bool {
        matches!(self, Self::Token | Self::Trade)
    }

    /// Returns `true` for [`PoolType::Trade`].
    #[must_use]
    pub const fn is_trade(&self) -> bool {
        matches!(self, Self::Trade)
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "TOKEN"),
            Self::Nft => write!(f, "NFT"),
            Self::Trade => write!(f, "TRADE"),
        }
    }
}

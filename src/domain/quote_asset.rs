//! The fungible side of a pair.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Address;

/// What a pair is priced in: the chain's native currency or a fungible
/// token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteAsset {
    /// The native currency, paid with transaction value.
    Native,
    /// A fungible token at the given contract address.
    Token(Address),
}

impl QuoteAsset {
    /// Returns `true` for [`QuoteAsset::Native`].
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }

    /// Returns the token contract, if any.
    #[must_use]
    pub const fn token(&self) -> Option<Address> {
        match self {
            Self::Native => None,
            Self::Token(addr) => Some(*addr),
        }
    }
}

impl fmt::Display for QuoteAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(addr) => write!(f, "token:{addr}"),
        }
    }
}

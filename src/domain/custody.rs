//! Where a pair's NFTs physically live.

use serde::{Deserialize, Serialize};

/// How a pair holds the NFTs it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Custody {
    /// The pair owns its NFTs in the collection ledger.
    #[default]
    Escrowed,
    /// The NFTs stay in the pair owner's wallet.  The pair only records
    /// which ids are listed and moves them at settlement using the
    /// owner's operator approval.
    Listed,
}

impl Custody {
    /// Returns `true` for [`Custody::Listed`].
    #[must_use]
    pub const fn is_listed(&self) -> bool {
        matches!(self, Self::Listed)
    }
}

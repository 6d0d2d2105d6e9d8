//! Per-pair legs of a router batch.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, NftId};

/// Buy these exact ids from `pair`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSwapSpecific {
    pub pair: Address,
    pub nft_ids: Vec<NftId>,
    /// Per-leg cap; `None` leaves only the batch total as the bound.
    #[serde(default)]
    pub max_input: Option<Amount>,
}

impl PairSwapSpecific {
    #[must_use]
    pub fn new(pair: Address, nft_ids: Vec<NftId>) -> Self {
        Self {
            pair,
            nft_ids,
            max_input: None,
        }
    }

    #[must_use]
    pub const fn with_max_input(mut self, max_input: Amount) -> Self {
        self.max_input = Some(max_input);
        self
    }
}

/// Buy `num_items` of whatever `pair` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSwapAny {
    pub pair: Address,
    pub num_items: usize,
    #[serde(default)]
    pub max_input: Option<Amount>,
}

impl PairSwapAny {
    #[must_use]
    pub const fn new(pair: Address, num_items: usize) -> Self {
        Self {
            pair,
            num_items,
            max_input: None,
        }
    }

    #[must_use]
    pub const fn with_max_input(mut self, max_input: Amount) -> Self {
        self.max_input = Some(max_input);
        self
    }
}

/// Sell these ids to `pair` for at least `min_output`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSwapSell {
    pub pair: Address,
    pub nft_ids: Vec<NftId>,
    #[serde(default)]
    pub min_output: Amount,
}

impl PairSwapSell {
    #[must_use]
    pub fn new(pair: Address, nft_ids: Vec<NftId>, min_output: Amount) -> Self {
        Self {
            pair,
            nft_ids,
            min_output,
        }
    }
}

/// A buy leg as the batch executor sees it.
pub(super) trait BuyLeg {
    fn pair(&self) -> Address;
    fn max_input(&self) -> Option<Amount>;
}

impl BuyLeg for PairSwapSpecific {
    fn pair(&self) -> Address {
        self.pair
    }

    fn max_input(&self) -> Option<Amount> {
        self.max_input
    }
}

impl BuyLeg for PairSwapAny {
    fn pair(&self) -> Address {
        self.pair
    }

    fn max_input(&self) -> Option<Amount> {
        self.max_input
    }
}

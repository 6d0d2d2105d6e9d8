//! Records emitted by the factory and pairs.
//!
//! Events are the only thing external indexers observe.  Field order is
//! part of the wire contract: indexers decode records positionally, so
//! the first field of [`Event::NewPair`] is always the pool address and
//! serialisation preserves declaration order.

use serde::{Deserialize, Serialize};

use crate::curves::CurveKind;
use crate::domain::{Address, Amount, BasisPoints, Delta, NftId, PoolType, QuoteAsset};

/// A single emitted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A pair was deployed.
    NewPair {
        pool_address: Address,
        owner: Address,
        collection: Address,
        quote_asset: QuoteAsset,
        bonding_curve: Address,
        curve_kind: CurveKind,
        pool_type: PoolType,
        spot_price: Amount,
        delta: Delta,
        fee: BasisPoints,
    },
    /// NFTs left a pair in exchange for quote asset.
    SwapNftOutPair {
        pair: Address,
        ids: Vec<NftId>,
        input_amount: Amount,
    },
    /// NFTs entered a pair in exchange for quote asset.
    SwapNftInPair {
        pair: Address,
        ids: Vec<NftId>,
        output_amount: Amount,
    },
    SpotPriceUpdate {
        pair: Address,
        new_spot_price: Amount,
    },
    DeltaUpdate {
        pair: Address,
        new_delta: Delta,
    },
    FeeUpdate {
        pair: Address,
        new_fee: BasisPoints,
    },
    AssetRecipientChange {
        pair: Address,
        recipient: Option<Address>,
    },
    TokenDeposit {
        pair: Address,
        amount: Amount,
    },
    TokenWithdrawal {
        pair: Address,
        amount: Amount,
    },
    NftDeposit {
        pair: Address,
        ids: Vec<NftId>,
    },
    NftWithdrawal {
        pair: Address,
        ids: Vec<NftId>,
    },
    BondingCurveStatusUpdate {
        curve: Address,
        allowed: bool,
    },
    RouterStatusUpdate {
        router: Address,
        allowed: bool,
    },
    ProtocolFeeMultiplierUpdate {
        multiplier: BasisPoints,
    },
}

impl Event {
    /// Short name of the record type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NewPair { .. } => "NewPair",
            Self::SwapNftOutPair { .. } => "SwapNFTOutPair",
            Self::SwapNftInPair { .. } => "SwapNFTInPair",
            Self::SpotPriceUpdate { .. } => "SpotPriceUpdate",
            Self::DeltaUpdate { .. } => "DeltaUpdate",
            Self::FeeUpdate { .. } => "FeeUpdate",
            Self::AssetRecipientChange { .. } => "AssetRecipientChange",
            Self::TokenDeposit { .. } => "TokenDeposit",
            Self::TokenWithdrawal { .. } => "TokenWithdrawal",
            Self::NftDeposit { .. } => "NFTDeposit",
            Self::NftWithdrawal { .. } => "NFTWithdrawal",
            Self::BondingCurveStatusUpdate { .. } => "BondingCurveStatusUpdate",
            Self::RouterStatusUpdate { .. } => "RouterStatusUpdate",
            Self::ProtocolFeeMultiplierUpdate { .. } => "ProtocolFeeMultiplierUpdate",
        }
    }
}

/// Append-only, ordered event log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    records: Vec<Event>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn emit(&mut self, event: Event) {
        self.records.push(event);
    }

    /// All records in emission order.
    #[must_use]
    pub fn records(&self) -> &[Event] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&Event> {
        self.records.last()
    }
}

//! The NFT/quote-asset trading pair.
//!
//! A [`Pair`] offers one NFT collection against one quote asset at a
//! price set by its bonding curve.  Depending on its [`PoolType`] it
//! sells NFTs to traders, buys them, or both.
//!
//! # Custody
//!
//! | [`Custody`] | NFTs live in | Settlement check |
//! |-------------|--------------|------------------|
//! | `Escrowed` | the pair's address | none beyond the held set |
//! | `Listed` | the owner's wallet | owner still holds the id and has approved the factory or the pair |
//!
//! # Check order for buys
//!
//! 1. deadline ([`AmmError::Expired`])
//! 2. caller ([`AmmError::RouterNotAllowed`])
//! 3. pool type ([`AmmError::WrongPoolType`])
//! 4. request shape ([`AmmError::InvalidNumItems`], [`AmmError::DuplicateNftId`])
//! 5. held set ([`AmmError::NftNotPermitted`])
//! 6. listing ownership ([`AmmError::NftNotOwnedByPoolOwner`])
//! 7. curve pricing, then the caller's bound ([`AmmError::SlippageExceeded`])
//! 8. transfers
//!
//! Operations mutate the transaction's scratch state directly; the
//! enclosing transaction discards everything if any step fails.

mod admin;
mod context;
mod swap;

use std::collections::BTreeSet;

pub use context::{CallFrame, PairContext};

use crate::config::PairConfig;
use crate::curves::CurveBox;
use crate::domain::{
    Address, Amount, BasisPoints, BuyQuote, Custody, Delta, NftId, NftIdSet, PoolType,
    QuoteAsset, SellQuote,
};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::traits::BondingCurve;

/// A deployed trading pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    address: Address,
    owner: Address,
    collection: Address,
    quote_asset: QuoteAsset,
    bonding_curve: Address,
    curve: CurveBox,
    pool_type: PoolType,
    asset_recipient: Option<Address>,
    delta: Delta,
    fee: BasisPoints,
    spot_price: Amount,
    held_ids: NftIdSet,
    custody: Custody,
}

impl Pair {
    /// Builds a pair from a validated configuration.
    ///
    /// The initial ids are recorded as held; moving them into custody is
    /// the factory's job.
    ///
    /// # Errors
    ///
    /// - Any error of [`PairConfig::validate`].
    /// - [`AmmError::InvalidDelta`] / [`AmmError::InvalidSpotPrice`] if the
    ///   curve rejects the parameters.
    pub fn new(
        address: Address,
        owner: Address,
        curve: CurveBox,
        config: &PairConfig,
    ) -> Result<Self, AmmError> {
        config.validate()?;
        curve.validate_delta(config.delta())?;
        curve.validate_spot_price(config.spot_price())?;
        Ok(Self {
            address,
            owner,
            collection: config.collection(),
            quote_asset: config.quote_asset(),
            bonding_curve: config.bonding_curve(),
            curve,
            pool_type: config.pool_type(),
            asset_recipient: config.asset_recipient(),
            delta: config.delta(),
            fee: config.fee(),
            spot_price: config.spot_price(),
            held_ids: config.initial_nft_ids().iter().copied().collect(),
            custody: config.custody(),
        })
    }

    // -- accessors ------------------------------------------------------------

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub const fn collection(&self) -> Address {
        self.collection
    }

    #[must_use]
    pub const fn quote_asset(&self) -> QuoteAsset {
        self.quote_asset
    }

    /// Address of the bonding curve the pair was created with.
    #[must_use]
    pub const fn bonding_curve(&self) -> Address {
        self.bonding_curve
    }

    /// The pricing strategy bound to [`bonding_curve`](Self::bonding_curve).
    #[must_use]
    pub const fn curve(&self) -> &CurveBox {
        &self.curve
    }

    #[must_use]
    pub const fn pool_type(&self) -> PoolType {
        self.pool_type
    }

    #[must_use]
    pub const fn custody(&self) -> Custody {
        self.custody
    }

    #[must_use]
    pub const fn delta(&self) -> Delta {
        self.delta
    }

    /// Trading fee, nonzero only for trade pools.
    #[must_use]
    pub const fn fee(&self) -> BasisPoints {
        self.fee
    }

    #[must_use]
    pub const fn spot_price(&self) -> Amount {
        self.spot_price
    }

    /// Held (or listed) ids in enumeration order.
    #[must_use]
    pub const fn held_ids(&self) -> &NftIdSet {
        &self.held_ids
    }

    /// The configured asset recipient, if any.
    #[must_use]
    pub const fn asset_recipient(&self) -> Option<Address> {
        self.asset_recipient
    }

    /// Where quote asset paid by buyers ends up.
    ///
    /// Trade pools always keep proceeds; other pools pay the configured
    /// recipient and fall back to the pair itself.
    #[must_use]
    pub fn proceeds_recipient(&self) -> Address {
        if self.pool_type.is_trade() {
            return self.address;
        }
        self.asset_recipient.unwrap_or(self.address)
    }

    /// The account that physically holds the pair's NFTs.
    #[must_use]
    pub const fn custodian(&self) -> Address {
        match self.custody {
            Custody::Escrowed => self.address,
            Custody::Listed => self.owner,
        }
    }

    /// Where NFTs sold into the pair end up.
    #[must_use]
    pub fn nft_recipient(&self) -> Address {
        if self.pool_type.is_trade() {
            return self.custodian();
        }
        self.asset_recipient.unwrap_or_else(|| self.custodian())
    }

    /// Quote asset held by the pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownToken`] if the quote token is gone from
    /// the ledger.
    pub fn quote_balance(&self, ledger: &Ledger) -> Result<Amount, AmmError> {
        ledger.quote_balance(&self.quote_asset, &self.address)
    }

    // -- quotes ---------------------------------------------------------------

    /// Prices buying `num_items` NFTs from the pair, without trading.
    ///
    /// # Errors
    ///
    /// See [`BondingCurve::get_buy_info`].
    pub fn buy_quote(
        &self,
        num_items: usize,
        protocol_fee: BasisPoints,
    ) -> Result<BuyQuote, AmmError> {
        self.curve.get_buy_info(
            self.spot_price,
            self.delta,
            num_items,
            self.fee,
            protocol_fee,
        )
    }

    /// Prices selling `num_items` NFTs into the pair, without trading.
    ///
    /// # Errors
    ///
    /// See [`BondingCurve::get_sell_info`].
    pub fn sell_quote(
        &self,
        num_items: usize,
        protocol_fee: BasisPoints,
    ) -> Result<SellQuote, AmmError> {
        self.curve.get_sell_info(
            self.spot_price,
            self.delta,
            num_items,
            self.fee,
            protocol_fee,
        )
    }

    // -- shared checks --------------------------------------------------------

    /// Rejects empty requests and repeated ids.
    fn check_request(ids: &[NftId]) -> Result<(), AmmError> {
        if ids.is_empty() {
            return Err(AmmError::InvalidNumItems);
        }
        let mut seen = BTreeSet::new();
        for id in ids {
            if !seen.insert(*id) {
                return Err(AmmError::DuplicateNftId(*id));
            }
        }
        Ok(())
    }

    /// Every id must currently be held or listed by the pair.
    fn check_held(&self, ids: &[NftId]) -> Result<(), AmmError> {
        match ids.iter().find(|id| !self.held_ids.contains(id)) {
            Some(id) => Err(AmmError::NftNotPermitted(*id)),
            None => Ok(()),
        }
    }

    /// The account that moves listed NFTs out of the owner's wallet, if
    /// the owner still holds `id` and has approved one.
    fn listing_operator(&self, ledger: &Ledger, factory: Address, id: &NftId) -> Option<Address> {
        let collection = ledger.collection(&self.collection).ok()?;
        if collection.owner_of(id) != Some(self.owner) {
            return None;
        }
        [factory, self.address]
            .into_iter()
            .find(|operator| collection.is_approved_or_owner(operator, id))
    }

    /// For listed custody, every id must still be owned and approved by
    /// the pair owner.
    fn check_listings(
        &self,
        ledger: &Ledger,
        factory: Address,
        ids: &[NftId],
    ) -> Result<(), AmmError> {
        if !self.custody.is_listed() {
            return Ok(());
        }
        match ids
            .iter()
            .find(|id| self.listing_operator(ledger, factory, id).is_none())
        {
            Some(id) => Err(AmmError::NftNotOwnedByPoolOwner(*id)),
            None => Ok(()),
        }
    }
}

//! Deterministic execution environment with atomic transactions.
//!
//! A [`Chain`] holds the [`World`]: the asset [`Ledger`], the
//! [`PairFactory`] (which owns every pair) and the [`EventLog`].  Every
//! state-changing entry point runs inside [`Chain::transact`], which
//! clones the world, hands a [`Transaction`] over the clone to the
//! operation and commits the clone only if the operation returns `Ok`.
//! A failed operation, router batches included, leaves no trace.
//!
//! ```
//! use nft_amm::chain::{Caller, Chain};
//! use nft_amm::config::FactoryConfig;
//! use nft_amm::domain::{Address, Amount, BasisPoints, Timestamp};
//!
//! let owner = Address::from_low_u64(1);
//! let config = FactoryConfig::new(owner, BasisPoints::new(500), owner).expect("valid");
//! let mut chain = Chain::new(&config, Timestamp::from_secs(1_000)).expect("chain");
//! chain.fund_native(owner, Amount::new(100)).expect("funded");
//!
//! // Attaching more value than the signer holds aborts before anything runs.
//! let broke = Caller::new(Address::from_low_u64(2)).with_value(Amount::new(1));
//! assert!(chain.transact(broke, |_| Ok(())).is_err());
//! ```

use tracing::debug;

use crate::config::{FactoryConfig, PairConfig};
use crate::curves::{CurveBox, CurveKind};
use crate::domain::{Address, Amount, BasisPoints, BuyQuote, NftId, QuoteAsset, SellQuote, Timestamp};
use crate::error::AmmError;
use crate::events::EventLog;
use crate::factory::PairFactory;
use crate::ledger::Ledger;
use crate::pair::{CallFrame, Pair, PairContext};
use crate::router::{PairSwapAny, PairSwapSell, PairSwapSpecific, Router};

/// Everything a transaction can touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct World {
    ledger: Ledger,
    factory: PairFactory,
    events: EventLog,
}

impl World {
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub const fn factory(&self) -> &PairFactory {
        &self.factory
    }

    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.events
    }
}

/// The signer of a transaction and the native value attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    address: Address,
    value: Amount,
}

impl Caller {
    /// A caller attaching no value.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self {
            address,
            value: Amount::ZERO,
        }
    }

    #[must_use]
    pub const fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub const fn value(&self) -> Amount {
        self.value
    }
}

impl From<Address> for Caller {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

/// One in-flight unit of work over a scratch copy of the world.
///
/// Unspent attached value never leaves the signer, so it is refunded
/// implicitly when the transaction ends.
#[derive(Debug)]
pub struct Transaction<'w> {
    world: &'w mut World,
    origin: Address,
    value: Amount,
    now: Timestamp,
}

impl Transaction<'_> {
    #[must_use]
    pub const fn origin(&self) -> Address {
        self.origin
    }

    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// Attached value not yet consumed.
    #[must_use]
    pub const fn remaining_value(&self) -> Amount {
        self.value
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.world.ledger
    }

    #[must_use]
    pub fn factory(&self) -> &PairFactory {
        &self.world.factory
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.world.ledger
    }

    /// Converts the whole attached value into wrapped-native tokens held
    /// by `beneficiary`, returning the wrapped amount.
    pub(crate) fn wrap_attached_value(&mut self, beneficiary: Address) -> Result<Amount, AmmError> {
        let amount = self.value;
        self.value = Amount::ZERO;
        self.world.ledger.wrap(self.origin, beneficiary, amount)?;
        Ok(amount)
    }

    /// Runs `f` against a deployed pair.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPair`], or whatever `f` returns.
    pub fn call_pair<T, F>(&mut self, frame: CallFrame, pair: &Address, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Pair, &mut PairContext<'_>) -> Result<T, AmmError>,
    {
        let World {
            ledger,
            factory,
            events,
        } = &mut *self.world;
        let (pair, settings) = factory.pair_with_settings(pair)?;
        let mut ctx = PairContext::new(ledger, events, settings, frame, &mut self.value, self.now);
        f(pair, &mut ctx)
    }

    // -- factory --------------------------------------------------------------

    /// Deploys a pair owned by the signer.
    ///
    /// # Errors
    ///
    /// See [`PairFactory::create_pair`].
    pub fn create_pair(&mut self, config: &PairConfig) -> Result<Address, AmmError> {
        let World {
            ledger,
            factory,
            events,
        } = &mut *self.world;
        factory.create_pair(ledger, events, self.origin, &mut self.value, config)
    }

    /// # Errors
    ///
    /// See [`PairFactory::register_curve`].
    pub fn register_curve(&mut self, address: Address, curve: CurveBox) -> Result<(), AmmError> {
        self.world
            .factory
            .register_curve(&self.origin, address, curve)
    }

    /// # Errors
    ///
    /// See [`PairFactory::set_bonding_curve_allowed`].
    pub fn set_bonding_curve_allowed(&mut self, curve: Address, allowed: bool) -> Result<(), AmmError> {
        let World {
            factory, events, ..
        } = &mut *self.world;
        factory.set_bonding_curve_allowed(events, &self.origin, curve, allowed)
    }

    /// # Errors
    ///
    /// See [`PairFactory::set_router_allowed`].
    pub fn set_router_allowed(&mut self, router: Address, allowed: bool) -> Result<(), AmmError> {
        let World {
            factory, events, ..
        } = &mut *self.world;
        factory.set_router_allowed(events, &self.origin, router, allowed)
    }

    /// # Errors
    ///
    /// See [`PairFactory::change_protocol_fee_multiplier`].
    pub fn change_protocol_fee_multiplier(&mut self, multiplier: BasisPoints) -> Result<(), AmmError> {
        let World {
            factory, events, ..
        } = &mut *self.world;
        factory.change_protocol_fee_multiplier(events, &self.origin, multiplier)
    }

    // -- direct swaps ---------------------------------------------------------

    /// # Errors
    ///
    /// See [`Pair::swap_token_for_specific_nfts`].
    pub fn swap_token_for_specific_nfts(
        &mut self,
        pair: &Address,
        ids: &[NftId],
        max_input: Amount,
        nft_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        let frame = CallFrame::direct(self.origin);
        self.call_pair(frame, pair, |p, ctx| {
            p.swap_token_for_specific_nfts(ctx, ids, max_input, nft_recipient, deadline)
        })
    }

    /// # Errors
    ///
    /// See [`Pair::swap_token_for_any_nfts`].
    pub fn swap_token_for_any_nfts(
        &mut self,
        pair: &Address,
        num_items: usize,
        max_input: Amount,
        nft_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        let frame = CallFrame::direct(self.origin);
        self.call_pair(frame, pair, |p, ctx| {
            p.swap_token_for_any_nfts(ctx, num_items, max_input, nft_recipient, deadline)
        })
    }

    /// # Errors
    ///
    /// See [`Pair::swap_nfts_for_token`].
    pub fn swap_nfts_for_token(
        &mut self,
        pair: &Address,
        ids: &[NftId],
        min_output: Amount,
        token_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        let frame = CallFrame::direct(self.origin);
        self.call_pair(frame, pair, |p, ctx| {
            p.swap_nfts_for_token(ctx, ids, min_output, token_recipient, deadline)
        })
    }
}

/// The execution environment: world state, a clock and a deploy nonce.
#[derive(Debug, Clone)]
pub struct Chain {
    world: World,
    now: Timestamp,
    nonce: u64,
}

impl Chain {
    /// Starts a chain whose factory is deployed by the configured owner.
    ///
    /// # Errors
    ///
    /// Any error of [`FactoryConfig::validate`].
    pub fn new(config: &FactoryConfig, now: Timestamp) -> Result<Self, AmmError> {
        let factory_address = Address::derive(&config.owner(), 0);
        Ok(Self {
            world: World {
                ledger: Ledger::new(),
                factory: PairFactory::new(factory_address, config)?,
                events: EventLog::new(),
            },
            now,
            nonce: 1,
        })
    }

    // -- state ----------------------------------------------------------------

    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.world.ledger
    }

    #[must_use]
    pub const fn factory(&self) -> &PairFactory {
        &self.world.factory
    }

    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.world.events
    }

    /// # Errors
    ///
    /// [`AmmError::UnknownPair`].
    pub fn pair(&self, address: &Address) -> Result<&Pair, AmmError> {
        self.world.factory.pair(address)
    }

    /// Price of buying `num_items` from `pair` right now.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPair`], or any curve error.
    pub fn buy_quote(&self, pair: &Address, num_items: usize) -> Result<BuyQuote, AmmError> {
        let multiplier = self.world.factory.settings().protocol_fee_multiplier();
        self.pair(pair)?.buy_quote(num_items, multiplier)
    }

    /// Proceeds of selling `num_items` to `pair` right now.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPair`], or any curve error.
    pub fn sell_quote(&self, pair: &Address, num_items: usize) -> Result<SellQuote, AmmError> {
        let multiplier = self.world.factory.settings().protocol_fee_multiplier();
        self.pair(pair)?.sell_quote(num_items, multiplier)
    }

    // -- clock ----------------------------------------------------------------

    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    pub fn set_time(&mut self, now: Timestamp) {
        self.now = now;
    }

    pub fn advance(&mut self, secs: u64) {
        self.now = self.now.plus_secs(secs);
    }

    // -- transactions ---------------------------------------------------------

    /// Runs `f` atomically on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// [`AmmError::InsufficientFunds`] if the signer cannot cover the
    /// attached value; otherwise whatever `f` returns, in which case the
    /// world is left untouched.
    pub fn transact<T, F>(&mut self, caller: Caller, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T, AmmError>,
    {
        if self.world.ledger.native_balance(&caller.address) < caller.value {
            return Err(AmmError::InsufficientFunds);
        }
        let mut scratch = self.world.clone();
        let result = {
            let mut tx = Transaction {
                world: &mut scratch,
                origin: caller.address,
                value: caller.value,
                now: self.now,
            };
            f(&mut tx)
        };
        match result {
            Ok(out) => {
                debug!(origin = %caller.address, "transaction committed");
                self.world = scratch;
                Ok(out)
            }
            Err(err) => {
                debug!(origin = %caller.address, error = %err, "transaction reverted");
                Err(err)
            }
        }
    }

    fn next_address(&mut self, deployer: &Address) -> Address {
        let address = Address::derive(deployer, self.nonce);
        self.nonce += 1;
        address
    }

    // -- deployment and asset setup -------------------------------------------

    /// Credits native currency out of thin air.
    ///
    /// # Errors
    ///
    /// [`AmmError::Overflow`].
    pub fn fund_native(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        self.world.ledger.fund_native(account, amount)
    }

    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] on an address clash.
    pub fn deploy_token(&mut self, deployer: Address) -> Result<Address, AmmError> {
        let address = self.next_address(&deployer);
        self.world.ledger.deploy_token(address)?;
        Ok(address)
    }

    /// Deploys a token and marks it as the wrapped-native token routers
    /// wrap into.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] on an address clash.
    pub fn deploy_wrapped_native(&mut self, deployer: Address) -> Result<Address, AmmError> {
        let address = self.deploy_token(deployer)?;
        self.world.ledger.set_wrapped_native(address)?;
        Ok(address)
    }

    /// Deposits `account`'s native currency into the wrapped-native token.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] without a wrapped-native token,
    /// [`AmmError::InsufficientFunds`].
    pub fn wrap_native(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        self.world.ledger.wrap(account, account, amount)
    }

    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] on an address clash.
    pub fn deploy_collection(&mut self, deployer: Address) -> Result<Address, AmmError> {
        let address = self.next_address(&deployer);
        self.world.ledger.deploy_collection(address)?;
        Ok(address)
    }

    /// Deploys a router.  It still has to be allowlisted by the factory
    /// owner before pairs accept its calls.
    pub fn deploy_router(&mut self, deployer: Address) -> Router {
        Router::new(self.next_address(&deployer))
    }

    /// Deploys a curve contract and binds it in the factory registry.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::InvalidConfiguration`] if
    /// the curve kind is compiled out.
    pub fn deploy_curve(&mut self, caller: Address, kind: CurveKind) -> Result<Address, AmmError> {
        let curve = CurveBox::from_kind(kind)?;
        let address = self.next_address(&caller);
        self.transact(Caller::new(caller), |tx| tx.register_curve(address, curve))?;
        Ok(address)
    }

    /// # Errors
    ///
    /// [`AmmError::UnknownToken`] / [`AmmError::Overflow`].
    pub fn mint_tokens(&mut self, token: &Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.world.ledger.token_mut(token)?.mint(to, amount)
    }

    /// # Errors
    ///
    /// [`AmmError::UnknownToken`].
    pub fn approve_tokens(
        &mut self,
        owner: Address,
        token: &Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.world.ledger.token_mut(token)?.approve(owner, spender, amount);
        Ok(())
    }

    /// # Errors
    ///
    /// [`AmmError::UnknownCollection`] / [`AmmError::NftAlreadyExists`].
    pub fn mint_nft(&mut self, collection: &Address, to: Address, id: NftId) -> Result<(), AmmError> {
        self.world.ledger.collection_mut(collection)?.mint(to, id)
    }

    /// # Errors
    ///
    /// [`AmmError::UnknownCollection`].
    pub fn set_approval_for_all(
        &mut self,
        owner: Address,
        collection: &Address,
        operator: Address,
        approved: bool,
    ) -> Result<(), AmmError> {
        self.world
            .ledger
            .collection_mut(collection)?
            .set_approval_for_all(owner, operator, approved);
        Ok(())
    }

    /// Moves one NFT out of `from`'s wallet.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownCollection`] / [`AmmError::NftNotOwned`].
    pub fn transfer_nft(
        &mut self,
        from: Address,
        collection: &Address,
        to: Address,
        id: NftId,
    ) -> Result<(), AmmError> {
        self.world
            .ledger
            .collection_mut(collection)?
            .transfer_from(from, from, to, id)
    }

    // -- factory entry points -------------------------------------------------

    /// # Errors
    ///
    /// See [`PairFactory::create_pair`].
    pub fn create_pair(&mut self, caller: Caller, config: &PairConfig) -> Result<Address, AmmError> {
        self.transact(caller, |tx| tx.create_pair(config))
    }

    /// # Errors
    ///
    /// See [`PairFactory::set_bonding_curve_allowed`].
    pub fn set_bonding_curve_allowed(
        &mut self,
        caller: Address,
        curve: Address,
        allowed: bool,
    ) -> Result<(), AmmError> {
        self.transact(Caller::new(caller), |tx| tx.set_bonding_curve_allowed(curve, allowed))
    }

    /// # Errors
    ///
    /// See [`PairFactory::set_router_allowed`].
    pub fn set_router_allowed(
        &mut self,
        caller: Address,
        router: Address,
        allowed: bool,
    ) -> Result<(), AmmError> {
        self.transact(Caller::new(caller), |tx| tx.set_router_allowed(router, allowed))
    }

    /// # Errors
    ///
    /// See [`PairFactory::change_protocol_fee_multiplier`].
    pub fn change_protocol_fee_multiplier(
        &mut self,
        caller: Address,
        multiplier: BasisPoints,
    ) -> Result<(), AmmError> {
        self.transact(Caller::new(caller), |tx| tx.change_protocol_fee_multiplier(multiplier))
    }

    // -- pair entry points ----------------------------------------------------

    /// Buys `ids` from `pair` for the signer.
    ///
    /// # Errors
    ///
    /// See [`Pair::swap_token_for_specific_nfts`].
    pub fn swap_token_for_specific_nfts(
        &mut self,
        caller: Caller,
        pair: &Address,
        ids: &[NftId],
        max_input: Amount,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        let recipient = caller.address;
        self.transact(caller, |tx| {
            tx.swap_token_for_specific_nfts(pair, ids, max_input, recipient, deadline)
        })
    }

    /// Buys any `num_items` from `pair` for the signer.
    ///
    /// # Errors
    ///
    /// See [`Pair::swap_token_for_any_nfts`].
    pub fn swap_token_for_any_nfts(
        &mut self,
        caller: Caller,
        pair: &Address,
        num_items: usize,
        max_input: Amount,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        let recipient = caller.address;
        self.transact(caller, |tx| {
            tx.swap_token_for_any_nfts(pair, num_items, max_input, recipient, deadline)
        })
    }

    /// Sells `ids` to `pair`, paying the signer.
    ///
    /// # Errors
    ///
    /// See [`Pair::swap_nfts_for_token`].
    pub fn swap_nfts_for_token(
        &mut self,
        caller: Address,
        pair: &Address,
        ids: &[NftId],
        min_output: Amount,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        self.transact(Caller::new(caller), |tx| {
            tx.swap_nfts_for_token(pair, ids, min_output, caller, deadline)
        })
    }

    /// Runs a direct call against `pair`, typically owner administration.
    ///
    /// # Errors
    ///
    /// [`AmmError::UnknownPair`], or whatever `f` returns.
    pub fn with_pair<T, F>(&mut self, caller: Caller, pair: &Address, f: F) -> Result<T, AmmError>
    where
        F: FnOnce(&mut Pair, &mut PairContext<'_>) -> Result<T, AmmError>,
    {
        let frame = CallFrame::direct(caller.address);
        self.transact(caller, |tx| tx.call_pair(frame, pair, f))
    }

    // -- router entry points --------------------------------------------------

    /// # Errors
    ///
    /// See [`Router::swap_eth_or_token_for_specific_nfts`].
    pub fn router_swap_for_specific_nfts(
        &mut self,
        caller: Caller,
        router: &Router,
        swap_list: &[PairSwapSpecific],
        max_total_input: Amount,
        deadline: Timestamp,
        quote_asset: QuoteAsset,
    ) -> Result<Amount, AmmError> {
        let recipient = caller.address;
        self.transact(caller, |tx| {
            router.swap_eth_or_token_for_specific_nfts(
                tx,
                swap_list,
                max_total_input,
                recipient,
                deadline,
                quote_asset,
            )
        })
    }

    /// # Errors
    ///
    /// See [`Router::swap_eth_or_token_for_any_nfts`].
    pub fn router_swap_for_any_nfts(
        &mut self,
        caller: Caller,
        router: &Router,
        swap_list: &[PairSwapAny],
        max_total_input: Amount,
        deadline: Timestamp,
        quote_asset: QuoteAsset,
    ) -> Result<Amount, AmmError> {
        let recipient = caller.address;
        self.transact(caller, |tx| {
            router.swap_eth_or_token_for_any_nfts(
                tx,
                swap_list,
                max_total_input,
                recipient,
                deadline,
                quote_asset,
            )
        })
    }

    /// # Errors
    ///
    /// See [`Router::swap_nfts_for_token`].
    pub fn router_swap_nfts_for_token(
        &mut self,
        caller: Address,
        router: &Router,
        swap_list: &[PairSwapSell],
        min_total_output: Amount,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        self.transact(Caller::new(caller), |tx| {
            router.swap_nfts_for_token(tx, swap_list, min_total_output, caller, deadline)
        })
    }
}

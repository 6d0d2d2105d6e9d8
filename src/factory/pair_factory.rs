//! The pair factory: deployment, registries and protocol settings.

use std::collections::BTreeMap;

use tracing::info;

use super::{CurveRegistry, ProtocolSettings};
use crate::config::{validate_combined_fee, validate_protocol_fee, FactoryConfig, PairConfig};
use crate::curves::CurveBox;
use crate::domain::{Address, Amount, BasisPoints, QuoteAsset};
use crate::error::AmmError;
use crate::events::{Event, EventLog};
use crate::ledger::Ledger;
use crate::pair::Pair;
use crate::traits::BondingCurve;

/// Deploys pairs and owns every registry they depend on.
///
/// The factory owns its pairs; callers reach them through the
/// transaction runtime.  Owner-only operations fail
/// [`AmmError::NotOwner`] for anyone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFactory {
    address: Address,
    owner: Address,
    settings: ProtocolSettings,
    curves: CurveRegistry,
    pairs: BTreeMap<Address, Pair>,
    nonce: u64,
}

impl PairFactory {
    /// Creates a factory at `address`.
    ///
    /// # Errors
    ///
    /// Any error of [`FactoryConfig::validate`].
    pub fn new(address: Address, config: &FactoryConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            address,
            owner: config.owner(),
            settings: ProtocolSettings::new(
                address,
                config.protocol_fee_multiplier(),
                config.protocol_fee_recipient(),
            ),
            curves: CurveRegistry::new(),
            pairs: BTreeMap::new(),
            nonce: 0,
        })
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub const fn settings(&self) -> &ProtocolSettings {
        &self.settings
    }

    #[must_use]
    pub const fn curves(&self) -> &CurveRegistry {
        &self.curves
    }

    /// Whether `address` is a pair deployed by this factory.
    #[must_use]
    pub fn is_pair(&self, address: &Address) -> bool {
        self.pairs.contains_key(address)
    }

    /// Looks up a deployed pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPair`] for anything else.
    pub fn pair(&self, address: &Address) -> Result<&Pair, AmmError> {
        self.pairs
            .get(address)
            .ok_or(AmmError::UnknownPair(*address))
    }

    /// Every deployed pair, ordered by address.
    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    /// A pair together with the settings its operations need.
    pub(crate) fn pair_with_settings(
        &mut self,
        address: &Address,
    ) -> Result<(&mut Pair, &ProtocolSettings), AmmError> {
        let pair = self
            .pairs
            .get_mut(address)
            .ok_or(AmmError::UnknownPair(*address))?;
        Ok((pair, &self.settings))
    }

    fn require_owner(&self, caller: &Address) -> Result<(), AmmError> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(AmmError::NotOwner)
        }
    }

    // -- owner administration -------------------------------------------------

    /// Binds a curve address to one of the compiled-in strategies.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`].
    pub fn register_curve(
        &mut self,
        caller: &Address,
        address: Address,
        curve: CurveBox,
    ) -> Result<(), AmmError> {
        self.require_owner(caller)?;
        self.curves.register(address, curve);
        info!(curve = %address, kind = %curve.kind(), "bonding curve registered");
        Ok(())
    }

    /// Allows or forbids creating pairs with a curve.  Idempotent.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::UnknownCurve`] if the
    /// address is not bound to a strategy.
    pub fn set_bonding_curve_allowed(
        &mut self,
        events: &mut EventLog,
        caller: &Address,
        curve: Address,
        allowed: bool,
    ) -> Result<(), AmmError> {
        self.require_owner(caller)?;
        self.curves.set_allowed(&curve, allowed)?;
        events.emit(Event::BondingCurveStatusUpdate { curve, allowed });
        info!(curve = %curve, allowed, "bonding curve allowlist updated");
        Ok(())
    }

    /// Allows or forbids a router to act for its callers.  Idempotent.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`].
    pub fn set_router_allowed(
        &mut self,
        events: &mut EventLog,
        caller: &Address,
        router: Address,
        allowed: bool,
    ) -> Result<(), AmmError> {
        self.require_owner(caller)?;
        self.settings.set_router_allowed(router, allowed);
        events.emit(Event::RouterStatusUpdate { router, allowed });
        info!(router = %router, allowed, "router allowlist updated");
        Ok(())
    }

    /// Changes the protocol's share of every trade.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::FeeTooHigh`] at 100% or
    /// more, or when some deployed pair's trade fee would push the total
    /// to 100%.
    pub fn change_protocol_fee_multiplier(
        &mut self,
        events: &mut EventLog,
        caller: &Address,
        multiplier: BasisPoints,
    ) -> Result<(), AmmError> {
        self.require_owner(caller)?;
        validate_protocol_fee(multiplier)?;
        for pair in self.pairs.values() {
            validate_combined_fee(pair.fee(), multiplier)?;
        }
        self.settings.set_protocol_fee_multiplier(multiplier);
        events.emit(Event::ProtocolFeeMultiplierUpdate { multiplier });
        info!(multiplier = %multiplier, "protocol fee multiplier updated");
        Ok(())
    }

    // -- deployment -----------------------------------------------------------

    /// Deploys a pair owned by `caller` and seeds it.
    ///
    /// Quote funding comes from the attached value for native pairs and
    /// from `caller`'s allowance to the factory for token pairs.  Escrowed
    /// pairs receive their initial NFTs through the factory's operator
    /// approval; listed pairs only record them.
    ///
    /// # Errors
    ///
    /// - Any error of [`PairConfig::validate`].
    /// - [`AmmError::FeeTooHigh`] if the trade fee plus the protocol fee
    ///   reaches 100%.
    /// - [`AmmError::BondingCurveNotAllowed`] for a curve off the allowlist.
    /// - [`AmmError::UnknownToken`] / [`AmmError::UnknownCollection`].
    /// - [`AmmError::InvalidDelta`] / [`AmmError::InvalidSpotPrice`].
    /// - [`AmmError::InsufficientFunds`] / [`AmmError::InsufficientAllowance`]
    ///   / [`AmmError::NftNotApproved`] if seeding fails.
    pub fn create_pair(
        &mut self,
        ledger: &mut Ledger,
        events: &mut EventLog,
        caller: Address,
        value: &mut Amount,
        config: &PairConfig,
    ) -> Result<Address, AmmError> {
        config.validate()?;
        validate_combined_fee(config.fee(), self.settings.protocol_fee_multiplier())?;
        if !self.curves.is_allowed(&config.bonding_curve()) {
            return Err(AmmError::BondingCurveNotAllowed);
        }
        let curve = self
            .curves
            .get(&config.bonding_curve())
            .ok_or(AmmError::UnknownCurve(config.bonding_curve()))?;
        if let QuoteAsset::Token(token) = config.quote_asset() {
            ledger.token(&token)?;
        }
        ledger.collection(&config.collection())?;

        let address = Address::derive(&self.address, self.nonce);
        let pair = Pair::new(address, caller, curve, config)?;

        let amount = config.initial_quote_amount();
        match config.quote_asset() {
            QuoteAsset::Native => {
                *value = value
                    .checked_sub(&amount)
                    .ok_or(AmmError::InsufficientFunds)?;
                ledger.transfer_native(caller, address, amount)?;
            }
            QuoteAsset::Token(token) => {
                ledger
                    .token_mut(&token)?
                    .transfer_from(self.address, caller, address, amount)?;
            }
        }
        if !pair.custody().is_listed() {
            ledger.transfer_nfts(
                &config.collection(),
                self.address,
                caller,
                address,
                config.initial_nft_ids(),
            )?;
        }

        self.nonce += 1;
        self.pairs.insert(address, pair);
        events.emit(Event::NewPair {
            pool_address: address,
            owner: caller,
            collection: config.collection(),
            quote_asset: config.quote_asset(),
            bonding_curve: config.bonding_curve(),
            curve_kind: curve.kind(),
            pool_type: config.pool_type(),
            spot_price: config.spot_price(),
            delta: config.delta(),
            fee: config.fee(),
        });
        info!(
            pair = %address,
            owner = %caller,
            pool_type = %config.pool_type(),
            curve = %curve.name(),
            nfts = config.initial_nft_ids().len(),
            "pair created"
        );
        Ok(address)
    }
}

#[cfg(all(test, feature = "linear"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::curves::CurveKind;
    use crate::domain::{Custody, Delta, NftId, PoolType};

    // -- fixture --------------------------------------------------------------

    const ETH: u128 = 1_000_000_000_000_000_000;

    fn owner() -> Address {
        Address::from_low_u64(1)
    }

    fn stranger() -> Address {
        Address::from_low_u64(2)
    }

    fn factory_address() -> Address {
        Address::from_low_u64(50)
    }

    fn curve_address() -> Address {
        Address::from_low_u64(80)
    }

    fn collection() -> Address {
        Address::from_low_u64(60)
    }

    fn token() -> Address {
        Address::from_low_u64(61)
    }

    fn factory() -> PairFactory {
        let Ok(cfg) = FactoryConfig::new(owner(), BasisPoints::new(500), owner()) else {
            panic!("valid factory config");
        };
        let Ok(mut f) = PairFactory::new(factory_address(), &cfg) else {
            panic!("valid factory");
        };
        let Ok(linear) = CurveBox::from_kind(CurveKind::Linear) else {
            panic!("linear enabled");
        };
        assert!(f.register_curve(&owner(), curve_address(), linear).is_ok());
        let mut events = EventLog::new();
        assert!(f
            .set_bonding_curve_allowed(&mut events, &owner(), curve_address(), true)
            .is_ok());
        f
    }

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        assert!(ledger.deploy_collection(collection()).is_ok());
        assert!(ledger.deploy_token(token()).is_ok());
        let Ok(c) = ledger.collection_mut(&collection()) else {
            panic!("collection");
        };
        for id in 1..=6u128 {
            assert!(c.mint(owner(), NftId::new(id)).is_ok());
        }
        c.set_approval_for_all(owner(), factory_address(), true);
        assert!(ledger.fund_native(owner(), Amount::new(ETH)).is_ok());
        ledger
    }

    fn config(pool_type: PoolType, quote: QuoteAsset) -> PairConfig {
        let Ok(cfg) = PairConfig::new(
            collection(),
            curve_address(),
            pool_type,
            Delta::new(ETH / 1_000),
            Amount::new(ETH / 100),
            quote,
        ) else {
            panic!("valid config");
        };
        cfg
    }

    // -- creation -------------------------------------------------------------

    #[test]
    fn create_escrowed_nft_pair() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        let cfg = config(PoolType::Nft, QuoteAsset::Native)
            .with_initial_nft_ids([1u128, 2, 3, 5, 6].map(NftId::new).to_vec());
        let Ok(addr) = f.create_pair(&mut l, &mut events, owner(), &mut value, &cfg) else {
            panic!("pair created");
        };
        assert!(f.is_pair(&addr));
        let Ok(c) = l.collection(&collection()) else {
            panic!("collection");
        };
        assert_eq!(c.owner_of(&NftId::new(5)), Some(addr));
        assert_eq!(c.owner_of(&NftId::new(4)), Some(owner()));
        let Some(Event::NewPair { pool_address, .. }) = events.last() else {
            panic!("NewPair emitted last");
        };
        assert_eq!(*pool_address, addr);
    }

    #[test]
    fn disallowed_curve_rejected() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        assert!(f
            .set_bonding_curve_allowed(&mut events, &owner(), curve_address(), false)
            .is_ok());
        let result = f.create_pair(
            &mut l,
            &mut events,
            owner(),
            &mut value,
            &config(PoolType::Nft, QuoteAsset::Native),
        );
        assert_eq!(result, Err(AmmError::BondingCurveNotAllowed));
    }

    #[test]
    fn native_funding_needs_value() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::new(ETH / 100);
        let cfg = config(PoolType::Token, QuoteAsset::Native)
            .with_initial_quote_amount(Amount::new(3 * ETH / 100));
        let result = f.create_pair(&mut l, &mut events, owner(), &mut value, &cfg);
        assert_eq!(result, Err(AmmError::InsufficientFunds));
    }

    #[test]
    fn token_funding_uses_factory_allowance() {
        let mut f = factory();
        let mut l = ledger();
        let Ok(t) = l.token_mut(&token()) else {
            panic!("token");
        };
        assert!(t.mint(owner(), Amount::new(ETH)).is_ok());
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        let cfg = config(PoolType::Token, QuoteAsset::Token(token()))
            .with_initial_quote_amount(Amount::new(ETH / 10));
        assert_eq!(
            f.create_pair(&mut l, &mut events, owner(), &mut value, &cfg),
            Err(AmmError::InsufficientAllowance)
        );

        let Ok(t) = l.token_mut(&token()) else {
            panic!("token");
        };
        t.approve(owner(), factory_address(), Amount::new(ETH));
        let Ok(addr) = f.create_pair(&mut l, &mut events, owner(), &mut value, &cfg) else {
            panic!("pair created");
        };
        let Ok(pair) = f.pair(&addr) else {
            panic!("pair registered");
        };
        assert_eq!(pair.quote_balance(&l), Ok(Amount::new(ETH / 10)));
    }

    #[test]
    fn listing_skips_ownership_check() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        let cfg = config(PoolType::Nft, QuoteAsset::Native)
            .with_custody(Custody::Listed)
            .with_initial_nft_ids(vec![NftId::new(6)]);
        assert!(f
            .create_pair(&mut l, &mut events, stranger(), &mut value, &cfg)
            .is_ok());
    }

    #[test]
    fn unknown_quote_token_rejected() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        let missing = Address::from_low_u64(99);
        let result = f.create_pair(
            &mut l,
            &mut events,
            owner(),
            &mut value,
            &config(PoolType::Token, QuoteAsset::Token(missing)),
        );
        assert_eq!(result, Err(AmmError::UnknownToken(missing)));
    }

    #[test]
    fn each_pair_gets_a_fresh_address() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        let cfg = config(PoolType::Token, QuoteAsset::Native);
        let Ok(a) = f.create_pair(&mut l, &mut events, owner(), &mut value, &cfg) else {
            panic!("first pair");
        };
        let Ok(b) = f.create_pair(&mut l, &mut events, owner(), &mut value, &cfg) else {
            panic!("second pair");
        };
        assert_ne!(a, b);
        assert_eq!(f.pairs().count(), 2);
    }

    #[test]
    fn trade_fee_plus_protocol_fee_below_full() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        assert!(f
            .change_protocol_fee_multiplier(&mut events, &owner(), BasisPoints::new(2_000))
            .is_ok());
        let greedy = config(PoolType::Trade, QuoteAsset::Native).with_fee(BasisPoints::new(8_000));
        assert!(matches!(
            f.create_pair(&mut l, &mut events, owner(), &mut value, &greedy),
            Err(AmmError::FeeTooHigh(_))
        ));
        assert_eq!(f.pairs().count(), 0);

        let fair = config(PoolType::Trade, QuoteAsset::Native).with_fee(BasisPoints::new(7_000));
        assert!(f
            .create_pair(&mut l, &mut events, owner(), &mut value, &fair)
            .is_ok());
    }

    // -- administration -------------------------------------------------------

    #[test]
    fn admin_is_owner_only() {
        let mut f = factory();
        let mut events = EventLog::new();
        assert_eq!(
            f.set_router_allowed(&mut events, &stranger(), stranger(), true),
            Err(AmmError::NotOwner)
        );
        assert_eq!(
            f.set_bonding_curve_allowed(&mut events, &stranger(), curve_address(), false),
            Err(AmmError::NotOwner)
        );
        assert!(events.is_empty());
    }

    #[test]
    fn allowlist_toggles_are_idempotent() {
        let mut f = factory();
        let mut events = EventLog::new();
        let router = Address::from_low_u64(90);
        for _ in 0..2 {
            assert!(f.set_router_allowed(&mut events, &owner(), router, true).is_ok());
        }
        assert!(f.settings().is_router_allowed(&router));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn protocol_fee_ceiling() {
        let mut f = factory();
        let mut events = EventLog::new();
        assert!(matches!(
            f.change_protocol_fee_multiplier(&mut events, &owner(), BasisPoints::MAX_PERCENT),
            Err(AmmError::FeeTooHigh(_))
        ));
        assert!(f
            .change_protocol_fee_multiplier(&mut events, &owner(), BasisPoints::new(100))
            .is_ok());
        assert_eq!(
            f.settings().protocol_fee_multiplier(),
            BasisPoints::new(100)
        );
    }

    #[test]
    fn protocol_fee_bounded_by_deployed_trade_fees() {
        let mut f = factory();
        let mut l = ledger();
        let mut events = EventLog::new();
        let mut value = Amount::ZERO;
        let cfg = config(PoolType::Trade, QuoteAsset::Native).with_fee(BasisPoints::new(7_000));
        assert!(f
            .create_pair(&mut l, &mut events, owner(), &mut value, &cfg)
            .is_ok());

        assert!(matches!(
            f.change_protocol_fee_multiplier(&mut events, &owner(), BasisPoints::new(3_000)),
            Err(AmmError::FeeTooHigh(_))
        ));
        assert_eq!(f.settings().protocol_fee_multiplier(), BasisPoints::new(500));
        assert!(f
            .change_protocol_fee_multiplier(&mut events, &owner(), BasisPoints::new(2_999))
            .is_ok());
    }
}

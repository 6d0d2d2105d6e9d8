//! Creation parameters of a pair.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, BasisPoints, Custody, Delta, NftId, PoolType, QuoteAsset};
use crate::error::AmmError;

/// Highest trading fee a trade pool may charge, exclusive (90%).
pub const MAX_TRADE_FEE: BasisPoints = BasisPoints::new(9_000);

/// Parameters of a pair to be created by the factory.
///
/// Curve-specific checks (`delta`, `spot_price`) need the bonding curve
/// and run in the factory; everything else is checked here.
///
/// # Validation
///
/// - `fee` must be zero unless the pool type is [`PoolType::Trade`], and
///   below [`MAX_TRADE_FEE`] for trade pools.
/// - Trade pools keep their proceeds and may not name an asset recipient.
/// - `is_native` must agree with `quote_asset`.
/// - `initial_nft_ids` may not repeat an id.
///
/// # Examples
///
/// ```
/// use nft_amm::config::PairConfig;
/// use nft_amm::domain::{Address, Amount, Delta, NftId, PoolType, QuoteAsset};
///
/// let config = PairConfig::new(
///     Address::from_low_u64(10),
///     Address::from_low_u64(20),
///     PoolType::Nft,
///     Delta::new(1_000_000_000_000_000),
///     Amount::new(10_000_000_000_000_000),
///     QuoteAsset::Native,
/// )
/// .expect("valid")
/// .with_initial_nft_ids([1, 2, 3].map(NftId::new).to_vec());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    collection: Address,
    bonding_curve: Address,
    #[serde(default)]
    asset_recipient: Option<Address>,
    pool_type: PoolType,
    delta: Delta,
    #[serde(default)]
    fee: BasisPoints,
    spot_price: Amount,
    #[serde(default)]
    initial_nft_ids: Vec<NftId>,
    #[serde(default)]
    initial_quote_amount: Amount,
    quote_asset: QuoteAsset,
    is_native: bool,
    #[serde(default)]
    custody: Custody,
}

impl PairConfig {
    /// Creates a fee-less, unfunded, escrowed pair configuration.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        collection: Address,
        bonding_curve: Address,
        pool_type: PoolType,
        delta: Delta,
        spot_price: Amount,
        quote_asset: QuoteAsset,
    ) -> Result<Self, AmmError> {
        let config = Self {
            collection,
            bonding_curve,
            asset_recipient: None,
            pool_type,
            delta,
            fee: BasisPoints::ZERO,
            spot_price,
            initial_nft_ids: Vec::new(),
            initial_quote_amount: Amount::ZERO,
            quote_asset,
            is_native: quote_asset.is_native(),
            custody: Custody::Escrowed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the trading fee.
    #[must_use]
    pub const fn with_fee(mut self, fee: BasisPoints) -> Self {
        self.fee = fee;
        self
    }

    /// Sets where proceeds are paid.
    #[must_use]
    pub const fn with_asset_recipient(mut self, recipient: Address) -> Self {
        self.asset_recipient = Some(recipient);
        self
    }

    /// Sets the NFTs the pair starts with.
    #[must_use]
    pub fn with_initial_nft_ids(mut self, ids: Vec<NftId>) -> Self {
        self.initial_nft_ids = ids;
        self
    }

    /// Sets the quote amount the creator deposits.
    #[must_use]
    pub const fn with_initial_quote_amount(mut self, amount: Amount) -> Self {
        self.initial_quote_amount = amount;
        self
    }

    /// Sets how the pair holds its NFTs.
    #[must_use]
    pub const fn with_custody(mut self, custody: Custody) -> Self {
        self.custody = custody;
        self
    }

    /// Overrides the native-currency flag.
    #[must_use]
    pub const fn with_native_flag(mut self, is_native: bool) -> Self {
        self.is_native = is_native;
        self
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidFee`] for a fee on a non-trade pool.
    /// - [`AmmError::FeeTooHigh`] for a trade fee at or above 90%.
    /// - [`AmmError::InvalidAssetRecipient`] for a trade pool recipient.
    /// - [`AmmError::InvalidConfiguration`] if `is_native` disagrees
    ///   with the quote asset.
    /// - [`AmmError::DuplicateNftId`] for repeated initial ids.
    pub fn validate(&self) -> Result<(), AmmError> {
        validate_fee(self.pool_type, self.fee)?;
        if self.pool_type.is_trade() && self.asset_recipient.is_some() {
            return Err(AmmError::InvalidAssetRecipient(
                "trade pools keep their proceeds",
            ));
        }
        if self.is_native != self.quote_asset.is_native() {
            return Err(AmmError::InvalidConfiguration(
                "native flag disagrees with quote asset",
            ));
        }
        let mut seen = BTreeSet::new();
        for id in &self.initial_nft_ids {
            if !seen.insert(*id) {
                return Err(AmmError::DuplicateNftId(*id));
            }
        }
        Ok(())
    }

    /// The NFT collection traded.
    #[must_use]
    pub const fn collection(&self) -> Address {
        self.collection
    }

    /// The bonding curve address.
    #[must_use]
    pub const fn bonding_curve(&self) -> Address {
        self.bonding_curve
    }

    /// Where proceeds go, if not to the pair.
    #[must_use]
    pub const fn asset_recipient(&self) -> Option<Address> {
        self.asset_recipient
    }

    #[must_use]
    pub const fn pool_type(&self) -> PoolType {
        self.pool_type
    }

    #[must_use]
    pub const fn delta(&self) -> Delta {
        self.delta
    }

    #[must_use]
    pub const fn fee(&self) -> BasisPoints {
        self.fee
    }

    #[must_use]
    pub const fn spot_price(&self) -> Amount {
        self.spot_price
    }

    /// Ids deposited (or listed) at creation.
    #[must_use]
    pub fn initial_nft_ids(&self) -> &[NftId] {
        &self.initial_nft_ids
    }

    /// Quote amount deposited at creation.
    #[must_use]
    pub const fn initial_quote_amount(&self) -> Amount {
        self.initial_quote_amount
    }

    #[must_use]
    pub const fn quote_asset(&self) -> QuoteAsset {
        self.quote_asset
    }

    #[must_use]
    pub const fn is_native(&self) -> bool {
        self.is_native
    }

    #[must_use]
    pub const fn custody(&self) -> Custody {
        self.custody
    }
}

/// Fee rule shared by creation and later fee changes.
pub(crate) const fn validate_fee(pool_type: PoolType, fee: BasisPoints) -> Result<(), AmmError> {
    if !pool_type.is_trade() {
        if !fee.is_zero() {
            return Err(AmmError::InvalidFee("only trade pools charge a fee"));
        }
        return Ok(());
    }
    if fee.get() >= MAX_TRADE_FEE.get() {
        return Err(AmmError::FeeTooHigh("trade fee must be below 90%"));
    }
    Ok(())
}

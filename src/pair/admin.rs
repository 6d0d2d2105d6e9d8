//! Owner administration of a [`Pair`].
//!
//! Every operation here requires the immediate caller to be the pair
//! owner and fails [`AmmError::NotOwner`] otherwise.

use tracing::info;

use super::{Pair, PairContext};
use crate::config::{validate_combined_fee, validate_fee};
use crate::domain::{Address, Amount, BasisPoints, Custody, Delta, NftId};
use crate::error::AmmError;
use crate::events::Event;
use crate::traits::BondingCurve;

impl Pair {
    /// Sets a new spot price.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::InvalidSpotPrice`] if the
    /// curve rejects the value.
    pub fn change_spot_price(
        &mut self,
        ctx: &mut PairContext<'_>,
        new_spot_price: Amount,
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        self.curve.validate_spot_price(new_spot_price)?;
        self.apply_price(ctx, new_spot_price, self.delta);
        Ok(())
    }

    /// Sets a new delta.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::InvalidDelta`] if the curve
    /// rejects the value.
    pub fn change_delta(
        &mut self,
        ctx: &mut PairContext<'_>,
        new_delta: Delta,
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        self.curve.validate_delta(new_delta)?;
        self.apply_price(ctx, self.spot_price, new_delta);
        Ok(())
    }

    /// Sets the trading fee of a trade pool.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], [`AmmError::InvalidFee`] on a non-trade
    /// pool, [`AmmError::FeeTooHigh`] at or above 90% or when the
    /// protocol fee would bring the total to 100%.
    pub fn change_fee(
        &mut self,
        ctx: &mut PairContext<'_>,
        new_fee: BasisPoints,
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        validate_fee(self.pool_type, new_fee)?;
        validate_combined_fee(new_fee, ctx.settings().protocol_fee_multiplier())?;
        if new_fee != self.fee {
            self.fee = new_fee;
            ctx.emit(Event::FeeUpdate {
                pair: self.address,
                new_fee,
            });
        }
        Ok(())
    }

    /// Redirects proceeds; `None` sends them back to the pair.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::InvalidAssetRecipient`] for
    /// trade pools.
    pub fn change_asset_recipient(
        &mut self,
        ctx: &mut PairContext<'_>,
        recipient: Option<Address>,
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        if self.pool_type.is_trade() {
            return Err(AmmError::InvalidAssetRecipient(
                "trade pools keep their proceeds",
            ));
        }
        if recipient != self.asset_recipient {
            self.asset_recipient = recipient;
            ctx.emit(Event::AssetRecipientChange {
                pair: self.address,
                recipient,
            });
        }
        Ok(())
    }

    /// Moves owner NFTs into escrow and makes them available for sale.
    ///
    /// The factory moves them, so the owner must have approved it.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], [`AmmError::InvalidConfiguration`] on a
    /// listed pair, [`AmmError::DuplicateNftId`] for ids already held,
    /// then transfer errors.
    pub fn deposit_nfts(
        &mut self,
        ctx: &mut PairContext<'_>,
        ids: &[NftId],
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        if self.custody.is_listed() {
            return Err(AmmError::InvalidConfiguration(
                "listed pairs take listings, not deposits",
            ));
        }
        self.record_ids(ids)?;
        let factory = ctx.settings().factory();
        ctx.ledger_mut()
            .transfer_nfts(&self.collection, factory, self.owner, self.address, ids)?;
        ctx.emit(Event::NftDeposit {
            pair: self.address,
            ids: ids.to_vec(),
        });
        Ok(())
    }

    /// Lists owner NFTs for sale without taking custody.
    ///
    /// Ownership is checked at settlement, not here.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], [`AmmError::InvalidConfiguration`] on an
    /// escrowed pair, [`AmmError::DuplicateNftId`] for ids already listed.
    pub fn list_nfts(&mut self, ctx: &mut PairContext<'_>, ids: &[NftId]) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        if !self.custody.is_listed() {
            return Err(AmmError::InvalidConfiguration(
                "escrowed pairs take deposits, not listings",
            ));
        }
        self.record_ids(ids)?;
        ctx.emit(Event::NftDeposit {
            pair: self.address,
            ids: ids.to_vec(),
        });
        Ok(())
    }

    /// Removes held ids.  Escrowed NFTs go back to the owner; listings
    /// are simply dropped.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], [`AmmError::NftNotPermitted`] for ids the
    /// pair does not hold, then transfer errors.
    pub fn withdraw_nfts(
        &mut self,
        ctx: &mut PairContext<'_>,
        ids: &[NftId],
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        Self::check_request(ids)?;
        self.check_held(ids)?;
        match self.custody {
            Custody::Escrowed => {
                let factory = ctx.settings().factory();
                self.send_nfts(ctx, factory, ids, self.owner)?;
            }
            Custody::Listed => {
                for id in ids {
                    self.held_ids.remove(id);
                }
            }
        }
        ctx.emit(Event::NftWithdrawal {
            pair: self.address,
            ids: ids.to_vec(),
        });
        Ok(())
    }

    /// Drops listings; alias of [`withdraw_nfts`](Self::withdraw_nfts)
    /// restricted to listed pairs.
    ///
    /// # Errors
    ///
    /// [`AmmError::InvalidConfiguration`] on an escrowed pair, otherwise
    /// as [`withdraw_nfts`](Self::withdraw_nfts).
    pub fn delist_nfts(
        &mut self,
        ctx: &mut PairContext<'_>,
        ids: &[NftId],
    ) -> Result<(), AmmError> {
        if !self.custody.is_listed() {
            return Err(AmmError::InvalidConfiguration(
                "escrowed pairs release NFTs by withdrawal",
            ));
        }
        self.withdraw_nfts(ctx, ids)
    }

    /// Adds quote asset to the pair.  Anyone may deposit.
    ///
    /// # Errors
    ///
    /// Transfer errors; native deposits are bounded by the attached value.
    pub fn deposit_quote(
        &mut self,
        ctx: &mut PairContext<'_>,
        amount: Amount,
    ) -> Result<(), AmmError> {
        ctx.pull_quote(&self.quote_asset, self.address, self.address, amount)?;
        ctx.emit(Event::TokenDeposit {
            pair: self.address,
            amount,
        });
        Ok(())
    }

    /// Pays `amount` of the pair's quote asset to the owner.
    ///
    /// # Errors
    ///
    /// [`AmmError::NotOwner`], or [`AmmError::InsufficientFunds`].
    pub fn withdraw_quote(
        &mut self,
        ctx: &mut PairContext<'_>,
        amount: Amount,
    ) -> Result<(), AmmError> {
        ctx.require_sender(&self.owner)?;
        ctx.ledger_mut()
            .transfer_quote(&self.quote_asset, self.address, self.owner, amount)?;
        ctx.emit(Event::TokenWithdrawal {
            pair: self.address,
            amount,
        });
        info!(pair = %self.address, amount = %amount, "quote withdrawn");
        Ok(())
    }

    /// Adds ids to the held set, all or nothing.
    fn record_ids(&mut self, ids: &[NftId]) -> Result<(), AmmError> {
        Self::check_request(ids)?;
        if let Some(id) = ids.iter().find(|id| self.held_ids.contains(id)) {
            return Err(AmmError::DuplicateNftId(*id));
        }
        for id in ids {
            self.held_ids.insert(*id);
        }
        Ok(())
    }
}

//! Multi-pair batch router.
//!
//! A [`Router`] executes a list of per-pair legs inside one
//! [`Transaction`]: either every leg settles or the transaction fails and
//! the world is left untouched.  Routed calls reach pairs with the
//! router as immediate caller, so the factory owner must allowlist the
//! router first or every leg fails [`AmmError::RouterNotAllowed`].
//!
//! # Funding
//!
//! | Quote asset | Payer | Mechanism |
//! |-------------|-------|-----------|
//! | native | signer | attached value, unspent value stays with the signer |
//! | token | signer | signer's allowance to the router |
//! | wrapped native, value attached | router | value is wrapped into the router, leftover unwrapped back |
//!
//! In wrapped mode a leg that runs the router dry fails
//! [`AmmError::InsufficientInput`], the same error a native batch gets
//! when the attached value runs out.

mod orders;

use tracing::{info, warn};

pub use orders::{PairSwapAny, PairSwapSell, PairSwapSpecific};

use self::orders::BuyLeg;
use crate::chain::Transaction;
use crate::domain::{Address, Amount, QuoteAsset, Timestamp};
use crate::error::AmmError;
use crate::pair::{CallFrame, Pair, PairContext};

/// A deployed router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Router {
    address: Address,
}

impl Router {
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Buys specific ids across several pairs quoted in `quote_asset`.
    ///
    /// Each leg is bounded by the smaller of its own cap and what is left
    /// of `max_total_input`.  Returns the total paid.
    ///
    /// # Errors
    ///
    /// [`AmmError::Expired`], [`AmmError::UnknownPair`],
    /// [`AmmError::QuoteAssetMismatch`], [`AmmError::SlippageExceeded`],
    /// [`AmmError::InsufficientInput`], or any error of
    /// [`Pair::swap_token_for_specific_nfts`].
    pub fn swap_eth_or_token_for_specific_nfts(
        &self,
        tx: &mut Transaction<'_>,
        swap_list: &[PairSwapSpecific],
        max_total_input: Amount,
        nft_recipient: Address,
        deadline: Timestamp,
        quote_asset: QuoteAsset,
    ) -> Result<Amount, AmmError> {
        let result = self.buy(
            tx,
            swap_list,
            max_total_input,
            deadline,
            quote_asset,
            |pair, ctx, leg, cap| {
                pair.swap_token_for_specific_nfts(ctx, &leg.nft_ids, cap, nft_recipient, deadline)
            },
        );
        self.report("specific-nft buy", swap_list.len(), result)
    }

    /// Buys any ids across several pairs quoted in `quote_asset`.
    ///
    /// # Errors
    ///
    /// As [`swap_eth_or_token_for_specific_nfts`](Self::swap_eth_or_token_for_specific_nfts),
    /// with [`Pair::swap_token_for_any_nfts`] per leg.
    pub fn swap_eth_or_token_for_any_nfts(
        &self,
        tx: &mut Transaction<'_>,
        swap_list: &[PairSwapAny],
        max_total_input: Amount,
        nft_recipient: Address,
        deadline: Timestamp,
        quote_asset: QuoteAsset,
    ) -> Result<Amount, AmmError> {
        let result = self.buy(
            tx,
            swap_list,
            max_total_input,
            deadline,
            quote_asset,
            |pair, ctx, leg, cap| {
                pair.swap_token_for_any_nfts(ctx, leg.num_items, cap, nft_recipient, deadline)
            },
        );
        self.report("any-nft buy", swap_list.len(), result)
    }

    /// Sells ids across several pairs.  Returns the total received.
    ///
    /// # Errors
    ///
    /// [`AmmError::Expired`], [`AmmError::UnknownPair`], any error of
    /// [`Pair::swap_nfts_for_token`], or [`AmmError::SlippageExceeded`]
    /// if the total falls short of `min_total_output`.
    pub fn swap_nfts_for_token(
        &self,
        tx: &mut Transaction<'_>,
        swap_list: &[PairSwapSell],
        min_total_output: Amount,
        token_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        let result = self.sell(tx, swap_list, min_total_output, token_recipient, deadline);
        self.report("sell", swap_list.len(), result)
    }

    fn report(
        &self,
        kind: &'static str,
        legs: usize,
        result: Result<Amount, AmmError>,
    ) -> Result<Amount, AmmError> {
        match &result {
            Ok(total) => info!(router = %self.address, kind, legs, total = %total, "router batch settled"),
            Err(err) => warn!(router = %self.address, kind, legs, error = %err, "router batch rolled back"),
        }
        result
    }

    fn check_pairs<'a>(
        tx: &Transaction<'_>,
        pairs: impl Iterator<Item = &'a Address>,
        quote_asset: Option<QuoteAsset>,
    ) -> Result<(), AmmError> {
        for address in pairs {
            let pair = tx.factory().pair(address)?;
            if quote_asset.is_some_and(|q| q != pair.quote_asset()) {
                return Err(AmmError::QuoteAssetMismatch(*address));
            }
        }
        Ok(())
    }

    /// Whether this batch pays through wrapped native held by the router.
    fn wraps(tx: &Transaction<'_>, quote_asset: QuoteAsset) -> bool {
        let Some(token) = quote_asset.token() else {
            return false;
        };
        tx.ledger().wrapped_native() == Some(token) && !tx.remaining_value().is_zero()
    }

    fn buy<L, F>(
        &self,
        tx: &mut Transaction<'_>,
        legs: &[L],
        max_total_input: Amount,
        deadline: Timestamp,
        quote_asset: QuoteAsset,
        mut swap: F,
    ) -> Result<Amount, AmmError>
    where
        L: BuyLeg,
        F: FnMut(&mut Pair, &mut PairContext<'_>, &L, Amount) -> Result<Amount, AmmError>,
    {
        if tx.now().is_past(deadline) {
            return Err(AmmError::Expired);
        }
        let addresses: Vec<Address> = legs.iter().map(BuyLeg::pair).collect();
        Self::check_pairs(tx, addresses.iter(), Some(quote_asset))?;

        let wrapped = if Self::wraps(tx, quote_asset) {
            Some(tx.wrap_attached_value(self.address)?)
        } else {
            None
        };
        let frame = if wrapped.is_some() {
            CallFrame::routed_from_router(tx.origin(), self.address)
        } else {
            CallFrame::routed(tx.origin(), self.address)
        };

        let mut spent = Amount::ZERO;
        for leg in legs {
            let remaining = max_total_input
                .checked_sub(&spent)
                .ok_or(AmmError::SlippageExceeded("total input above maximum"))?;
            let cap = leg.max_input().map_or(remaining, |m| m.min(remaining));
            let paid = tx
                .call_pair(frame, &leg.pair(), |pair, ctx| swap(pair, ctx, leg, cap))
                .map_err(|err| match err {
                    AmmError::InsufficientFunds if wrapped.is_some() => AmmError::InsufficientInput,
                    other => other,
                })?;
            spent = spent
                .checked_add(&paid)
                .ok_or(AmmError::Overflow("router total input"))?;
        }
        if spent > max_total_input {
            return Err(AmmError::SlippageExceeded("total input above maximum"));
        }

        if let Some(amount) = wrapped {
            let leftover = amount.saturating_sub(&spent);
            if !leftover.is_zero() {
                let origin = tx.origin();
                tx.ledger_mut().unwrap(self.address, origin, leftover)?;
            }
        }
        Ok(spent)
    }

    fn sell(
        &self,
        tx: &mut Transaction<'_>,
        legs: &[PairSwapSell],
        min_total_output: Amount,
        token_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        if tx.now().is_past(deadline) {
            return Err(AmmError::Expired);
        }
        Self::check_pairs(tx, legs.iter().map(|leg| &leg.pair), None)?;

        let frame = CallFrame::routed(tx.origin(), self.address);
        let mut received = Amount::ZERO;
        for leg in legs {
            let out = tx.call_pair(frame, &leg.pair, |pair, ctx| {
                pair.swap_nfts_for_token(ctx, &leg.nft_ids, leg.min_output, token_recipient, deadline)
            })?;
            received = received
                .checked_add(&out)
                .ok_or(AmmError::Overflow("router total output"))?;
        }
        if received < min_total_output {
            return Err(AmmError::SlippageExceeded("total output below minimum"));
        }
        Ok(received)
    }
}

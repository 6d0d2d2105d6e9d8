//! Trading operations of a [`Pair`].

use tracing::debug;

use super::{Pair, PairContext};
use crate::domain::{Address, Amount, Custody, Delta, NftId, Timestamp};
use crate::error::AmmError;
use crate::events::Event;
use crate::math::CheckedArithmetic;

impl Pair {
    /// Sells the requested ids to the caller.
    ///
    /// Returns the quote amount paid, fees included.
    ///
    /// # Errors
    ///
    /// In check order: [`AmmError::Expired`],
    /// [`AmmError::RouterNotAllowed`], [`AmmError::WrongPoolType`],
    /// [`AmmError::InvalidNumItems`] / [`AmmError::DuplicateNftId`],
    /// [`AmmError::NftNotPermitted`], [`AmmError::NftNotOwnedByPoolOwner`],
    /// curve errors, [`AmmError::SlippageExceeded`], then transfer errors.
    pub fn swap_token_for_specific_nfts(
        &mut self,
        ctx: &mut PairContext<'_>,
        ids: &[NftId],
        max_input: Amount,
        nft_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        self.check_buy_preconditions(ctx, deadline)?;
        Self::check_request(ids)?;
        self.check_held(ids)?;
        self.sell_to_trader(ctx, ids, max_input, nft_recipient)
    }

    /// Sells `num_items` ids of the pair's choosing to the caller.
    ///
    /// Ids are taken from the back of the held set's enumeration order,
    /// so the most recently added id goes first.
    ///
    /// # Errors
    ///
    /// As [`swap_token_for_specific_nfts`](Self::swap_token_for_specific_nfts);
    /// [`AmmError::InvalidNumItems`] if `num_items` is zero or exceeds the
    /// held set.  A listed id that its owner moved away fails the call
    /// rather than being skipped.
    pub fn swap_token_for_any_nfts(
        &mut self,
        ctx: &mut PairContext<'_>,
        num_items: usize,
        max_input: Amount,
        nft_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        self.check_buy_preconditions(ctx, deadline)?;
        if num_items == 0 || num_items > self.held_ids.len() {
            return Err(AmmError::InvalidNumItems);
        }
        let ids: Vec<NftId> = self
            .held_ids
            .iter()
            .rev()
            .take(num_items)
            .copied()
            .collect();
        self.sell_to_trader(ctx, &ids, max_input, nft_recipient)
    }

    /// Buys the caller's `ids` for quote asset.
    ///
    /// Returns the quote amount paid to `token_recipient`, fees deducted.
    ///
    /// # Errors
    ///
    /// In check order: [`AmmError::Expired`],
    /// [`AmmError::RouterNotAllowed`], [`AmmError::WrongPoolType`],
    /// [`AmmError::InvalidNumItems`] / [`AmmError::DuplicateNftId`],
    /// curve errors, [`AmmError::SlippageExceeded`], then transfer errors
    /// ([`AmmError::InsufficientFunds`] if the pair cannot pay).
    pub fn swap_nfts_for_token(
        &mut self,
        ctx: &mut PairContext<'_>,
        ids: &[NftId],
        min_output: Amount,
        token_recipient: Address,
        deadline: Timestamp,
    ) -> Result<Amount, AmmError> {
        if ctx.now().is_past(deadline) {
            return Err(AmmError::Expired);
        }
        ctx.authorize_sender()?;
        if !self.pool_type.buys_nfts() {
            return Err(AmmError::WrongPoolType("pool does not buy NFTs"));
        }
        Self::check_request(ids)?;

        let quote = self.sell_quote(ids.len(), ctx.settings().protocol_fee_multiplier())?;
        let output = quote.output_value();
        if output < min_output {
            return Err(AmmError::SlippageExceeded("output below minimum"));
        }

        let owed = output.safe_add(&quote.protocol_fee())?;
        if ctx.ledger().quote_balance(&self.quote_asset, &self.address)? < owed {
            return Err(AmmError::InsufficientFunds);
        }

        let nft_recipient = self.nft_recipient();
        ctx.pull_nfts(&self.collection, self.address, nft_recipient, ids)?;
        if nft_recipient == self.custodian() {
            for id in ids {
                self.held_ids.insert(*id);
            }
        }

        let fee_recipient = ctx.settings().protocol_fee_recipient();
        let ledger = ctx.ledger_mut();
        ledger.transfer_quote(&self.quote_asset, self.address, token_recipient, output)?;
        ledger.transfer_quote(
            &self.quote_asset,
            self.address,
            fee_recipient,
            quote.protocol_fee(),
        )?;

        self.apply_price(ctx, quote.new_spot_price(), quote.new_delta());
        ctx.emit(Event::SwapNftInPair {
            pair: self.address,
            ids: ids.to_vec(),
            output_amount: output,
        });
        debug!(
            pair = %self.address,
            items = ids.len(),
            output = %output,
            spot_price = %self.spot_price,
            "nfts sold into pair"
        );
        Ok(output)
    }

    // -- internals ------------------------------------------------------------

    fn check_buy_preconditions(
        &self,
        ctx: &PairContext<'_>,
        deadline: Timestamp,
    ) -> Result<(), AmmError> {
        if ctx.now().is_past(deadline) {
            return Err(AmmError::Expired);
        }
        ctx.authorize_sender()?;
        if !self.pool_type.sells_nfts() {
            return Err(AmmError::WrongPoolType("pool does not sell NFTs"));
        }
        Ok(())
    }

    /// Prices and settles a sale of held `ids` to the caller.
    fn sell_to_trader(
        &mut self,
        ctx: &mut PairContext<'_>,
        ids: &[NftId],
        max_input: Amount,
        nft_recipient: Address,
    ) -> Result<Amount, AmmError> {
        let factory = ctx.settings().factory();
        self.check_listings(ctx.ledger(), factory, ids)?;

        let quote = self.buy_quote(ids.len(), ctx.settings().protocol_fee_multiplier())?;
        let input = quote.input_value();
        if input > max_input {
            return Err(AmmError::SlippageExceeded("input above maximum"));
        }

        let to_pool = input.safe_sub(&quote.protocol_fee())?;
        ctx.pull_quote(
            &self.quote_asset,
            self.address,
            self.proceeds_recipient(),
            to_pool,
        )?;
        let fee_recipient = ctx.settings().protocol_fee_recipient();
        ctx.pull_quote(
            &self.quote_asset,
            self.address,
            fee_recipient,
            quote.protocol_fee(),
        )?;

        self.send_nfts(ctx, factory, ids, nft_recipient)?;

        self.apply_price(ctx, quote.new_spot_price(), quote.new_delta());
        ctx.emit(Event::SwapNftOutPair {
            pair: self.address,
            ids: ids.to_vec(),
            input_amount: input,
        });
        debug!(
            pair = %self.address,
            items = ids.len(),
            input = %input,
            spot_price = %self.spot_price,
            "nfts bought from pair"
        );
        Ok(input)
    }

    /// Moves held ids out to `to` and drops them from the held set.
    pub(super) fn send_nfts(
        &mut self,
        ctx: &mut PairContext<'_>,
        factory: Address,
        ids: &[NftId],
        to: Address,
    ) -> Result<(), AmmError> {
        for id in ids {
            let (spender, from) = match self.custody {
                Custody::Escrowed => (self.address, self.address),
                Custody::Listed => (
                    self.listing_operator(ctx.ledger(), factory, id)
                        .ok_or(AmmError::NftNotOwnedByPoolOwner(*id))?,
                    self.owner,
                ),
            };
            ctx.ledger_mut()
                .collection_mut(&self.collection)?
                .transfer_from(spender, from, to, *id)?;
            self.held_ids.remove(id);
        }
        Ok(())
    }

    /// Stores new curve parameters, emitting an update for each change.
    pub(super) fn apply_price(
        &mut self,
        ctx: &mut PairContext<'_>,
        new_spot_price: Amount,
        new_delta: Delta,
    ) {
        if new_spot_price != self.spot_price {
            self.spot_price = new_spot_price;
            ctx.emit(Event::SpotPriceUpdate {
                pair: self.address,
                new_spot_price,
            });
        }
        if new_delta != self.delta {
            self.delta = new_delta;
            ctx.emit(Event::DeltaUpdate {
                pair: self.address,
                new_delta,
            });
        }
    }
}

#[cfg(all(test, feature = "linear"))]
#[allow(clippy::panic)]
mod tests {
    use super::super::tests::{
        collection, config, factory, fee_recipient, make_pair, owner, pair_address, trader,
        Harness, ETH,
    };
    use super::*;
    use crate::domain::{BasisPoints, PoolType};
    use crate::pair::CallFrame;

    fn ids(raw: &[u128]) -> Vec<NftId> {
        raw.iter().copied().map(NftId::new).collect()
    }

    fn deadline() -> Timestamp {
        Timestamp::from_secs(2_000)
    }

    fn held(pair: &Pair) -> Vec<u128> {
        pair.held_ids().iter().map(NftId::get).collect()
    }

    // -- buying from the pair -------------------------------------------------

    #[test]
    fn buy_specific_moves_nft_and_price() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1, 2, 3, 5, 6]));
        h.value = Amount::new(ETH / 20);

        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let Ok(paid) = pair.swap_token_for_specific_nfts(
            &mut ctx,
            &ids(&[2]),
            Amount::new(ETH / 20),
            trader(),
            deadline(),
        ) else {
            panic!("buy should succeed");
        };

        let value = 11 * ETH / 1_000;
        let protocol = value / 20;
        assert_eq!(paid, Amount::new(value + protocol));
        assert_eq!(pair.spot_price(), Amount::new(value));
        assert_eq!(held(&pair), vec![1, 6, 3, 5]);
        let Ok(c) = h.ledger.collection(&pair.collection()) else {
            panic!("collection");
        };
        assert_eq!(c.owner_of(&NftId::new(2)), Some(trader()));
        assert_eq!(h.ledger.native_balance(&pair_address()), Amount::new(value));
        assert_eq!(h.ledger.native_balance(&fee_recipient()), Amount::new(protocol));
        assert_eq!(h.value, Amount::new(ETH / 20 - value - protocol));
    }

    #[test]
    fn unheld_id_not_permitted() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1, 2, 3]));
        h.value = Amount::new(ETH);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result = pair.swap_token_for_specific_nfts(
            &mut ctx,
            &ids(&[0, 4]),
            Amount::new(ETH),
            trader(),
            deadline(),
        );
        assert_eq!(result, Err(AmmError::NftNotPermitted(NftId::new(0))));
        assert_eq!(pair.held_ids().len(), 3);
    }

    #[test]
    fn expired_checked_first() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Token, &[]));
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result = pair.swap_token_for_specific_nfts(
            &mut ctx,
            &ids(&[9]),
            Amount::ZERO,
            trader(),
            Timestamp::from_secs(999),
        );
        assert_eq!(result, Err(AmmError::Expired));
    }

    #[test]
    fn token_pool_does_not_sell() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Token, &[]));
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result = pair.swap_token_for_any_nfts(&mut ctx, 1, Amount::MAX, trader(), deadline());
        assert!(matches!(result, Err(AmmError::WrongPoolType(_))));
    }

    #[test]
    fn slippage_bound_enforced() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1]));
        h.value = Amount::new(ETH);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result = pair.swap_token_for_specific_nfts(
            &mut ctx,
            &ids(&[1]),
            Amount::new(11 * ETH / 1_000),
            trader(),
            deadline(),
        );
        assert!(matches!(result, Err(AmmError::SlippageExceeded(_))));
    }

    #[test]
    fn attached_value_caps_native_spend() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1]));
        h.value = Amount::new(ETH / 1_000);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result =
            pair.swap_token_for_specific_nfts(&mut ctx, &ids(&[1]), Amount::MAX, trader(), deadline());
        assert_eq!(result, Err(AmmError::InsufficientInput));
    }

    #[test]
    fn any_nfts_taken_from_the_back() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1, 2, 3, 5, 6]));
        h.value = Amount::new(ETH);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        assert!(pair
            .swap_token_for_any_nfts(&mut ctx, 2, Amount::MAX, trader(), deadline())
            .is_ok());
        assert_eq!(held(&pair), vec![1, 2, 3]);
        let Ok(c) = h.ledger.collection(&pair.collection()) else {
            panic!("collection");
        };
        assert_eq!(c.owner_of(&NftId::new(6)), Some(trader()));
        assert_eq!(c.owner_of(&NftId::new(5)), Some(trader()));
    }

    #[test]
    fn any_nfts_beyond_inventory_rejected() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1]));
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result = pair.swap_token_for_any_nfts(&mut ctx, 2, Amount::MAX, trader(), deadline());
        assert_eq!(result, Err(AmmError::InvalidNumItems));
    }

    // -- listed custody -------------------------------------------------------

    #[test]
    fn listed_id_moved_away_not_owned() {
        let mut h = Harness::new();
        let cfg = config(PoolType::Nft, &[1, 5, 6]).with_custody(Custody::Listed);
        let mut pair = make_pair(&mut h.ledger, &cfg);
        let Ok(c) = h.ledger.collection_mut(&pair.collection()) else {
            panic!("collection");
        };
        assert!(c.transfer_from(owner(), owner(), trader(), NftId::new(6)).is_ok());

        h.value = Amount::new(ETH);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result =
            pair.swap_token_for_specific_nfts(&mut ctx, &ids(&[6]), Amount::MAX, trader(), deadline());
        assert_eq!(result, Err(AmmError::NftNotOwnedByPoolOwner(NftId::new(6))));

        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result = pair.swap_token_for_any_nfts(&mut ctx, 1, Amount::MAX, trader(), deadline());
        assert_eq!(result, Err(AmmError::NftNotOwnedByPoolOwner(NftId::new(6))));
    }

    #[test]
    fn listed_sale_moves_from_owner_wallet() {
        let mut h = Harness::new();
        let cfg = config(PoolType::Nft, &[1, 2])
            .with_custody(Custody::Listed)
            .with_asset_recipient(owner());
        let mut pair = make_pair(&mut h.ledger, &cfg);
        let before = h.ledger.native_balance(&owner());
        h.value = Amount::new(ETH);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        assert!(pair
            .swap_token_for_specific_nfts(&mut ctx, &ids(&[1]), Amount::MAX, trader(), deadline())
            .is_ok());
        let Ok(c) = h.ledger.collection(&pair.collection()) else {
            panic!("collection");
        };
        assert_eq!(c.owner_of(&NftId::new(1)), Some(trader()));
        assert_eq!(
            h.ledger.native_balance(&owner()),
            Amount::new(before.get() + 11 * ETH / 1_000)
        );
    }

    #[test]
    fn listing_without_approval_not_owned() {
        let mut h = Harness::new();
        let Ok(c) = h.ledger.collection_mut(&collection()) else {
            panic!("collection");
        };
        c.set_approval_for_all(owner(), factory(), false);
        let cfg = config(PoolType::Nft, &[3]).with_custody(Custody::Listed);
        let mut pair = make_pair(&mut h.ledger, &cfg);
        h.value = Amount::new(ETH);
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result =
            pair.swap_token_for_specific_nfts(&mut ctx, &ids(&[3]), Amount::MAX, trader(), deadline());
        assert_eq!(result, Err(AmmError::NftNotOwnedByPoolOwner(NftId::new(3))));
    }

    // -- selling into the pair ------------------------------------------------

    #[test]
    fn sell_into_trade_pool_adds_to_inventory() {
        let mut h = Harness::new();
        let cfg = config(PoolType::Trade, &[1]).with_fee(BasisPoints::new(100));
        let mut pair = make_pair(&mut h.ledger, &cfg);
        assert!(h
            .ledger
            .fund_native(pair_address(), Amount::new(ETH))
            .is_ok());
        let before = h.ledger.native_balance(&trader());

        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let Ok(received) = pair.swap_nfts_for_token(
            &mut ctx,
            &ids(&[10, 11]),
            Amount::ZERO,
            trader(),
            deadline(),
        ) else {
            panic!("sell should succeed");
        };

        // 0.010 + 0.009, less 1% trade fee and 5% protocol fee
        let value = 19 * ETH / 1_000;
        let expected = value - value / 100 - value / 20;
        assert_eq!(received, Amount::new(expected));
        assert_eq!(
            h.ledger.native_balance(&trader()),
            Amount::new(before.get() + expected)
        );
        assert_eq!(pair.spot_price(), Amount::new(8 * ETH / 1_000));
        assert_eq!(held(&pair), vec![1, 10, 11]);
    }

    #[test]
    fn nft_pool_does_not_buy() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1]));
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result =
            pair.swap_nfts_for_token(&mut ctx, &ids(&[10]), Amount::ZERO, trader(), deadline());
        assert!(matches!(result, Err(AmmError::WrongPoolType(_))));
    }

    #[test]
    fn underfunded_pair_cannot_pay() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Token, &[]));
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result =
            pair.swap_nfts_for_token(&mut ctx, &ids(&[10]), Amount::ZERO, trader(), deadline());
        assert_eq!(result, Err(AmmError::InsufficientFunds));

        // Nothing was taken from the seller.
        assert!(held(&pair).is_empty());
        let Ok(nfts) = h.ledger.collection(&collection()) else {
            panic!("collection deployed");
        };
        assert_eq!(nfts.owner_of(&NftId::new(10)), Some(trader()));
    }

    #[test]
    fn sell_slippage_bound_enforced() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Token, &[]));
        assert!(h
            .ledger
            .fund_native(pair_address(), Amount::new(ETH))
            .is_ok());
        let mut ctx = h.ctx(CallFrame::direct(trader()));
        let result =
            pair.swap_nfts_for_token(&mut ctx, &ids(&[10]), Amount::new(ETH), trader(), deadline());
        assert!(matches!(result, Err(AmmError::SlippageExceeded(_))));
    }

    #[test]
    fn unlisted_router_rejected() {
        let mut h = Harness::new();
        let mut pair = make_pair(&mut h.ledger, &config(PoolType::Nft, &[1]));
        let mut ctx = h.ctx(CallFrame::routed(trader(), Address::from_low_u64(99)));
        let result =
            pair.swap_token_for_specific_nfts(&mut ctx, &ids(&[1]), Amount::MAX, trader(), deadline());
        assert_eq!(result, Err(AmmError::RouterNotAllowed));
    }
}

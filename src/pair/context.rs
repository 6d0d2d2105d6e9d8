//! Execution context handed to pair operations.
//!
//! A [`PairContext`] only exists inside a transaction: it borrows the
//! transaction's scratch ledger and event log, the factory's
//! [`ProtocolSettings`], the call frame and the remaining attached
//! native value.  Everything a pair moves goes through it.

use crate::domain::{Address, Amount, NftId, QuoteAsset, Timestamp};
use crate::error::AmmError;
use crate::events::{Event, EventLog};
use crate::factory::ProtocolSettings;
use crate::ledger::Ledger;

/// Who is calling a pair, and on whose behalf.
///
/// `origin` signed the transaction.  `sender` is the immediate caller:
/// the origin for direct calls, a router for routed ones.  `payer` is
/// the account quote asset is pulled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallFrame {
    origin: Address,
    sender: Address,
    payer: Address,
}

impl CallFrame {
    /// `caller` talks to the pair itself.
    #[must_use]
    pub const fn direct(caller: Address) -> Self {
        Self {
            origin: caller,
            sender: caller,
            payer: caller,
        }
    }

    /// `router` calls on behalf of `origin`, spending `origin`'s
    /// allowance to the router.
    #[must_use]
    pub const fn routed(origin: Address, router: Address) -> Self {
        Self {
            origin,
            sender: router,
            payer: origin,
        }
    }

    /// `router` calls on behalf of `origin` and pays from its own balance.
    #[must_use]
    pub const fn routed_from_router(origin: Address, router: Address) -> Self {
        Self {
            origin,
            sender: router,
            payer: router,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> Address {
        self.origin
    }

    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    #[must_use]
    pub const fn payer(&self) -> Address {
        self.payer
    }

    /// Whether the signer called the pair without an intermediary.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.origin == self.sender
    }
}

/// Borrowed view of the transaction a pair operation runs in.
#[derive(Debug)]
pub struct PairContext<'a> {
    ledger: &'a mut Ledger,
    events: &'a mut EventLog,
    settings: &'a ProtocolSettings,
    frame: CallFrame,
    value: &'a mut Amount,
    now: Timestamp,
}

impl<'a> PairContext<'a> {
    /// Assembles a context from the pieces of a transaction.
    #[must_use]
    pub(crate) fn new(
        ledger: &'a mut Ledger,
        events: &'a mut EventLog,
        settings: &'a ProtocolSettings,
        frame: CallFrame,
        value: &'a mut Amount,
        now: Timestamp,
    ) -> Self {
        Self {
            ledger,
            events,
            settings,
            frame,
            value,
            now,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    #[must_use]
    pub const fn frame(&self) -> CallFrame {
        self.frame
    }

    #[must_use]
    pub const fn settings(&self) -> &ProtocolSettings {
        self.settings
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &*self.ledger
    }

    /// Native value still attached to the transaction.
    #[must_use]
    pub fn remaining_value(&self) -> Amount {
        *self.value
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut *self.ledger
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.emit(event);
    }

    /// Fails unless the immediate caller is the signer or an allowlisted
    /// router.
    pub(crate) fn authorize_sender(&self) -> Result<(), AmmError> {
        if self.frame.is_direct() || self.settings.is_router_allowed(&self.frame.sender) {
            return Ok(());
        }
        Err(AmmError::RouterNotAllowed)
    }

    /// Fails unless the immediate caller is `owner`.
    pub(crate) fn require_sender(&self, owner: &Address) -> Result<(), AmmError> {
        if self.frame.sender == *owner {
            Ok(())
        } else {
            Err(AmmError::NotOwner)
        }
    }

    /// The account allowed to move assets on the payer's behalf when
    /// `pair` pulls them.
    fn spender_for(&self, pair: Address) -> Address {
        if self.frame.is_direct() {
            pair
        } else {
            self.frame.sender
        }
    }

    /// Pulls `amount` of `asset` from the payer to `to`.
    ///
    /// Native currency comes out of the attached value; going past it
    /// fails [`AmmError::InsufficientInput`].
    pub(crate) fn pull_quote(
        &mut self,
        asset: &QuoteAsset,
        pair: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if amount.is_zero() {
            return Ok(());
        }
        match asset {
            QuoteAsset::Native => {
                *self.value = self
                    .value
                    .checked_sub(&amount)
                    .ok_or(AmmError::InsufficientInput)?;
                self.ledger.transfer_native(self.frame.origin, to, amount)
            }
            QuoteAsset::Token(token) => {
                let spender = self.spender_for(pair);
                let payer = self.frame.payer;
                let token = self.ledger.token_mut(token)?;
                if payer == spender {
                    token.transfer(payer, to, amount)
                } else {
                    token.transfer_from(spender, payer, to, amount)
                }
            }
        }
    }

    /// Pulls NFTs from the signer to `to`.
    pub(crate) fn pull_nfts(
        &mut self,
        collection: &Address,
        pair: Address,
        to: Address,
        ids: &[NftId],
    ) -> Result<(), AmmError> {
        let spender = self.spender_for(pair);
        self.ledger
            .transfer_nfts(collection, spender, self.frame.origin, to, ids)
    }
}

//! In-memory asset ledger: native balances, fungible tokens, NFT
//! collections and the wrapped-native token.
//!
//! Every pair, router and account settles through a [`Ledger`].  All
//! operations either fully apply or return an error without touching
//! state, and the ledger is `Clone` so a transaction can run against a
//! scratch copy.
//!
//! # Wrapped native
//!
//! One token may be registered as the wrapped-native token.  Wrapping
//! moves native currency from the account to the token's own address and
//! mints the same amount of tokens; unwrapping reverses it.

mod collection;
mod token;

use std::collections::BTreeMap;

pub use collection::NftCollection;
pub use token::FungibleToken;

use crate::domain::{Address, Amount, NftId, QuoteAsset};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balances of every asset known to the execution environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    native: BTreeMap<Address, Amount>,
    tokens: BTreeMap<Address, FungibleToken>,
    collections: BTreeMap<Address, NftCollection>,
    wrapped_native: Option<Address>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- native ---------------------------------------------------------------

    /// Native balance of `account`.
    #[must_use]
    pub fn native_balance(&self, account: &Address) -> Amount {
        self.native.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Credits `amount` of native currency to `account`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would overflow.
    pub fn fund_native(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self.native_balance(&account).safe_add(&amount)?;
        self.native.insert(account, balance);
        Ok(())
    }

    /// Moves native currency between accounts.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientFunds`] if `from` holds less.
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let debited = self
            .native_balance(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientFunds)?;
        if from == to {
            return Ok(());
        }
        let credited = self.native_balance(&to).safe_add(&amount)?;
        self.native.insert(from, debited);
        self.native.insert(to, credited);
        Ok(())
    }

    // -- tokens ---------------------------------------------------------------

    /// Registers a new, empty token at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the address is taken.
    pub fn deploy_token(&mut self, address: Address) -> Result<(), AmmError> {
        if self.tokens.contains_key(&address) || self.collections.contains_key(&address) {
            return Err(AmmError::InvalidConfiguration("address already deployed"));
        }
        self.tokens.insert(address, FungibleToken::new());
        Ok(())
    }

    /// Marks an already deployed token as the wrapped-native token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownToken`] if no token lives at `address`.
    pub fn set_wrapped_native(&mut self, address: Address) -> Result<(), AmmError> {
        self.token(&address)?;
        self.wrapped_native = Some(address);
        Ok(())
    }

    /// The wrapped-native token, if registered.
    #[must_use]
    pub const fn wrapped_native(&self) -> Option<Address> {
        self.wrapped_native
    }

    /// Whether a token is deployed at `address`.
    #[must_use]
    pub fn has_token(&self, address: &Address) -> bool {
        self.tokens.contains_key(address)
    }

    /// Read access to a token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownToken`] if no token lives at `address`.
    pub fn token(&self, address: &Address) -> Result<&FungibleToken, AmmError> {
        self.tokens
            .get(address)
            .ok_or(AmmError::UnknownToken(*address))
    }

    /// Write access to a token.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownToken`] if no token lives at `address`.
    pub fn token_mut(&mut self, address: &Address) -> Result<&mut FungibleToken, AmmError> {
        self.tokens
            .get_mut(address)
            .ok_or(AmmError::UnknownToken(*address))
    }

    /// Converts `amount` of `account`'s native currency into wrapped tokens
    /// credited to `beneficiary`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if no wrapped-native token is set.
    /// - [`AmmError::InsufficientFunds`] if `account` holds less.
    pub fn wrap(
        &mut self,
        account: Address,
        beneficiary: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let weth = self
            .wrapped_native
            .ok_or(AmmError::InvalidConfiguration("no wrapped native token"))?;
        self.transfer_native(account, weth, amount)?;
        self.token_mut(&weth)?.mint(beneficiary, amount)
    }

    /// Burns `amount` wrapped tokens of `account` and pays the native
    /// currency to `beneficiary`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidConfiguration`] if no wrapped-native token is set.
    /// - [`AmmError::InsufficientFunds`] if `account` holds less.
    pub fn unwrap(
        &mut self,
        account: Address,
        beneficiary: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let weth = self
            .wrapped_native
            .ok_or(AmmError::InvalidConfiguration("no wrapped native token"))?;
        self.token_mut(&weth)?.burn(account, amount)?;
        self.transfer_native(weth, beneficiary, amount)
    }

    // -- quote assets ---------------------------------------------------------

    /// Balance of `account` in `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownToken`] for an undeployed token.
    pub fn quote_balance(&self, asset: &QuoteAsset, account: &Address) -> Result<Amount, AmmError> {
        match asset {
            QuoteAsset::Native => Ok(self.native_balance(account)),
            QuoteAsset::Token(t) => Ok(self.token(t)?.balance_of(account)),
        }
    }

    /// Moves `amount` of `asset` out of an account the caller controls.
    ///
    /// # Errors
    ///
    /// - [`AmmError::UnknownToken`] for an undeployed token.
    /// - [`AmmError::InsufficientFunds`] if `from` holds less.
    pub fn transfer_quote(
        &mut self,
        asset: &QuoteAsset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        match asset {
            QuoteAsset::Native => self.transfer_native(from, to, amount),
            QuoteAsset::Token(t) => self.token_mut(t)?.transfer(from, to, amount),
        }
    }

    // -- collections ----------------------------------------------------------

    /// Registers a new, empty NFT collection at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the address is taken.
    pub fn deploy_collection(&mut self, address: Address) -> Result<(), AmmError> {
        if self.tokens.contains_key(&address) || self.collections.contains_key(&address) {
            return Err(AmmError::InvalidConfiguration("address already deployed"));
        }
        self.collections.insert(address, NftCollection::new());
        Ok(())
    }

    /// Read access to a collection.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownCollection`] if none lives at `address`.
    pub fn collection(&self, address: &Address) -> Result<&NftCollection, AmmError> {
        self.collections
            .get(address)
            .ok_or(AmmError::UnknownCollection(*address))
    }

    /// Write access to a collection.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownCollection`] if none lives at `address`.
    pub fn collection_mut(&mut self, address: &Address) -> Result<&mut NftCollection, AmmError> {
        self.collections
            .get_mut(address)
            .ok_or(AmmError::UnknownCollection(*address))
    }

    /// Moves NFTs one by one; the first failure aborts the batch.
    ///
    /// # Errors
    ///
    /// See [`NftCollection::transfer_from`].
    pub fn transfer_nfts(
        &mut self,
        collection: &Address,
        spender: Address,
        from: Address,
        to: Address,
        ids: &[NftId],
    ) -> Result<(), AmmError> {
        let collection = self.collection_mut(collection)?;
        for id in ids {
            collection.transfer_from(spender, from, to, *id)?;
        }
        Ok(())
    }
}

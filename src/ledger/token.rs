//! Fungible token balances and allowances.

use std::collections::BTreeMap;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balance sheet of a single fungible token contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FungibleToken {
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl FungibleToken {
    /// Creates an empty token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`.
    #[must_use]
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Amount `spender` may still move on behalf of `owner`.
    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Outstanding supply.
    #[must_use]
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Sets the allowance of `spender` over `owner`'s balance.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Creates `amount` new units for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply would overflow.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.total_supply = self.total_supply.safe_add(&amount)?;
        let balance = self.balance_of(&to).safe_add(&amount)?;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Destroys `amount` units held by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientFunds`] if `from` holds less.
    pub fn burn(&mut self, from: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientFunds)?;
        self.balances.insert(from, balance);
        self.total_supply = self.total_supply.safe_sub(&amount)?;
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientFunds`] if `from` holds less.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        if amount.is_zero() || from == to {
            return if self.balance_of(&from) >= amount {
                Ok(())
            } else {
                Err(AmmError::InsufficientFunds)
            };
        }
        let debited = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientFunds)?;
        let credited = self.balance_of(&to).safe_add(&amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`, spending `spender`'s allowance.
    ///
    /// A spender moving its own balance needs no allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientFunds`] if `from` holds less.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        if spender != from {
            let remaining = self
                .allowance(&from, &spender)
                .checked_sub(&amount)
                .ok_or(AmmError::InsufficientAllowance)?;
            self.transfer(from, to, amount)?;
            self.allowances.insert((from, spender), remaining);
            return Ok(());
        }
        self.transfer(from, to, amount)
    }
}

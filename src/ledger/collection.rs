//! NFT collection ownership and approvals.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Address, NftId};
use crate::error::AmmError;

/// Ownership registry of a single NFT collection.
///
/// Approvals follow the usual two levels: an operator approved by an
/// owner may move all of that owner's ids, a per-id approval covers one
/// id and is cleared when the id moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftCollection {
    owners: BTreeMap<NftId, Address>,
    token_approvals: BTreeMap<NftId, Address>,
    operators: BTreeSet<(Address, Address)>,
}

impl NftCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current owner of `id`, if minted.
    #[must_use]
    pub fn owner_of(&self, id: &NftId) -> Option<Address> {
        self.owners.get(id).copied()
    }

    /// Ids held by `owner`, ascending.
    #[must_use]
    pub fn tokens_of(&self, owner: &Address) -> Vec<NftId> {
        self.owners
            .iter()
            .filter(|(_, o)| *o == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Whether `operator` may move every id of `owner`.
    #[must_use]
    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.operators.contains(&(*owner, *operator))
    }

    /// Whether `spender` may move `id` right now.
    #[must_use]
    pub fn is_approved_or_owner(&self, spender: &Address, id: &NftId) -> bool {
        let Some(owner) = self.owner_of(id) else {
            return false;
        };
        owner == *spender
            || self.is_approved_for_all(&owner, spender)
            || self.token_approvals.get(id) == Some(spender)
    }

    /// Mints `id` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::NftAlreadyExists`] if `id` is already minted.
    pub fn mint(&mut self, to: Address, id: NftId) -> Result<(), AmmError> {
        if self.owners.contains_key(&id) {
            return Err(AmmError::NftAlreadyExists(id));
        }
        self.owners.insert(id, to);
        Ok(())
    }

    /// Grants or revokes `operator` over all of `owner`'s ids.
    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
    }

    /// Approves `spender` for a single id.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NftNotOwned`] if `owner` does not hold `id`.
    pub fn approve(&mut self, owner: Address, spender: Address, id: NftId) -> Result<(), AmmError> {
        if self.owner_of(&id) != Some(owner) {
            return Err(AmmError::NftNotOwned(id));
        }
        self.token_approvals.insert(id, spender);
        Ok(())
    }

    /// Moves `id` from `from` to `to` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NftNotOwned`] if `from` does not hold `id`.
    /// - [`AmmError::NftNotApproved`] if `spender` may not move it.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        id: NftId,
    ) -> Result<(), AmmError> {
        if self.owner_of(&id) != Some(from) {
            return Err(AmmError::NftNotOwned(id));
        }
        if !self.is_approved_or_owner(&spender, &id) {
            return Err(AmmError::NftNotApproved(id));
        }
        self.token_approvals.remove(&id);
        self.owners.insert(id, to);
        Ok(())
    }
}

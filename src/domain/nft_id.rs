//! NFT token identifiers and the enumerable id set held by pairs.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of one token inside an NFT collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NftId(u128);

impl NftId {
    /// Wraps a raw token id.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw token id.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u128> for NftId {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

/// An enumerable set of NFT ids with index-set semantics.
///
/// The enumeration order is externally observable (it decides which ids a
/// "buy any" trade delivers), so it is pinned down precisely:
///
/// - [`insert`](Self::insert) appends a new id at the end;
/// - [`remove`](Self::remove) moves the **last** id into the freed slot and
///   shrinks the set by one (swap-and-pop);
/// - [`last`](Self::last) is the next id handed out by a "buy any" trade.
///
/// # Examples
///
/// ```
/// use nft_amm::domain::{NftId, NftIdSet};
///
/// let mut set: NftIdSet = [1u128, 2, 3, 5].into_iter().map(NftId::new).collect();
/// assert!(set.remove(&NftId::new(2)));
/// let order: Vec<u128> = set.iter().map(|id| id.get()).collect();
/// assert_eq!(order, vec![1, 5, 3]);
/// assert_eq!(set.last(), Some(NftId::new(3)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftIdSet {
    values: Vec<NftId>,
    positions: BTreeMap<NftId, usize>,
}

impl NftIdSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id`; returns `false` if it was already present.
    pub fn insert(&mut self, id: NftId) -> bool {
        if self.positions.contains_key(&id) {
            return false;
        }
        self.positions.insert(id, self.values.len());
        self.values.push(id);
        true
    }

    /// Removes `id` with swap-and-pop; returns `false` if it was absent.
    pub fn remove(&mut self, id: &NftId) -> bool {
        let Some(index) = self.positions.remove(id) else {
            return false;
        };
        self.values.swap_remove(index);
        if let Some(moved) = self.values.get(index) {
            self.positions.insert(*moved, index);
        }
        true
    }

    /// Returns `true` if `id` is in the set.
    #[must_use]
    pub fn contains(&self, id: &NftId) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of ids held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no id is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The id at the end of the enumeration order.
    #[must_use]
    pub fn last(&self) -> Option<NftId> {
        self.values.last().copied()
    }

    /// Iterates in enumeration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &NftId> + ExactSizeIterator {
        self.values.iter()
    }

    /// Returns the ids in enumeration order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<NftId> {
        self.values.clone()
    }
}

impl FromIterator<NftId> for NftIdSet {
    fn from_iter<T: IntoIterator<Item = NftId>>(iter: T) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u128]) -> NftIdSet {
        raw.iter().copied().map(NftId::new).collect()
    }

    fn order(set: &NftIdSet) -> Vec<u128> {
        set.iter().map(NftId::get).collect()
    }

    #[test]
    fn insert_appends_and_rejects_duplicates() {
        let mut set = ids(&[3, 1]);
        assert!(set.insert(NftId::new(2)));
        assert!(!set.insert(NftId::new(1)));
        assert_eq!(order(&set), vec![3, 1, 2]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_is_swap_and_pop() {
        let mut set = ids(&[1, 2, 3, 5, 6]);
        assert!(set.remove(&NftId::new(1)));
        assert_eq!(order(&set), vec![6, 2, 3, 5]);
        assert!(set.remove(&NftId::new(5)));
        assert_eq!(order(&set), vec![6, 2, 3]);
        assert!(!set.remove(&NftId::new(5)));
        assert!(set.contains(&NftId::new(6)));
    }

    #[test]
    fn remove_last_element() {
        let mut set = ids(&[4]);
        assert!(set.remove(&NftId::new(4)));
        assert!(set.is_empty());
        assert_eq!(set.last(), None);
    }

    #[test]
    fn positions_stay_consistent() {
        let mut set = ids(&[10, 20, 30, 40]);
        set.remove(&NftId::new(20));
        set.remove(&NftId::new(40));
        set.insert(NftId::new(50));
        assert_eq!(order(&set), vec![10, 30, 50]);
        assert!(set.remove(&NftId::new(10)));
        assert_eq!(order(&set), vec![50, 30]);
        assert_eq!(set.last(), Some(NftId::new(30)));
    }

    #[test]
    fn iterates_from_the_back() {
        let mut set = ids(&[1, 2, 3]);
        set.remove(&NftId::new(1));
        let newest: Vec<u128> = set.iter().rev().take(2).map(|id| id.get()).collect();
        assert_eq!(newest, vec![2, 3]);
        assert_eq!(set.iter().len(), 2);
    }

    #[test]
    fn display_id() {
        assert_eq!(NftId::new(7).to_string(), "#7");
    }
}

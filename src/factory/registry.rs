//! Runtime table binding curve addresses to pricing strategies.

use std::collections::BTreeMap;

use crate::curves::CurveBox;
use crate::domain::Address;
use crate::error::AmmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CurveEntry {
    curve: CurveBox,
    allowed: bool,
}

/// Curve address → (strategy, allowlisted).
///
/// Only the closed set of [`CurveBox`] variants can ever be bound, so the
/// pricing code a pair may run is known at compile time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveRegistry {
    entries: BTreeMap<Address, CurveEntry>,
}

impl CurveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `address` to `curve`.  New bindings start disallowed;
    /// rebinding keeps the allowlist flag.
    pub fn register(&mut self, address: Address, curve: CurveBox) {
        let allowed = self.is_allowed(&address);
        self.entries.insert(address, CurveEntry { curve, allowed });
    }

    /// Sets the allowlist flag of a registered curve.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownCurve`] if `address` is not bound.
    pub fn set_allowed(&mut self, address: &Address, allowed: bool) -> Result<(), AmmError> {
        let entry = self
            .entries
            .get_mut(address)
            .ok_or(AmmError::UnknownCurve(*address))?;
        entry.allowed = allowed;
        Ok(())
    }

    /// Whether pairs may be created with the curve at `address`.
    #[must_use]
    pub fn is_allowed(&self, address: &Address) -> bool {
        self.entries.get(address).is_some_and(|e| e.allowed)
    }

    /// The strategy bound to `address`.
    #[must_use]
    pub fn get(&self, address: &Address) -> Option<CurveBox> {
        self.entries.get(address).map(|e| e.curve)
    }

    /// Number of bound curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

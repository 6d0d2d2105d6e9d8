//! Factory-wide settings shared with every pair.

use std::collections::BTreeMap;

use crate::domain::{Address, BasisPoints};

/// Protocol fee settings and the router allowlist.
///
/// Owned by the factory and passed by reference to each pair operation;
/// pairs never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolSettings {
    factory: Address,
    protocol_fee_multiplier: BasisPoints,
    protocol_fee_recipient: Address,
    routers: BTreeMap<Address, bool>,
}

impl ProtocolSettings {
    /// Creates settings with an empty router allowlist.
    #[must_use]
    pub fn new(
        factory: Address,
        protocol_fee_multiplier: BasisPoints,
        protocol_fee_recipient: Address,
    ) -> Self {
        Self {
            factory,
            protocol_fee_multiplier,
            protocol_fee_recipient,
            routers: BTreeMap::new(),
        }
    }

    /// Address of the owning factory.  Pair owners approve it as operator
    /// for listed NFTs.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    #[must_use]
    pub const fn protocol_fee_multiplier(&self) -> BasisPoints {
        self.protocol_fee_multiplier
    }

    #[must_use]
    pub const fn protocol_fee_recipient(&self) -> Address {
        self.protocol_fee_recipient
    }

    /// Whether pairs trust `router` to act for its callers.
    #[must_use]
    pub fn is_router_allowed(&self, router: &Address) -> bool {
        self.routers.get(router).copied().unwrap_or(false)
    }

    pub(crate) fn set_router_allowed(&mut self, router: Address, allowed: bool) {
        self.routers.insert(router, allowed);
    }

    pub(crate) fn set_protocol_fee_multiplier(&mut self, multiplier: BasisPoints) {
        self.protocol_fee_multiplier = multiplier;
    }
}

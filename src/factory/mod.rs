//! Pair deployment and the registries pairs depend on.
//!
//! [`PairFactory`] validates [`PairConfig`](crate::config::PairConfig)s,
//! deploys [`Pair`](crate::pair::Pair)s and keeps three registries:
//!
//! - a [`CurveRegistry`] binding curve addresses to
//!   [`CurveBox`](crate::curves::CurveBox) strategies plus an allowlist
//!   flag;
//! - the router allowlist, held in [`ProtocolSettings`];
//! - the protocol fee multiplier and recipient, also in
//!   [`ProtocolSettings`].
//!
//! [`ProtocolSettings`] is passed explicitly to every pair operation, so
//! there is no global state.

mod pair_factory;
mod registry;
mod settings;

pub use pair_factory::PairFactory;
pub use registry::CurveRegistry;
pub use settings::ProtocolSettings;

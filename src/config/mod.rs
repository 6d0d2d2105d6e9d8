//! Declarative deployment blueprints.
//!
//! [`FactoryConfig`] describes a factory deployment and [`PairConfig`]
//! the parameters of one pair.  Both are `serde`-deserialisable so that a
//! deployment can be described in a file; deserialised values must
//! still be [`validate`](PairConfig::validate)d before use, which the
//! factory does on every call.

mod factory_config;
mod pair_config;

pub use factory_config::FactoryConfig;
pub use pair_config::{PairConfig, MAX_TRADE_FEE};

pub(crate) use factory_config::{validate_combined_fee, validate_protocol_fee};
pub(crate) use pair_config::validate_fee;

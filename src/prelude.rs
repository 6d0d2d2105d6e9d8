//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use nft_amm::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, BuyQuote, Custody, Delta, NftId, PoolType, QuoteAsset,
    SellQuote, Timestamp,
};

pub use crate::traits::BondingCurve;

pub use crate::math::CheckedArithmetic;

pub use crate::config::{FactoryConfig, PairConfig};

pub use crate::curves::{CurveBox, CurveKind};

pub use crate::error::{AmmError, Result};

pub use crate::chain::{Caller, Chain};

pub use crate::router::{PairSwapAny, PairSwapSell, PairSwapSpecific, Router};

//! Fundamental domain value types used throughout the library.
//!
//! Addresses, amounts, fee multipliers, NFT ids and the priced outcome of
//! curve trades.  All types are newtypes so that a spot price cannot be
//! confused with a delta, or an NFT id with an amount.

mod address;
mod amount;
mod basis_points;
mod custody;
mod delta;
mod nft_id;
mod pool_type;
mod quote;
mod quote_asset;
mod rounding;
mod timestamp;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use custody::Custody;
pub use delta::Delta;
pub use nft_id::{NftId, NftIdSet};
pub use pool_type::PoolType;
pub use quote::{BuyQuote, SellQuote};
pub use quote_asset::QuoteAsset;
pub use rounding::Rounding;
pub use timestamp::Timestamp;

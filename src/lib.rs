//! # NFT AMM
//!
//! Automated market maker for NFT collections: every pair trades one
//! collection against one quote asset (native currency or a fungible
//! token) at a price set by a bonding curve.
//!
//! This crate provides domain types, feature-gated bonding curves, the
//! trading [`Pair`](pair::Pair), the [`PairFactory`](factory::PairFactory)
//! with its registries, a multi-pair [`Router`](router::Router) and a
//! deterministic [`Chain`](chain::Chain) that runs everything inside
//! atomic transactions:
//!
//! - **Linear** curve: price moves by a fixed step per item (`linear` feature)
//! - **Exponential** curve: price moves by a fixed ratio per item (`exponential` feature)
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `linear` | yes | Additive-step bonding curve |
//! | `exponential` | yes | Multiplicative-step bonding curve |
//! | `all-curves` | yes | Enables both curves |
//!
//! # Quick Start
//!
//! ```rust
//! use nft_amm::chain::{Caller, Chain};
//! use nft_amm::config::{FactoryConfig, PairConfig};
//! use nft_amm::curves::CurveKind;
//! use nft_amm::domain::{Amount, Address, BasisPoints, Delta, NftId, PoolType, QuoteAsset, Timestamp};
//!
//! let owner = Address::from_low_u64(1);
//! let buyer = Address::from_low_u64(2);
//!
//! // 1. A chain with a factory taking a 0.5% protocol fee
//! let factory_cfg = FactoryConfig::new(owner, BasisPoints::new(50), owner).expect("valid");
//! let mut chain = Chain::new(&factory_cfg, Timestamp::from_secs(1_000)).expect("chain");
//!
//! // 2. A collection, an allowlisted linear curve and some funds
//! let collection = chain.deploy_collection(owner).expect("collection");
//! let curve = chain.deploy_curve(owner, CurveKind::Linear).expect("curve");
//! chain.set_bonding_curve_allowed(owner, curve, true).expect("allowed");
//! for id in 1..=3u128 {
//!     chain.mint_nft(&collection, owner, NftId::new(id)).expect("minted");
//! }
//! let factory = chain.factory().address();
//! chain.set_approval_for_all(owner, &collection, factory, true).expect("approved");
//! chain.fund_native(buyer, Amount::new(1_000_000)).expect("funded");
//!
//! // 3. An NFT pool selling ids 1..=3, starting at 1000 and rising by 100
//! let config = PairConfig::new(
//!     collection,
//!     curve,
//!     PoolType::Nft,
//!     Delta::new(100),
//!     Amount::new(1_000),
//!     QuoteAsset::Native,
//! )
//! .expect("valid config")
//! .with_initial_nft_ids(vec![NftId::new(1), NftId::new(2), NftId::new(3)]);
//! let pair = chain.create_pair(Caller::new(owner), &config).expect("pair");
//!
//! // 4. Buy one NFT
//! let deadline = chain.now();
//! let paid = chain
//!     .swap_token_for_specific_nfts(
//!         Caller::new(buyer).with_value(Amount::new(10_000)),
//!         &pair,
//!         &[NftId::new(2)],
//!         Amount::new(10_000),
//!         deadline,
//!     )
//!     .expect("bought");
//!
//! assert_eq!(paid, Amount::new(1_105)); // 1100 + 0.5% protocol fee
//! assert_eq!(chain.pair(&pair).expect("pair").spot_price(), Amount::new(1_100));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Chain      │  clock, World snapshot, atomic transact()
//! └──────┬──────┘
//!        │ Transaction
//!        ▼
//! ┌─────────────┐
//! │   Router     │  multi-pair batches, WETH wrap/unwrap
//! └──────┬──────┘
//!        │ CallFrame + PairContext
//!        ▼
//! ┌─────────────┐
//! │   Factory    │  owns pairs, curve/router allowlists, protocol fee
//! └──────┬──────┘
//!        │ CurveBox (enum dispatch)
//!        ▼
//! ┌─────────────┐
//! │   Pairs      │  swaps, owner administration, custody
//! └──────┬──────┘
//!        │ Ledger
//!        ▼
//! ┌─────────────┐
//! │   Domain     │  Address, Amount, Delta, NftId, BuyQuote, …
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Address`](domain::Address), [`NftId`](domain::NftId), etc. |
//! | [`traits`] | The [`BondingCurve`](traits::BondingCurve) pricing abstraction |
//! | [`curves`] | Feature-gated curves and the [`CurveBox`](curves::CurveBox) dispatch enum |
//! | [`config`] | [`PairConfig`](config::PairConfig) and [`FactoryConfig`](config::FactoryConfig) |
//! | [`ledger`] | In-memory native balances, fungible tokens and NFT collections |
//! | [`pair`] | The trading pair and its execution context |
//! | [`factory`] | Pair deployment, allowlists, protocol settings |
//! | [`router`] | Atomic multi-pair batches |
//! | [`chain`] | Clock and transactional execution |
//! | [`events`] | Emitted records |
//! | [`math`] | Checked arithmetic and WAD fixed-point helpers |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod chain;
pub mod config;
pub mod curves;
pub mod domain;
pub mod error;
pub mod events;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pair;
pub mod prelude;
pub mod router;
pub mod traits;

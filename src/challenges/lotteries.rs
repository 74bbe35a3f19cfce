//! Lottery levels: every source of "randomness" here is either stored on
//! chain in the clear or derived from chain state any caller can read.

use super::verify_complete;
use crate::{
    artifacts,
    runner::{confirm, Ctx},
    utils::{
        ether,
        retry::{poll_until, TokioSleeper},
    },
};
use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_provider::Provider;
use alloy_sol_types::sol;
use eyre::{bail, Result};
use tracing::{debug, info};

sol! {
    #[sol(rpc)]
    interface GuessTheNumberChallenge {
        function guess(uint8 n) external payable;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface GuessTheSecretNumberChallenge {
        function guess(uint8 n) external payable;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface GuessTheRandomNumberChallenge {
        function guess(uint8 n) external payable;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface GuessTheNewNumberChallenge {
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface GuessTheNewNumberAttacker {
        function attack() external payable;
    }

    #[sol(rpc)]
    interface PredictTheFutureChallenge {
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface PredictTheFutureAttacker {
        function lockInGuess(uint8 n) external payable;
        function attack() external;
    }

    #[sol(rpc)]
    interface PredictTheBlockHashChallenge {
        function lockInGuess(bytes32 hash) external payable;
        function settle() external;
        function isComplete() external view returns (bool);
    }
}

/// The answer is hardcoded in the contract source.
pub async fn guess_the_number(ctx: &Ctx, target: Address) -> Result<()> {
    let challenge = GuessTheNumberChallenge::new(target, &ctx.provider);
    confirm(challenge.guess(42).value(ether(1)).gas(100_000).send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// `keccak256` of the secret from the guess-the-secret-number source.
const SECRET_NUMBER_HASH: B256 =
    alloy_primitives::b256!("0xdb81b4d58595fbbbb592d3661a34cdca14d7ab379441400cbfa1b78bc447c365");

/// Finds the byte whose keccak hash the contract compares guesses against.
/// The secret is a `uint8`, so 256 hashes cover the whole space.
pub fn brute_force_secret(target_hash: B256) -> Result<u8> {
    for i in 0..=u8::MAX {
        if keccak256([i]) == target_hash {
            return Ok(i);
        }
    }
    bail!("no single byte hashes to {target_hash}");
}

/// The "secret" number is only a keccak preimage of one byte.
pub async fn guess_the_secret_number(ctx: &Ctx, target: Address) -> Result<()> {
    let secret = brute_force_secret(SECRET_NUMBER_HASH)?;
    info!(secret, "brute forced the secret number");

    let challenge = GuessTheSecretNumberChallenge::new(target, &ctx.provider);
    confirm(challenge.guess(secret).value(ether(1)).send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// The "random" number sits in storage slot 0, readable by anyone.
pub async fn guess_the_random_number(ctx: &Ctx, target: Address) -> Result<()> {
    let word = ctx.provider.get_storage_at(target, U256::ZERO).await?;
    let answer = word.byte(0);
    info!(answer, "read the answer from storage slot 0");

    let challenge = GuessTheRandomNumberChallenge::new(target, &ctx.provider);
    confirm(challenge.guess(answer).value(ether(1)).send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// The number is derived from the previous blockhash and the timestamp, both
/// equally available to a contract guessing in the same block.
pub async fn guess_the_new_number(ctx: &Ctx, target: Address) -> Result<()> {
    let attacker_addr = artifacts::deploy_helper(
        &ctx.provider,
        &ctx.artifacts,
        "GuessTheNewNumberAttacker",
        target,
        U256::ZERO,
    )
    .await?;
    info!(attacker = %attacker_addr, "deployed attacker");

    let attacker = GuessTheNewNumberAttacker::new(attacker_addr, &ctx.provider);
    confirm(attacker.attack().value(ether(1)).send().await?).await?;

    let challenge = GuessTheNewNumberChallenge::new(target, &ctx.provider);
    verify_complete(challenge.isComplete().call().await?)
}

/// Lock in a guess of 0, then let the helper settle only in blocks where the
/// derived number happens to be 0 (one in ten on average).
pub async fn predict_the_future(ctx: &Ctx, target: Address) -> Result<()> {
    let attacker_addr = artifacts::deploy_helper(
        &ctx.provider,
        &ctx.artifacts,
        "PredictTheFutureAttacker",
        target,
        U256::ZERO,
    )
    .await?;
    info!(attacker = %attacker_addr, "deployed attacker");

    let attacker = PredictTheFutureAttacker::new(attacker_addr, &ctx.provider);
    confirm(attacker.lockInGuess(0).value(ether(1)).send().await?).await?;

    let challenge = PredictTheFutureChallenge::new(target, &ctx.provider);
    poll_until(ctx.poll, &TokioSleeper, || async {
        confirm(attacker.attack().gas(100_000).send().await?).await?;
        Ok(challenge.isComplete().call().await?)
    })
    .await?;

    verify_complete(challenge.isComplete().call().await?)
}

/// `block.blockhash` only covers the 256 most recent blocks and returns zero
/// beyond that: guess zero, age the guess past the window, settle.
pub async fn predict_the_blockhash(ctx: &Ctx, target: Address) -> Result<()> {
    let challenge = PredictTheBlockHashChallenge::new(target, &ctx.provider);
    confirm(challenge.lockInGuess(B256::ZERO).value(ether(1)).send().await?).await?;

    // 257 blocks: the guess block itself plus the 256-block lookback window.
    for i in 0..257u32 {
        let _: serde_json::Value =
            ctx.provider.raw_request("evm_increaseTime".into(), (1u64,)).await?;
        let _: serde_json::Value =
            ctx.provider.raw_request("evm_mine".into(), Vec::<u64>::new()).await?;
        if i % 64 == 0 {
            debug!(block = ctx.provider.get_block_number().await?, "mining past the window");
        }
    }

    confirm(challenge.settle().send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

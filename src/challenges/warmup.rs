//! Warmup levels: no vulnerability, just exercising the pipeline.

use super::verify_complete;
use crate::runner::{confirm, Ctx};
use alloy_primitives::{Address, B256};
use alloy_sol_types::sol;
use eyre::Result;
use tracing::info;

sol! {
    #[sol(rpc)]
    interface CallMeChallenge {
        function callme() external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface CaptureTheEther {
        function setNickname(bytes32 nickname) external;
    }
}

/// Call `callme()`. That's the whole level.
pub async fn call_me(ctx: &Ctx, target: Address) -> Result<()> {
    let challenge = CallMeChallenge::new(target, &ctx.provider);
    confirm(challenge.callme().send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

const NICKNAME: &str = "cmichel.io";

/// Register a nickname with the main CaptureTheEther contract.
pub async fn nickname(ctx: &Ctx, target: Address) -> Result<()> {
    let challenge = CaptureTheEther::new(target, &ctx.provider);
    let mut name = B256::ZERO;
    name[..NICKNAME.len()].copy_from_slice(NICKNAME.as_bytes());
    confirm(challenge.setNickname(name).send().await?).await?;
    // No completion flag on this one; the site checks the mapping entry.
    info!(nickname = NICKNAME, "nickname set");
    Ok(())
}

//! Account levels: everything about an account is public except the private
//! key, and sometimes the key follows from what is public.

use super::verify_complete;
use crate::{
    artifacts, ecdsa,
    runner::{confirm, Ctx},
    utils::ether,
    vanity,
};
use alloy_consensus::{TxEnvelope, TxLegacy};
use alloy_network::TransactionBuilder;
use alloy_primitives::{address, b256, Address, Bytes, Signature, B256, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolValue};
use eyre::{bail, ensure, eyre, Result};
use tracing::info;

sol! {
    #[sol(rpc)]
    interface PublicKeyChallenge {
        function authenticate(bytes publicKey) external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface AccountTakeoverChallenge {
        function authenticate() external;
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface FuzzyIdentityChallenge {
        function isComplete() external view returns (bool);
    }

    #[sol(rpc)]
    interface FuzzyIdentityAttacker {
        function attack() external;
    }
}

async fn fetch_legacy(provider: &DynProvider, hash: B256) -> Result<(TxLegacy, Signature)> {
    let tx = provider
        .get_transaction_by_hash(hash)
        .await?
        .ok_or_else(|| eyre!("transaction {hash} not found; run against a ropsten fork"))?;
    match tx.inner.inner() {
        TxEnvelope::Legacy(signed) => Ok((signed.tx().clone(), *signed.signature())),
        _ => bail!("transaction {hash} is not a legacy transaction"),
    }
}

/// The owner's only outgoing transaction on Ropsten.
const PUBLIC_KEY_TX: B256 =
    b256!("0xabc467bedd1d17462fcc7942d0af7874d6f8bdefee2b299c9168a216d3ff0edb");
const PUBLIC_KEY_OWNER: Address = address!("0x92b28647ae1f3264661f72fb2eb9625a89d88a31");

/// An address is just the hash of the public key; the key itself is
/// recoverable from any transaction the account ever signed.
pub async fn public_key(ctx: &Ctx, target: Address) -> Result<()> {
    let (tx, signature) = fetch_legacy(&ctx.provider, PUBLIC_KEY_TX).await?;
    let (public_key, recovered) = ecdsa::recover_public_key(&tx, &signature)?;
    ensure!(
        recovered == PUBLIC_KEY_OWNER,
        "recovered key belongs to {recovered}, expected {PUBLIC_KEY_OWNER}"
    );
    info!(public_key = %Bytes::from(public_key.to_vec()), "recovered the owner's public key");

    let challenge = PublicKeyChallenge::new(target, &ctx.provider);
    confirm(challenge.authenticate(Bytes::from(public_key.to_vec())).send().await?).await?;
    verify_complete(challenge.isComplete().call().await?)
}

const TAKEOVER_OWNER: Address = address!("0x6B477781b0e68031109f21887e6B5afEAaEB002b");
/// Two outgoing transactions of the challenge owner that share an `r`
/// component, i.e. the signer reused the ECDSA nonce.
const TAKEOVER_TX1: B256 =
    b256!("0xd79fc80e7b787802602f3317b7fe67765c14a7d40c3e0dcb266e63657f881396");
const TAKEOVER_TX2: B256 =
    b256!("0x061bf0b4b5fdb64ac475795e9bc5a3978f985919ce6747ce2cfbbcaccaf51009");

/// Recover the owner's private key from the reused nonce, then simply be
/// the owner.
pub async fn account_takeover(ctx: &Ctx, target: Address) -> Result<()> {
    let (tx1, sig1) = fetch_legacy(&ctx.provider, TAKEOVER_TX1).await?;
    let (tx2, sig2) = fetch_legacy(&ctx.provider, TAKEOVER_TX2).await?;

    let msg1 = ecdsa::SignedMessage::from_legacy(&tx1, &sig1);
    let msg2 = ecdsa::SignedMessage::from_legacy(&tx2, &sig2);
    ensure!(
        ecdsa::is_usable_signature(&msg1) && ecdsa::is_usable_signature(&msg2),
        "degenerate signature components"
    );

    let key = ecdsa::recover_private_key(&msg1, &msg2, TAKEOVER_OWNER)?;
    let owner = PrivateKeySigner::from_signing_key(key);
    info!(owner = %owner.address(), "recovered the owner's private key");

    // The owner account needs gas for the authenticate call.
    let tx = TransactionRequest::default().to(owner.address()).value(ether(1) / U256::from(10));
    confirm(ctx.provider.send_transaction(tx).await?).await?;

    let as_owner = ctx.provider_for(owner).await?;
    let challenge = AccountTakeoverChallenge::new(target, &as_owner);
    confirm(challenge.authenticate().send().await?).await?;

    let challenge = AccountTakeoverChallenge::new(target, &ctx.provider);
    verify_complete(challenge.isComplete().call().await?)
}

/// Brute force a key whose nonce-0 contract address contains `badc0de`,
/// fund it, and deploy a contract from it that names itself "smarx".
pub async fn fuzzy_identity(ctx: &Ctx, target: Address) -> Result<()> {
    let key = tokio::task::spawn_blocking(|| vanity::find_vanity_contract_key("badc0de", 0))
        .await??;
    let deployer = PrivateKeySigner::from_signing_key(key);
    info!(
        deployer = %deployer.address(),
        contract = %deployer.address().create(0),
        "found vanity deployer"
    );

    // Contract deployment costs gas the fresh account does not have.
    let tx = TransactionRequest::default().to(deployer.address()).value(ether(1) / U256::from(10));
    confirm(ctx.provider.send_transaction(tx).await?).await?;

    let as_deployer = ctx.provider_for(deployer.clone()).await?;
    ensure!(
        ctx.provider.get_transaction_count(deployer.address()).await? == 0,
        "vanity address only matches at nonce 0, but the account already sent transactions"
    );

    let mut initcode =
        artifacts::load_initcode(&ctx.artifacts, "FuzzyIdentityAttacker")?.to_vec();
    initcode.extend_from_slice(&target.abi_encode());
    let request = TransactionRequest::default()
        .with_deploy_code(Bytes::from(initcode))
        .nonce(0);
    let receipt = confirm(as_deployer.send_transaction(request).await?).await?;
    let attacker_addr = receipt
        .contract_address
        .ok_or_else(|| eyre!("deployment receipt is missing the contract address"))?;
    info!(attacker = %attacker_addr, "deployed attacker from the vanity account");

    let attacker = FuzzyIdentityAttacker::new(attacker_addr, &ctx.provider);
    confirm(attacker.attack().send().await?).await?;

    let challenge = FuzzyIdentityChallenge::new(target, &ctx.provider);
    verify_complete(challenge.isComplete().call().await?)
}

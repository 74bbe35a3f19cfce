//! Minimal forge artifact reader.
//!
//! The attacker helper contracts in `contracts/` are compiled externally
//! (`forge build`); at run time only the creation bytecode is needed, so the
//! reader deserialises just that field of the artifact JSON.

use alloy_network::TransactionBuilder;
use alloy_primitives::{hex, Address, Bytes, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolValue;
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Artifact {
    bytecode: ArtifactBytecode,
}

#[derive(Debug, Deserialize)]
struct ArtifactBytecode {
    object: String,
}

/// Loads the creation bytecode for `name` from
/// `<dir>/<name>.sol/<name>.json`.
pub fn load_initcode(dir: &Path, name: &str) -> Result<Bytes> {
    let path = dir.join(format!("{name}.sol")).join(format!("{name}.json"));
    let raw = std::fs::read_to_string(&path).wrap_err_with(|| {
        format!("missing artifact {}; run `forge build` in contracts/", path.display())
    })?;
    let artifact: Artifact =
        serde_json::from_str(&raw).wrap_err_with(|| format!("malformed artifact {name}"))?;
    let code = hex::decode(&artifact.bytecode.object)
        .wrap_err_with(|| format!("artifact {name} bytecode is not hex"))?;
    Ok(code.into())
}

/// Deploys `initcode` (constructor arguments already appended) with `value`
/// attached, waits for the receipt and returns the new contract's address.
pub async fn deploy(provider: &DynProvider, initcode: Bytes, value: U256) -> Result<Address> {
    let tx = TransactionRequest::default().with_deploy_code(initcode).value(value);
    let receipt = provider.send_transaction(tx).await?.get_receipt().await?;
    eyre::ensure!(receipt.status(), "deployment transaction {} reverted", receipt.transaction_hash);
    receipt
        .contract_address
        .ok_or_else(|| eyre!("deployment receipt is missing the contract address"))
}

/// Loads `name`'s artifact, appends the ABI-encoded single-address
/// constructor argument the helpers take, and deploys.
pub async fn deploy_helper(
    provider: &DynProvider,
    dir: &Path,
    name: &str,
    target: Address,
    value: U256,
) -> Result<Address> {
    let mut initcode = load_initcode(dir, name)?.to_vec();
    initcode.extend_from_slice(&target.abi_encode());
    deploy(provider, initcode.into(), value).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::fs;

    #[test]
    fn reads_forge_artifact_layout() {
        let dir = tempdir();
        let contract_dir = dir.join("RetirementFundAttacker.sol");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::write(
            contract_dir.join("RetirementFundAttacker.json"),
            r#"{"abi":[],"bytecode":{"object":"0x6080604052"}}"#,
        )
        .unwrap();

        let code = load_initcode(&dir, "RetirementFundAttacker").unwrap();
        assert_eq!(code, Bytes::from(hex::decode("6080604052").unwrap()));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_artifact_mentions_forge_build() {
        let err = load_initcode(Path::new("/nonexistent"), "TokenBankAttacker").unwrap_err();
        assert!(format!("{err:#}").contains("forge build"));
    }

    #[test]
    fn constructor_argument_is_left_padded() {
        let target = address!("0x16d20B998E593eaFffB676f9F5923B1E2173234B");
        let encoded = target.abi_encode();
        assert_eq!(encoded.len(), 32);
        assert!(encoded[..12].iter().all(|b| *b == 0));
        assert_eq!(&encoded[12..], target.as_slice());
    }

    fn tempdir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("cte-artifacts-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}

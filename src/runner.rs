//! One-time setup shared by every challenge: provider construction, signer
//! wiring and receipt confirmation.
//!
//! The original scripts kept the contract handle, signer and pending
//! transaction in module globals; here everything a procedure needs is
//! threaded through an explicit [`Ctx`].

use crate::{opts::Opts, utils::fmt::etherscan_tx_url, utils::retry::PollOptions};
use alloy_network::{Ethereum, EthereumWallet};
use alloy_primitives::Address;
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionReceipt;
use alloy_signer_local::PrivateKeySigner;
use eyre::{ensure, eyre, Result, WrapErr};
use std::{path::PathBuf, time::Duration};
use tracing::info;

/// Everything a challenge procedure needs: a wallet-filled provider, the
/// signers behind it and the run configuration.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub provider: DynProvider,
    pub signer: PrivateKeySigner,
    pub accomplice: Option<PrivateKeySigner>,
    pub artifacts: PathBuf,
    pub poll: PollOptions,
    rpc_url: String,
}

impl Ctx {
    /// Connects to the RPC endpoint and prepares the signers.
    pub async fn connect(opts: &Opts) -> Result<Self> {
        let signer: PrivateKeySigner =
            opts.private_key.parse().wrap_err("invalid --private-key")?;
        let accomplice = opts
            .accomplice_key
            .as_deref()
            .map(|key| key.parse::<PrivateKeySigner>())
            .transpose()
            .wrap_err("invalid --accomplice-key")?;

        let mut wallet = EthereumWallet::from(signer.clone());
        if let Some(accomplice) = &accomplice {
            wallet.register_signer(accomplice.clone());
        }

        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect(&opts.rpc_url)
            .await
            .wrap_err_with(|| format!("failed to connect to {}", opts.rpc_url))?
            .erased();

        info!(rpc_url = %opts.rpc_url, sender = %signer.address(), "connected");

        Ok(Self {
            provider,
            signer,
            accomplice,
            artifacts: opts.artifacts.clone(),
            poll: PollOptions {
                attempts: opts.poll_attempts,
                delay: Duration::from_millis(opts.poll_delay_ms),
            },
            rpc_url: opts.rpc_url.clone(),
        })
    }

    /// The address paying for and signing the exploit transactions.
    pub fn sender(&self) -> Address {
        self.signer.address()
    }

    /// The second funded signer, where a challenge needs one.
    pub fn accomplice(&self) -> Result<&PrivateKeySigner> {
        self.accomplice
            .as_ref()
            .ok_or_else(|| eyre!("this challenge needs a second account; pass --accomplice-key"))
    }

    /// Connects a fresh wallet-filled provider for a signer obtained at run
    /// time (a recovered or brute-forced key).
    pub async fn provider_for(&self, signer: PrivateKeySigner) -> Result<DynProvider> {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(&self.rpc_url)
            .await
            .wrap_err_with(|| format!("failed to connect to {}", self.rpc_url))?
            .erased();
        Ok(provider)
    }
}

/// Waits for a submitted transaction's receipt and fails on revert.
///
/// Challenges chain state-dependent transactions, so every send goes through
/// here before the next one is issued.
pub async fn confirm(pending: PendingTransactionBuilder<Ethereum>) -> Result<TransactionReceipt> {
    let receipt = pending.get_receipt().await?;
    ensure!(receipt.status(), "transaction {} reverted", receipt.transaction_hash);
    info!(tx = %etherscan_tx_url(receipt.transaction_hash), "confirmed");
    Ok(receipt)
}

use crate::challenges::Challenge;
use alloy_primitives::Address;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for `cte`.
#[derive(Clone, Debug, Parser)]
#[command(name = "cte", about = "Capture the Ether challenge solver", version)]
pub struct Opts {
    /// The challenge to solve.
    #[arg(value_enum)]
    pub challenge: Challenge,

    /// The RPC endpoint.
    #[arg(
        short = 'r',
        long = "rpc-url",
        env = "ETH_RPC_URL",
        value_name = "URL",
        default_value = "http://localhost:8545"
    )]
    pub rpc_url: String,

    /// The private key used to sign the exploit transactions.
    #[arg(long, env = "PRIVATE_KEY", value_name = "RAW_PRIVATE_KEY")]
    pub private_key: String,

    /// A second funded private key. Only token-whale needs one.
    #[arg(long, env = "ACCOMPLICE_KEY", value_name = "RAW_PRIVATE_KEY")]
    pub accomplice_key: Option<String>,

    /// Address of the challenge instance.
    ///
    /// Challenge instances are deployed per player; this defaults to the
    /// instance the suite was originally solved against.
    #[arg(long, value_name = "ADDRESS")]
    pub target: Option<Address>,

    /// Directory containing the forge build artifacts for the attacker
    /// contracts in `contracts/`.
    #[arg(long, value_name = "PATH", default_value = "out")]
    pub artifacts: PathBuf,

    /// Maximum number of attempts for challenges that poll until success.
    #[arg(long, value_name = "COUNT", default_value_t = 600)]
    pub poll_attempts: usize,

    /// Delay between poll attempts, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 10_000)]
    pub poll_delay_ms: u64,
}

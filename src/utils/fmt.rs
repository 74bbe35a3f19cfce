use alloy_primitives::TxHash;

/// Returns the block explorer link for a transaction on Ropsten, where the
/// challenge instances live.
pub fn etherscan_tx_url(tx_hash: TxHash) -> String {
    format!("https://ropsten.etherscan.io/tx/{tx_hash}")
}

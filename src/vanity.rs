//! Vanity contract-address brute force.
//!
//! The fuzzy-identity challenge authenticates any caller whose address
//! contains `badc0de`, so the search derives fresh keys until the contract
//! address they would deploy to at a fixed nonce contains the needle.
//! Expected runtime is probabilistic (a 7-nibble needle over 34 possible
//! positions is a few million keccak evaluations) and there is no upper
//! bound by construction.

use alloy_primitives::{hex, Address};
use alloy_signer::{k256::ecdsa::SigningKey, utils::secret_key_to_address};
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use eyre::{ensure, Result, WrapErr};
use rayon::iter::{self, ParallelIterator};

/// A generated signing key and the account address it controls.
pub type GeneratedWallet = (SigningKey, Address);

/// Whether the contract `deployer` would create at `nonce` contains `needle`.
pub fn contract_address_matches(deployer: Address, nonce: u64, needle: &str) -> bool {
    hex::encode(deployer.create(nonce)).contains(needle)
}

fn generate_wallet() -> GeneratedWallet {
    let key = SigningKey::random(&mut rand::thread_rng());
    let address = secret_key_to_address(&key);
    (key, address)
}

/// Generates random wallets in parallel until one's nonce-`nonce` contract
/// address contains `needle`.
///
/// `needle` must be lowercase hex; anything else can never match and is
/// rejected up front rather than spinning forever.
pub fn find_vanity_contract_key(needle: &str, nonce: u64) -> Result<SigningKey> {
    ensure!(
        !needle.is_empty() && needle.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')),
        "needle must be non-empty lowercase hex, got {needle:?}"
    );
    let (key, _) = iter::repeat(())
        .map(|()| generate_wallet())
        .find_any(|(_, address)| contract_address_matches(*address, nonce, needle))
        .expect("repeat iterator is infinite");
    Ok(key)
}

/// Derives the wallet at `m/44'/60'/0'/0/{index}` of a BIP-39 mnemonic.
///
/// Deterministic counterpart to the random search: walking indices of a
/// fixed mnemonic gives a reproducible scan order, at the cost of a few
/// extra hashes per candidate.
pub fn derive_mnemonic_key(phrase: &str, index: u32) -> Result<PrivateKeySigner> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .index(index)
        .wrap_err("derivation index out of range")?
        .build()
        .wrap_err("invalid mnemonic phrase")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    // The key the original fuzzy-identity run found after ~7 million
    // candidates, kept as a regression fixture for the address math.
    const FOUND_KEY: &str = "0x1318d64ef03445df72658516e50f1981cb0474b7a29bb019e3add89a86a40beb";

    #[test]
    fn found_key_addresses_are_reproduced() {
        let signer: PrivateKeySigner = FOUND_KEY.parse().unwrap();
        assert_eq!(signer.address(), address!("0x53f2A7A12Da3c5551dDAEc1b86e28a4B777a75e4"));
        assert_eq!(
            signer.address().create(0),
            address!("0xfBFe5821F56e42602f7baDC0dEbE123dfFd097Da")
        );
        assert!(contract_address_matches(signer.address(), 0, "badc0de"));
        assert!(!contract_address_matches(signer.address(), 1, "badc0de"));
    }

    #[test]
    fn mnemonic_derivation_matches_known_vectors() {
        let phrase = "test test test test test test test test test test test junk";
        let wallet = derive_mnemonic_key(phrase, 0).unwrap();
        assert_eq!(wallet.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        let wallet = derive_mnemonic_key(phrase, 1).unwrap();
        assert_eq!(wallet.address(), address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));
    }

    #[test]
    fn rejects_unmatchable_needles() {
        assert!(find_vanity_contract_key("BADC0DE", 0).is_err());
        assert!(find_vanity_contract_key("", 0).is_err());
        assert!(find_vanity_contract_key("0xbad", 0).is_err());
    }

    #[test]
    fn finds_single_nibble_needle_quickly() {
        let key = find_vanity_contract_key("a", 0).unwrap();
        let address = secret_key_to_address(&key);
        assert!(contract_address_matches(address, 0, "a"));
    }
}

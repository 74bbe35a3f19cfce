//! Solidity storage layout arithmetic.
//!
//! Scalars occupy sequential slots in declaration order. A dynamic array
//! declared at slot `p` keeps its length in `p` and its data starting at
//! `keccak256(p)`; a mapping stores the element for key `k` at
//! `keccak256(k ‖ p)`. Element addressing wraps modulo 2^256, which is what
//! makes the mapping challenge's out-of-bounds write possible.

use alloy_primitives::{keccak256, B256, U256};

/// Storage slot of the element for `key` in a mapping declared at `slot`.
pub fn mapping_slot(key: B256, slot: U256) -> U256 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(key.as_slice());
    data[32..].copy_from_slice(&slot.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(data).0)
}

/// First data slot of a dynamic array declared at `slot`.
pub fn array_data_slot(slot: U256) -> U256 {
    U256::from_be_bytes(keccak256(slot.to_be_bytes::<32>()).0)
}

/// Array index whose element address wraps around to the absolute storage
/// slot `target`.
///
/// Element `i` of an array declared at `slot` lives at
/// `keccak256(slot) + i mod 2^256`, so `i = target - keccak256(slot)` with
/// wrapping subtraction reaches any slot in the contract, bounds checks
/// permitting.
pub fn wrapping_index_to(slot: U256, target: U256) -> U256 {
    target.wrapping_sub(array_data_slot(slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn array_data_slots_match_known_hashes() {
        // keccak256(bytes32(0)) and keccak256(bytes32(1)), the data regions of
        // the fifty-years queue and the mapping challenge's map.
        assert_eq!(
            array_data_slot(U256::ZERO),
            U256::from_be_bytes(
                b256!("0x290decd9548b62a8d60345a988386fc84ba6bc95484008f6362f93160ef3e563").0
            )
        );
        assert_eq!(
            array_data_slot(U256::from(1)),
            U256::from_be_bytes(
                b256!("0xb10e2d527612073b26eecdfd717e6a320cf44b4afac2b0732d9fcbe2b7fa0cf6").0
            )
        );
    }

    #[test]
    fn mapping_slot_hashes_key_then_slot() {
        // keccak256 of 64 zero bytes: element 0x00..00 of a mapping at slot 0.
        assert_eq!(
            mapping_slot(B256::ZERO, U256::ZERO),
            U256::from_be_bytes(
                b256!("0xad3228b676f7d3cd4284a5443f17f1962b36e491b30a40b2405849e597ba5fb5").0
            )
        );
    }

    #[test]
    fn wrapping_index_cancels_data_offset() {
        let index = wrapping_index_to(U256::from(1), U256::ZERO);
        assert_eq!(index.wrapping_add(array_data_slot(U256::from(1))), U256::ZERO);

        // Non-zero targets land exactly on the requested slot.
        let index = wrapping_index_to(U256::from(7), U256::from(42));
        assert_eq!(index.wrapping_add(array_data_slot(U256::from(7))), U256::from(42));
    }
}

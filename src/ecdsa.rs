//! Off-chain ECDSA work: private key recovery from a reused signature nonce
//! and public key recovery from a transaction signature.

use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{keccak256, Address, Signature, B256};
use alloy_signer::utils::secret_key_to_address;
use eyre::{bail, ensure, Result, WrapErr};
use k256::{
    ecdsa::SigningKey,
    elliptic_curve::{ops::Reduce, sec1::ToEncodedPoint, Field},
    FieldBytes, Scalar,
};

/// One observed ECDSA signature over a known message hash, with the
/// components as scalars mod the curve order.
#[derive(Clone, Copy, Debug)]
pub struct SignedMessage {
    pub msg_hash: B256,
    pub r: B256,
    pub s: B256,
}

impl SignedMessage {
    /// Extracts the signed payload hash and signature components from a
    /// signed EIP-155 legacy transaction.
    pub fn from_legacy(tx: &TxLegacy, signature: &Signature) -> Self {
        Self {
            msg_hash: tx.signature_hash(),
            r: B256::from(signature.r()),
            s: B256::from(signature.s()),
        }
    }
}

fn scalar_from_be(bytes: &B256) -> Scalar {
    let bytes = FieldBytes::from(bytes.0);
    <Scalar as Reduce<k256::U256>>::reduce_bytes(&bytes)
}

/// Recovers a private key from two signatures by the same signer that reused
/// the per-signature nonce, observable as a shared `r` component.
///
/// With nonce `k` and key `d`: `s_i * k = m_i + r * d (mod n)`, so
/// `k = (m1 - m2) * (s1 - s2)^-1` and `d = (s1 * k - m1) * r^-1`, all mod the
/// curve order; subtraction wraps and division is the modular inverse.
///
/// Broadcast signatures are low-s normalised, which loses the algebraic sign
/// of each `s`. Every `±s1`/`±s2` combination is derived and the candidate
/// that re-derives `signer`'s address wins; trusting any single convention
/// here breaks depending on the signing backend.
pub fn recover_private_key(
    sig1: &SignedMessage,
    sig2: &SignedMessage,
    signer: Address,
) -> Result<SigningKey> {
    ensure!(sig1.r == sig2.r, "signatures do not share a nonce: r components differ");

    let r = scalar_from_be(&sig1.r);
    let m1 = scalar_from_be(&sig1.msg_hash);
    let m2 = scalar_from_be(&sig2.msg_hash);
    let s1 = scalar_from_be(&sig1.s);
    let s2 = scalar_from_be(&sig2.s);

    for s1 in [s1, -s1] {
        for s2 in [s2, -s2] {
            let Some(key) = derive_candidate(r, m1, s1, m2, s2) else { continue };
            if secret_key_to_address(&key) == signer {
                return Ok(key);
            }
        }
    }
    bail!("no candidate key re-derives the signer address {signer}");
}

fn derive_candidate(r: Scalar, m1: Scalar, s1: Scalar, m2: Scalar, s2: Scalar) -> Option<SigningKey> {
    let denom = s1 - s2;
    let denom_inv = Option::<Scalar>::from(denom.invert())?;
    let r_inv = Option::<Scalar>::from(r.invert())?;
    let k = (m1 - m2) * denom_inv;
    let d = (s1 * k - m1) * r_inv;
    SigningKey::from_bytes(&d.to_bytes()).ok()
}

/// Recovers the public key that signed an EIP-155 legacy transaction, i.e.
/// the key whose keccak hash is the sender address.
///
/// The signed payload is `rlp([nonce, gasPrice, gasLimit, to, value, data,
/// chainId, 0, 0])`; its keccak hash plus the signature components yield the
/// verifying key. Returned with the uncompressed-point `0x04` type prefix
/// stripped, which is the form `ecrecover`-style authentication expects.
pub fn recover_public_key(tx: &TxLegacy, signature: &Signature) -> Result<([u8; 64], Address)> {
    let prehash = tx.signature_hash();
    let verifying_key = signature
        .recover_from_prehash(&prehash)
        .wrap_err("signature does not recover to a public key")?;
    let point = verifying_key.to_encoded_point(false);
    let mut public_key = [0u8; 64];
    public_key.copy_from_slice(&point.as_bytes()[1..]);
    let address = Address::from_slice(&keccak256(public_key)[12..]);
    Ok((public_key, address))
}

/// Rejects the all-zero scalar edge cases before they reach the arithmetic.
pub fn is_usable_signature(sig: &SignedMessage) -> bool {
    !bool::from(scalar_from_be(&sig.r).is_zero()) && !bool::from(scalar_from_be(&sig.s).is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, Bytes, TxKind, U256};
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use k256::ProjectivePoint;

    /// Textbook ECDSA signing with a caller-chosen nonce, so nonce reuse can
    /// be staged deterministically.
    fn sign_with_nonce(d: Scalar, k: Scalar, msg_hash: B256) -> SignedMessage {
        let point = (ProjectivePoint::GENERATOR * k).to_affine();
        let encoded = point.to_encoded_point(false);
        let r = scalar_from_be(&B256::from_slice(encoded.x().unwrap()));
        let m = scalar_from_be(&msg_hash);
        let s = Option::<Scalar>::from(k.invert()).unwrap() * (m + r * d);
        SignedMessage {
            msg_hash,
            r: B256::from_slice(&r.to_bytes()),
            s: B256::from_slice(&s.to_bytes()),
        }
    }

    #[test]
    fn recovers_key_from_reused_nonce() {
        let key = SigningKey::from_bytes(
            &FieldBytes::from(
                b256!("0x4646464646464646464646464646464646464646464646464646464646464646").0,
            ),
        )
        .unwrap();
        let d = scalar_from_be(&B256::from_slice(&key.to_bytes()));
        let k = scalar_from_be(&b256!(
            "0x0000000000000000000000000000000000000000000000000000000000aabbcc"
        ));
        let signer = secret_key_to_address(&key);

        let m1 = keccak256(b"first message");
        let m2 = keccak256(b"second message");
        let sig1 = sign_with_nonce(d, k, m1);
        let sig2 = sign_with_nonce(d, k, m2);
        assert_eq!(sig1.r, sig2.r);
        assert!(is_usable_signature(&sig1));

        let recovered = recover_private_key(&sig1, &sig2, signer).unwrap();
        assert_eq!(recovered.to_bytes(), key.to_bytes());
    }

    #[test]
    fn rejects_signatures_with_distinct_nonces() {
        let key = SigningKey::from_bytes(
            &FieldBytes::from(
                b256!("0x4646464646464646464646464646464646464646464646464646464646464646").0,
            ),
        )
        .unwrap();
        let d = scalar_from_be(&B256::from_slice(&key.to_bytes()));
        let signer = secret_key_to_address(&key);

        let k1 = scalar_from_be(&b256!(
            "0x0000000000000000000000000000000000000000000000000000000000aabbcc"
        ));
        let k2 = scalar_from_be(&b256!(
            "0x0000000000000000000000000000000000000000000000000000000000aabbcd"
        ));
        let sig1 = sign_with_nonce(d, k1, keccak256(b"first message"));
        let sig2 = sign_with_nonce(d, k2, keccak256(b"second message"));

        let err = recover_private_key(&sig1, &sig2, signer).unwrap_err();
        assert!(err.to_string().contains("do not share a nonce"));
    }

    #[test]
    fn recovered_account_takeover_key_matches_owner() {
        // Key recovered from the challenge owner's nonce-reusing transactions.
        let signer: PrivateKeySigner =
            "0x614f5e36cd55ddab0947d1723693fef5456e5bee24738ba90bd33c0c6e68e269"
                .parse()
                .unwrap();
        assert_eq!(signer.address(), address!("0x6B477781b0e68031109f21887e6B5afEAaEB002b"));
    }

    #[test]
    fn public_key_recovery_round_trips_a_signed_legacy_tx() {
        let signer = PrivateKeySigner::random();
        let tx = TxLegacy {
            chain_id: Some(3),
            nonce: 0,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(address!("0x3535353535353535353535353535353535353535")),
            value: U256::from(10u64).pow(U256::from(18u64)),
            input: Bytes::new(),
        };
        let signature = signer.sign_hash_sync(&tx.signature_hash()).unwrap();

        let (public_key, address) = recover_public_key(&tx, &signature).unwrap();
        assert_eq!(address, signer.address());
        // Address is the low 20 bytes of the key's keccak hash.
        assert_eq!(address.as_slice(), &keccak256(public_key)[12..]);
    }
}

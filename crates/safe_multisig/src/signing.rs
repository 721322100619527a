//! EIP-712 signing of Safe transactions and threshold signature aggregation.

use alloy_primitives::{b256, keccak256, Address, Bytes, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolStruct, SolValue};

use crate::{error::SafeError, transaction_data::SafeTransactionData};

sol! {
    struct SafeTx {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 safeTxGas;
        uint256 baseGas;
        uint256 gasPrice;
        address gasToken;
        address refundReceiver;
        uint256 nonce;
    }
}

/// keccak256 of the canonical `SafeTx(...)` type string.
pub const SAFE_TX_TYPEHASH: B256 =
    b256!("bb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8");

/// keccak256("EIP712Domain(address verifyingContract)"), the minimal
/// pre-v1.3.0 Safe domain. Used when `domainSeparator()` cannot be read.
pub const DOMAIN_TYPEHASH_MINIMAL: B256 =
    b256!("035aff83d86937d35b32e04f0ddc6ff469290eef2f1b692d8a815c89404d4749");

/// Marker the Safe uses to recognize an eth_sign-style signature entry.
const ETH_SIGN_V_OFFSET: u8 = 4;

/// One signer's attestation over a Safe transaction: exactly 65 bytes,
/// r(32) || s(32) || v(1).
#[derive(Debug, Clone)]
pub struct SafeSignature {
    pub signer: Address,
    pub bytes: [u8; 65],
}

/// Computes the typed-data digest the co-signers attest to:
/// `keccak256(0x19 || 0x01 || domain_separator || struct_hash)`.
pub fn transaction_digest(tx: &SafeTransactionData, domain_separator: B256) -> B256 {
    let safe_tx = SafeTx {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: tx.operation,
        safeTxGas: tx.safe_tx_gas,
        baseGas: tx.base_gas,
        gasPrice: tx.gas_price,
        gasToken: tx.gas_token,
        refundReceiver: tx.refund_receiver,
        nonce: tx.nonce,
    };
    let struct_hash = safe_tx.eip712_hash_struct();

    let mut preimage = Vec::with_capacity(66);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(domain_separator.as_slice());
    preimage.extend_from_slice(struct_hash.as_slice());
    keccak256(&preimage)
}

/// Derives a domain separator for Safes whose `domainSeparator()` view is
/// unreachable, from the verifying-contract address alone.
pub fn fallback_domain_separator(safe: Address) -> B256 {
    keccak256((DOMAIN_TYPEHASH_MINIMAL, safe).abi_encode())
}

/// Signs `tx` with one co-signer's key, encoding the recovery byte with the
/// Safe's +4 eth_sign offset.
pub async fn sign_transaction(
    signer: &PrivateKeySigner,
    tx: &SafeTransactionData,
    domain_separator: B256,
) -> Result<SafeSignature, SafeError> {
    let digest = transaction_digest(tx, domain_separator);
    let signature = signer
        .sign_hash(&digest)
        .await
        .map_err(|source| SafeError::Signing {
            signer: signer.address(),
            source,
        })?;

    // 27/28 "Electrum" notation, then +4 to mark the eth_sign scheme.
    let mut bytes = signature.as_bytes();
    bytes[64] += ETH_SIGN_V_OFFSET;

    Ok(SafeSignature {
        signer: signer.address(),
        bytes,
    })
}

/// Concatenates signatures sorted by signer address ascending.
///
/// The Safe verifies owners in address order; an unsorted blob fails
/// verification regardless of how valid the individual signatures are.
pub fn aggregate_signatures(mut signatures: Vec<SafeSignature>) -> Bytes {
    signatures.sort_by(|a, b| a.signer.cmp(&b.signer));

    let mut blob = Vec::with_capacity(signatures.len() * 65);
    for signature in &signatures {
        blob.extend_from_slice(&signature.bytes);
    }
    blob.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use std::str::FromStr;

    const KEY_0: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_1: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn sample_tx() -> SafeTransactionData {
        SafeTransactionData::call(
            Address::repeat_byte(0x11),
            U256::ZERO,
            Bytes::from_static(&[0x84, 0x56, 0xcb, 0x59]),
            U256::from(7),
        )
    }

    #[test]
    fn safe_tx_typehash_matches_canonical_type_string() {
        let computed = keccak256(SafeTx::eip712_encode_type().as_bytes());
        assert_eq!(computed, SAFE_TX_TYPEHASH);
    }

    #[test]
    fn minimal_domain_typehash_matches_type_string() {
        let computed = keccak256("EIP712Domain(address verifyingContract)");
        assert_eq!(computed, DOMAIN_TYPEHASH_MINIMAL);
    }

    #[test]
    fn digest_is_deterministic_and_nonce_sensitive() {
        let domain = fallback_domain_separator(Address::repeat_byte(0xaa));
        let tx = sample_tx();

        assert_eq!(
            transaction_digest(&tx, domain),
            transaction_digest(&tx, domain)
        );

        let mut stale = tx.clone();
        stale.nonce = U256::from(8);
        assert_ne!(transaction_digest(&tx, domain), transaction_digest(&stale, domain));
    }

    #[tokio::test]
    async fn signature_is_65_bytes_with_eth_sign_marker() {
        let signer = PrivateKeySigner::from_str(KEY_0).unwrap();
        let domain = fallback_domain_separator(Address::repeat_byte(0xaa));

        let signature = sign_transaction(&signer, &sample_tx(), domain)
            .await
            .unwrap();

        assert_eq!(signature.signer, signer.address());
        // v must be 27/28 shifted by the eth_sign offset.
        assert!(signature.bytes[64] == 31 || signature.bytes[64] == 32);
    }

    #[tokio::test]
    async fn aggregation_is_input_order_independent() {
        let signer_a = PrivateKeySigner::from_str(KEY_0).unwrap();
        let signer_b = PrivateKeySigner::from_str(KEY_1).unwrap();
        let domain = fallback_domain_separator(Address::repeat_byte(0xaa));
        let tx = sample_tx();

        let sig_a = sign_transaction(&signer_a, &tx, domain).await.unwrap();
        let sig_b = sign_transaction(&signer_b, &tx, domain).await.unwrap();

        let forward = aggregate_signatures(vec![sig_a.clone(), sig_b.clone()]);
        let reversed = aggregate_signatures(vec![sig_b, sig_a]);

        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 130);
    }
}

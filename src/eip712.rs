//! EIP-712 domains and digests.
//!
//! Every Avocado account is its own verifying contract: the domain binds the
//! account address plus a salt derived from the chain id. Chain-agnostic
//! casts swap the real chain id for a fixed cross-chain id in the domain —
//! the real chain id travels inside each signed entry instead — so one
//! domain validates intents for many chains.

use crate::{
    constants::{CHAIN_AGNOSTIC_CHAIN_ID, DOMAIN_SEPARATOR_NAME, DOMAIN_SEPARATOR_VERSION},
    types::{
        AvocadoContractSignature, Cast, CastAuthorized, CastAuthorizedParams, CastChainAgnostic,
        CastChainAgnosticParams, CastForwardParams, CastParams, ChainAgnosticHash,
    },
};
use alloy::{
    primitives::{Address, B256, U256, keccak256},
    sol_types::{Eip712Domain, SolStruct},
};

/// The EIP-712 domain of an account on a concrete chain.
pub fn domain(chain_id: u64, account: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(DOMAIN_SEPARATOR_NAME.into()),
        Some(DOMAIN_SEPARATOR_VERSION.into()),
        Some(U256::from(chain_id)),
        Some(account),
        Some(chain_id_salt(chain_id)),
    )
}

/// The EIP-712 domain of an account for chain-agnostic casts.
pub fn chain_agnostic_domain(account: Address) -> Eip712Domain {
    domain(CHAIN_AGNOSTIC_CHAIN_ID, account)
}

/// Salt binding a chain id into the domain.
fn chain_id_salt(chain_id: u64) -> B256 {
    keccak256(U256::from(chain_id).to_be_bytes::<32>())
}

/// The digest signers of a forwarded cast sign.
pub fn cast_digest(
    chain_id: u64,
    account: Address,
    params: &CastParams,
    forward_params: &CastForwardParams,
) -> B256 {
    Cast { params: params.clone(), forwardParams: forward_params.clone() }
        .eip712_signing_hash(&domain(chain_id, account))
}

/// The digest signers of an authorized cast sign.
pub fn cast_authorized_digest(
    chain_id: u64,
    account: Address,
    params: &CastParams,
    authorized_params: &CastAuthorizedParams,
) -> B256 {
    CastAuthorized { params: params.clone(), authorizedParams: authorized_params.clone() }
        .eip712_signing_hash(&domain(chain_id, account))
}

/// The EIP-712 struct hash of one per-chain entry of a chain-agnostic cast.
pub fn chain_agnostic_entry_hash(entry: &CastChainAgnosticParams) -> B256 {
    entry.eip712_hash_struct()
}

/// The digest signers of a chain-agnostic cast sign, from full entries.
/// This is the signing side; verifiers use
/// [`chain_agnostic_digest_from_hashes`] and never need the other chains'
/// payloads.
pub fn chain_agnostic_digest(account: Address, entries: &[CastChainAgnosticParams]) -> B256 {
    CastChainAgnostic { params: entries.to_vec() }
        .eip712_signing_hash(&chain_agnostic_domain(account))
}

/// Recomputes the chain-agnostic digest from per-entry struct hashes only.
///
/// EIP-712 hashes an array of structs as the keccak of the concatenated
/// struct hashes, so the digest over full entries and the digest over their
/// hashes are the same value by construction.
pub fn chain_agnostic_digest_from_hashes(account: Address, hashes: &[ChainAgnosticHash]) -> B256 {
    let mut encoded = Vec::with_capacity(32 * hashes.len());
    for entry in hashes {
        encoded.extend_from_slice(entry.hash.as_slice());
    }

    let type_hash = keccak256(CastChainAgnostic::eip712_encode_type().as_bytes());
    let mut struct_encoded = Vec::with_capacity(64);
    struct_encoded.extend_from_slice(type_hash.as_slice());
    struct_encoded.extend_from_slice(keccak256(&encoded).as_slice());
    let struct_hash = keccak256(&struct_encoded);

    signing_hash(&chain_agnostic_domain(account), struct_hash)
}

/// The nested typed-data envelope presented to ERC-1271 contract signers
/// instead of the raw cast digest.
pub fn contract_signature_digest(domain: &Eip712Domain, digest: B256) -> B256 {
    AvocadoContractSignature { digest }.eip712_signing_hash(domain)
}

/// `keccak256("\x19\x01" ‖ domainSeparator ‖ structHash)`.
fn signing_hash(domain: &Eip712Domain, struct_hash: B256) -> B256 {
    let mut buf = Vec::with_capacity(66);
    buf.extend_from_slice(&[0x19, 0x01]);
    buf.extend_from_slice(domain.hash_struct().as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    keccak256(&buf)
}

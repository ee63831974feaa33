//! Cast verification: timing, digests, threshold signatures and nonces.
//!
//! Everything here is read-only; a cast that verifies cleanly is then
//! dispatched by the account pipeline, which claims the nonce and executes.

use crate::{
    account::{NonceTracker, SignerSet},
    chain::Chain,
    eip712,
    error::CastError,
    signers::SignatureValidator,
    types::{
        CastAuthorizedParams, CastChainAgnosticParams, CastForwardParams, CastParams,
        ChainAgnosticHash, SignatureParams,
    },
};
use alloy::{
    primitives::{Address, B256, U256},
    sol_types::Eip712Domain,
};

/// Verifies a forwarded cast and returns the digest its signatures cover.
pub fn verify_cast(
    chain: &Chain,
    account: Address,
    signers: &SignerSet,
    nonce: &NonceTracker,
    params: &CastParams,
    forward_params: &CastForwardParams,
    signatures: &[SignatureParams],
) -> Result<B256, CastError> {
    check_timing(chain.timestamp(), forward_params.validAfter, forward_params.validUntil)?;
    params.validate_id()?;

    let domain = eip712::domain(chain.chain_id(), account);
    let digest = eip712::cast_digest(chain.chain_id(), account, params, forward_params);
    verify_signatures(chain, &domain, signers, digest, signatures)?;
    check_nonce(params, nonce, digest)?;
    Ok(digest)
}

/// Verifies an authorized cast and returns the digest its signatures cover.
pub fn verify_cast_authorized(
    chain: &Chain,
    account: Address,
    signers: &SignerSet,
    nonce: &NonceTracker,
    params: &CastParams,
    authorized_params: &CastAuthorizedParams,
    signatures: &[SignatureParams],
) -> Result<B256, CastError> {
    check_timing(chain.timestamp(), authorized_params.validAfter, authorized_params.validUntil)?;
    params.validate_id()?;

    let domain = eip712::domain(chain.chain_id(), account);
    let digest =
        eip712::cast_authorized_digest(chain.chain_id(), account, params, authorized_params);
    verify_signatures(chain, &domain, signers, digest, signatures)?;
    check_nonce(params, nonce, digest)?;
    Ok(digest)
}

/// Verifies this chain's entry of a chain-agnostic cast and returns the
/// digest its signatures cover.
///
/// The digest is recomputed from the caller-supplied per-chain entry hashes;
/// the entry for the current chain must hash to a member of that list, so an
/// entry can never execute on a chain the signer did not cover.
pub fn verify_cast_chain_agnostic(
    chain: &Chain,
    account: Address,
    signers: &SignerSet,
    nonce: &NonceTracker,
    entry: &CastChainAgnosticParams,
    hashes: &[ChainAgnosticHash],
    signatures: &[SignatureParams],
) -> Result<B256, CastError> {
    if entry.chainId != U256::from(chain.chain_id()) {
        return Err(CastError::InvalidParams("entry is signed for a different chain"));
    }
    if hashes.len() < 2 {
        return Err(CastError::InvalidParams("chain-agnostic cast must cover several chains"));
    }
    check_timing(
        chain.timestamp(),
        entry.forwardParams.validAfter,
        entry.forwardParams.validUntil,
    )?;
    entry.params.validate_id()?;

    let own = eip712::chain_agnostic_entry_hash(entry);
    if !hashes.iter().any(|h| h.chain_id == entry.chainId && h.hash == own) {
        return Err(CastError::InvalidParams("entry hash is not covered by the signed set"));
    }

    let domain = eip712::chain_agnostic_domain(account);
    let digest = eip712::chain_agnostic_digest_from_hashes(account, hashes);
    verify_signatures(chain, &domain, signers, digest, signatures)?;
    check_nonce(&entry.params, nonce, digest)?;
    Ok(digest)
}

/// Threshold signature aggregation.
///
/// Requires at least `required_signers` entries, each from a member of the
/// signer set, strictly ascending by signer address. The ordering doubles as
/// duplicate rejection in a single O(n) scan; verification rejects on the
/// first violation and never re-sorts, since clients depend on the canonical
/// order.
pub fn verify_signatures(
    chain: &Chain,
    domain: &Eip712Domain,
    signers: &SignerSet,
    digest: B256,
    signatures: &[SignatureParams],
) -> Result<(), CastError> {
    if signatures.len() < signers.required_signers() as usize {
        return Err(CastError::InvalidParams("not enough signatures for the threshold"));
    }

    let mut previous: Option<Address> = None;
    for params in signatures {
        if previous.is_some_and(|previous| params.signer <= previous) {
            return Err(CastError::InvalidParams("signers must be strictly ascending"));
        }
        previous = Some(params.signer);

        if !signers.contains(params.signer) {
            return Err(CastError::InvalidParams("signer is not part of the signer set"));
        }

        SignatureValidator::resolve(chain, params.signer).validate(domain, digest, params)?;
    }
    Ok(())
}

/// Rejects requests outside their validity window. Zero bounds are open.
fn check_timing(timestamp: u64, valid_after: U256, valid_until: U256) -> Result<(), CastError> {
    let now = U256::from(timestamp);
    if !valid_after.is_zero() && now < valid_after {
        return Err(CastError::InvalidTiming);
    }
    if !valid_until.is_zero() && now > valid_until {
        return Err(CastError::InvalidTiming);
    }
    Ok(())
}

/// Rejects stale sequential nonces and consumed digests without claiming.
fn check_nonce(params: &CastParams, nonce: &NonceTracker, digest: B256) -> Result<(), CastError> {
    if params.uses_sequential_nonce() {
        let Some(expected) = params.sequential_nonce() else {
            return Err(CastError::InvalidParams("negative nonce"));
        };
        if expected != nonce.sequential() {
            return Err(CastError::InvalidNonce);
        }
    } else if nonce.is_digest_consumed(digest) {
        return Err(CastError::InvalidNonce);
    }
    Ok(())
}

//! Signature validation capabilities.
//!
//! A signer entry is polymorphic over how its signature is checked: an
//! externally-owned key validates by ECDSA recovery over the digest, while a
//! contract signer delegates to its ERC-1271 `isValidSignature` callback.
//! Which capability applies is resolved per signer at verification time.

use crate::{
    chain::{Chain, Revert},
    constants::EIP1271_MAGIC_VALUE,
    eip712,
    error::CastError,
    types::SignatureParams,
};
use alloy::{
    primitives::{Address, B256, Bytes, FixedBytes, Signature},
    sol_types::Eip712Domain,
};
use std::{fmt, sync::Arc};

/// An ERC-1271 contract signer registered in the environment.
pub trait Erc1271Signer: fmt::Debug + Send + Sync {
    /// Validates `signature` over `digest`, returning the 4-byte magic value
    /// on success.
    fn is_valid_signature(&self, digest: B256, signature: &Bytes) -> Result<FixedBytes<4>, Revert>;
}

/// How one signer's signature is validated.
#[derive(Debug, Clone)]
pub enum SignatureValidator {
    /// Pure ECDSA recovery against the signer address.
    Eoa,
    /// Delegation to the signer contract's ERC-1271 callback.
    ContractSigner(Arc<dyn Erc1271Signer>),
}

impl SignatureValidator {
    /// Resolves the capability of `signer`: contract signers are addresses
    /// with a registered ERC-1271 implementation, everything else validates
    /// as an externally-owned key.
    pub fn resolve(chain: &Chain, signer: Address) -> Self {
        match chain.contract_signer(signer) {
            Some(validator) => Self::ContractSigner(validator),
            None => Self::Eoa,
        }
    }

    /// Validates one signature over `digest`.
    ///
    /// Contract signers never see the raw digest: it is wrapped in a nested
    /// typed-data envelope under the account domain first, so a contract
    /// signature cannot double as a raw EOA-style signature for the same
    /// digest.
    pub fn validate(
        &self,
        domain: &Eip712Domain,
        digest: B256,
        params: &SignatureParams,
    ) -> Result<(), CastError> {
        let invalid = || CastError::InvalidSignature { signer: params.signer };
        match self {
            Self::Eoa => {
                let signature =
                    Signature::try_from(params.signature.as_ref()).map_err(|_| invalid())?;
                let recovered =
                    signature.recover_address_from_prehash(&digest).map_err(|_| invalid())?;
                if recovered != params.signer {
                    return Err(invalid());
                }
                Ok(())
            }
            Self::ContractSigner(validator) => {
                let wrapped = eip712::contract_signature_digest(domain, digest);
                let magic =
                    validator.is_valid_signature(wrapped, &params.signature).map_err(|_| invalid())?;
                if magic.as_slice() != EIP1271_MAGIC_VALUE {
                    return Err(invalid());
                }
                Ok(())
            }
        }
    }
}

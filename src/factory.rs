//! Deterministic account deployment.
//!
//! Account addresses are a pure function of `(owner, index)` and a fixed
//! creation-code hash, so anyone can compute where an account will live
//! before it exists and casts can deploy it lazily on first use.

use crate::{
    constants::{AVOCADO_CREATION_CODE_HASH, SEQUENTIAL_INDEX_FROM},
    chain::Chain,
    error::AccountError,
    types::{AccountId, AvocadoAccount, Event},
};
use alloy::primitives::{Address, keccak256};
use tracing::info;

/// Deploys Avocado accounts at deterministic addresses.
#[derive(Debug)]
pub struct AvoFactory;

impl AvoFactory {
    /// Computes the deterministic address of `(owner, index)`.
    ///
    /// CREATE2-flavored derivation: the last 20 bytes of
    /// `keccak256(0xff ‖ owner ‖ index ‖ creationCodeHash)`. Constant over
    /// time and deployment state.
    pub fn compute_address(owner: Address, index: u32) -> Address {
        let mut buf = [0u8; 1 + 20 + 4 + 32];
        buf[0] = 0xff;
        buf[1..21].copy_from_slice(owner.as_slice());
        buf[21..25].copy_from_slice(&index.to_be_bytes());
        buf[25..].copy_from_slice(AVOCADO_CREATION_CODE_HASH.as_slice());
        Address::from_slice(&keccak256(buf)[12..])
    }

    /// Deploys the account of `(owner, index)`, idempotently: a second call
    /// returns the existing address without re-initializing.
    ///
    /// Indexes at or above [`SEQUENTIAL_INDEX_FROM`] must be claimed in
    /// order — index `n` requires `n - 1` to exist — which caps address
    /// pre-computation squatting while keeping low indexes free-form.
    pub fn deploy(chain: &mut Chain, owner: Address, index: u32) -> Result<Address, AccountError> {
        if owner.is_zero() {
            return Err(AccountError::ZeroOwner);
        }

        let id = AccountId::new(owner, index);
        if let Some(existing) = chain.address_of(id) {
            return Ok(existing);
        }

        if index >= SEQUENTIAL_INDEX_FROM
            && index > 0
            && chain.address_of(AccountId::new(owner, index - 1)).is_none()
        {
            return Err(AccountError::IndexGap(index));
        }

        let address = Self::compute_address(owner, index);
        let implementation = chain.registry().current_implementation();
        chain.insert_account(address, AvocadoAccount::new(id, implementation));
        chain.emit(Event::AvocadoDeployed { owner, index, avocado: address });
        info!(%owner, index, avocado = %address, "deployed avocado");

        Ok(address)
    }

    /// Whether `address` hosts a deployed Avocado account.
    pub fn is_avocado(chain: &Chain, address: Address) -> bool {
        chain.is_avocado(address)
    }
}

//! Account state.

use crate::account::{NonceTracker, SignerSet};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Identifier of one Avocado account: the owner that signed it into
/// existence plus an index discriminator, so one owner can control several
/// independent accounts at deterministic addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountId {
    /// The owning address; always present in the signer set.
    pub owner: Address,
    /// The index discriminator.
    pub index: u32,
}

impl AccountId {
    /// Creates a new account id.
    pub const fn new(owner: Address, index: u32) -> Self {
        Self { owner, index }
    }
}

/// State of one deployed Avocado multisig account.
#[derive(Debug, Clone)]
pub struct AvocadoAccount {
    /// The (owner, index) pair the account was deployed for.
    pub id: AccountId,
    /// Implementation version currently governing the account; upgradable
    /// only via a self-authorized cast to a registry-allowed version.
    pub implementation: Address,
    /// Authorized co-signers, ascending, always containing the owner.
    pub signers: SignerSet,
    /// Dual replay protection state.
    pub nonce: NonceTracker,
    /// Whether signer mutations notify the signers-list side index.
    pub track_in_storage: bool,
}

impl AvocadoAccount {
    /// Creates a fresh account owned by `id.owner` with a 1-of-1 signer set.
    pub fn new(id: AccountId, implementation: Address) -> Self {
        Self {
            id,
            implementation,
            signers: SignerSet::new(id.owner),
            nonce: NonceTracker::default(),
            track_in_storage: true,
        }
    }
}

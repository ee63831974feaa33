//! The signers-list side index.
//!
//! A denormalized reverse mapping from signer address to the accounts it
//! co-signs for, maintained best-effort so off-chain tooling can discover
//! accounts without scanning. Accounts opt out of maintaining it via their
//! `track_in_storage` flag.

use alloy::primitives::Address;
use dashmap::DashMap;
use std::collections::BTreeSet;

/// Reverse index signer → accounts.
#[derive(Debug, Default)]
pub struct AvoSignersList {
    accounts_per_signer: DashMap<Address, BTreeSet<Address>>,
}

impl AvoSignersList {
    /// Records that `signer` now co-signs for `account`.
    pub fn on_signer_added(&self, account: Address, signer: Address) {
        self.accounts_per_signer.entry(signer).or_default().insert(account);
    }

    /// Records that `signer` no longer co-signs for `account`.
    pub fn on_signer_removed(&self, account: Address, signer: Address) {
        if let Some(mut accounts) = self.accounts_per_signer.get_mut(&signer) {
            accounts.remove(&account);
        }
    }

    /// The accounts `signer` is known to co-sign for, ascending.
    pub fn accounts_of(&self, signer: Address) -> Vec<Address> {
        self.accounts_per_signer
            .get(&signer)
            .map(|accounts| accounts.iter().copied().collect())
            .unwrap_or_default()
    }
}

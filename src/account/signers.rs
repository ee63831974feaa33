//! The authoritative signer set of one account.

use crate::{constants::MAX_SIGNERS_COUNT, error::AccountError};
use alloy::primitives::Address;
use itertools::Itertools;

/// Ordered-by-address-ascending set of co-signers plus the signature
/// threshold. The owner is a permanent member.
///
/// Mutation inputs must already be strictly ascending: the canonical order is
/// a protocol invariant clients depend on, so the set never re-sorts on their
/// behalf. Mutations validate every invariant before touching state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSet {
    owner: Address,
    signers: Vec<Address>,
    required: u8,
}

impl SignerSet {
    /// Creates a 1-of-1 set holding only the owner.
    pub fn new(owner: Address) -> Self {
        Self { owner, signers: vec![owner], required: 1 }
    }

    /// The permanent owner signer.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The signers, ascending.
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    /// Number of signers. At least 1, since the owner is permanent.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// The signature threshold.
    pub fn required_signers(&self) -> u8 {
        self.required
    }

    /// Whether `signer` is part of the set.
    pub fn contains(&self, signer: Address) -> bool {
        self.signers.binary_search(&signer).is_ok()
    }

    /// Adds `add` (strictly ascending) to the set and updates the threshold.
    pub fn add(&mut self, add: &[Address], required: u8) -> Result<(), AccountError> {
        Self::ensure_ascending(add)?;
        let count = self.signers.len() + add.len();
        if count > MAX_SIGNERS_COUNT {
            return Err(AccountError::TooManySigners { max: MAX_SIGNERS_COUNT });
        }
        for &signer in add {
            if self.contains(signer) {
                return Err(AccountError::SignerAlreadyExists(signer));
            }
        }
        Self::ensure_required(required, count)?;

        self.signers = self.signers.iter().copied().merge(add.iter().copied()).collect();
        self.required = required;
        Ok(())
    }

    /// Removes `remove` from the set and updates the threshold. The owner can
    /// not be removed.
    pub fn remove(&mut self, remove: &[Address], required: u8) -> Result<(), AccountError> {
        Self::ensure_ascending(remove)?;
        for &signer in remove {
            if signer == self.owner {
                return Err(AccountError::OwnerNotRemovable(signer));
            }
            if !self.contains(signer) {
                return Err(AccountError::SignerDoesNotExist(signer));
            }
        }
        let count = self.signers.len() - remove.len();
        Self::ensure_required(required, count)?;

        self.signers.retain(|signer| remove.binary_search(signer).is_err());
        self.required = required;
        Ok(())
    }

    /// Updates the threshold, keeping it within `1..=len`.
    pub fn set_required(&mut self, required: u8) -> Result<(), AccountError> {
        Self::ensure_required(required, self.signers.len())?;
        self.required = required;
        Ok(())
    }

    fn ensure_required(required: u8, count: usize) -> Result<(), AccountError> {
        if required == 0 || required as usize > count {
            return Err(AccountError::InvalidRequiredSigners { required, count });
        }
        Ok(())
    }

    fn ensure_ascending(signers: &[Address]) -> Result<(), AccountError> {
        if signers.iter().tuple_windows().any(|(a, b)| a >= b) {
            return Err(AccountError::SignersNotOrdered);
        }
        Ok(())
    }
}

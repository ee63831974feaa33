//! Dual replay protection.
//!
//! Every cast consumes exactly one nonce: either the monotonic sequential
//! counter, or — in non-sequential mode — the EIP-712 digest of the full
//! signed payload, recorded in an append-only consumed set. Claims happen
//! after signature and timing validation succeed but strictly before action
//! dispatch, so a re-entrant call from within action execution can never
//! reuse the nonce of its parent cast.

use crate::error::CastError;
use alloy::primitives::{B256, U256, map::B256HashSet};

/// Replay protection state of one account.
#[derive(Debug, Clone, Default)]
pub struct NonceTracker {
    sequential: U256,
    consumed: B256HashSet,
}

impl NonceTracker {
    /// The next sequential nonce a cast must carry.
    pub fn sequential(&self) -> U256 {
        self.sequential
    }

    /// Whether `digest` has been used as a non-sequential nonce.
    pub fn is_digest_consumed(&self, digest: B256) -> bool {
        self.consumed.contains(&digest)
    }

    /// Compare-and-increment of the sequential counter.
    pub fn claim_sequential(&mut self, nonce: U256) -> Result<(), CastError> {
        if nonce != self.sequential {
            return Err(CastError::InvalidNonce);
        }
        self.sequential += U256::from(1);
        Ok(())
    }

    /// Check-and-insert of a non-sequential digest nonce.
    pub fn claim_digest(&mut self, digest: B256) -> Result<(), CastError> {
        if !self.consumed.insert(digest) {
            return Err(CastError::InvalidNonce);
        }
        Ok(())
    }

    /// Pre-burns digests so they can never be cast. Burning an already
    /// consumed digest is rejected like any other reuse.
    pub fn occupy(&mut self, digests: &[B256]) -> Result<(), CastError> {
        for &digest in digests {
            self.claim_digest(digest)?;
        }
        Ok(())
    }
}

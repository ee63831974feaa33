use super::{internal_rpc, invalid_params};
use alloy::primitives::Address;
use thiserror::Error;

/// Errors rejecting a cast before dispatch.
///
/// Each failure condition is a distinct variant so callers can tell a
/// malformed request from a bad signature from a stale nonce.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    /// Malformed or inconsistent request shape.
    #[error("invalid cast params: {0}")]
    InvalidParams(&'static str),
    /// A signature failed ECDSA recovery or the ERC-1271 callback.
    #[error("invalid signature for signer {signer}")]
    InvalidSignature {
        /// The signer the signature claimed to validate for.
        signer: Address,
    },
    /// The request is outside its `[validAfter, validUntil]` window.
    #[error("cast is not valid at the current timestamp")]
    InvalidTiming,
    /// Sequential nonce mismatch or non-sequential digest reuse.
    #[error("invalid nonce")]
    InvalidNonce,
    /// The broadcaster attached less gas than the signer required.
    #[error("insufficient gas sent: required {required}, available {available}")]
    InsufficientGasSent {
        /// Gas the signed forward params require.
        required: u64,
        /// Gas the broadcaster attached.
        available: u64,
    },
    /// An action's operation code is out of range or disallowed in the
    /// current reentry context.
    #[error("invalid operation{}", fmt_index(.index))]
    InvalidOperation {
        /// Index of the offending action, when known.
        index: Option<usize>,
    },
    /// An action reverted during simulation, where the failure is reported
    /// as an error instead of a failed cast outcome.
    #[error("action {index} reverted: {reason}")]
    ActionReverted {
        /// Index of the first failing action.
        index: usize,
        /// The raw revert reason.
        reason: String,
    },
}

fn fmt_index(index: &Option<usize>) -> String {
    index.map(|i| format!(" for action {i}")).unwrap_or_default()
}

impl From<CastError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: CastError) -> Self {
        match err {
            CastError::ActionReverted { .. } => internal_rpc(err.to_string()),
            _ => invalid_params(err.to_string()),
        }
    }
}

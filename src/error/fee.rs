use super::invalid_params;
use alloy::primitives::U256;
use thiserror::Error;

/// Errors related to protocol fees on authorized casts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
    /// The computed fee exceeds the caller-supplied ceiling. Raised before
    /// dispatch so the payer can bound worst-case cost; no nonce is consumed.
    #[error("computed fee {fee} exceeds max fee {max_fee}")]
    FeeNotCovered {
        /// The computed, clamped fee.
        fee: U256,
        /// The caller-supplied ceiling.
        max_fee: U256,
    },
    /// The chain-wide fee configuration is inconsistent.
    #[error("invalid fee config: {0}")]
    InvalidFeeParams(&'static str),
}

impl From<FeeError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: FeeError) -> Self {
        invalid_params(err.to_string())
    }
}

use super::invalid_params;
use alloy::primitives::Address;
use thiserror::Error;

/// Errors related to account state, signer sets and deployment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// No account is deployed at the address.
    #[error("no avocado account at {0}")]
    UnknownAccount(Address),
    /// The owner address is zero.
    #[error("owner must not be the zero address")]
    ZeroOwner,
    /// Indexes at or above the reserved threshold must be claimed in order.
    #[error("index {0} can only be deployed once its predecessor exists")]
    IndexGap(u32),
    /// The signer set would exceed the fixed cap.
    #[error("signer set may hold at most {max} signers")]
    TooManySigners {
        /// The cap.
        max: usize,
    },
    /// A signer list was not strictly ascending by address.
    #[error("signers must be strictly ascending by address")]
    SignersNotOrdered,
    /// The signer is already part of the set.
    #[error("signer {0} already added")]
    SignerAlreadyExists(Address),
    /// The signer is not part of the set.
    #[error("signer {0} does not exist")]
    SignerDoesNotExist(Address),
    /// The owner is a permanent signer and can not be removed.
    #[error("owner {0} can not be removed from the signer set")]
    OwnerNotRemovable(Address),
    /// The threshold is zero or larger than the signer count.
    #[error("required signers {required} out of bounds for {count} signers")]
    InvalidRequiredSigners {
        /// The requested threshold.
        required: u8,
        /// The current signer count.
        count: usize,
    },
    /// The registry does not allow the requested implementation version.
    #[error("implementation {0} is not allowed by the registry")]
    VersionNotAllowed(Address),
}

impl From<AccountError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: AccountError) -> Self {
        invalid_params(err.to_string())
    }
}

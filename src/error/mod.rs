//! Avocado error types.
use alloy::primitives::Bytes;
use core::fmt;
use jsonrpsee::core::RpcResult;
use thiserror::Error;

mod account;
pub use account::AccountError;

mod cast;
pub use cast::CastError;

mod fee;
pub use fee::FeeError;

/// The overarching error type returned by the forwarder surface.
///
/// Every variant is structural: returning one of these means the request was
/// rejected before or during validation and no state changed. Action-level
/// failures after dispatch are not errors; they surface as a failed
/// [`CastResult`](crate::types::CastResult) plus a `CastFailed` event.
#[derive(Debug, Error)]
pub enum AvocadoError {
    /// Errors related to cast validation.
    #[error(transparent)]
    Cast(#[from] CastError),
    /// Errors related to account state and deployment.
    #[error(transparent)]
    Account(#[from] AccountError),
    /// Errors related to protocol fees.
    #[error(transparent)]
    Fee(#[from] FeeError),
    /// The caller lacks the required role.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    /// An error occurred during ABI encoding/decoding.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
    /// An internal error occurred.
    #[error(transparent)]
    Internal(#[from] eyre::Error),
}

impl From<AvocadoError> for jsonrpsee::types::error::ErrorObject<'static> {
    fn from(err: AvocadoError) -> Self {
        match err {
            AvocadoError::Cast(inner) => inner.into(),
            AvocadoError::Account(inner) => inner.into(),
            AvocadoError::Fee(inner) => inner.into(),
            AvocadoError::Unauthorized(_) => invalid_params(err.to_string()),
            AvocadoError::Abi(_) | AvocadoError::Internal(_) => internal_rpc(err),
        }
    }
}

/// A helper trait to provide an RPC error code.
pub trait ToRpcResult<Ok, Err>: Sized {
    /// Converts result to [`RpcResult`] by converting error variant to
    /// [`jsonrpsee::types::error::ErrorObject`].
    fn to_rpc_result(self) -> RpcResult<Ok>
    where
        Err: fmt::Display;
}

macro_rules! impl_error_helpers {
    ($err:ty) => {
        impl<Ok> ToRpcResult<Ok, $err> for Result<Ok, $err> {
            fn to_rpc_result(self) -> RpcResult<Ok> {
                self.map_err(|err| err.into())
            }
        }

        impl From<$err> for String {
            fn from(err: $err) -> Self {
                err.to_string()
            }
        }
    };
}

impl_error_helpers!(AvocadoError);
impl_error_helpers!(CastError);
impl_error_helpers!(AccountError);
impl_error_helpers!(FeeError);

/// Constructs an invalid params JSON-RPC error.
fn invalid_params(msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    rpc_err(jsonrpsee::types::error::INVALID_PARAMS_CODE, msg, None)
}

/// Constructs an internal JSON-RPC error.
fn internal_rpc(msg: impl Into<String>) -> jsonrpsee::types::error::ErrorObject<'static> {
    rpc_err(jsonrpsee::types::error::INTERNAL_ERROR_CODE, msg, None)
}

/// Constructs a JSON-RPC error with `code`, `message` and optional `data`.
fn rpc_err(
    code: i32,
    msg: impl Into<String>,
    data: Option<Bytes>,
) -> jsonrpsee::types::error::ErrorObject<'static> {
    jsonrpsee::types::error::ErrorObject::owned(code, msg.into(), data)
}

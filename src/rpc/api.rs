//! The `avocado_` namespace.
//!
//! JSON-RPC surface of the forwarder façade:
//!
//! - `avocado_execute` / `avocado_verify` for forwarded (relayer-paid) casts,
//! - `avocado_castAuthorized` / `avocado_verifyAuthorized` for self-paying
//!   casts with protocol fee settlement,
//! - `avocado_executeChainAgnostic` / `avocado_verifyChainAgnostic` for
//!   entries of one-signature-many-chains casts,
//! - `avocado_executeBatch` for ordered multi-account batches,
//! - `avocado_simulateExecute` for gas estimation without committing state,
//! - discovery helpers over the factory, accounts and the signers-list
//!   side index.

use crate::types::{
    BatchEntry, BatchResult, CastAuthorizedParameters, CastResult, ChainAgnosticParameters,
    ExecuteParameters, SimulationResult,
};
use alloy::primitives::{Address, U256};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};

/// Avocado `avocado_` RPC namespace.
#[rpc(server, client, namespace = "avocado")]
pub trait AvocadoApi {
    /// Checks the health of the forwarder and returns its version.
    #[method(name = "health")]
    async fn health(&self) -> RpcResult<String>;

    /// Computes the deterministic account address of `(owner, index)`.
    #[method(name = "computeAddress")]
    async fn compute_address(&self, owner: Address, index: u32) -> RpcResult<Address>;

    /// Deploys the account of `(owner, index)`, idempotently, and returns
    /// its address.
    #[method(name = "deploy")]
    async fn deploy(&self, owner: Address, index: u32) -> RpcResult<Address>;

    /// Executes a forwarded cast, lazily deploying the target account.
    #[method(name = "execute")]
    async fn execute(&self, parameters: ExecuteParameters) -> RpcResult<CastResult>;

    /// Verifies a forwarded cast without committing state.
    #[method(name = "verify")]
    async fn verify(&self, parameters: ExecuteParameters) -> RpcResult<bool>;

    /// Executes an authorized (self-paying) cast.
    #[method(name = "castAuthorized")]
    async fn cast_authorized(&self, parameters: CastAuthorizedParameters) -> RpcResult<CastResult>;

    /// Verifies an authorized cast without committing state.
    #[method(name = "verifyAuthorized")]
    async fn verify_authorized(&self, parameters: CastAuthorizedParameters) -> RpcResult<bool>;

    /// Executes this chain's entry of a chain-agnostic cast.
    #[method(name = "executeChainAgnostic")]
    async fn execute_chain_agnostic(
        &self,
        parameters: ChainAgnosticParameters,
    ) -> RpcResult<CastResult>;

    /// Verifies this chain's entry of a chain-agnostic cast.
    #[method(name = "verifyChainAgnostic")]
    async fn verify_chain_agnostic(&self, parameters: ChainAgnosticParameters) -> RpcResult<bool>;

    /// Executes independent per-account entries in order. See
    /// [`AvoForwarder::execute_batch`](crate::forwarder::AvoForwarder::execute_batch)
    /// for the `continue_on_revert` semantics.
    #[method(name = "executeBatch")]
    async fn execute_batch(
        &self,
        entries: Vec<BatchEntry>,
        continue_on_revert: bool,
    ) -> RpcResult<Vec<BatchResult>>;

    /// Runs the full execute pipeline and restores state, returning the gas
    /// estimate. `from` must be the sentinel simulation caller.
    #[method(name = "simulateExecute")]
    async fn simulate_execute(
        &self,
        from: Address,
        parameters: ExecuteParameters,
    ) -> RpcResult<SimulationResult>;

    /// The signer set of a deployed account, ascending.
    #[method(name = "getSigners")]
    async fn get_signers(&self, avocado: Address) -> RpcResult<Vec<Address>>;

    /// The signature threshold of a deployed account.
    #[method(name = "getRequiredSigners")]
    async fn get_required_signers(&self, avocado: Address) -> RpcResult<u8>;

    /// The next sequential nonce of a deployed account.
    #[method(name = "getNonce")]
    async fn get_nonce(&self, avocado: Address) -> RpcResult<U256>;

    /// The accounts `signer` co-signs for, per the signers-list side index.
    #[method(name = "accounts")]
    async fn accounts(&self, signer: Address) -> RpcResult<Vec<Address>>;
}

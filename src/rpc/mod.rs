//! Avocado RPC server.

mod api;
pub use api::{AvocadoApiClient, AvocadoApiServer};

use crate::{
    chain::Chain,
    error::{AccountError, AvocadoError, ToRpcResult},
    factory::AvoFactory,
    forwarder::AvoForwarder,
    types::{
        BatchEntry, BatchResult, CastAuthorizedParameters, CastResult, ChainAgnosticParameters,
        ExecuteParameters, SimulationResult,
    },
    version::AVOCADO_SHORT_VERSION,
};
use alloy::primitives::{Address, U256};
use jsonrpsee::core::{RpcResult, async_trait};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The Avocado RPC service: the forwarder façade over one chain
/// environment.
#[derive(Debug, Clone)]
pub struct Avocado {
    inner: Arc<AvocadoInner>,
}

#[derive(Debug)]
struct AvocadoInner {
    chain: RwLock<Chain>,
    forwarder: AvoForwarder,
}

impl Avocado {
    /// Creates the service over `chain`, relaying through `forwarder`.
    pub fn new(chain: Chain, forwarder: AvoForwarder) -> Self {
        Self { inner: Arc::new(AvocadoInner { chain: RwLock::new(chain), forwarder }) }
    }

    /// Shared read access to the chain environment.
    pub async fn with_chain<T>(&self, f: impl FnOnce(&Chain) -> T) -> T {
        f(&*self.inner.chain.read().await)
    }

    /// Exclusive access to the chain environment.
    pub async fn with_chain_mut<T>(&self, f: impl FnOnce(&mut Chain) -> T) -> T {
        f(&mut *self.inner.chain.write().await)
    }
}

#[async_trait]
impl AvocadoApiServer for Avocado {
    async fn health(&self) -> RpcResult<String> {
        Ok(AVOCADO_SHORT_VERSION.to_string())
    }

    async fn compute_address(&self, owner: Address, index: u32) -> RpcResult<Address> {
        Ok(AvoFactory::compute_address(owner, index))
    }

    async fn deploy(&self, owner: Address, index: u32) -> RpcResult<Address> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.deploy(&mut chain, owner, index).to_rpc_result()
    }

    async fn execute(&self, parameters: ExecuteParameters) -> RpcResult<CastResult> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.execute(&mut chain, &parameters).to_rpc_result()
    }

    async fn verify(&self, parameters: ExecuteParameters) -> RpcResult<bool> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.verify(&mut chain, &parameters).to_rpc_result()
    }

    async fn cast_authorized(&self, parameters: CastAuthorizedParameters) -> RpcResult<CastResult> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.cast_authorized(&mut chain, &parameters).to_rpc_result()
    }

    async fn verify_authorized(&self, parameters: CastAuthorizedParameters) -> RpcResult<bool> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.verify_authorized(&mut chain, &parameters).to_rpc_result()
    }

    async fn execute_chain_agnostic(
        &self,
        parameters: ChainAgnosticParameters,
    ) -> RpcResult<CastResult> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.execute_chain_agnostic(&mut chain, &parameters).to_rpc_result()
    }

    async fn verify_chain_agnostic(&self, parameters: ChainAgnosticParameters) -> RpcResult<bool> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.verify_chain_agnostic(&mut chain, &parameters).to_rpc_result()
    }

    async fn execute_batch(
        &self,
        entries: Vec<BatchEntry>,
        continue_on_revert: bool,
    ) -> RpcResult<Vec<BatchResult>> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        Ok(inner.forwarder.execute_batch(&mut chain, &entries, continue_on_revert))
    }

    async fn simulate_execute(
        &self,
        from: Address,
        parameters: ExecuteParameters,
    ) -> RpcResult<SimulationResult> {
        let inner = &self.inner;
        let mut chain = inner.chain.write().await;
        inner.forwarder.simulate_execute(&mut chain, from, &parameters).to_rpc_result()
    }

    async fn get_signers(&self, avocado: Address) -> RpcResult<Vec<Address>> {
        let chain = self.inner.chain.read().await;
        let account = chain
            .account(avocado)
            .ok_or_else(|| AvocadoError::from(AccountError::UnknownAccount(avocado)))?;
        Ok(account.signers.signers().to_vec())
    }

    async fn get_required_signers(&self, avocado: Address) -> RpcResult<u8> {
        let chain = self.inner.chain.read().await;
        let account = chain
            .account(avocado)
            .ok_or_else(|| AvocadoError::from(AccountError::UnknownAccount(avocado)))?;
        Ok(account.signers.required_signers())
    }

    async fn get_nonce(&self, avocado: Address) -> RpcResult<U256> {
        let chain = self.inner.chain.read().await;
        let account = chain
            .account(avocado)
            .ok_or_else(|| AvocadoError::from(AccountError::UnknownAccount(avocado)))?;
        Ok(account.nonce.sequential())
    }

    async fn accounts(&self, signer: Address) -> RpcResult<Vec<Address>> {
        let chain = self.inner.chain.read().await;
        Ok(chain.signers_list().accounts_of(signer))
    }
}

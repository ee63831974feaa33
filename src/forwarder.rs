//! The forwarder façade.
//!
//! The externally callable surface of the platform: relayed (forwarded)
//! casts, authorized casts, chain-agnostic casts, gas-estimation-only
//! simulation and multi-account batches, with deterministic lazy deployment
//! of the target account as part of every call.
//!
//! Batched execution has no cross-account atomicity: entries run in order,
//! each against its own account, and entries executed before a failing one
//! keep their effects.

use crate::{
    account,
    chain::Chain,
    constants::{DEFAULT_FORWARDER_GAS_LIMIT, SIMULATION_CALLER},
    error::AvocadoError,
    execute,
    factory::AvoFactory,
    metrics::ForwarderMetrics,
    types::{
        AccountId, BatchEntry, BatchResult, CastAuthorizedParameters, CastResult,
        ChainAgnosticParameters, Event, ExecuteParameters, SimulationResult,
    },
};
use alloy::primitives::Address;
use tracing::instrument;

/// The forwarder relaying casts into Avocado accounts.
pub struct AvoForwarder {
    /// The broadcaster identity relayed casts run under; it pays gas and
    /// funds forwarded value.
    broadcaster: Address,
    /// Gas the broadcaster attaches to each relayed cast.
    gas_limit: u64,
    metrics: ForwarderMetrics,
}

impl std::fmt::Debug for AvoForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvoForwarder")
            .field("broadcaster", &self.broadcaster)
            .field("gas_limit", &self.gas_limit)
            .finish_non_exhaustive()
    }
}

impl AvoForwarder {
    /// Creates a forwarder broadcasting as `broadcaster`.
    pub fn new(broadcaster: Address) -> Self {
        Self { broadcaster, gas_limit: DEFAULT_FORWARDER_GAS_LIMIT, metrics: Default::default() }
    }

    /// Sets the gas attached to each relayed cast.
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// The broadcaster identity.
    pub fn broadcaster(&self) -> Address {
        self.broadcaster
    }

    /// Executes a forwarded cast, deploying the target account first if
    /// needed. Structural failures roll everything back — including the lazy
    /// deployment — and surface as an error; action failures are a
    /// dispatched outcome.
    #[instrument(skip_all, fields(owner = %parameters.owner, index = parameters.index))]
    pub fn execute(
        &self,
        chain: &mut Chain,
        parameters: &ExecuteParameters,
    ) -> Result<CastResult, AvocadoError> {
        self.with_rollback_on_error(chain, |this, chain| {
            this.execute_uncommitted(chain, parameters)
        })
    }

    /// The execute pipeline without side-index or metrics commits; callers
    /// wrap it in either commit-on-success or discard-always handling.
    fn execute_uncommitted(
        &self,
        chain: &mut Chain,
        parameters: &ExecuteParameters,
    ) -> Result<CastResult, AvocadoError> {
        let avocado = AvoFactory::deploy(chain, parameters.owner, parameters.index)?;
        let result = account::cast(
            chain,
            avocado,
            self.broadcaster,
            self.gas_limit,
            &parameters.params,
            &parameters.forward_params,
            &parameters.signatures,
        )?;
        self.emit_outcome(
            chain,
            parameters.owner,
            parameters.index,
            avocado,
            parameters.params.source,
            parameters.params.metadata.clone(),
            &result,
        );
        Ok(result)
    }

    /// Verifies a forwarded cast against the (possibly not yet deployed)
    /// target account. View semantics: any lazy deployment needed for
    /// verification is rolled back before returning.
    pub fn verify(
        &self,
        chain: &mut Chain,
        parameters: &ExecuteParameters,
    ) -> Result<bool, AvocadoError> {
        let snapshot = chain.snapshot();
        let result = AvoFactory::deploy(chain, parameters.owner, parameters.index)
            .map_err(AvocadoError::from)
            .and_then(|avocado| {
                account::verify(
                    chain,
                    avocado,
                    &parameters.params,
                    &parameters.forward_params,
                    &parameters.signatures,
                )
            });
        chain.revert_to(snapshot);
        result.map(|_| true)
    }

    /// Executes an authorized (self-paying) cast.
    #[instrument(skip_all, fields(owner = %parameters.owner, index = parameters.index))]
    pub fn cast_authorized(
        &self,
        chain: &mut Chain,
        parameters: &CastAuthorizedParameters,
    ) -> Result<CastResult, AvocadoError> {
        self.with_rollback_on_error(chain, |this, chain| {
            let avocado = AvoFactory::deploy(chain, parameters.owner, parameters.index)?;
            let result = account::cast_authorized(
                chain,
                avocado,
                this.broadcaster,
                &parameters.params,
                &parameters.authorized_params,
                &parameters.signatures,
            )?;
            this.emit_outcome(
                chain,
                parameters.owner,
                parameters.index,
                avocado,
                parameters.params.source,
                parameters.params.metadata.clone(),
                &result,
            );
            Ok(result)
        })
    }

    /// Verifies an authorized cast. View semantics like [`Self::verify`].
    pub fn verify_authorized(
        &self,
        chain: &mut Chain,
        parameters: &CastAuthorizedParameters,
    ) -> Result<bool, AvocadoError> {
        let snapshot = chain.snapshot();
        let result = AvoFactory::deploy(chain, parameters.owner, parameters.index)
            .map_err(AvocadoError::from)
            .and_then(|avocado| {
                account::verify_authorized(
                    chain,
                    avocado,
                    &parameters.params,
                    &parameters.authorized_params,
                    &parameters.signatures,
                )
            });
        chain.revert_to(snapshot);
        result.map(|_| true)
    }

    /// Executes this chain's entry of a chain-agnostic cast.
    #[instrument(skip_all, fields(owner = %parameters.owner, index = parameters.index))]
    pub fn execute_chain_agnostic(
        &self,
        chain: &mut Chain,
        parameters: &ChainAgnosticParameters,
    ) -> Result<CastResult, AvocadoError> {
        self.with_rollback_on_error(chain, |this, chain| {
            let avocado = AvoFactory::deploy(chain, parameters.owner, parameters.index)?;
            let result = account::cast_chain_agnostic(
                chain,
                avocado,
                this.broadcaster,
                this.gas_limit,
                &parameters.params,
                &parameters.chain_agnostic_hashes,
                &parameters.signatures,
            )?;
            this.emit_outcome(
                chain,
                parameters.owner,
                parameters.index,
                avocado,
                parameters.params.params.source,
                parameters.params.params.metadata.clone(),
                &result,
            );
            Ok(result)
        })
    }

    /// Verifies this chain's entry of a chain-agnostic cast. View semantics
    /// like [`Self::verify`].
    pub fn verify_chain_agnostic(
        &self,
        chain: &mut Chain,
        parameters: &ChainAgnosticParameters,
    ) -> Result<bool, AvocadoError> {
        let snapshot = chain.snapshot();
        let result = AvoFactory::deploy(chain, parameters.owner, parameters.index)
            .map_err(AvocadoError::from)
            .and_then(|avocado| {
                account::verify_chain_agnostic(
                    chain,
                    avocado,
                    &parameters.params,
                    &parameters.chain_agnostic_hashes,
                    &parameters.signatures,
                )
            });
        chain.revert_to(snapshot);
        result.map(|_| true)
    }

    /// Executes independent per-account entries in order.
    ///
    /// With `continue_on_revert`, one entry's structural or action failure
    /// does not stop the remaining entries; without it, the batch aborts at
    /// the first failure, keeping the effects of entries already executed.
    pub fn execute_batch(
        &self,
        chain: &mut Chain,
        entries: &[BatchEntry],
        continue_on_revert: bool,
    ) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.execute(chain, entry) {
                Ok(result) => {
                    let failed = !result.success;
                    results.push(BatchResult { result: Some(result), error: None });
                    if failed && !continue_on_revert {
                        break;
                    }
                }
                Err(err) => {
                    results.push(BatchResult { result: None, error: Some(err.to_string()) });
                    if !continue_on_revert {
                        break;
                    }
                }
            }
        }
        results
    }

    /// Runs the full execute pipeline and unconditionally restores state, so
    /// a caller can measure gas without committing anything. Restricted to
    /// the sentinel simulation caller.
    pub fn simulate_execute(
        &self,
        chain: &mut Chain,
        from: Address,
        parameters: &ExecuteParameters,
    ) -> Result<SimulationResult, AvocadoError> {
        if from != SIMULATION_CALLER {
            return Err(AvocadoError::Unauthorized(
                "simulations must be sent from the sentinel simulation caller",
            ));
        }

        let would_deploy =
            chain.address_of(AccountId::new(parameters.owner, parameters.index)).is_none();
        let snapshot = chain.snapshot();
        let outcome = self.execute_uncommitted(chain, parameters);
        chain.revert_to(snapshot);
        chain.transient.reset();

        Ok(match outcome {
            Ok(result) => SimulationResult {
                success: result.success,
                estimated_gas: result.gas_used,
                revert_reason: result.revert_reason,
                would_deploy,
            },
            Err(err) => SimulationResult {
                success: false,
                estimated_gas: execute::estimate_gas(&parameters.params),
                revert_reason: Some(err.to_string()),
                would_deploy,
            },
        })
    }

    /// Explicitly deploys (or finds) the account of `(owner, index)`.
    pub fn deploy(
        &self,
        chain: &mut Chain,
        owner: Address,
        index: u32,
    ) -> Result<Address, AvocadoError> {
        let from = chain.events().len();
        let avocado = AvoFactory::deploy(chain, owner, index)?;
        self.commit_side_index(chain, from);
        Ok(avocado)
    }

    /// Runs `f` and rolls the chain back if it fails structurally, then
    /// commits side-index notifications and metrics for the surviving
    /// events.
    fn with_rollback_on_error(
        &self,
        chain: &mut Chain,
        f: impl FnOnce(&Self, &mut Chain) -> Result<CastResult, AvocadoError>,
    ) -> Result<CastResult, AvocadoError> {
        let from = chain.events().len();
        let snapshot = chain.snapshot();
        match f(self, chain) {
            Ok(result) => {
                self.commit_side_index(chain, from);
                self.record_metrics(chain, from, &result);
                Ok(result)
            }
            Err(err) => {
                chain.revert_to(snapshot);
                self.metrics.casts_rejected.increment(1);
                Err(err)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_outcome(
        &self,
        chain: &mut Chain,
        owner: Address,
        index: u32,
        avocado: Address,
        source: Address,
        metadata: alloy::primitives::Bytes,
        result: &CastResult,
    ) {
        match &result.revert_reason {
            None => chain.emit(Event::Executed { owner, index, avocado, source, metadata }),
            Some(reason) => chain.emit(Event::ExecuteFailed {
                owner,
                index,
                avocado,
                source,
                reason: reason.clone(),
                metadata,
            }),
        }
    }

    /// Applies the best-effort signers-list notifications for events that
    /// survived the call, honoring each account's `track_in_storage` flag.
    fn commit_side_index(&self, chain: &Chain, from: usize) {
        let list = chain.signers_list().clone();
        let tracks = |account: &Address| {
            chain.account(*account).is_none_or(|state| state.track_in_storage)
        };

        for event in &chain.events()[from..] {
            match event {
                Event::AvocadoDeployed { owner, avocado, .. } if tracks(avocado) => {
                    list.on_signer_added(*avocado, *owner);
                }
                Event::SignerAdded { account, signer } if tracks(account) => {
                    list.on_signer_added(*account, *signer);
                }
                Event::SignerRemoved { account, signer } if tracks(account) => {
                    list.on_signer_removed(*account, *signer);
                }
                _ => {}
            }
        }
    }

    fn record_metrics(&self, chain: &Chain, from: usize, result: &CastResult) {
        if result.success {
            self.metrics.casts_executed.increment(1);
        } else {
            self.metrics.casts_failed.increment(1);
        }
        self.metrics.cast_gas.record(result.gas_used as f64);

        let deployed = chain.events()[from..]
            .iter()
            .filter(|event| matches!(event, Event::AvocadoDeployed { .. }))
            .count();
        if deployed > 0 {
            self.metrics.accounts_deployed.increment(deployed as u64);
        }
    }
}

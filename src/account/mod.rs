//! The Avocado multisig account.
//!
//! The cast pipeline ties the components together: signature verification
//! against the current signer set, nonce claiming, action dispatch and — on
//! the authorized path — fee settlement.
//!
//! The recovery policy is deliberately asymmetric: structural failures
//! (signature, nonce, timing, params) abort the whole call with no state
//! change and no event, while action failures after dispatch roll back the
//! actions' effects but keep the nonce consumed and emit `CastFailed`. This
//! stops griefing via guaranteed-revert payloads that would otherwise let a
//! signer stall their own nonce for free.

mod nonce;
pub use nonce::NonceTracker;

mod signers;
pub use signers::SignerSet;

use crate::{
    chain::{CallContext, Chain, Revert},
    error::{AccountError, AvocadoError, CastError, FeeError},
    execute,
    fee::FeeEngine,
    types::{
        CastAuthorizedParams, CastChainAgnosticParams, CastForwardParams, CastParams, CastResult,
        ChainAgnosticHash, Event, IAvocadoMultisig, IFlashloanReceiver, SignatureParams,
    },
    verify,
};
use alloy::{
    primitives::{Address, B256, Bytes},
    sol_types::{SolCall, SolInterface, SolValue},
};
use eyre::eyre;
use tracing::debug;

/// Runs a forwarded cast against the account at `account`.
///
/// `caller` is the broadcaster paying for gas; `available_gas` is what it
/// attached and must cover the signed `forwardParams.gas`. The broadcaster
/// also funds `forwardParams.value` onto the account before dispatch.
pub fn cast(
    chain: &mut Chain,
    account: Address,
    caller: Address,
    available_gas: u64,
    params: &CastParams,
    forward_params: &CastForwardParams,
    signatures: &[SignatureParams],
) -> Result<CastResult, AvocadoError> {
    let (signers, nonce) = account_state(chain, account)?;

    let required = u64::try_from(forward_params.gas).unwrap_or(u64::MAX);
    if available_gas < required {
        return Err(CastError::InsufficientGasSent { required, available: available_gas }.into());
    }

    let digest =
        verify::verify_cast(chain, account, &signers, &nonce, params, forward_params, signatures)?;

    chain
        .transfer(caller, account, forward_params.value)
        .map_err(|_| CastError::InvalidParams("broadcaster cannot fund the forwarded value"))?;

    dispatch(chain, account, caller, params, digest)
}

/// Verifies a forwarded cast without touching state.
pub fn verify(
    chain: &Chain,
    account: Address,
    params: &CastParams,
    forward_params: &CastForwardParams,
    signatures: &[SignatureParams],
) -> Result<B256, AvocadoError> {
    let (signers, nonce) = account_state(chain, account)?;
    Ok(verify::verify_cast(chain, account, &signers, &nonce, params, forward_params, signatures)?)
}

/// Runs an authorized (self-paying) cast against the account at `account`.
///
/// The protocol fee is computed before dispatch — synthetic gas is
/// deterministic — and checked against the signed `maxFee` ceiling, so a
/// too-expensive cast is rejected with nothing consumed. Settlement happens
/// after dispatch regardless of the actions' outcome.
pub fn cast_authorized(
    chain: &mut Chain,
    account: Address,
    caller: Address,
    params: &CastParams,
    authorized_params: &CastAuthorizedParams,
    signatures: &[SignatureParams],
) -> Result<CastResult, AvocadoError> {
    let (signers, nonce) = account_state(chain, account)?;
    let digest = verify::verify_cast_authorized(
        chain,
        account,
        &signers,
        &nonce,
        params,
        authorized_params,
        signatures,
    )?;

    let config = chain.registry().fee_config().clone();
    let fee = FeeEngine::compute(&config, execute::estimate_gas(params), authorized_params.gasPrice)?;
    if !authorized_params.maxFee.is_zero() && fee > authorized_params.maxFee {
        return Err(FeeError::FeeNotCovered { fee, max_fee: authorized_params.maxFee }.into());
    }

    let result = dispatch(chain, account, caller, params, digest)?;

    // fee settles whether or not the actions succeeded; payment trouble
    // falls back to the backup collector and never fails the cast
    FeeEngine::settle(chain, account, fee, &config);

    Ok(result)
}

/// Verifies an authorized cast without touching state.
pub fn verify_authorized(
    chain: &Chain,
    account: Address,
    params: &CastParams,
    authorized_params: &CastAuthorizedParams,
    signatures: &[SignatureParams],
) -> Result<B256, AvocadoError> {
    let (signers, nonce) = account_state(chain, account)?;
    Ok(verify::verify_cast_authorized(
        chain,
        account,
        &signers,
        &nonce,
        params,
        authorized_params,
        signatures,
    )?)
}

/// Runs this chain's entry of a chain-agnostic cast.
pub fn cast_chain_agnostic(
    chain: &mut Chain,
    account: Address,
    caller: Address,
    available_gas: u64,
    entry: &CastChainAgnosticParams,
    hashes: &[ChainAgnosticHash],
    signatures: &[SignatureParams],
) -> Result<CastResult, AvocadoError> {
    let (signers, nonce) = account_state(chain, account)?;

    let required = u64::try_from(entry.forwardParams.gas).unwrap_or(u64::MAX);
    if available_gas < required {
        return Err(CastError::InsufficientGasSent { required, available: available_gas }.into());
    }

    let digest = verify::verify_cast_chain_agnostic(
        chain, account, &signers, &nonce, entry, hashes, signatures,
    )?;

    chain
        .transfer(caller, account, entry.forwardParams.value)
        .map_err(|_| CastError::InvalidParams("broadcaster cannot fund the forwarded value"))?;

    dispatch(chain, account, caller, &entry.params, digest)
}

/// Verifies this chain's entry of a chain-agnostic cast without touching
/// state.
pub fn verify_chain_agnostic(
    chain: &Chain,
    account: Address,
    entry: &CastChainAgnosticParams,
    hashes: &[ChainAgnosticHash],
    signatures: &[SignatureParams],
) -> Result<B256, AvocadoError> {
    let (signers, nonce) = account_state(chain, account)?;
    Ok(verify::verify_cast_chain_agnostic(
        chain, account, &signers, &nonce, entry, hashes, signatures,
    )?)
}

fn account_state(
    chain: &Chain,
    account: Address,
) -> Result<(SignerSet, NonceTracker), AvocadoError> {
    let state = chain.account(account).ok_or(AccountError::UnknownAccount(account))?;
    Ok((state.signers.clone(), state.nonce.clone()))
}

/// Claims the nonce and executes the actions under the cast policy.
///
/// The nonce claim happens strictly before dispatch and the rollback
/// snapshot is taken after it, so a failing (or re-entering) action can
/// never un-consume or reuse the nonce.
fn dispatch(
    chain: &mut Chain,
    account: Address,
    caller: Address,
    params: &CastParams,
    digest: B256,
) -> Result<CastResult, AvocadoError> {
    if !chain.transient.is_empty() {
        return Err(eyre!("transient reentry state not at sentinel before dispatch").into());
    }

    {
        let state = chain.account_mut(account).ok_or(AccountError::UnknownAccount(account))?;
        match params.sequential_nonce() {
            Some(nonce) => state.nonce.claim_sequential(nonce)?,
            None => state.nonce.claim_digest(digest)?,
        }
    }

    let gas_used = execute::estimate_gas(params);
    let snapshot = chain.snapshot();
    let result = execute::execute_actions(chain, account, &params.actions);

    if !chain.transient.is_empty() {
        chain.transient.reset();
        return Err(eyre!("transient reentry state leaked past dispatch").into());
    }

    match result {
        Ok(()) => {
            chain.emit(Event::CastExecuted {
                account,
                caller,
                source: params.source,
                metadata: params.metadata.clone(),
            });
            Ok(CastResult::ok(gas_used))
        }
        Err((index, revert)) => {
            chain.revert_to(snapshot);
            let reason = format!("{index}_{revert}");
            debug!(%account, %reason, "cast failed");
            chain.emit(Event::CastFailed {
                account,
                caller,
                source: params.source,
                reason: reason.clone(),
                metadata: params.metadata.clone(),
            });
            Ok(CastResult::failed(gas_used, reason))
        }
    }
}

/// Routes an incoming call frame to the account. Empty calldata is a plain
/// value transfer; the only callable surface mid-transaction is the
/// flashloan callback.
pub(crate) fn handle_call(
    chain: &mut Chain,
    account: Address,
    ctx: &CallContext,
) -> Result<Bytes, Revert> {
    if ctx.data.is_empty() {
        return Ok(Bytes::new());
    }

    if let Ok(call) = IFlashloanReceiver::executeOperationCall::abi_decode(&ctx.data) {
        execute_operation(chain, account, ctx.caller, &call.actions_)?;
        return Ok(true.abi_encode().into());
    }

    Err(Revert::new("unknown call to avocado account"))
}

/// The flashloan callback: executes the inner actions while the reentry
/// guard is armed for exactly this (account, provider) pair, at most once.
fn execute_operation(
    chain: &mut Chain,
    account: Address,
    caller: Address,
    actions: &[crate::types::Action],
) -> Result<(), Revert> {
    {
        let Some(guard) = chain.transient.reentry_mut() else {
            return Err(Revert::new("no flashloan in progress"));
        };
        if guard.account != account {
            return Err(Revert::new("flashloan callback for a different account"));
        }
        if guard.provider != caller {
            return Err(Revert::new("caller is not the flashloan provider"));
        }
        if guard.entered {
            return Err(Revert::new("flashloan callback already entered"));
        }
        guard.entered = true;
    }

    execute::execute_callback_actions(chain, account, actions)
}

/// Dispatches an action targeting the account itself against its admin
/// surface. Only reachable from inside a cast, so the mutation is already
/// authorized by the cast's own signatures and rolls back with the cast.
pub(crate) fn dispatch_self_call(
    chain: &mut Chain,
    account: Address,
    data: &[u8],
) -> Result<Bytes, Revert> {
    let call = IAvocadoMultisig::IAvocadoMultisigCalls::abi_decode(data)
        .map_err(|_| Revert::new("unknown self-call"))?;

    let as_revert = |err: AccountError| Revert::new(err.to_string());

    match call {
        IAvocadoMultisig::IAvocadoMultisigCalls::addSigners(inner) => {
            let state = state_mut(chain, account)?;
            state.signers.add(&inner.addSigners_, inner.requiredSigners_).map_err(as_revert)?;
            for signer in inner.addSigners_ {
                chain.emit(Event::SignerAdded { account, signer });
            }
            chain.emit(Event::RequiredSignersSet {
                account,
                required_signers: inner.requiredSigners_,
            });
        }
        IAvocadoMultisig::IAvocadoMultisigCalls::removeSigners(inner) => {
            let state = state_mut(chain, account)?;
            state.signers.remove(&inner.removeSigners_, inner.requiredSigners_).map_err(as_revert)?;
            for signer in inner.removeSigners_ {
                chain.emit(Event::SignerRemoved { account, signer });
            }
            chain.emit(Event::RequiredSignersSet {
                account,
                required_signers: inner.requiredSigners_,
            });
        }
        IAvocadoMultisig::IAvocadoMultisigCalls::setRequiredSigners(inner) => {
            let state = state_mut(chain, account)?;
            state.signers.set_required(inner.requiredSigners_).map_err(as_revert)?;
            chain.emit(Event::RequiredSignersSet {
                account,
                required_signers: inner.requiredSigners_,
            });
        }
        IAvocadoMultisig::IAvocadoMultisigCalls::occupyNonSequentialNonces(inner) => {
            let state = state_mut(chain, account)?;
            state.nonce.occupy(&inner.nonces_).map_err(|err| Revert::new(err.to_string()))?;
        }
        IAvocadoMultisig::IAvocadoMultisigCalls::upgradeTo(inner) => {
            if !chain.registry().is_version_allowed(inner.avoImplementation_, true) {
                return Err(as_revert(AccountError::VersionNotAllowed(inner.avoImplementation_)));
            }
            let state = state_mut(chain, account)?;
            state.implementation = inner.avoImplementation_;
        }
    }

    Ok(Bytes::new())
}

fn state_mut<'a>(
    chain: &'a mut Chain,
    account: Address,
) -> Result<&'a mut crate::types::AvocadoAccount, Revert> {
    chain
        .account_mut(account)
        .ok_or_else(|| Revert::new(AccountError::UnknownAccount(account).to_string()))
}

//! Batched action execution.
//!
//! Actions run in order with the account itself as the caller of every
//! target. The cast either dispatches all actions or — on the first failure
//! — rolls their effects back wholesale; that policy lives in the account
//! pipeline, this module owns per-action dispatch and the flashloan reentry
//! guard.
//!
//! The guard is transient, single-transaction state: it must sit at its
//! sentinel (empty) value before dispatch begins and after it completes,
//! on success and failure alike. A flashloan marker arms it around the
//! provider frame; while armed, delegatecalls are refused so an untrusted
//! provider cannot steer delegatecall targets mid-cast.

use crate::{
    account,
    chain::{CallContext, Chain, Revert},
    constants::{ACTION_GAS, CALLDATA_BYTE_GAS, CAST_BASE_GAS},
    types::{Action, CastParams, Operation},
};
use alloy::primitives::{Address, U256};

/// Per-transaction transient state of the flashloan reentry guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientState {
    reentry: Option<ReentryGuard>,
}

impl TransientState {
    /// Whether the guard sits at its sentinel (empty) value.
    pub fn is_empty(&self) -> bool {
        self.reentry.is_none()
    }

    pub(crate) fn reentry_mut(&mut self) -> Option<&mut ReentryGuard> {
        self.reentry.as_mut()
    }

    pub(crate) fn arm(&mut self, guard: ReentryGuard) {
        debug_assert!(self.reentry.is_none());
        self.reentry = Some(guard);
    }

    pub(crate) fn reset(&mut self) {
        self.reentry = None;
    }
}

/// Armed while a flashloan marker's provider frame is on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReentryGuard {
    /// The account mid-cast.
    pub(crate) account: Address,
    /// The provider allowed to re-enter it once.
    pub(crate) provider: Address,
    /// Set on the first callback; a second one is refused.
    pub(crate) entered: bool,
}

/// Deterministic synthetic gas of a cast: a base charge plus per-action and
/// per-calldata-byte charges. Deterministic so the fee bound of authorized
/// casts can be checked before dispatch.
pub fn estimate_gas(params: &CastParams) -> u64 {
    CAST_BASE_GAS
        + params
            .actions
            .iter()
            .map(|action| ACTION_GAS + action.data.len() as u64 * CALLDATA_BYTE_GAS)
            .sum::<u64>()
}

/// Executes a cast's actions in order, stopping at the first failure.
pub(crate) fn execute_actions(
    chain: &mut Chain,
    account: Address,
    actions: &[Action],
) -> Result<(), (usize, Revert)> {
    for (index, action) in actions.iter().enumerate() {
        dispatch(chain, account, action).map_err(|revert| (index, revert))?;
    }
    Ok(())
}

fn dispatch(chain: &mut Chain, account: Address, action: &Action) -> Result<(), Revert> {
    match action.operation().map_err(|err| Revert::new(err.to_string()))? {
        Operation::Call => dispatch_call(chain, account, action).map(drop),
        Operation::DelegateCall => {
            if !chain.transient.is_empty() {
                return Err(Revert::new(
                    "invalid operation: delegatecall while the flashloan reentry guard is armed",
                ));
            }
            chain
                .execute_frame(
                    action.target,
                    CallContext {
                        caller: account,
                        this: account,
                        value: U256::ZERO,
                        data: action.data.clone(),
                        operation: Operation::DelegateCall,
                    },
                )
                .map(drop)
        }
        Operation::FlashloanMarker => {
            if !chain.transient.is_empty() {
                return Err(Revert::new("invalid operation: nested flashloan"));
            }
            chain.transient.arm(ReentryGuard {
                account,
                provider: action.target,
                entered: false,
            });
            // the provider may synchronously call back into the account
            // exactly once while the guard is armed
            let result = chain.execute_frame(
                action.target,
                CallContext {
                    caller: account,
                    this: action.target,
                    value: action.value,
                    data: action.data.clone(),
                    operation: Operation::Call,
                },
            );
            chain.transient.reset();
            result.map(drop)
        }
    }
}

/// Inner actions of a flashloan callback. Only plain calls are permitted
/// here: the guard is armed, so delegatecalls (and nested markers) are
/// refused to keep the provider from steering the account's identity.
pub(crate) fn execute_callback_actions(
    chain: &mut Chain,
    account: Address,
    actions: &[Action],
) -> Result<(), Revert> {
    for action in actions {
        match action.operation().map_err(|err| Revert::new(err.to_string()))? {
            Operation::Call => dispatch_call(chain, account, action).map(drop)?,
            Operation::DelegateCall => {
                return Err(Revert::new(
                    "invalid operation: delegatecall during a flashloan callback",
                ));
            }
            Operation::FlashloanMarker => {
                return Err(Revert::new(
                    "invalid operation: flashloan marker during a flashloan callback",
                ));
            }
        }
    }
    Ok(())
}

/// Plain call dispatch; calls targeting the account itself route to its
/// self-call admin surface instead of a frame.
fn dispatch_call(
    chain: &mut Chain,
    account: Address,
    action: &Action,
) -> Result<alloy::primitives::Bytes, Revert> {
    if action.target == account {
        return account::dispatch_self_call(chain, account, &action.data);
    }
    chain.execute_frame(
        action.target,
        CallContext {
            caller: account,
            this: action.target,
            value: action.value,
            data: action.data.clone(),
            operation: Operation::Call,
        },
    )
}

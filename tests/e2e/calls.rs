//! Action builders for common calls.

use crate::e2e::fixtures::{FlashloanParams, IERC20};
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol_types::{SolCall, SolValue},
};
use avocado::types::{Action, IAvocadoMultisig};

/// An ERC20 `transfer` call action.
pub fn transfer_erc20(token: Address, to: Address, amount: U256) -> Action {
    Action {
        target: token,
        data: IERC20::transferCall { to, amount }.abi_encode().into(),
        value: U256::ZERO,
        operation: U256::ZERO,
    }
}

/// A plain native transfer action.
pub fn transfer_native(to: Address, amount: U256) -> Action {
    Action { target: to, data: Bytes::new(), value: amount, operation: U256::ZERO }
}

/// A plain call action with raw calldata.
pub fn call(target: Address, data: Bytes) -> Action {
    Action { target, data, value: U256::ZERO, operation: U256::ZERO }
}

/// A delegatecall action.
pub fn delegatecall(target: Address) -> Action {
    Action { target, data: Bytes::new(), value: U256::ZERO, operation: U256::from(1) }
}

/// A flashloan marker action borrowing `amount` from `provider` and running
/// `actions` from inside the callback.
pub fn flashloan(provider: Address, amount: U256, actions: Vec<Action>) -> Action {
    Action {
        target: provider,
        data: FlashloanParams { amount, actions }.abi_encode().into(),
        value: U256::ZERO,
        operation: U256::from(2),
    }
}

/// A self-call adding signers.
pub fn add_signers(avocado: Address, signers: Vec<Address>, required: u8) -> Action {
    call(
        avocado,
        IAvocadoMultisig::addSignersCall { addSigners_: signers, requiredSigners_: required }
            .abi_encode()
            .into(),
    )
}

/// A self-call removing signers.
pub fn remove_signers(avocado: Address, signers: Vec<Address>, required: u8) -> Action {
    call(
        avocado,
        IAvocadoMultisig::removeSignersCall { removeSigners_: signers, requiredSigners_: required }
            .abi_encode()
            .into(),
    )
}

/// A self-call updating the threshold.
pub fn set_required_signers(avocado: Address, required: u8) -> Action {
    call(
        avocado,
        IAvocadoMultisig::setRequiredSignersCall { requiredSigners_: required }.abi_encode().into(),
    )
}

/// A self-call pre-burning non-sequential nonces.
pub fn occupy_nonces(avocado: Address, nonces: Vec<B256>) -> Action {
    call(
        avocado,
        IAvocadoMultisig::occupyNonSequentialNoncesCall { nonces_: nonces }.abi_encode().into(),
    )
}

/// A self-call upgrading the implementation.
pub fn upgrade_to(avocado: Address, implementation: Address) -> Action {
    call(
        avocado,
        IAvocadoMultisig::upgradeToCall { avoImplementation_: implementation }.abi_encode().into(),
    )
}

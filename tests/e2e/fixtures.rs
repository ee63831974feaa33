//! External contract fixtures registered in the test environment.

use alloy::{
    primitives::{Address, B256, Bytes, FixedBytes, Signature, U256},
    signers::local::PrivateKeySigner,
    sol,
    sol_types::{SolCall, SolValue},
};
use avocado::{
    chain::{CallContext, Chain, Contract, Revert},
    constants::EIP1271_MAGIC_VALUE,
    signers::Erc1271Signer,
    types::{Action, IFlashloanReceiver, Operation},
};
use std::sync::Arc;

sol! {
    /// Minimal ERC20 surface used by the fixtures.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);
    }

    /// Payload of a flashloan marker action: the amount to borrow and the
    /// callback actions the provider hands back to the account.
    struct FlashloanParams {
        uint256 amount;
        Action[] actions;
    }
}

/// Storage-backed token.
#[derive(Debug)]
pub struct Erc20;

impl Erc20 {
    fn slot(holder: Address) -> B256 {
        B256::left_padding_from(holder.as_slice())
    }

    pub fn mint(chain: &mut Chain, token: Address, to: Address, amount: U256) {
        let balance = Self::balance_of(chain, token, to) + amount;
        chain.sstore(token, Self::slot(to), B256::from(balance.to_be_bytes::<32>()));
    }

    pub fn balance_of(chain: &Chain, token: Address, holder: Address) -> U256 {
        U256::from_be_bytes(chain.sload(token, Self::slot(holder)).0)
    }
}

impl Contract for Erc20 {
    fn call(&self, chain: &mut Chain, ctx: &CallContext) -> Result<Bytes, Revert> {
        let token = ctx.this;
        if let Ok(call) = IERC20::transferCall::abi_decode(&ctx.data) {
            let from = Self::balance_of(chain, token, ctx.caller);
            if from < call.amount {
                return Err(Revert::new("erc20: balance too low"));
            }
            chain.sstore(
                token,
                Self::slot(ctx.caller),
                B256::from((from - call.amount).to_be_bytes::<32>()),
            );
            let to = Self::balance_of(chain, token, call.to);
            chain.sstore(token, Self::slot(call.to), B256::from((to + call.amount).to_be_bytes::<32>()));
            return Ok(true.abi_encode().into());
        }
        if let Ok(call) = IERC20::balanceOfCall::abi_decode(&ctx.data) {
            return Ok(Self::balance_of(chain, token, call.owner).abi_encode().into());
        }
        Err(Revert::new("erc20: unknown call"))
    }
}

pub fn register_erc20(chain: &mut Chain, at: Address) {
    chain.register_contract(at, Arc::new(Erc20));
}

/// Reverts every call; doubles as a fee collector that rejects payment.
#[derive(Debug)]
pub struct Rejecting;

impl Contract for Rejecting {
    fn call(&self, _chain: &mut Chain, _ctx: &CallContext) -> Result<Bytes, Revert> {
        Err(Revert::new("rejected"))
    }
}

pub fn register_rejecting(chain: &mut Chain, at: Address) {
    chain.register_contract(at, Arc::new(Rejecting));
}

/// Increments a counter in the storage space of the executing identity, so
/// delegatecalled increments land on the account, not the counter contract.
#[derive(Debug)]
pub struct Counter;

impl Counter {
    const SLOT: B256 = B256::ZERO;

    pub fn count(chain: &Chain, identity: Address) -> U256 {
        U256::from_be_bytes(chain.sload(identity, Self::SLOT).0)
    }
}

impl Contract for Counter {
    fn call(&self, chain: &mut Chain, ctx: &CallContext) -> Result<Bytes, Revert> {
        let count = Self::count(chain, ctx.this) + U256::from(1);
        chain.sstore(ctx.this, Self::SLOT, B256::from(count.to_be_bytes::<32>()));
        Ok(Bytes::new())
    }
}

pub fn register_counter(chain: &mut Chain, at: Address) {
    chain.register_contract(at, Arc::new(Counter));
}

/// Native-currency flashloan provider: lends the requested amount, calls the
/// borrower back with the inner actions, and reverts unless it was repaid by
/// the time the callback returns.
#[derive(Debug)]
pub struct FlashloanProvider;

impl Contract for FlashloanProvider {
    fn call(&self, chain: &mut Chain, ctx: &CallContext) -> Result<Bytes, Revert> {
        let params = FlashloanParams::abi_decode(&ctx.data)
            .map_err(|_| Revert::new("flashloan: bad params"))?;
        let provider = ctx.this;
        let borrower = ctx.caller;

        let before = chain.balance_of(provider);
        chain.transfer(provider, borrower, params.amount)?;

        let callback = IFlashloanReceiver::executeOperationCall {
            actions_: params.actions,
            data_: Bytes::new(),
        };
        chain.execute_frame(
            borrower,
            CallContext {
                caller: provider,
                this: borrower,
                value: U256::ZERO,
                data: callback.abi_encode().into(),
                operation: Operation::Call,
            },
        )?;

        if chain.balance_of(provider) < before {
            return Err(Revert::new("flashloan: not repaid"));
        }
        Ok(Bytes::new())
    }
}

pub fn register_flashloan_provider(chain: &mut Chain, at: Address, liquidity: U256) {
    chain.fund(at, liquidity);
    chain.register_contract(at, Arc::new(FlashloanProvider));
}

/// ERC-1271 contract signer backed by a local key.
#[derive(Debug)]
pub struct KeyBacked1271 {
    key: PrivateKeySigner,
}

impl KeyBacked1271 {
    pub fn new(key: PrivateKeySigner) -> Self {
        Self { key }
    }
}

impl Erc1271Signer for KeyBacked1271 {
    fn is_valid_signature(
        &self,
        digest: B256,
        signature: &Bytes,
    ) -> Result<FixedBytes<4>, Revert> {
        let signature = Signature::try_from(signature.as_ref())
            .map_err(|_| Revert::new("1271: malformed signature"))?;
        let recovered = signature
            .recover_address_from_prehash(&digest)
            .map_err(|_| Revert::new("1271: recovery failed"))?;
        if recovered != self.key.address() {
            return Err(Revert::new("1271: unknown key"));
        }
        Ok(FixedBytes::from(EIP1271_MAGIC_VALUE))
    }
}

//! In-memory chain environment.
//!
//! There is no EVM underneath this crate, so the execution substrate is
//! modeled explicitly: native balances, deployed Avocado accounts, external
//! contracts as trait objects with a key-value storage space, an append-only
//! event log and the per-transaction transient state of the reentry guard.
//!
//! Execution is single-threaded per transaction; all-or-nothing action
//! semantics are implemented with [`Chain::snapshot`] / [`Chain::revert_to`].

use crate::{
    account,
    execute::TransientState,
    registry::AvoRegistry,
    signers::Erc1271Signer,
    signers_list::AvoSignersList,
    types::{AccountId, AvocadoAccount, Event, Operation},
};
use alloy::primitives::{
    Address, B256, Bytes, U256,
    map::{AddressHashMap, B256HashMap, HashMap},
};
use std::{fmt, sync::Arc};
use tracing::trace;

/// Revert reason of a failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revert(pub String);

impl Revert {
    /// Creates a revert reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revert {
    fn from(reason: &str) -> Self {
        Self(reason.to_string())
    }
}

impl From<String> for Revert {
    fn from(reason: String) -> Self {
        Self(reason)
    }
}

/// Execution context of one call frame.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// The calling identity.
    pub caller: Address,
    /// The identity the code executes as: the target for a call, the
    /// account itself for a delegatecall.
    pub this: Address,
    /// Native value moved with the call (always zero for delegatecalls).
    pub value: U256,
    /// The calldata bytes.
    pub data: Bytes,
    /// How the frame was entered.
    pub operation: Operation,
}

/// An external contract registered in the environment.
///
/// Implementations are stateless logic; durable state belongs in the
/// environment's storage space ([`Chain::sload`] / [`Chain::sstore`]) or
/// balances so cast-level rollback covers it.
pub trait Contract: fmt::Debug + Send + Sync {
    /// Executes the contract with the given frame context.
    fn call(&self, chain: &mut Chain, ctx: &CallContext) -> Result<Bytes, Revert>;
}

/// Rollback point returned by [`Chain::snapshot`].
#[derive(Debug, Clone)]
pub struct Snapshot {
    balances: AddressHashMap<U256>,
    accounts: AddressHashMap<AvocadoAccount>,
    account_index: HashMap<AccountId, Address>,
    storage: AddressHashMap<B256HashMap<B256>>,
    events_len: usize,
}

/// The in-memory chain environment.
#[derive(Debug)]
pub struct Chain {
    chain_id: u64,
    timestamp: u64,
    balances: AddressHashMap<U256>,
    accounts: AddressHashMap<AvocadoAccount>,
    account_index: HashMap<AccountId, Address>,
    contracts: AddressHashMap<Arc<dyn Contract>>,
    contract_signers: AddressHashMap<Arc<dyn Erc1271Signer>>,
    storage: AddressHashMap<B256HashMap<B256>>,
    events: Vec<Event>,
    registry: AvoRegistry,
    signers_list: Arc<AvoSignersList>,
    pub(crate) transient: TransientState,
}

impl Chain {
    /// Creates an empty environment for `chain_id`.
    pub fn new(chain_id: u64, registry: AvoRegistry) -> Self {
        Self {
            chain_id,
            timestamp: 1,
            balances: Default::default(),
            accounts: Default::default(),
            account_index: Default::default(),
            contracts: Default::default(),
            contract_signers: Default::default(),
            storage: Default::default(),
            events: Vec::new(),
            registry,
            signers_list: Arc::new(AvoSignersList::default()),
            transient: TransientState::default(),
        }
    }

    /// The environment's chain id.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The current block timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Sets the block timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// The registry collaborator.
    pub fn registry(&self) -> &AvoRegistry {
        &self.registry
    }

    /// Mutable access to the registry collaborator.
    pub fn registry_mut(&mut self) -> &mut AvoRegistry {
        &mut self.registry
    }

    /// The signers-list side index.
    pub fn signers_list(&self) -> &Arc<AvoSignersList> {
        &self.signers_list
    }

    /// The per-transaction transient state of the reentry guard.
    pub fn transient(&self) -> &TransientState {
        &self.transient
    }

    // === balances ===

    /// The native balance of `address`.
    pub fn balance_of(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }

    /// Mints native balance onto `address`.
    pub fn fund(&mut self, address: Address, amount: U256) {
        *self.balances.entry(address).or_default() += amount;
    }

    /// Moves native balance between addresses.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.balances.entry(from).or_default();
        if *balance < amount {
            return Err(Revert::new(format!("insufficient balance of {from}")));
        }
        *balance -= amount;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    // === accounts ===

    /// The account deployed at `address`, if any.
    pub fn account(&self, address: Address) -> Option<&AvocadoAccount> {
        self.accounts.get(&address)
    }

    /// Mutable access to the account deployed at `address`.
    pub fn account_mut(&mut self, address: Address) -> Option<&mut AvocadoAccount> {
        self.accounts.get_mut(&address)
    }

    /// Whether an Avocado account is deployed at `address`.
    pub fn is_avocado(&self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    /// The deployed address of `id`, if any.
    pub fn address_of(&self, id: AccountId) -> Option<Address> {
        self.account_index.get(&id).copied()
    }

    /// Records a freshly deployed account. Used by the factory only.
    pub(crate) fn insert_account(&mut self, address: Address, account: AvocadoAccount) {
        self.account_index.insert(account.id, address);
        self.accounts.insert(address, account);
    }

    // === contracts & storage ===

    /// Registers an external contract at `address`.
    pub fn register_contract(&mut self, address: Address, contract: Arc<dyn Contract>) {
        self.contracts.insert(address, contract);
    }

    /// Registers an ERC-1271 contract signer at `address`.
    pub fn register_contract_signer(&mut self, address: Address, signer: Arc<dyn Erc1271Signer>) {
        self.contract_signers.insert(address, signer);
    }

    /// The ERC-1271 implementation registered at `address`, if any.
    pub fn contract_signer(&self, address: Address) -> Option<Arc<dyn Erc1271Signer>> {
        self.contract_signers.get(&address).cloned()
    }

    /// Whether any code (contract or account) lives at `address`.
    pub fn has_code(&self, address: Address) -> bool {
        self.contracts.contains_key(&address) || self.is_avocado(address)
    }

    /// Reads a storage word of `contract`.
    pub fn sload(&self, contract: Address, key: B256) -> B256 {
        self.storage.get(&contract).and_then(|slots| slots.get(&key)).copied().unwrap_or_default()
    }

    /// Writes a storage word of `contract`.
    pub fn sstore(&mut self, contract: Address, key: B256, value: B256) {
        self.storage.entry(contract).or_default().insert(key, value);
    }

    // === events ===

    /// The append-only event log.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Appends an event to the log.
    pub fn emit(&mut self, event: Event) {
        trace!(?event, "emit");
        self.events.push(event);
    }

    // === execution ===

    /// Executes one call frame.
    ///
    /// `code` is the address whose logic runs; for delegatecalls it differs
    /// from `ctx.this`. Value moves caller → `ctx.this` before the frame runs
    /// (delegatecalls are value-less by construction). Frames targeting an
    /// address without code succeed as plain transfers, like on-chain.
    pub fn execute_frame(&mut self, code: Address, ctx: CallContext) -> Result<Bytes, Revert> {
        debug_assert!(ctx.operation != Operation::DelegateCall || ctx.value.is_zero());

        if ctx.operation != Operation::DelegateCall {
            self.transfer(ctx.caller, ctx.this, ctx.value)?;
        }

        if self.is_avocado(code) {
            return account::handle_call(self, code, &ctx);
        }

        match self.contracts.get(&code).cloned() {
            Some(contract) => contract.call(self, &ctx),
            None => Ok(Bytes::new()),
        }
    }

    // === snapshots ===

    /// Captures a rollback point covering balances, account state, contract
    /// storage and the event log. The transient reentry state is deliberately
    /// not covered: it must be reset explicitly on every exit path, and
    /// [`TransientState::is_empty`] is asserted around every cast.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balances: self.balances.clone(),
            accounts: self.accounts.clone(),
            account_index: self.account_index.clone(),
            storage: self.storage.clone(),
            events_len: self.events.len(),
        }
    }

    /// Restores a rollback point.
    pub fn revert_to(&mut self, snapshot: Snapshot) {
        self.balances = snapshot.balances;
        self.accounts = snapshot.accounts;
        self.account_index = snapshot.account_index;
        self.storage = snapshot.storage;
        self.events.truncate(snapshot.events_len);
    }
}

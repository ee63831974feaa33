//! Shared test environment: a seeded chain, a forwarder and sorted signer
//! keys.

use crate::e2e::fixtures::{self, Erc20};
use alloy::{
    primitives::{Address, B256, Bytes, I256, U256},
    signers::{SignerSync, local::PrivateKeySigner},
};
use avocado::{
    chain::Chain,
    eip712,
    error::AvocadoError,
    factory::AvoFactory,
    forwarder::AvoForwarder,
    registry::{AvoRegistry, FeeConfig},
    types::{
        Action, CastAuthorizedParams, CastChainAgnosticParams, CastForwardParams, CastParams,
        CastResult, ChainAgnosticHash, ExecuteParameters, SignatureParams,
    },
};

/// Chain id the default environment reports.
pub const CHAIN_ID: u64 = 1;

/// Implementation version accounts are deployed with.
pub const IMPL_V1: Address = Address::with_last_byte(0x01);

/// Gas the test broadcaster attaches to relayed casts.
pub const GAS_LIMIT: u64 = 30_000_000;

pub struct Env {
    pub chain: Chain,
    pub forwarder: AvoForwarder,
    pub broadcaster: Address,
    /// The owner key of the default account.
    pub owner: PrivateKeySigner,
    /// Co-signer keys, sorted ascending by address (owner not included).
    pub cosigners: Vec<PrivateKeySigner>,
    /// An ERC20-style token, pre-funded for the default account.
    pub erc20: Address,
}

impl Env {
    /// A fresh environment with the default (zero) fee configuration.
    pub fn new() -> Self {
        Self::with_fee(FeeConfig::default())
    }

    /// A fresh environment with the given fee configuration.
    pub fn with_fee(fee: FeeConfig) -> Self {
        let broadcaster = Address::with_last_byte(0xb0);
        let mut chain = Chain::new(CHAIN_ID, AvoRegistry::new(IMPL_V1, fee));
        chain.set_timestamp(1_700_000_000);
        chain.fund(broadcaster, U256::from(10u128.pow(24)));

        let owner = PrivateKeySigner::random();
        let mut cosigners: Vec<_> = (0..4).map(|_| PrivateKeySigner::random()).collect();
        cosigners.sort_by_key(|signer| signer.address());

        let erc20 = Address::with_last_byte(0xe2);
        fixtures::register_erc20(&mut chain, erc20);
        // seed the default account with tokens and native balance
        let avocado = AvoFactory::compute_address(owner.address(), 0);
        Erc20::mint(&mut chain, erc20, avocado, U256::from(1_000));
        chain.fund(avocado, U256::from(10u128.pow(21)));

        Self {
            chain,
            forwarder: AvoForwarder::new(broadcaster).with_gas_limit(GAS_LIMIT),
            broadcaster,
            owner,
            cosigners,
            erc20,
        }
    }

    /// The deterministic address of the default account.
    pub fn avocado(&self) -> Address {
        AvoFactory::compute_address(self.owner.address(), 0)
    }

    /// All keys that may co-sign for the default account once added:
    /// owner plus cosigners, ascending by address.
    pub fn all_signers(&self) -> Vec<&PrivateKeySigner> {
        let mut signers: Vec<_> =
            self.cosigners.iter().chain(std::iter::once(&self.owner)).collect();
        signers.sort_by_key(|signer| signer.address());
        signers
    }

    /// Default forward params: open validity window, no required gas.
    pub fn forward_params(&self) -> CastForwardParams {
        CastForwardParams::default()
    }

    /// Cast params carrying the account's current sequential nonce.
    pub fn next_params(&self, actions: Vec<Action>) -> CastParams {
        let nonce = self
            .chain
            .account(self.avocado())
            .map(|account| account.nonce.sequential())
            .unwrap_or_default();
        CastParams { actions, avoNonce: I256::from_raw(nonce), ..Default::default() }
    }

    /// Wraps signed cast pieces into RPC execute parameters for the default
    /// account.
    pub fn execute_params(
        &self,
        params: CastParams,
        forward_params: CastForwardParams,
        signatures: Vec<SignatureParams>,
    ) -> ExecuteParameters {
        ExecuteParameters {
            owner: self.owner.address(),
            index: 0,
            params,
            forward_params,
            signatures,
        }
    }

    /// Signs with `signers` and executes a forwarded cast in one go.
    pub fn cast(
        &mut self,
        params: CastParams,
        signers: &[&PrivateKeySigner],
    ) -> Result<CastResult, AvocadoError> {
        let forward_params = self.forward_params();
        let signatures = self.sign_cast(&params, &forward_params, signers);
        let parameters = self.execute_params(params, forward_params, signatures);
        self.forwarder.execute(&mut self.chain, &parameters)
    }

    /// Signs a forwarded cast for the default account with each signer, in
    /// the given order.
    pub fn sign_cast(
        &self,
        params: &CastParams,
        forward_params: &CastForwardParams,
        signers: &[&PrivateKeySigner],
    ) -> Vec<SignatureParams> {
        let digest =
            eip712::cast_digest(self.chain.chain_id(), self.avocado(), params, forward_params);
        signers.iter().map(|signer| sign_digest(signer, digest)).collect()
    }

    /// Signs an authorized cast for the default account.
    pub fn sign_cast_authorized(
        &self,
        params: &CastParams,
        authorized_params: &CastAuthorizedParams,
        signers: &[&PrivateKeySigner],
    ) -> Vec<SignatureParams> {
        let digest = eip712::cast_authorized_digest(
            self.chain.chain_id(),
            self.avocado(),
            params,
            authorized_params,
        );
        signers.iter().map(|signer| sign_digest(signer, digest)).collect()
    }

    /// Signs a chain-agnostic entry array for the default account and
    /// returns the signatures plus the per-entry hash list verifiers need.
    pub fn sign_chain_agnostic(
        &self,
        entries: &[CastChainAgnosticParams],
        signers: &[&PrivateKeySigner],
    ) -> (Vec<SignatureParams>, Vec<ChainAgnosticHash>) {
        let digest = eip712::chain_agnostic_digest(self.avocado(), entries);
        let hashes = entries
            .iter()
            .map(|entry| ChainAgnosticHash {
                hash: eip712::chain_agnostic_entry_hash(entry),
                chain_id: entry.chainId,
            })
            .collect();
        (signers.iter().map(|signer| sign_digest(signer, digest)).collect(), hashes)
    }
}

/// Signs a raw digest, EOA-style.
pub fn sign_digest(signer: &PrivateKeySigner, digest: B256) -> SignatureParams {
    let signature = signer.sign_hash_sync(&digest).expect("signing can not fail");
    SignatureParams { signature: Bytes::from(signature.as_bytes()), signer: signer.address() }
}

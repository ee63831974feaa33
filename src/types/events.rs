//! Chain event log entries.
//!
//! One cast attempt emits exactly one success or failure event, never one per
//! action; `source` and `metadata` are carried through untouched so off-chain
//! consumers can attribute casts.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// An entry of the chain environment's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// All actions of a cast executed.
    #[serde(rename_all = "camelCase")]
    CastExecuted {
        /// The account that cast.
        account: Address,
        /// The submitting caller (broadcaster or account itself).
        caller: Address,
        /// Attribution source from the cast params.
        source: Address,
        /// Attribution metadata from the cast params.
        metadata: Bytes,
    },
    /// A cast was dispatched but an action reverted; all action effects were
    /// rolled back, the nonce stayed consumed.
    #[serde(rename_all = "camelCase")]
    CastFailed {
        /// The account that cast.
        account: Address,
        /// The submitting caller (broadcaster or account itself).
        caller: Address,
        /// Attribution source from the cast params.
        source: Address,
        /// First failing action's revert reason, prefixed by its index.
        reason: String,
        /// Attribution metadata from the cast params.
        metadata: Bytes,
    },
    /// The protocol fee of an authorized cast was settled.
    #[serde(rename_all = "camelCase")]
    FeePaid {
        /// The paying account.
        account: Address,
        /// The fee amount in native currency.
        amount: U256,
        /// The collector that received it.
        collector: Address,
    },
    /// Forwarder-level success marker for a relayed cast.
    #[serde(rename_all = "camelCase")]
    Executed {
        /// Owner of the target account.
        owner: Address,
        /// Index of the target account.
        index: u32,
        /// The target account address.
        avocado: Address,
        /// Attribution source from the cast params.
        source: Address,
        /// Attribution metadata from the cast params.
        metadata: Bytes,
    },
    /// Forwarder-level failure marker for a relayed cast.
    #[serde(rename_all = "camelCase")]
    ExecuteFailed {
        /// Owner of the target account.
        owner: Address,
        /// Index of the target account.
        index: u32,
        /// The target account address.
        avocado: Address,
        /// Attribution source from the cast params.
        source: Address,
        /// First failing action's revert reason, prefixed by its index.
        reason: String,
        /// Attribution metadata from the cast params.
        metadata: Bytes,
    },
    /// A new account was deployed at its deterministic address.
    #[serde(rename_all = "camelCase")]
    AvocadoDeployed {
        /// Owner of the new account.
        owner: Address,
        /// Index of the new account.
        index: u32,
        /// The deployed address.
        avocado: Address,
    },
    /// A signer was added to an account.
    #[serde(rename_all = "camelCase")]
    SignerAdded {
        /// The mutated account.
        account: Address,
        /// The added signer.
        signer: Address,
    },
    /// A signer was removed from an account.
    #[serde(rename_all = "camelCase")]
    SignerRemoved {
        /// The mutated account.
        account: Address,
        /// The removed signer.
        signer: Address,
    },
    /// The signature threshold of an account changed.
    #[serde(rename_all = "camelCase")]
    RequiredSignersSet {
        /// The mutated account.
        account: Address,
        /// The new threshold.
        required_signers: u8,
    },
}

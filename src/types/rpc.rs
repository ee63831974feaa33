//! Parameter and response types of the `avocado_` RPC namespace.

use super::{
    CastAuthorizedParams, CastChainAgnosticParams, CastForwardParams, CastParams,
    ChainAgnosticHash, SignatureParams,
};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Parameters of a forwarded (relayer-paid) cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteParameters {
    /// Owner of the target account.
    pub owner: Address,
    /// Index of the target account.
    #[serde(default)]
    pub index: u32,
    /// The cast parameters.
    pub params: CastParams,
    /// The forward parameters.
    pub forward_params: CastForwardParams,
    /// Threshold signatures, strictly ascending by signer.
    pub signatures: Vec<SignatureParams>,
}

/// Parameters of an authorized (self-paying) cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastAuthorizedParameters {
    /// Owner of the target account.
    pub owner: Address,
    /// Index of the target account.
    #[serde(default)]
    pub index: u32,
    /// The cast parameters.
    pub params: CastParams,
    /// The authorized parameters.
    pub authorized_params: CastAuthorizedParams,
    /// Threshold signatures, strictly ascending by signer.
    pub signatures: Vec<SignatureParams>,
}

/// Parameters of a chain-agnostic cast: this chain's entry plus the hashes
/// of every entry the signature covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAgnosticParameters {
    /// Owner of the target account.
    pub owner: Address,
    /// Index of the target account.
    #[serde(default)]
    pub index: u32,
    /// The entry to execute on this chain.
    pub params: CastChainAgnosticParams,
    /// Threshold signatures, strictly ascending by signer.
    pub signatures: Vec<SignatureParams>,
    /// Ordered hashes of every per-chain entry covered by the signature.
    pub chain_agnostic_hashes: Vec<ChainAgnosticHash>,
}

/// Outcome of a dispatched cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastResult {
    /// Whether all actions executed.
    pub success: bool,
    /// Synthetic gas consumed by the cast.
    pub gas_used: u64,
    /// First failing action's revert reason, prefixed by its index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
}

impl CastResult {
    /// A successful cast outcome.
    pub fn ok(gas_used: u64) -> Self {
        Self { success: true, gas_used, revert_reason: None }
    }

    /// A failed cast outcome with the aggregated revert reason.
    pub fn failed(gas_used: u64, reason: impl Into<String>) -> Self {
        Self { success: false, gas_used, revert_reason: Some(reason.into()) }
    }
}

/// One entry of an `avocado_executeBatch` request.
pub type BatchEntry = ExecuteParameters;

/// Outcome of one batch entry.
///
/// Structural failures of one entry surface here as `error` instead of
/// failing the whole RPC call, so independent entries can still report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// The dispatched outcome, absent when the entry failed structurally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CastResult>,
    /// Structural failure reason, absent when the entry was dispatched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a simulated cast. State is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Whether the cast would have succeeded.
    pub success: bool,
    /// Synthetic gas the cast would consume.
    pub estimated_gas: u64,
    /// Failure reason, structural or action-level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
    /// Whether the target account would be deployed as part of the call.
    pub would_deploy: bool,
}

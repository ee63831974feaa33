//! Cast request types.
//!
//! These structs are the EIP-712 typed schemas every Avocado account signs
//! over, declared with `sol!` so struct hashing follows the standard
//! encoding. A cast is one signed batch-execution request: an ordered action
//! list plus the mode-specific parameters of the path it travels (forwarded,
//! authorized, or chain-agnostic).

use crate::{
    constants::{CAST_ID_CALL, CAST_ID_FLASHLOAN_CALL, CAST_ID_FLASHLOAN_MIXED, CAST_ID_MIXED},
    error::CastError,
};
use alloy::{
    primitives::{Address, I256, U256},
    sol,
};
use serde::{Deserialize, Serialize};

/// The `avoNonce` sentinel selecting non-sequential nonce mode: the EIP-712
/// digest of the signed payload becomes the nonce.
pub const NON_SEQUENTIAL_NONCE: I256 = I256::MINUS_ONE;

sol! {
    /// One action of a cast, executed with the account itself as the caller.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Action {
        /// The call target.
        address target;
        /// The calldata bytes.
        bytes data;
        /// Amount of native value to send to the target.
        uint256 value;
        /// Operation discriminant, see [`Operation`].
        uint256 operation;
    }

    /// Parameters shared by every cast mode.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CastParams {
        /// Ordered actions; order is preserved during execution.
        Action[] actions;
        /// Cast id selecting execution semantics (see the `CAST_ID_*` constants).
        uint256 id;
        /// Sequential nonce the account must currently be at, or `-1` for
        /// non-sequential mode.
        int256 avoNonce;
        /// Opaque salt mixed into the digest.
        bytes32 salt;
        /// Attribution source, carried through to events.
        address source;
        /// Opaque metadata, carried through to events.
        bytes metadata;
    }

    /// Parameters of a forwarded (relayer-paid) cast.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CastForwardParams {
        /// Minimum gas the broadcaster must attach.
        uint256 gas;
        /// Gas price the signer agreed to.
        uint256 gasPrice;
        /// Request is rejected before this timestamp (0 = unbounded).
        uint256 validAfter;
        /// Request is rejected after this timestamp (0 = unbounded).
        uint256 validUntil;
        /// Native value the broadcaster attaches for the actions to spend.
        uint256 value;
    }

    /// Parameters of an authorized (self-paying) cast.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CastAuthorizedParams {
        /// Ceiling on the protocol fee (0 = unbounded).
        uint256 maxFee;
        /// Gas price used for fee computation.
        uint256 gasPrice;
        /// Request is rejected before this timestamp (0 = unbounded).
        uint256 validAfter;
        /// Request is rejected after this timestamp (0 = unbounded).
        uint256 validUntil;
    }

    /// One chain's entry of a chain-agnostic cast.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CastChainAgnosticParams {
        /// The cast for this chain.
        CastParams params;
        /// The forward params for this chain.
        CastForwardParams forwardParams;
        /// The chain this entry may execute on.
        uint256 chainId;
    }

    /// Typed schema of a forwarded cast signature.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Cast {
        /// The cast parameters.
        CastParams params;
        /// The forward parameters.
        CastForwardParams forwardParams;
    }

    /// Typed schema of an authorized cast signature.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CastAuthorized {
        /// The cast parameters.
        CastParams params;
        /// The authorized parameters.
        CastAuthorizedParams authorizedParams;
    }

    /// Typed schema of a chain-agnostic cast signature: one signature over the
    /// whole per-chain entry array authorizes each entry on its own chain.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct CastChainAgnostic {
        /// One entry per chain.
        CastChainAgnosticParams[] params;
    }

    /// Digest envelope presented to ERC-1271 contract signers instead of the
    /// raw cast digest, so a contract signature cannot be replayed as a raw
    /// EOA-style signature.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct AvocadoContractSignature {
        /// The wrapped cast digest.
        bytes32 digest;
    }

    /// Self-call admin surface of an Avocado account. Actions targeting the
    /// account itself are decoded against this interface.
    interface IAvocadoMultisig {
        /// Adds signers, sorted ascending, and updates the threshold.
        function addSigners(address[] calldata addSigners_, uint8 requiredSigners_) external;

        /// Removes signers and updates the threshold. The owner can not be removed.
        function removeSigners(address[] calldata removeSigners_, uint8 requiredSigners_) external;

        /// Updates the threshold.
        function setRequiredSigners(uint8 requiredSigners_) external;

        /// Pre-burns non-sequential nonces so they can never be cast.
        function occupyNonSequentialNonces(bytes32[] calldata nonces_) external;

        /// Upgrades the account to a registry-allowed implementation.
        function upgradeTo(address avoImplementation_) external;
    }

    /// Callback surface a flashloan provider re-enters during a flashloan
    /// cast. The reentry guard must be armed for the callback to execute.
    interface IFlashloanReceiver {
        /// Executes the callback actions mid-flashloan. Delegatecall actions
        /// are refused while the reentry guard is armed.
        function executeOperation(Action[] calldata actions_, bytes calldata data_) external returns (bool);
    }
}

/// A signature bundled with the signer it claims to come from.
///
/// The list passed with one request must be strictly ascending by signer
/// address with no duplicates; this canonical ordering is a protocol
/// invariant clients rely on, not an implementation detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParams {
    /// The raw signature bytes.
    pub signature: alloy::primitives::Bytes,
    /// The address this signature must validate for.
    pub signer: Address,
}

/// Execution semantics of one [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Low-level call with value and calldata.
    Call,
    /// Low-level delegatecall; executes the target's code with the account's
    /// identity, no value forwarding.
    DelegateCall,
    /// Calls a flashloan provider which may synchronously re-enter the
    /// account once. Only valid in flashloan casts.
    FlashloanMarker,
}

impl Action {
    /// Decodes the operation discriminant.
    pub fn operation(&self) -> Result<Operation, CastError> {
        match u8::try_from(self.operation) {
            Ok(0) => Ok(Operation::Call),
            Ok(1) => Ok(Operation::DelegateCall),
            Ok(2) => Ok(Operation::FlashloanMarker),
            _ => Err(CastError::InvalidOperation { index: None }),
        }
    }
}

impl CastParams {
    /// Whether this cast uses the sequential nonce.
    pub fn uses_sequential_nonce(&self) -> bool {
        self.avoNonce != NON_SEQUENTIAL_NONCE
    }

    /// The sequential nonce this cast claims, if it uses one.
    ///
    /// Negative values other than the [`NON_SEQUENTIAL_NONCE`] sentinel are
    /// not valid nonces and yield `None` even in sequential mode.
    pub fn sequential_nonce(&self) -> Option<U256> {
        (self.avoNonce >= I256::ZERO).then(|| self.avoNonce.unsigned_abs())
    }

    /// The cast id as a small integer, if it is one.
    pub fn cast_id(&self) -> Result<u8, CastError> {
        u8::try_from(self.id).map_err(|_| CastError::InvalidParams("unknown cast id"))
    }

    /// Whether the cast id is one of the two flashloan sentinels.
    pub fn is_flashloan(&self) -> bool {
        matches!(self.cast_id(), Ok(CAST_ID_FLASHLOAN_CALL | CAST_ID_FLASHLOAN_MIXED))
    }

    /// Rejects unknown cast ids and operations the id does not permit.
    ///
    /// Delegatecall legality during flashloan reentry is enforced separately
    /// at dispatch time, where the reentry flag is known.
    pub fn validate_id(&self) -> Result<(), CastError> {
        let id = self.cast_id()?;
        if !matches!(id, CAST_ID_CALL | CAST_ID_MIXED | CAST_ID_FLASHLOAN_CALL | CAST_ID_FLASHLOAN_MIXED)
        {
            return Err(CastError::InvalidParams("unknown cast id"));
        }

        for (index, action) in self.actions.iter().enumerate() {
            let allowed = match action.operation()? {
                Operation::Call => true,
                Operation::DelegateCall => matches!(id, CAST_ID_MIXED | CAST_ID_FLASHLOAN_MIXED),
                Operation::FlashloanMarker => {
                    matches!(id, CAST_ID_FLASHLOAN_CALL | CAST_ID_FLASHLOAN_MIXED)
                }
            };
            if !allowed {
                return Err(CastError::InvalidOperation { index: Some(index) });
            }
        }
        Ok(())
    }
}

/// A per-chain entry hash of a chain-agnostic cast.
///
/// Verifiers on one chain only need the other chains' entry hashes, not
/// their full payloads; the signed digest is recomputed from this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAgnosticHash {
    /// EIP-712 struct hash of the entry.
    pub hash: alloy::primitives::B256,
    /// The chain the entry belongs to.
    pub chain_id: U256,
}

//! Core Avocado types.

mod account;
pub use account::{AccountId, AvocadoAccount};

mod cast;
pub use cast::{
    Action, AvocadoContractSignature, Cast, CastAuthorized, CastAuthorizedParams,
    CastChainAgnostic, CastChainAgnosticParams, CastForwardParams, CastParams, ChainAgnosticHash,
    IAvocadoMultisig, IFlashloanReceiver, NON_SEQUENTIAL_NONCE, Operation, SignatureParams,
};

mod events;
pub use events::Event;

mod rpc;
pub use rpc::{
    BatchEntry, BatchResult, CastAuthorizedParameters, CastResult, ChainAgnosticParameters,
    ExecuteParameters, SimulationResult,
};

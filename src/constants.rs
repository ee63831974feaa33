//! Avocado platform constants.

use alloy::primitives::{Address, B256, address, b256};

/// EIP-712 domain name shared by every Avocado multisig account.
pub const DOMAIN_SEPARATOR_NAME: &str = "Avocado-Multisig";

/// EIP-712 domain version shared by every Avocado multisig account.
pub const DOMAIN_SEPARATOR_VERSION: &str = "1.1.0";

/// Chain id embedded in the EIP-712 domain for chain-agnostic casts.
///
/// The real chain id travels inside each signed `CastChainAgnosticParams`
/// entry instead of the domain, so one signature can cover several chains.
pub const CHAIN_AGNOSTIC_CHAIN_ID: u64 = 634;

/// Maximum number of signers one account can hold.
pub const MAX_SIGNERS_COUNT: usize = 90;

/// Account indexes at or above this value must be claimed sequentially:
/// index `n` is only deployable once `n - 1` exists.
pub const SEQUENTIAL_INDEX_FROM: u32 = 20;

/// Cast id for casts that may only contain `Call` actions.
pub const CAST_ID_CALL: u8 = 0;

/// Cast id for casts mixing `Call` and `DelegateCall` actions.
pub const CAST_ID_MIXED: u8 = 1;

/// Cast id tolerating a flashloan callback, `Call` actions only.
pub const CAST_ID_FLASHLOAN_CALL: u8 = 20;

/// Cast id tolerating a flashloan callback, mixed actions.
pub const CAST_ID_FLASHLOAN_MIXED: u8 = 21;

/// Magic value an ERC-1271 contract signer must return from
/// `isValidSignature` for the signature to count.
pub const EIP1271_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Sender accepted by the simulation entry points.
///
/// Simulations run the full cast pipeline and then unconditionally restore
/// state; restricting them to a sentinel that can never hold a key prevents
/// accidental state-changing use.
pub const SIMULATION_CALLER: Address = address!("0x000000000000000000000000000000000000dEaD");

/// Fallback fee collector used when the configured collector rejects payment.
pub const BACKUP_FEE_COLLECTOR: Address = address!("0x000000000000000000000000000000000000Fee5");

/// Hash of the account "creation code" template, mixed into deterministic
/// address derivation so Avocado addresses do not collide with other schemes.
pub const AVOCADO_CREATION_CODE_HASH: B256 =
    b256!("0x44419a32a6049b49f19aa74f17d25d1f2b3448e325e3655744cb7661a71ed363");

/// Synthetic base gas charged for every cast.
pub const CAST_BASE_GAS: u64 = 21_000;

/// Synthetic gas charged per dispatched action.
pub const ACTION_GAS: u64 = 40_000;

/// Synthetic gas charged per byte of action calldata.
pub const CALLDATA_BYTE_GAS: u64 = 16;

/// Divisor for [`FeeMode::Percentage`](crate::registry::FeeMode) fee values:
/// a value of 1e9 charges 100% of the native gas cost.
pub const FEE_PERCENTAGE_DIVISOR: u64 = 1_000_000_000;

/// Gas attached to a relayed cast when the broadcaster does not say otherwise.
pub const DEFAULT_FORWARDER_GAS_LIMIT: u64 = 8_000_000;

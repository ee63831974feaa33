//! The Avocado registry collaborator.
//!
//! The registry is the platform-operator-controlled configuration the core
//! consults: the implementation version new accounts are deployed with, the
//! set of versions accounts may self-upgrade to, and the chain-wide fee
//! configuration for authorized casts.

use alloy::primitives::{Address, U256, map::AddressHashSet};
use serde::{Deserialize, Serialize};

use crate::constants::BACKUP_FEE_COLLECTOR;

/// How the protocol fee of an authorized cast is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeeMode {
    /// `value` is a parts-per-billion multiplier applied to the native gas
    /// cost (`gas_used * gas_price`).
    #[default]
    Percentage,
    /// `value` is an absolute fee in native currency.
    Fixed,
}

/// Chain-wide fee configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeConfig {
    /// The fee mode.
    pub mode: FeeMode,
    /// Mode-dependent fee value; see [`FeeMode`].
    pub value: U256,
    /// Lower clamp applied to the computed fee.
    pub min: U256,
    /// Upper clamp applied to the computed fee (0 = unbounded).
    pub max: U256,
    /// Receiver of fee payments.
    pub collector: Address,
    /// Receiver of last resort when the collector rejects payment.
    pub backup_collector: Address,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            mode: FeeMode::Percentage,
            value: U256::ZERO,
            min: U256::ZERO,
            max: U256::ZERO,
            collector: Address::ZERO,
            backup_collector: BACKUP_FEE_COLLECTOR,
        }
    }
}

/// Versioned implementation pointer plus fee configuration.
#[derive(Debug, Clone, Default)]
pub struct AvoRegistry {
    current: Address,
    allowed: AddressHashSet,
    fee: FeeConfig,
}

impl AvoRegistry {
    /// Creates a registry with `current` as the only allowed version.
    pub fn new(current: Address, fee: FeeConfig) -> Self {
        let mut allowed = AddressHashSet::default();
        allowed.insert(current);
        Self { current, allowed, fee }
    }

    /// The implementation new accounts are deployed with.
    pub fn current_implementation(&self) -> Address {
        self.current
    }

    /// Whether accounts may run, or upgrade to, `version`.
    pub fn is_version_allowed(&self, version: Address, for_upgrade: bool) -> bool {
        // Upgrades additionally exclude no-op pointers to the zero address.
        if for_upgrade && version.is_zero() {
            return false;
        }
        self.allowed.contains(&version)
    }

    /// Marks `version` as allowed.
    pub fn allow_version(&mut self, version: Address) {
        self.allowed.insert(version);
    }

    /// Marks `version` as allowed and makes it the deployment default.
    pub fn set_current(&mut self, version: Address) {
        self.allowed.insert(version);
        self.current = version;
    }

    /// The chain-wide fee configuration.
    pub fn fee_config(&self) -> &FeeConfig {
        &self.fee
    }

    /// Replaces the fee configuration.
    pub fn set_fee_config(&mut self, fee: FeeConfig) {
        self.fee = fee;
    }
}

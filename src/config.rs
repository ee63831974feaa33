//! Avocado service configuration.

use crate::{
    chain::Chain,
    constants::DEFAULT_FORWARDER_GAS_LIMIT,
    forwarder::AvoForwarder,
    registry::{AvoRegistry, FeeConfig},
};
use alloy::primitives::{Address, U256, map::AddressHashMap};
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
};
use tracing::info;

/// Avocado service configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvocadoConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Chain environment settings.
    pub chain: ChainSettings,
    /// Fee configuration for authorized casts.
    pub fee: FeeConfig,
    /// Registry configuration.
    pub registry: RegistryConfig,
    /// Forwarder configuration.
    pub forwarder: ForwarderConfig,
    /// Genesis native balances, e.g. to fund the broadcaster.
    pub balances: AddressHashMap<U256>,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to serve the RPC on.
    pub address: IpAddr,
    /// The port to serve the RPC on.
    pub port: u16,
    /// The port to serve the metrics on.
    pub metrics_port: u16,
    /// Maximum number of concurrent connections.
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 6340,
            metrics_port: 9000,
            max_connections: 500,
        }
    }
}

/// Chain environment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    /// The chain id the environment reports.
    pub id: u64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self { id: 1 }
    }
}

/// Registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Implementation version new accounts are deployed with.
    pub current_implementation: Address,
    /// Additional versions accounts may upgrade to.
    pub allowed_versions: Vec<Address>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { current_implementation: Address::with_last_byte(1), allowed_versions: Vec::new() }
    }
}

/// Forwarder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwarderConfig {
    /// The broadcaster identity relayed casts run under.
    pub broadcaster: Address,
    /// Gas attached to each relayed cast.
    pub gas_limit: u64,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            broadcaster: Address::with_last_byte(0xb0),
            gas_limit: DEFAULT_FORWARDER_GAS_LIMIT,
        }
    }
}

impl AvocadoConfig {
    /// Loads the configuration from a YAML file. A missing file is created
    /// with the default configuration.
    pub fn load(path: &Path) -> eyre::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            std::fs::write(path, serde_yaml::to_string(&config)?)
                .wrap_err_with(|| format!("could not write default config to {}", path.display()))?;
            info!(path = %path.display(), "wrote default configuration");
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("could not read config from {}", path.display()))?;
        serde_yaml::from_str(&raw).wrap_err("could not parse configuration")
    }

    /// Sets the IP address to serve the RPC on.
    pub fn with_address(mut self, address: IpAddr) -> Self {
        self.server.address = address;
        self
    }

    /// Sets the port to serve the RPC on.
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the port to serve the metrics on.
    pub fn with_metrics_port(mut self, port: u16) -> Self {
        self.server.metrics_port = port;
        self
    }

    /// Sets the chain id of the environment.
    pub fn with_chain_id(mut self, id: u64) -> Self {
        self.chain.id = id;
        self
    }

    /// Sets the broadcaster identity.
    pub fn with_broadcaster(mut self, broadcaster: Address) -> Self {
        self.forwarder.broadcaster = broadcaster;
        self
    }

    /// The socket address of the RPC server.
    pub fn rpc_address(&self) -> SocketAddr {
        SocketAddr::new(self.server.address, self.server.port)
    }

    /// The socket address of the metrics exporter.
    pub fn metrics_address(&self) -> SocketAddr {
        SocketAddr::new(self.server.address, self.server.metrics_port)
    }

    /// Builds the registry collaborator.
    pub fn registry(&self) -> AvoRegistry {
        let mut registry = AvoRegistry::new(self.registry.current_implementation, self.fee.clone());
        for &version in &self.registry.allowed_versions {
            registry.allow_version(version);
        }
        registry
    }

    /// Builds the chain environment, seeded with the genesis balances.
    pub fn build_chain(&self, timestamp: u64) -> Chain {
        let mut chain = Chain::new(self.chain.id, self.registry());
        chain.set_timestamp(timestamp);
        for (&address, &amount) in &self.balances {
            chain.fund(address, amount);
        }
        chain
    }

    /// Builds the forwarder.
    pub fn build_forwarder(&self) -> AvoForwarder {
        AvoForwarder::new(self.forwarder.broadcaster).with_gas_limit(self.forwarder.gas_limit)
    }
}

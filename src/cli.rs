//! # Avocado CLI

use crate::{
    config::AvocadoConfig,
    rpc::{Avocado, AvocadoApiServer},
    version::AVOCADO_LONG_VERSION,
};
use alloy::primitives::Address;
use clap::Parser;
use jsonrpsee::server::{Server, ServerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{
    net::IpAddr,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::info;

/// The Avocado forwarder service relays signed casts into multisig
/// smart accounts.
#[derive(Debug, Parser)]
#[command(author, about = "Avocado", long_about = None, version = AVOCADO_LONG_VERSION)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be written to this path.
    #[arg(long, value_name = "CONFIG", env = "AVOCADO_CONFIG", default_value = "avocado.yaml")]
    pub config: PathBuf,
    /// The address to serve the RPC on.
    #[arg(long = "http.addr", value_name = "ADDR")]
    pub address: Option<IpAddr>,
    /// The port to serve the RPC on.
    #[arg(long = "http.port", value_name = "PORT")]
    pub port: Option<u16>,
    /// The port to serve the metrics on.
    #[arg(long = "http.metrics-port", value_name = "PORT")]
    pub metrics_port: Option<u16>,
    /// The chain id the environment reports.
    #[arg(long = "chain-id", value_name = "CHAIN_ID")]
    pub chain_id: Option<u64>,
    /// The broadcaster identity relayed casts run under.
    #[arg(long, value_name = "ADDRESS", env = "AVOCADO_BROADCASTER")]
    pub broadcaster: Option<Address>,
}

impl Args {
    /// Runs the forwarder service until interrupted.
    pub async fn run(self) -> eyre::Result<()> {
        let mut config = AvocadoConfig::load(&self.config)?;
        if let Some(address) = self.address {
            config = config.with_address(address);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(port) = self.metrics_port {
            config = config.with_metrics_port(port);
        }
        if let Some(chain_id) = self.chain_id {
            config = config.with_chain_id(chain_id);
        }
        if let Some(broadcaster) = self.broadcaster {
            config = config.with_broadcaster(broadcaster);
        }

        PrometheusBuilder::new()
            .with_http_listener(config.metrics_address())
            .install()
            .map_err(|err| eyre::eyre!("could not start metrics exporter: {err}"))?;

        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let avocado = Avocado::new(config.build_chain(timestamp), config.build_forwarder());

        let server = Server::builder()
            .set_config(
                ServerConfig::builder()
                    .max_connections(config.server.max_connections)
                    .build(),
            )
            .build(config.rpc_address())
            .await?;
        let addr = server.local_addr()?;
        let handle = server.start(avocado.into_rpc());
        info!(%addr, chain_id = config.chain.id, "avocado forwarder started");

        tokio::signal::ctrl_c().await?;
        info!("shutting down");
        handle.stop()?;
        handle.stopped().await;

        Ok(())
    }
}

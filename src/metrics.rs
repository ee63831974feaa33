//! Forwarder metrics.

use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// Metrics for the [`AvoForwarder`](crate::forwarder::AvoForwarder).
#[derive(Metrics)]
#[metrics(scope = "forwarder")]
pub struct ForwarderMetrics {
    /// Number of casts whose actions all executed.
    pub casts_executed: Counter,
    /// Number of dispatched casts whose actions reverted.
    pub casts_failed: Counter,
    /// Number of requests rejected before dispatch.
    pub casts_rejected: Counter,
    /// Number of accounts deployed.
    pub accounts_deployed: Counter,
    /// Synthetic gas consumed per cast.
    pub cast_gas: Histogram,
}

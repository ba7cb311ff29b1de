//! Configuration schema definitions.
//!
//! All values come from environment variables (see `loader.rs`); the structs
//! here are the validated, immutable result.

use serde::{Deserialize, Serialize};

/// Root configuration for the bridge proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Overlay-network address of the upstream device.
    pub upstream_host: String,

    /// Port the upstream backend listens on.
    pub upstream_port: u16,

    /// Local port to accept traffic on.
    pub listen_port: u16,

    /// Health probe settings.
    pub probe: ProbeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Local bind address derived from the listen port.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Probe interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Liveness path on the upstream backend.
    pub path: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 120,
            timeout_secs: 5,
            path: "/kaithhealthcheck".to_string(),
        }
    }
}

/// Timeout configuration for forwarded calls and shutdown.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for the upstream to produce response headers, in seconds.
    /// The response body itself may stream for longer (media payloads).
    pub upstream_secs: u64,

    /// Grace period for in-flight requests during shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 300,
            shutdown_grace_secs: 15,
        }
    }
}

/// Observability configuration. Log level is handled by the tracing
/// subscriber directly (`LOG_LEVEL` / `RUST_LOG`), before config loads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

//! Configuration loading from the process environment.

use std::env;
use std::str::FromStr;

use axum::http::uri::Authority;
use url::Url;

use crate::config::schema::{Config, ObservabilityConfig, ProbeConfig, TimeoutConfig};
use crate::error::ConfigError;

/// Read an environment variable, falling back to a default.
fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a required environment variable.
fn env_required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

/// Parse a network port, rejecting 0 and anything that does not fit in u16.
fn parse_port(key: &'static str, raw: &str) -> Result<u16, ConfigError> {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidPort {
            var: key,
            value: raw.to_string(),
        }),
        Ok(p) => Ok(p),
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        var: key,
        value: raw.to_string(),
        expected: "a non-negative integer",
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    raw.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
        var: key,
        value: raw.to_string(),
        expected: "true or false",
    })
}

/// Validate the upstream host shape.
///
/// Accepts anything that forms a valid authority and URL together with the
/// port, which is exactly what [`crate::upstream::UpstreamTarget`] builds
/// from it later; rejecting here keeps that construction infallible.
fn validate_host(host: &str, port: u16) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidHost {
        value: host.to_string(),
    };

    // Userinfo, paths and whitespace would smuggle through authority
    // parsing with a different host than the one configured.
    if host.contains(|c: char| c.is_whitespace()) || host.contains('@') || host.contains('/') {
        return Err(invalid());
    }

    let authority = Authority::from_str(&format!("{}:{}", host, port)).map_err(|_| invalid())?;
    if authority.port_u16() != Some(port) {
        return Err(invalid());
    }
    Url::parse(&format!("http://{}:{}", host, port)).map_err(|_| invalid())?;

    Ok(())
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Fails fast: any missing required value or out-of-range port is
    /// returned as a [`ConfigError`] and the caller is expected to exit
    /// without binding a socket.
    pub fn from_env() -> Result<Self, ConfigError> {
        let upstream_host = env_required("UPSTREAM_HOST")?;
        let upstream_port = parse_port("UPSTREAM_PORT", &env_required("UPSTREAM_PORT")?)?;
        validate_host(&upstream_host, upstream_port)?;
        let listen_port = parse_port("LISTEN_PORT", &env_or("LISTEN_PORT", "8080"))?;

        let probe_defaults = ProbeConfig::default();
        let probe = ProbeConfig {
            interval_secs: parse_secs(
                "PROBE_INTERVAL_SECS",
                &env_or(
                    "PROBE_INTERVAL_SECS",
                    &probe_defaults.interval_secs.to_string(),
                ),
            )?,
            timeout_secs: parse_secs(
                "PROBE_TIMEOUT_SECS",
                &env_or(
                    "PROBE_TIMEOUT_SECS",
                    &probe_defaults.timeout_secs.to_string(),
                ),
            )?,
            path: env_or("PROBE_PATH", &probe_defaults.path),
        };

        let timeout_defaults = TimeoutConfig::default();
        let timeouts = TimeoutConfig {
            connect_secs: parse_secs(
                "CONNECT_TIMEOUT_SECS",
                &env_or(
                    "CONNECT_TIMEOUT_SECS",
                    &timeout_defaults.connect_secs.to_string(),
                ),
            )?,
            upstream_secs: parse_secs(
                "UPSTREAM_TIMEOUT_SECS",
                &env_or(
                    "UPSTREAM_TIMEOUT_SECS",
                    &timeout_defaults.upstream_secs.to_string(),
                ),
            )?,
            shutdown_grace_secs: parse_secs(
                "SHUTDOWN_GRACE_SECS",
                &env_or(
                    "SHUTDOWN_GRACE_SECS",
                    &timeout_defaults.shutdown_grace_secs.to_string(),
                ),
            )?,
        };

        let observability_defaults = ObservabilityConfig::default();
        let observability = ObservabilityConfig {
            metrics_enabled: parse_bool("METRICS_ENABLED", &env_or("METRICS_ENABLED", "false"))?,
            metrics_address: env_or("METRICS_ADDRESS", &observability_defaults.metrics_address),
        };

        Ok(Config {
            upstream_host,
            upstream_port,
            listen_port,
            probe,
            timeouts,
            observability,
        })
    }
}

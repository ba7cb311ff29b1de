//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; filter comes from `RUST_LOG` with a
//!   `LOG_LEVEL` fallback so deployments without `RUST_LOG` still work.
//! - Metrics are cheap atomic updates and opt-in; the Prometheus endpoint
//!   only starts when enabled in config.

pub mod logging;
pub mod metrics;

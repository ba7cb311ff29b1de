//! Tether — single-upstream overlay bridge proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 BRIDGE PROXY                  │
//!                      │                                               │
//!   Public caller      │  ┌────────┐   ┌─────────┐   ┌──────────────┐ │      Device backend
//!   ───────────────────┼─▶│ http   │──▶│ forward │──▶│   upstream   │─┼────▶ (overlay network)
//!                      │  │ server │   │ engine  │   │    target    │ │
//!   ◀──────────────────┼──│ (CORS, │◀──│(streamed│◀──│  host:port   │◀┼─────
//!    streamed response │  │/health)│   │  relay) │   └──────────────┘ │
//!                      │  └────────┘   └─────────┘                    │
//!                      │                                               │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │           Cross-Cutting Concerns        │  │
//!                      │  │  config · health prober · lifecycle ·   │  │
//!                      │  │  observability (tracing, metrics)       │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! The public tunnel in front and the overlay client underneath are external
//! collaborators; this process only listens on one local port and forwards
//! to one configured upstream.

use tether::config::Config;
use tether::lifecycle::startup;
use tether::observability::logging;

#[tokio::main]
async fn main() {
    logging::init();

    tracing::info!("tether v0.1.0 starting");

    // Fail fast on bad configuration, before any socket binds.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        upstream_host = %config.upstream_host,
        upstream_port = config.upstream_port,
        listen_port = config.listen_port,
        probe_interval_secs = config.probe.interval_secs,
        "Configuration loaded"
    );

    if let Err(e) = startup::run(config).await {
        tracing::error!(error = %e, "Fatal startup error");
        std::process::exit(1);
    }

    tracing::info!("Shutdown complete");
}

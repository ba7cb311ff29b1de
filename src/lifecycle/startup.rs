//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the upstream target from validated configuration
//! - Bind the listening socket (fatal on failure)
//! - Start the health prober as a background task
//! - Serve until terminated, then drain within the grace period

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time;

use crate::config::Config;
use crate::health::{HealthHandle, HealthProber};
use crate::http::ProxyServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::upstream::UpstreamTarget;

/// Run the proxy until a termination signal arrives.
///
/// Any error returned here is fatal; the caller exits non-zero.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let upstream = UpstreamTarget::from_config(&config);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        listen = %listener.local_addr()?,
        upstream = %upstream,
        "Proxy route established"
    );

    let shutdown = Shutdown::new();
    let health = HealthHandle::new();

    let prober = HealthProber::new(upstream.clone(), config.probe.clone(), health.clone());
    tokio::spawn(prober.run(shutdown.subscribe()));

    let server = ProxyServer::new(&config, upstream, health);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::terminated().await;
    shutdown.trigger();

    // In-flight requests get a bounded grace period, then we exit anyway;
    // a stuck overlay link must not wedge the restart cycle.
    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);
    match time::timeout(grace, server_task).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!(
                grace_secs = config.timeouts.shutdown_grace_secs,
                "Drain deadline exceeded, exiting with requests in flight"
            );
        }
    }

    Ok(())
}

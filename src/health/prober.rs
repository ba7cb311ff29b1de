//! Periodic upstream liveness probing.
//!
//! # Responsibilities
//! - Probe the upstream liveness path on a fixed interval
//! - Publish each result into the shared health snapshot
//! - Keep probing through failures until shutdown

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::sync::broadcast;
use tokio::time;

use crate::config::ProbeConfig;
use crate::health::state::{HealthHandle, Reachability};
use crate::observability::metrics;
use crate::upstream::UpstreamTarget;

pub struct HealthProber {
    upstream: UpstreamTarget,
    config: ProbeConfig,
    handle: HealthHandle,
    client: Client<HttpConnector, Body>,
}

impl HealthProber {
    pub fn new(upstream: UpstreamTarget, config: ProbeConfig, handle: HealthHandle) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            upstream,
            config,
            handle,
            client,
        }
    }

    /// Probe loop. Runs until the shutdown signal fires; a failed probe
    /// marks the upstream unreachable but never stops the scheduler.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            upstream = %self.upstream,
            interval_secs = self.config.interval_secs,
            path = %self.config.path,
            "Health prober starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe_once().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health prober received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn probe_once(&self) {
        let reachable = self.check_upstream().await;
        let previous = self.handle.publish(reachable);
        metrics::record_upstream_reachable(reachable);

        // Log transitions only; steady state stays quiet.
        let current = if reachable {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        };
        if previous != current {
            tracing::info!(
                upstream = %self.upstream,
                from = ?previous,
                to = ?current,
                "Upstream reachability changed"
            );
        }
    }

    async fn check_upstream(&self) -> bool {
        let uri = match self.upstream.probe_uri(&self.config.path) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build probe URI");
                return false;
            }
        };

        let request = match Request::builder()
            .method("GET")
            .uri(uri)
            .header("user-agent", "tether-health-probe")
            .body(Body::empty())
        {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build probe request");
                return false;
            }
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        match time::timeout(timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let success = response.status().is_success();
                if !success {
                    tracing::warn!(
                        upstream = %self.upstream,
                        status = %response.status(),
                        "Probe failed: non-success status"
                    );
                }
                success
            }
            Ok(Err(e)) => {
                tracing::warn!(upstream = %self.upstream, error = %e, "Probe failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(upstream = %self.upstream, "Probe failed: timeout");
                false
            }
        }
    }
}

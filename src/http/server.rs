//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router: local health route plus a catch-all forwarder
//! - Wire middleware (request ID, tracing, permissive CORS)
//! - Answer OPTIONS locally, never forwarding preflight upstream
//! - Serve until the shutdown signal fires, then drain gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{Config, TimeoutConfig};
use crate::health::HealthHandle;
use crate::http::forward;
use crate::observability::metrics;
use crate::upstream::UpstreamTarget;

/// Reserved local path, answered without contacting the upstream. The
/// whole path is shadowed for every method so it can never leak upstream.
pub const HEALTH_PATH: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamTarget>,
    pub client: Client<HttpConnector, Body>,
    pub health: HealthHandle,
    pub timeouts: TimeoutConfig,
}

/// HTTP server for the bridge proxy.
pub struct ProxyServer {
    router: Router,
}

impl ProxyServer {
    /// Create a new server forwarding everything to `upstream`.
    pub fn new(config: &Config, upstream: UpstreamTarget, health: HealthHandle) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState {
            upstream: Arc::new(upstream),
            client,
            health,
            timeouts: config.timeouts.clone(),
        };

        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        // Any caller origin is allowed, mirroring the requested method and
        // headers; the CORS layer also answers preflight on its own.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request());

        Router::new()
            .route(HEALTH_PATH, any(health_handler))
            .fallback(forward_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(cors),
            )
    }

    /// Run the server until the shutdown signal fires, then stop accepting
    /// and drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Local liveness report. Always "ok" while the process is up; the upstream
/// section reflects the last probe and is informational only.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.health.snapshot();
    Json(json!({
        "status": "ok",
        "upstream": snapshot.to_report(),
    }))
}

/// Catch-all handler: everything that is not the health path goes upstream.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    // Preflight is already intercepted by the CORS layer; any remaining
    // OPTIONS request is still answered locally, never forwarded.
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(method = %method, path = %path, upstream = %state.upstream, "Forwarding request");

    match forward::forward(&state, request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start);
            response
        }
        Err(err) => {
            tracing::warn!(
                method = %method,
                path = %path,
                upstream = %state.upstream,
                error = %err,
                "Forwarding failed"
            );
            let response = err.into_response();
            metrics::record_request(&method, response.status().as_u16(), start);
            response
        }
    }
}

//! Error taxonomy for the bridge proxy.
//!
//! Configuration errors are fatal and only occur at startup. Per-request
//! errors are contained to the request that produced them and render as
//! gateway responses, so the caller can always tell a proxy failure apart
//! from an upstream application error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Fatal startup errors. Never retried; the process exits non-zero.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("{var} must be a port in 1-65535, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("UPSTREAM_HOST is not a usable host address, got {value:?}")]
    InvalidHost { value: String },
}

/// Per-request forwarding errors, surfaced to the caller as gateway
/// responses. These never crash the listener or affect other requests.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("upstream timed out after {0}s")]
    UpstreamTimeout(u64),

    #[error("could not build upstream request: {0}")]
    BadUpstreamRequest(String),
}

impl ProxyError {
    /// Gateway status for this failure, distinct from anything the upstream
    /// application itself would return through the relay.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::UpstreamUnreachable(_) | ProxyError::BadUpstreamRequest(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

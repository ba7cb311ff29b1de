//! The single upstream target.
//!
//! # Responsibilities
//! - Resolve the upstream address from validated configuration
//! - Hold it as an immutable value for the process lifetime
//! - Produce per-request URIs for the forwarding engine and the prober

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, PathAndQuery, Scheme, Uri};
use url::Url;

use crate::config::Config;
use crate::error::ProxyError;

/// Address of the one backend every request is forwarded to.
///
/// Immutable after startup; a restart is required to repoint the proxy.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    /// Overlay-network host of the device backend.
    pub host: String,
    /// Backend port.
    pub port: u16,
    /// Pre-calculated base URL, mostly for logging.
    pub base_url: Url,
}

impl UpstreamTarget {
    /// Build the target from already-validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.upstream_host, config.upstream_port)
    }

    pub fn new(host: &str, port: u16) -> Self {
        // Host and port were validated by the config loader; a parse
        // failure here would be a programming error.
        let base_url = Url::parse(&format!("http://{}:{}", host, port))
            .unwrap_or_else(|e| panic!("invalid upstream address {}:{}: {}", host, port, e));
        Self {
            host: host.to_string(),
            port,
            base_url,
        }
    }

    /// `host:port` form, used as the rewritten Host header.
    pub fn authority(&self) -> Authority {
        Authority::from_str(&format!("{}:{}", self.host, self.port))
            .unwrap_or_else(|e| panic!("invalid upstream authority: {}", e))
    }

    /// Rewrite an inbound URI to point at this upstream, preserving path
    /// and query verbatim.
    pub fn rewrite_uri(&self, inbound: &Uri) -> Result<Uri, ProxyError> {
        let mut parts = inbound.clone().into_parts();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Uri::from_parts(parts).map_err(|e| ProxyError::BadUpstreamRequest(e.to_string()))
    }

    /// URI of the upstream liveness path, used by the health prober.
    pub fn probe_uri(&self, path: &str) -> Result<Uri, ProxyError> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Uri::from_str(&format!("http://{}:{}{}", self.host, self.port, path))
            .map_err(|e| ProxyError::BadUpstreamRequest(e.to_string()))
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> UpstreamTarget {
        UpstreamTarget::new("100.87.250.20", 8081)
    }

    #[test]
    fn rewrite_preserves_path_and_query() {
        let inbound: Uri = "/video?id=abc123".parse().unwrap();
        let rewritten = target().rewrite_uri(&inbound).unwrap();
        assert_eq!(
            rewritten.to_string(),
            "http://100.87.250.20:8081/video?id=abc123"
        );
    }

    #[test]
    fn rewrite_defaults_empty_path_to_root() {
        let inbound = Uri::from_static("http://public.example");
        let rewritten = target().rewrite_uri(&inbound).unwrap();
        assert_eq!(rewritten.path(), "/");
    }

    #[test]
    fn probe_uri_normalizes_leading_slash() {
        let uri = target().probe_uri("kaithhealthcheck").unwrap();
        assert_eq!(
            uri.to_string(),
            "http://100.87.250.20:8081/kaithhealthcheck"
        );
    }

    #[test]
    fn display_is_host_port() {
        assert_eq!(target().to_string(), "100.87.250.20:8081");
    }
}

//! Request forwarding to the upstream.
//!
//! # Responsibilities
//! - Rewrite inbound requests: same method, path, query and body, with the
//!   Host header replaced by the upstream authority
//! - Strip hop-by-hop headers in both directions
//! - Enforce a response-header deadline on every forwarded call
//! - Relay the response as a stream, never buffering the full body

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, request, HeaderMap, HeaderName, HeaderValue, Request, Response, Version},
};
use tokio::time;

use crate::error::ProxyError;
use crate::http::server::AppState;
use crate::upstream::UpstreamTarget;

/// Hop-by-hop headers per RFC 9110 §7.6.1. These describe one connection
/// and must not cross the proxy in either direction.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let doomed: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name))
        .cloned()
        .collect();
    for name in doomed {
        headers.remove(name);
    }
}

/// Rewrite the inbound request for transmission to the upstream.
///
/// The body is moved through untouched, so streaming request bodies are
/// forwarded as they arrive.
fn build_upstream_request(
    upstream: &UpstreamTarget,
    parts: request::Parts,
    body: Body,
) -> Result<Request<Body>, ProxyError> {
    let uri = upstream.rewrite_uri(&parts.uri)?;
    let host = HeaderValue::from_str(upstream.authority().as_str())
        .map_err(|e| ProxyError::BadUpstreamRequest(e.to_string()))?;

    // Always speak HTTP/1.1 to the upstream regardless of what the caller
    // used; the device backend is plain HTTP/1.1 over the overlay network.
    let mut builder = Request::builder()
        .method(parts.method)
        .uri(uri)
        .version(Version::HTTP_11);

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            if name == header::HOST || is_hop_by_hop(name) {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }
        headers.insert(header::HOST, host);
    }

    builder
        .body(body)
        .map_err(|e| ProxyError::BadUpstreamRequest(e.to_string()))
}

/// Forward one request and relay the upstream's response.
///
/// The deadline covers connection establishment and response headers; the
/// body that follows may stream for as long as it needs to, since media
/// payloads are unbounded. Dropping the returned response (caller went
/// away) drops the upstream body with it, cancelling the transfer.
pub async fn forward(state: &AppState, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
    let (parts, body) = request.into_parts();
    let upstream_request = build_upstream_request(&state.upstream, parts, body)?;

    let deadline = Duration::from_secs(state.timeouts.upstream_secs);
    let response = match time::timeout(deadline, state.client.request(upstream_request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => return Err(ProxyError::UpstreamUnreachable(e.to_string())),
        Err(_) => return Err(ProxyError::UpstreamTimeout(state.timeouts.upstream_secs)),
    };

    // Status and headers pass through; the body is wrapped, not collected,
    // so bytes reach the caller as the upstream produces them.
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}

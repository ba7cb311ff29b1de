//! HTTP surface of the proxy.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, CORS, local /health route)
//!     → forward.rs (rewrite for the upstream, send, relay response)
//!     → streamed back to the caller
//! ```

pub mod forward;
pub mod server;

pub use server::{AppState, ProxyServer, HEALTH_PATH};

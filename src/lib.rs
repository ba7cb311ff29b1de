//! Tether — single-upstream overlay bridge proxy.
//!
//! Exposes a backend running on an intermittently-connected device (a phone
//! on a private overlay network) to the public internet by forwarding every
//! inbound HTTP request to one configured upstream and streaming the
//! response back byte-for-byte.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::Config;
pub use error::{ConfigError, ProxyError};
pub use health::HealthHandle;
pub use http::ProxyServer;
pub use lifecycle::Shutdown;
pub use upstream::UpstreamTarget;

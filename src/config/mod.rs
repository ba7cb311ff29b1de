//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read & parse env vars)
//!     → validation inside the loader (ports in range, host non-empty)
//!     → Config (validated, immutable)
//!     → shared by value/Arc with all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload path. A restart is
//!   the only way to change the upstream, which matches the hosting
//!   environment's restart-driven operation.
//! - Missing or invalid required values are fatal before any socket binds.

pub mod loader;
pub mod schema;

pub use schema::{Config, ObservabilityConfig, ProbeConfig, TimeoutConfig};

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → bind listener → spawn prober → serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain (bounded) → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, never silently retried
//! - Startup is idempotent; nothing persists across restarts
//! - Drain has a deadline; the process exits even with requests in flight

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;

//! Upstream health subsystem.
//!
//! # Data Flow
//! ```text
//! Prober (prober.rs):
//!     Periodic timer
//!     → GET upstream liveness path with short timeout
//!     → publish result into state.rs
//!
//! State (state.rs):
//!     Single atomically-published snapshot
//!     → lock-free reads from request handlers and the /health route
//! ```
//!
//! # Design Decisions
//! - The prober never sits on the request path; it only informs the local
//!   health report and external supervisors.
//! - One upstream means no thresholds or hysteresis: each probe publishes
//!   its result directly, and the snapshot starts as Unknown on every boot.
//! - Probing continues on failure; only the shutdown signal stops it.

pub mod prober;
pub mod state;

pub use prober::HealthProber;
pub use state::{HealthHandle, HealthSnapshot, Reachability};

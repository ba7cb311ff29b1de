//! Atomically-published upstream health state.
//!
//! Writers (the prober) swap in a whole new snapshot; readers load it
//! lock-free. A reader can observe a value at most one probe interval
//! stale, never a torn one.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use serde::Serialize;
use serde_json::{json, Value};

/// Whether the last probe reached the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reachability {
    /// No probe has completed yet (fresh process).
    Unknown,
    Reachable,
    Unreachable,
}

/// Result of the most recent probe.
#[derive(Debug, Clone)]
pub struct HealthSnapshot {
    pub reachability: Reachability,
    pub last_checked: Option<SystemTime>,
}

impl HealthSnapshot {
    fn unknown() -> Self {
        Self {
            reachability: Reachability::Unknown,
            last_checked: None,
        }
    }

    /// JSON view for the local health report.
    pub fn to_report(&self) -> Value {
        let last_checked_unix = self
            .last_checked
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());
        json!({
            "reachable": self.reachability,
            "last_checked_unix": last_checked_unix,
        })
    }
}

/// Shared handle to the health snapshot.
///
/// Cheap to clone; the prober owns writes, everyone else reads.
#[derive(Clone)]
pub struct HealthHandle {
    inner: Arc<ArcSwap<HealthSnapshot>>,
}

impl HealthHandle {
    /// Fresh handle in the Unknown state. Every restart re-enters Unknown.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(HealthSnapshot::unknown())),
        }
    }

    /// Publish a probe result, returning the previous reachability so the
    /// caller can log transitions.
    pub fn publish(&self, reachable: bool) -> Reachability {
        let reachability = if reachable {
            Reachability::Reachable
        } else {
            Reachability::Unreachable
        };
        let previous = self.inner.swap(Arc::new(HealthSnapshot {
            reachability,
            last_checked: Some(SystemTime::now()),
        }));
        previous.reachability
    }

    /// Lock-free read of the current snapshot.
    pub fn snapshot(&self) -> Arc<HealthSnapshot> {
        self.inner.load_full()
    }
}

impl Default for HealthHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown() {
        let handle = HealthHandle::new();
        let snap = handle.snapshot();
        assert_eq!(snap.reachability, Reachability::Unknown);
        assert!(snap.last_checked.is_none());
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let handle = HealthHandle::new();
        assert_eq!(handle.publish(true), Reachability::Unknown);
        let snap = handle.snapshot();
        assert_eq!(snap.reachability, Reachability::Reachable);
        assert!(snap.last_checked.is_some());

        assert_eq!(handle.publish(false), Reachability::Reachable);
        assert_eq!(handle.snapshot().reachability, Reachability::Unreachable);
    }

    #[test]
    fn report_serializes_reachability() {
        let handle = HealthHandle::new();
        handle.publish(false);
        let report = handle.snapshot().to_report();
        assert_eq!(report["reachable"], "unreachable");
        assert!(report["last_checked_unix"].is_u64());
    }
}

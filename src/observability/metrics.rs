//! Metrics registry
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Reset only on process start
//! - Thread-safe but lock-minimal

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics registry containing all operational counters
///
/// # Thread Safety
///
/// All counters use atomic operations for thread-safe increments.
/// Uses Relaxed ordering for minimal overhead (eventual consistency is fine for metrics).
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Instances created and reported reachable
    provisions_completed: AtomicU64,
    /// Provision requests that hit an existing instance
    provisions_conflicted: AtomicU64,
    /// Provision requests that failed upstream
    provisions_failed: AtomicU64,
    /// Instances deleted
    deprovisions_completed: AtomicU64,
    /// Deletion failures
    deprovisions_failed: AtomicU64,
    /// Tier updates completed
    plan_changes_completed: AtomicU64,
    /// Tier update failures
    plan_changes_failed: AtomicU64,
    /// Readiness polls that exhausted their attempt budget
    poll_timeouts: AtomicU64,
    /// Upstream API calls that returned an error
    upstream_errors: AtomicU64,
    /// Requests rejected by the auth gate
    auth_rejections: AtomicU64,
    /// Requests rejected before any upstream call
    requests_rejected: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Provisioning metrics

    /// Increment completed provisions
    pub fn increment_provisions_completed(&self) {
        self.provisions_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment conflicted provisions
    pub fn increment_provisions_conflicted(&self) {
        self.provisions_conflicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed provisions
    pub fn increment_provisions_failed(&self) {
        self.provisions_failed.fetch_add(1, Ordering::Relaxed);
    }

    // Deprovisioning metrics

    /// Increment completed deprovisions
    pub fn increment_deprovisions_completed(&self) {
        self.deprovisions_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed deprovisions
    pub fn increment_deprovisions_failed(&self) {
        self.deprovisions_failed.fetch_add(1, Ordering::Relaxed);
    }

    // Plan-change metrics

    /// Increment completed plan changes
    pub fn increment_plan_changes_completed(&self) {
        self.plan_changes_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed plan changes
    pub fn increment_plan_changes_failed(&self) {
        self.plan_changes_failed.fetch_add(1, Ordering::Relaxed);
    }

    // Polling metrics

    /// Increment poll timeouts
    pub fn increment_poll_timeouts(&self) {
        self.poll_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    // Upstream metrics

    /// Increment upstream API errors
    pub fn increment_upstream_errors(&self) {
        self.upstream_errors.fetch_add(1, Ordering::Relaxed);
    }

    // Request metrics

    /// Increment auth rejections
    pub fn increment_auth_rejections(&self) {
        self.auth_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejected requests
    pub fn increment_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            provisions_completed: self.provisions_completed.load(Ordering::Relaxed),
            provisions_conflicted: self.provisions_conflicted.load(Ordering::Relaxed),
            provisions_failed: self.provisions_failed.load(Ordering::Relaxed),
            deprovisions_completed: self.deprovisions_completed.load(Ordering::Relaxed),
            deprovisions_failed: self.deprovisions_failed.load(Ordering::Relaxed),
            plan_changes_completed: self.plan_changes_completed.load(Ordering::Relaxed),
            plan_changes_failed: self.plan_changes_failed.load(Ordering::Relaxed),
            poll_timeouts: self.poll_timeouts.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            auth_rejections: self.auth_rejections.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub provisions_completed: u64,
    pub provisions_conflicted: u64,
    pub provisions_failed: u64,
    pub deprovisions_completed: u64,
    pub deprovisions_failed: u64,
    pub plan_changes_completed: u64,
    pub plan_changes_failed: u64,
    pub poll_timeouts: u64,
    pub upstream_errors: u64,
    pub auth_rejections: u64,
    pub requests_rejected: u64,
}

//! Application state management.
//!
//! This module manages the state shared across relay request handlers.

use crate::client::MergeClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared application state.
pub struct AppState {
    /// Client for the merge service.
    pub client: MergeClient,
    /// Application start time.
    pub start_time: Instant,
    /// Statistics counters.
    pub stats: Stats,
}

impl AppState {
    /// Creates a new application state around a configured client.
    pub fn new(client: MergeClient) -> Self {
        Self {
            client,
            start_time: Instant::now(),
            stats: Stats::default(),
        }
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Increments the total request counter.
    pub fn increment_requests(&self) {
        self.stats.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the relayed document counter.
    pub fn increment_success(&self) {
        self.stats.requests_success.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the failed request counter.
    pub fn increment_failed(&self) {
        self.stats.requests_failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Statistics counters.
#[derive(Default)]
pub struct Stats {
    /// Total requests received.
    pub requests_total: AtomicU64,
    /// Requests that relayed a PDF.
    pub requests_success: AtomicU64,
    /// Requests answered with an error body.
    pub requests_failed: AtomicU64,
}

impl Stats {
    /// Gets the current statistics as a snapshot.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of statistics counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatsSnapshot {
    /// Total requests received.
    pub requests_total: u64,
    /// Requests that relayed a PDF.
    pub requests_success: u64,
    /// Requests answered with an error body.
    pub requests_failed: u64,
}

//! Ingestion metrics.
//!
//! Counters are plain atomics owned by a [`SourceMetrics`] value that callers
//! construct and inject wherever they need visibility. There is no global
//! registry; tests build their own instance and assert on it directly.

use std::sync::atomic::{AtomicU64, Ordering};

/// Coarse lifecycle state reported through the uptime gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeState {
    /// Not currently ingesting.
    Stopped,
    /// Connected and between records.
    Running,
    /// Actively receiving records.
    Receiving,
}

impl UptimeState {
    fn gauge_value(self) -> u64 {
        match self {
            UptimeState::Stopped => 0,
            UptimeState::Running => 10,
            UptimeState::Receiving => 20,
        }
    }
}

/// Counters and gauges for one ingestion source.
#[derive(Debug, Default)]
pub struct SourceMetrics {
    calls: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    objects_received: AtomicU64,
    objects_stored: AtomicU64,
    batches: AtomicU64,
    deletes_skipped: AtomicU64,
    invalid_skipped: AtomicU64,
    dead_letter_resolved: AtomicU64,
    dead_letter_obsolete: AtomicU64,
    uptime: AtomicU64,
}

impl SourceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_objects_received(&self, count: u64) {
        self.objects_received.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_objects_stored(&self, count: u64) {
        self.objects_stored.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_batch(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete_skipped(&self) {
        self.deletes_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_skipped(&self) {
        self.invalid_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dead_letter_resolved(&self) {
        self.dead_letter_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dead_letter_obsolete(&self) {
        self.dead_letter_obsolete.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_uptime(&self, state: UptimeState) {
        self.uptime.store(state.gauge_value(), Ordering::Relaxed);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn objects_received(&self) -> u64 {
        self.objects_received.load(Ordering::Relaxed)
    }

    pub fn objects_stored(&self) -> u64 {
        self.objects_stored.load(Ordering::Relaxed)
    }

    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    pub fn deletes_skipped(&self) -> u64 {
        self.deletes_skipped.load(Ordering::Relaxed)
    }

    pub fn invalid_skipped(&self) -> u64 {
        self.invalid_skipped.load(Ordering::Relaxed)
    }

    pub fn dead_letter_resolved(&self) -> u64 {
        self.dead_letter_resolved.load(Ordering::Relaxed)
    }

    pub fn dead_letter_obsolete(&self) -> u64 {
        self.dead_letter_obsolete.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> u64 {
        self.uptime.load(Ordering::Relaxed)
    }
}

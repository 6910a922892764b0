//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use contracts::DeliveryCounts;

/// Metrics for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Records taken into the queue
    accepted: AtomicU64,
    /// Total successful writes
    write_count: AtomicU64,
    /// Total bytes accepted by the sink
    bytes_written: AtomicU64,
    /// Total failed write attempts
    failure_count: AtomicU64,
    /// Total retries scheduled
    retry_count: AtomicU64,
    /// Records given up on: retries exhausted, queue full, or shutdown overran
    dropped_count: AtomicU64,
    /// Acknowledged by the destination after the write (queue sinks)
    delivered: AtomicU64,
    /// Written but reported failed or never acknowledged (queue sinks)
    delivery_failed: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn inc_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Record one successful write of `bytes` bytes
    pub fn record_write(&self, bytes: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn retry_count(&self) -> u64 {
        self.retry_count.load(Ordering::Relaxed)
    }

    pub fn inc_retry_count(&self) {
        self.retry_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    pub fn inc_dropped_count(&self) {
        self.add_dropped(1);
    }

    pub fn add_dropped(&self, count: u64) {
        self.dropped_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn delivery_failed(&self) -> u64 {
        self.delivery_failed.load(Ordering::Relaxed)
    }

    /// Store the final delivery outcome; pending reports count as failed
    pub fn record_deliveries(&self, counts: DeliveryCounts) {
        self.delivered.store(counts.delivered, Ordering::Relaxed);
        self.delivery_failed
            .store(counts.failed + counts.pending, Ordering::Relaxed);
    }

    /// Mark every written but unacknowledged record as failed
    pub fn fail_unacknowledged(&self) {
        let settled = self.delivered() + self.delivery_failed();
        let unsettled = self.write_count().saturating_sub(settled);
        self.delivery_failed.fetch_add(unsettled, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            accepted: self.accepted(),
            write_count: self.write_count(),
            bytes_written: self.bytes_written(),
            failure_count: self.failure_count(),
            retry_count: self.retry_count(),
            dropped_count: self.dropped_count(),
            delivered: self.delivered(),
            delivery_failed: self.delivery_failed(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub accepted: u64,
    pub write_count: u64,
    pub bytes_written: u64,
    pub failure_count: u64,
    pub retry_count: u64,
    pub dropped_count: u64,
    pub delivered: u64,
    pub delivery_failed: u64,
}

//! SinkHandle - manages a sink with isolated queue and worker task
//!
//! Enqueueing waits a bounded time for queue space. A sink whose queue stays
//! full is marked saturated and sheds records without waiting until its worker
//! catches up, so one stuck sink never holds back the others.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use contracts::{EncodedRecord, RecordSink, RetryPolicy, SinkKind};

use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// Default wait for space in a full sink queue
pub const DEFAULT_ENQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Result of offering one record to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued for the worker
    Accepted,
    /// Queue stayed full; counted as dropped for this sink
    Dropped,
    /// Sink capped or its worker gone
    Rejected,
}

/// Handle to a running sink worker
pub struct SinkHandle {
    /// Sink name
    name: String,
    /// Sink delivery class
    kind: SinkKind,
    /// Channel to send records to worker
    tx: mpsc::Sender<EncodedRecord>,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
    /// Tells the worker to give up on its backlog
    stop: CancellationToken,
    /// Longest wait for queue space
    enqueue_timeout: Duration,
    /// Maximum number of records this sink accepts (None = unlimited)
    cap: Option<u64>,
    /// Records accepted so far
    accepted: u64,
    /// Records dropped because the queue was full
    shed: u64,
    /// Last wait for space timed out; full queue drops immediately
    saturated: bool,
    /// Worker gone; further sends are skipped
    closed: bool,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task
    pub fn spawn<S: RecordSink + Send + 'static>(
        sink: S,
        queue_capacity: usize,
        retry: RetryPolicy,
    ) -> Self {
        let name = sink.name().to_string();
        let kind = sink.kind();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(SinkMetrics::new());
        let stop = CancellationToken::new();

        let worker_metrics = Arc::clone(&metrics);
        let worker_stop = stop.clone();
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            sink_worker(sink, rx, worker_metrics, retry, worker_stop, worker_name).await;
        });

        Self {
            name,
            kind,
            tx,
            metrics,
            worker_handle,
            stop,
            enqueue_timeout: DEFAULT_ENQUEUE_TIMEOUT,
            cap: None,
            accepted: 0,
            shed: 0,
            saturated: false,
            closed: false,
        }
    }

    /// Set the longest wait for queue space
    pub fn with_enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.enqueue_timeout = timeout;
        self
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SinkKind {
        self.kind
    }

    pub fn enqueue_timeout(&self) -> Duration {
        self.enqueue_timeout
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Limit the number of records this sink accepts
    pub fn set_cap(&mut self, cap: Option<u64>) {
        self.cap = cap;
    }

    pub fn cap(&self) -> Option<u64> {
        self.cap
    }

    /// Records accepted into the queue so far
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Whether the last wait for queue space timed out
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    /// Whether the sink still takes records
    pub fn is_accepting(&self) -> bool {
        !self.closed && self.cap.is_none_or(|cap| self.accepted < cap)
    }

    /// Enqueue without waiting
    ///
    /// A full queue hands the record back so the caller can wait for space.
    /// A saturated sink drops it instead.
    pub fn try_send(&mut self, record: EncodedRecord) -> Result<SendOutcome, EncodedRecord> {
        if !self.is_accepting() {
            return Ok(SendOutcome::Rejected);
        }

        match self.tx.try_send(record) {
            Ok(()) => Ok(self.on_accepted()),
            Err(mpsc::error::TrySendError::Full(record)) if self.saturated => {
                debug!(sink = %self.name, seq = record.seq, "Sink saturated, record dropped");
                Ok(self.on_shed(1))
            }
            Err(mpsc::error::TrySendError::Full(record)) => Err(record),
            Err(mpsc::error::TrySendError::Closed(record)) => Ok(self.on_closed(record.seq)),
        }
    }

    /// Wait until `deadline` for queue space
    ///
    /// On timeout the record is dropped and the sink becomes saturated.
    pub async fn send_until(&mut self, record: EncodedRecord, deadline: Instant) -> SendOutcome {
        if !self.is_accepting() {
            return SendOutcome::Rejected;
        }

        let seq = record.seq;
        match timeout_at(deadline, self.tx.send(record)).await {
            Ok(Ok(())) => self.on_accepted(),
            Ok(Err(mpsc::error::SendError(record))) => self.on_closed(record.seq),
            Err(_) => {
                warn!(
                    sink = %self.name,
                    seq,
                    timeout_ms = self.enqueue_timeout.as_millis() as u64,
                    "Sink queue stayed full, dropping records until it drains"
                );
                self.saturated = true;
                self.on_shed(1)
            }
        }
    }

    /// Enqueue, waiting at most the enqueue timeout for space
    pub async fn send(&mut self, record: EncodedRecord) -> SendOutcome {
        match self.try_send(record) {
            Ok(outcome) => outcome,
            Err(record) => {
                let deadline = Instant::now() + self.enqueue_timeout;
                self.send_until(record, deadline).await
            }
        }
    }

    fn on_accepted(&mut self) -> SendOutcome {
        if self.saturated {
            debug!(sink = %self.name, "Sink queue has space again");
            self.saturated = false;
        }
        self.accepted += 1;
        self.metrics.inc_accepted();
        let depth = self.tx.max_capacity() - self.tx.capacity();
        self.metrics.set_queue_len(depth);
        observability::record_sink_queue_depth(&self.name, depth);
        SendOutcome::Accepted
    }

    fn on_shed(&mut self, count: u64) -> SendOutcome {
        self.shed += count;
        self.metrics.add_dropped(count);
        observability::record_sink_dropped(&self.name, "queue_full", count);
        SendOutcome::Dropped
    }

    fn on_closed(&mut self, seq: u64) -> SendOutcome {
        self.closed = true;
        error!(sink = %self.name, seq, "Sink worker closed unexpectedly");
        SendOutcome::Rejected
    }

    /// Shutdown the sink worker
    ///
    /// The worker gets `timeout` to write its backlog, flush and close. If it
    /// overruns, the backlog is discarded and the worker gets another `timeout`
    /// to flush and close. A worker that still has not finished is aborted.
    /// Every accepted record ends up written or dropped in the returned
    /// snapshot; for queue sinks every written record is delivered or failed.
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self, timeout: Duration) -> MetricsSnapshot {
        let Self {
            name,
            kind,
            tx,
            metrics,
            mut worker_handle,
            stop,
            accepted,
            shed,
            ..
        } = self;

        // Drop sender to signal worker to stop
        drop(tx);

        let finished = match tokio::time::timeout(timeout, &mut worker_handle).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(
                    sink = %name,
                    timeout_ms = timeout.as_millis() as u64,
                    queued = metrics.queue_len(),
                    "Sink did not drain in time, discarding backlog"
                );
                stop.cancel();
                match tokio::time::timeout(timeout, &mut worker_handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        worker_handle.abort();
                        error!(sink = %name, "Sink did not close in time, worker aborted");
                        worker_handle.await
                    }
                }
            }
        };

        if let Err(e) = finished {
            if e.is_panic() {
                error!(sink = %name, error = ?e, "Worker task panicked");
            }
            // Whatever the worker did not settle is lost
            let settled = metrics.write_count() + metrics.dropped_count().saturating_sub(shed);
            let lost = accepted.saturating_sub(settled);
            if lost > 0 {
                metrics.add_dropped(lost);
                observability::record_sink_dropped(&name, "shutdown", lost);
            }
            if kind == SinkKind::Queue {
                metrics.fail_unacknowledged();
            }
        }

        metrics.set_queue_len(0);
        debug!(sink = %name, "SinkHandle shutdown complete");
        metrics.snapshot()
    }
}

/// Worker task that consumes records and writes to sink
#[instrument(
    name = "sink_worker_loop",
    skip(sink, rx, metrics, retry, stop),
    fields(sink = %name)
)]
async fn sink_worker<S: RecordSink>(
    mut sink: S,
    mut rx: mpsc::Receiver<EncodedRecord>,
    metrics: Arc<SinkMetrics>,
    retry: RetryPolicy,
    stop: CancellationToken,
    name: String,
) {
    debug!(sink = %name, "Sink worker started");

    loop {
        let record = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            next = rx.recv() => match next {
                Some(record) => record,
                None => break,
            },
        };
        metrics.set_queue_len(rx.len());

        tokio::select! {
            biased;
            _ = stop.cancelled() => {
                metrics.inc_dropped_count();
                observability::record_sink_dropped(&name, "shutdown", 1);
                warn!(sink = %name, seq = record.seq, "Write interrupted by shutdown, record dropped");
                break;
            }
            _ = write_with_retry(&mut sink, &record, &metrics, &retry, &name) => {}
        }
    }

    // Backlog left behind by a forced stop
    rx.close();
    let mut backlog = 0u64;
    while rx.try_recv().is_ok() {
        backlog += 1;
    }
    if backlog > 0 {
        metrics.add_dropped(backlog);
        observability::record_sink_dropped(&name, "shutdown", backlog);
        warn!(sink = %name, backlog, "Backlog discarded on shutdown");
    }

    // Cleanup
    if let Err(e) = sink.flush().await {
        error!(sink = %name, error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = sink.close().await {
        error!(sink = %name, error = %e, "Close failed on shutdown");
    }
    if let Some(counts) = sink.delivery_counts() {
        metrics.record_deliveries(counts);
    }

    metrics.set_queue_len(0);
    debug!(sink = %name, "Sink worker stopped");
}

async fn write_with_retry<S: RecordSink>(
    sink: &mut S,
    record: &EncodedRecord,
    metrics: &SinkMetrics,
    retry: &RetryPolicy,
    name: &str,
) {
    let mut attempt: u32 = 0;
    loop {
        match sink.write(record).await {
            Ok(bytes) => {
                metrics.record_write(bytes);
                observability::record_sink_write(name, true);
                return;
            }
            Err(e) => {
                metrics.inc_failure_count();
                observability::record_sink_write(name, false);

                if attempt >= retry.max_retries {
                    metrics.inc_dropped_count();
                    observability::record_sink_dropped(name, "retries_exhausted", 1);
                    error!(
                        sink = %name,
                        seq = record.seq,
                        attempts = attempt + 1,
                        error = %e,
                        "Write failed, record dropped"
                    );
                    return;
                }

                let delay = retry.backoff_for(attempt);
                attempt += 1;
                metrics.inc_retry_count();
                observability::record_sink_retry(name);
                warn!(
                    sink = %name,
                    seq = record.seq,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Write failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

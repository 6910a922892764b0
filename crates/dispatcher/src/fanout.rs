//! Fanout - routes every record to each accepting sink

use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument};

use contracts::{EncodedRecord, RetryPolicy, SinkConfig, SinkKind};

use crate::error::DispatcherError;
use crate::handle::{SendOutcome, SinkHandle, DEFAULT_ENQUEUE_TIMEOUT};
use crate::metrics::MetricsSnapshot;
use crate::sinks::{ConsoleSink, FileSink, QueueSink, QueueSinkConfig};

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Final per-sink state after shutdown
#[derive(Debug, Clone)]
pub struct SinkReport {
    pub name: String,
    pub kind: SinkKind,
    pub metrics: MetricsSnapshot,
}

/// What happened to one record across the sinks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Sinks that queued the record
    pub accepted: usize,
    /// Sinks whose queue stayed full
    pub dropped: usize,
}

impl DispatchOutcome {
    fn count(&mut self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Accepted => self.accepted += 1,
            SendOutcome::Dropped => self.dropped += 1,
            SendOutcome::Rejected => {}
        }
    }

    /// No sink took or even tried to take the record
    pub fn is_rejected(&self) -> bool {
        self.accepted == 0 && self.dropped == 0
    }
}

/// Builder for creating a Fanout from sink configurations
pub struct FanoutBuilder {
    sinks: Vec<SinkConfig>,
    retry: RetryPolicy,
    enqueue_timeout: Duration,
    shutdown_timeout: Duration,
}

impl FanoutBuilder {
    pub fn new(sinks: Vec<SinkConfig>) -> Self {
        Self {
            sinks,
            retry: RetryPolicy::default(),
            enqueue_timeout: DEFAULT_ENQUEUE_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Retry policy applied by every sink worker
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Longest wait for space in a full sink queue
    pub fn enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.enqueue_timeout = timeout;
        self
    }

    /// Budget later passed to [`Fanout::shutdown`]; queue sinks fit their
    /// flush and delivery drain into it
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Open every sink and start its worker
    ///
    /// If a sink fails to open, the sinks opened before it are closed again.
    #[instrument(name = "fanout_builder_build", skip(self), fields(sink_count = self.sinks.len()))]
    pub async fn build(self) -> Result<Fanout, DispatcherError> {
        let mut handles = Vec::with_capacity(self.sinks.len());
        for sink_config in &self.sinks {
            match self.create_sink_handle(sink_config).await {
                Ok(handle) => handles.push(handle.with_enqueue_timeout(self.enqueue_timeout)),
                Err(e) => {
                    Fanout::with_handles(handles)
                        .shutdown(self.shutdown_timeout)
                        .await;
                    return Err(e);
                }
            }
        }
        Ok(Fanout::with_handles(handles))
    }

    /// Create a SinkHandle from configuration
    #[instrument(
        name = "fanout_create_sink_handle",
        skip(self, config),
        fields(sink = %config.name, sink_type = ?config.sink_type)
    )]
    async fn create_sink_handle(&self, config: &SinkConfig) -> Result<SinkHandle, DispatcherError> {
        let retry = self.retry.clone();
        match config.sink_type {
            SinkKind::Console => {
                let sink = ConsoleSink::new(&config.name);
                Ok(SinkHandle::spawn(sink, config.queue_capacity, retry))
            }
            SinkKind::File => {
                let sink = FileSink::from_params(&config.name, &config.params)
                    .await
                    .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
                Ok(SinkHandle::spawn(sink, config.queue_capacity, retry))
            }
            SinkKind::Queue => {
                let mut queue_config = QueueSinkConfig::from_params(&config.params)
                    .map_err(|e| DispatcherError::sink_creation(&config.name, e))?;
                queue_config.fit_shutdown_budget(self.shutdown_timeout);
                let sink = QueueSink::new(&config.name, queue_config)
                    .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
                Ok(SinkHandle::spawn(sink, config.queue_capacity, retry))
            }
        }
    }
}

/// Fan-out over the opened sinks
pub struct Fanout {
    handles: Vec<SinkHandle>,
}

impl Fanout {
    /// Create a fanout with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>) -> Self {
        Self { handles }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Whether any sink streams without a natural end
    pub fn has_unbounded_sink(&self) -> bool {
        self.handles.iter().any(|h| h.kind().is_unbounded())
    }

    /// Cap every bounded (non-queue) sink at `cap` records
    pub fn cap_bounded_sinks(&mut self, cap: u64) {
        for handle in self.handles.iter_mut().filter(|h| !h.kind().is_unbounded()) {
            debug!(sink = %handle.name(), cap, "Bounded sink capped");
            handle.set_cap(Some(cap));
        }
    }

    /// Whether any sink still takes records
    pub fn is_accepting(&self) -> bool {
        self.handles.iter().any(SinkHandle::is_accepting)
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Enqueue a record on every accepting sink
    ///
    /// Every sink with queue space gets the record first. Sinks with a full
    /// queue are then waited on, each until its enqueue timeout measured from
    /// the start of the call, and drop the record if that passes.
    pub async fn dispatch(&mut self, record: &EncodedRecord) -> DispatchOutcome {
        let started = Instant::now();
        let mut outcome = DispatchOutcome::default();
        let mut waiting = Vec::new();

        for (index, handle) in self.handles.iter_mut().enumerate() {
            match handle.try_send(record.clone()) {
                Ok(sent) => outcome.count(sent),
                Err(record) => waiting.push((index, record)),
            }
        }

        for (index, record) in waiting {
            let handle = &mut self.handles[index];
            let deadline = started + handle.enqueue_timeout();
            outcome.count(handle.send_until(record, deadline).await);
        }

        outcome
    }

    /// Flush and close every sink concurrently, see [`SinkHandle::shutdown`]
    #[instrument(name = "fanout_shutdown", skip(self), fields(sinks = self.handles.len()))]
    pub async fn shutdown(self, timeout: Duration) -> Vec<SinkReport> {
        let mut tasks = JoinSet::new();
        for (index, handle) in self.handles.into_iter().enumerate() {
            tasks.spawn(async move {
                let name = handle.name().to_string();
                let kind = handle.kind();
                let metrics = handle.shutdown(timeout).await;
                (index, SinkReport { name, kind, metrics })
            });
        }

        let mut reports = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => reports.push(entry),
                Err(e) => error!(error = ?e, "Sink shutdown task failed"),
            }
        }
        reports.sort_by_key(|(index, _)| *index);
        let reports: Vec<SinkReport> = reports.into_iter().map(|(_, report)| report).collect();

        info!(sinks = reports.len(), "Fanout shutdown complete");
        reports
    }
}

//! QueueSink - one Kafka message per record
//!
//! `write` only enqueues into the producer's local buffer. Delivery reports are
//! awaited by a drain task owned by the sink; they are logged and counted, never
//! surfaced as write errors.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use config_loader::BrokerProperties;
use contracts::{ContractError, DeliveryCounts, EncodedRecord, RecordSink, SinkKind};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Default broker properties file
pub const DEFAULT_PROPERTIES_PATH: &str = "./conf/kafka.properties";

const DEFAULT_FLUSH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ENQUEUE_TIMEOUT_MS: u64 = 5_000;
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(10);
const EMPTY_KEY: &str = "";

/// Configuration for QueueSink
#[derive(Debug, Clone)]
pub struct QueueSinkConfig {
    /// Destination topic
    pub topic: String,
    /// `key=value` producer properties
    pub properties_path: PathBuf,
    /// Overrides `bootstrap.servers`
    pub brokers: Option<String>,
    /// Upper bound for flushing outstanding deliveries on close
    pub flush_timeout: Duration,
    /// How long `write` waits while the local producer queue is full
    pub enqueue_timeout: Duration,
}

impl QueueSinkConfig {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            properties_path: PathBuf::from(DEFAULT_PROPERTIES_PATH),
            brokers: None,
            flush_timeout: Duration::from_millis(DEFAULT_FLUSH_TIMEOUT_MS),
            enqueue_timeout: Duration::from_millis(DEFAULT_ENQUEUE_TIMEOUT_MS),
        }
    }

    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let topic = params
            .get("topic")
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| "missing 'topic' parameter".to_string())?;

        let mut config = Self::new(topic);

        if let Some(path) = params.get("properties") {
            config.properties_path = PathBuf::from(path);
        }
        config.brokers = params
            .get("brokers")
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        if let Some(ms) = params.get("flush_timeout_ms") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| format!("invalid flush_timeout_ms '{ms}': {e}"))?;
            config.flush_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = params.get("enqueue_timeout_ms") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| format!("invalid enqueue_timeout_ms '{ms}': {e}"))?;
            config.enqueue_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Shrink the flush and drain waits so both fit in `budget`
    ///
    /// `close` runs a producer flush followed by a drain wait, each bounded by
    /// `flush_timeout`; together they take at most 4/5 of the budget.
    pub fn fit_shutdown_budget(&mut self, budget: Duration) {
        let per_phase = budget.mul_f64(0.4);
        if self.flush_timeout > per_phase {
            debug!(
                topic = %self.topic,
                requested_ms = self.flush_timeout.as_millis() as u64,
                fitted_ms = per_phase.as_millis() as u64,
                "Flush timeout reduced to fit shutdown budget"
            );
            self.flush_timeout = per_phase;
        }
    }

    /// Build the producer configuration from the properties file and overrides
    pub fn client_config(&self) -> Result<ClientConfig, ContractError> {
        let mut props = if self.properties_path.exists() {
            BrokerProperties::load(&self.properties_path)?
        } else if self.brokers.is_some() {
            debug!(
                path = %self.properties_path.display(),
                "Properties file absent, using broker override only"
            );
            BrokerProperties::default()
        } else {
            return Err(ContractError::config_parse(format!(
                "broker properties file '{}' not found and no brokers given",
                self.properties_path.display()
            )));
        };

        if let Some(brokers) = &self.brokers {
            props.set("bootstrap.servers", brokers.as_str());
        }
        if props.get("bootstrap.servers").is_none() {
            return Err(ContractError::config_validation(
                "bootstrap.servers",
                "no brokers configured",
            ));
        }

        let mut client = ClientConfig::new();
        for (key, value) in props.iter() {
            client.set(key, value);
        }
        if props.get("message.timeout.ms").is_none() {
            client.set("message.timeout.ms", "30000");
        }
        Ok(client)
    }
}

/// Delivery report counters
#[derive(Debug, Default)]
struct DeliveryStats {
    pending: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// Sink that produces every record to a Kafka topic
pub struct QueueSink {
    name: String,
    config: QueueSinkConfig,
    producer: FutureProducer,
    deliveries: Option<mpsc::UnboundedSender<DeliveryFuture>>,
    drain: Option<JoinHandle<()>>,
    stop: CancellationToken,
    stats: Arc<DeliveryStats>,
}

impl QueueSink {
    /// Create the producer and start the delivery drain task
    ///
    /// Must be called inside a Tokio runtime.
    #[instrument(name = "queue_sink_new", skip(name, config), fields(topic = %config.topic))]
    pub fn new(name: impl Into<String>, config: QueueSinkConfig) -> Result<Self, ContractError> {
        let name = name.into();
        let producer: FutureProducer = config
            .client_config()?
            .create()
            .map_err(|e| ContractError::sink_connection(&name, e.to_string()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let stop = CancellationToken::new();
        let stats = Arc::new(DeliveryStats::default());
        let drain = tokio::spawn(drain_deliveries(
            name.clone(),
            rx,
            stop.clone(),
            Arc::clone(&stats),
        ));

        info!(sink = %name, topic = %config.topic, "QueueSink producer created");

        Ok(Self {
            name,
            config,
            producer,
            deliveries: Some(tx),
            drain: Some(drain),
            stop,
            stats,
        })
    }

    fn counts(&self) -> DeliveryCounts {
        DeliveryCounts {
            pending: self.stats.pending.load(Ordering::Relaxed),
            delivered: self.stats.delivered.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }

    fn track(&self, delivery: DeliveryFuture) {
        self.stats.pending.fetch_add(1, Ordering::Relaxed);
        let sent = self
            .deliveries
            .as_ref()
            .is_some_and(|tx| tx.send(delivery).is_ok());
        if !sent {
            self.stats.pending.fetch_sub(1, Ordering::Relaxed);
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            warn!(sink = %self.name, "Delivery drain stopped, report lost");
        }
    }
}

impl RecordSink for QueueSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Queue
    }

    async fn write(&mut self, record: &EncodedRecord) -> Result<usize, ContractError> {
        let deadline = Instant::now() + self.config.enqueue_timeout;
        loop {
            match self.producer.send_result(
                FutureRecord::to(&self.config.topic)
                    .key(EMPTY_KEY)
                    .payload(record.as_bytes()),
            ) {
                Ok(delivery) => {
                    self.track(delivery);
                    return Ok(record.len());
                }
                Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), _))
                    if Instant::now() < deadline => {}
                Err((e, _)) => {
                    return Err(ContractError::sink_write(&self.name, e.to_string()));
                }
            }
            tokio::time::sleep(QUEUE_FULL_BACKOFF).await;
        }
    }

    /// Wait (bounded) for the producer to hand off buffered messages
    #[instrument(name = "queue_sink_flush", skip(self), fields(sink = %self.name))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        let producer = self.producer.clone();
        let timeout = self.config.flush_timeout;
        let result = tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;

        if let Err(e) = result {
            warn!(
                sink = %self.name,
                pending = self.stats.pending.load(Ordering::Relaxed),
                error = %e,
                "Producer flush did not complete"
            );
        }
        Ok(())
    }

    #[instrument(name = "queue_sink_close", skip(self), fields(sink = %self.name))]
    async fn close(&mut self) -> Result<(), ContractError> {
        // No more deliveries; the drain finishes once the channel is empty
        self.deliveries.take();

        if let Some(mut drain) = self.drain.take() {
            if tokio::time::timeout(self.config.flush_timeout, &mut drain)
                .await
                .is_err()
            {
                self.stop.cancel();
                if let Err(e) = drain.await {
                    warn!(sink = %self.name, error = ?e, "Delivery drain task failed");
                }
            }
        }

        let undelivered = self.stats.pending.swap(0, Ordering::Relaxed);
        if undelivered > 0 {
            self.stats.failed.fetch_add(undelivered, Ordering::Relaxed);
            observability::record_queue_undelivered(&self.name, undelivered);
            warn!(sink = %self.name, undelivered, "Messages still undelivered at close");
        }

        let counts = self.counts();
        info!(
            sink = %self.name,
            delivered = counts.delivered,
            failed = counts.failed,
            "QueueSink closed"
        );
        Ok(())
    }

    fn delivery_counts(&self) -> Option<DeliveryCounts> {
        Some(self.counts())
    }
}

/// Await delivery reports in enqueue order until the channel closes or `stop` fires
async fn drain_deliveries(
    name: String,
    mut rx: mpsc::UnboundedReceiver<DeliveryFuture>,
    stop: CancellationToken,
    stats: Arc<DeliveryStats>,
) {
    loop {
        let delivery = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            next = rx.recv() => match next {
                Some(delivery) => delivery,
                None => break,
            },
        };

        let outcome = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            outcome = delivery => outcome,
        };

        stats.pending.fetch_sub(1, Ordering::Relaxed);
        match outcome {
            Ok(Ok(_)) => {
                stats.delivered.fetch_add(1, Ordering::Relaxed);
                observability::record_queue_delivery(&name, true);
            }
            Ok(Err((e, _))) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                observability::record_queue_delivery(&name, false);
                warn!(sink = %name, error = %e, "Delivery failed");
            }
            Err(_) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                observability::record_queue_delivery(&name, false);
                warn!(sink = %name, "Delivery report canceled");
            }
        }
    }
    debug!(sink = %name, "Delivery drain stopped");
}

//! RecordSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use serde::{Deserialize, Serialize};

use crate::{ContractError, EncodedRecord};

/// Delivery class of a sink.
///
/// `Queue` sinks stream without a natural end; `File` and `Console` sinks
/// are bounded by the record ceiling when the run has no explicit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    Console,
    File,
    Queue,
}

impl SinkKind {
    /// Whether the sink keeps accepting records in an unlimited run
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Queue)
    }
}

/// Outcome of messages acknowledged after `write` returned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryCounts {
    /// Still awaiting a report
    pub pending: u64,
    pub delivered: u64,
    /// Reported failed, or never reported before close
    pub failed: u64,
}

/// Record output trait
///
/// All sink implementations must implement this trait. Opening happens in the
/// sink's constructor; a constructed sink is ready for `write`.
#[trait_variant::make(RecordSink: Send)]
pub trait LocalRecordSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Delivery class
    fn kind(&self) -> SinkKind;

    /// Write one serialized record, returning the number of payload bytes accepted
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, record: &EncodedRecord) -> Result<usize, ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;

    /// Delivery outcomes for sinks whose writes are acknowledged later
    fn delivery_counts(&self) -> Option<DeliveryCounts> {
        None
    }
}

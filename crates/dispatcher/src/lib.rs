//! # Dispatcher
//!
//! 记录分发模块。
//!
//! 负责：
//! - 将 `EncodedRecord` fan-out 到多个 sinks
//! - 每个 sink 独立队列与 worker，失败互不影响
//! - 有界队列提供有限等待的背压，队列长期满时只丢弃该 sink 的记录
//! - 写失败按重试策略退避
//! - 有界 sink 在无限运行中按上限截断

pub mod error;
pub mod fanout;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{EncodedRecord, RecordSink, SinkKind};
pub use error::DispatcherError;
pub use fanout::{DispatchOutcome, Fanout, FanoutBuilder, SinkReport};
pub use handle::{SendOutcome, SinkHandle, DEFAULT_ENQUEUE_TIMEOUT};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, FileSink, FileSinkConfig, QueueSink, QueueSinkConfig};

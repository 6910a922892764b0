//! Sink implementations
//!
//! Contains ConsoleSink, FileSink, and QueueSink.

mod console;
mod file;
mod queue;

pub use self::console::ConsoleSink;
pub use self::file::{FileSink, FileSinkConfig};
pub use self::queue::{QueueSink, QueueSinkConfig};

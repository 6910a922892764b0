//! Run statistics

use std::fmt;
use std::time::Duration;

use contracts::SinkKind;
use dispatcher::SinkReport;
use observability::EmissionSummary;

use crate::RunState;

/// Statistics from a finished run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Terminal state (`Completed` or `Stopped`)
    pub outcome: RunState,

    /// Records materialized and handed to the fan-out
    pub records: u64,

    /// Wall time from start of emission to sinks closed
    pub elapsed: Duration,

    /// Fields that took a fallback value
    pub fallbacks: u64,

    /// Final per-sink counters
    pub sinks: Vec<SinkReport>,

    /// Record size / latency aggregates
    pub summary: EmissionSummary,
}

impl RunReport {
    /// Records per second over the whole run
    pub fn records_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }

    /// Records dropped by sinks: retries exhausted, queue full or cut off at shutdown
    pub fn dropped(&self) -> u64 {
        self.sinks.iter().map(|s| s.metrics.dropped_count).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Run Statistics ===")?;
        writeln!(f, "Outcome: {}", self.outcome)?;
        writeln!(f, "Records: {}", self.records)?;
        writeln!(f, "Elapsed: {:.3}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "Throughput: {:.2} records/s", self.records_per_second())?;
        writeln!(f, "Field fallbacks: {}", self.fallbacks)?;

        for sink in &self.sinks {
            let m = &sink.metrics;
            write!(
                f,
                "Sink '{}' ({:?}): accepted={}, written={}, bytes={}, failures={}, retries={}, dropped={}",
                sink.name,
                sink.kind,
                m.accepted,
                m.write_count,
                m.bytes_written,
                m.failure_count,
                m.retry_count,
                m.dropped_count
            )?;
            if sink.kind == SinkKind::Queue {
                write!(f, ", delivered={}, undelivered={}", m.delivered, m.delivery_failed)?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", self.summary)
    }
}

//! 生成与分发指标收集模块
//!
//! 通过 `metrics` facade 上报，并在内存中聚合运行摘要。

use metrics::{counter, gauge, histogram};

/// 记录一条已序列化并进入分发的记录
pub fn record_record_emitted(bytes: usize) {
    counter!("datagen_records_generated_total").increment(1);
    histogram!("datagen_record_bytes").record(bytes as f64);
}

/// 记录一次字段降级 (null / literal)
pub fn record_field_fallback(reason: &str) {
    counter!(
        "datagen_field_fallbacks_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// 记录单条记录的物化耗时 (微秒)
pub fn record_materialize_latency_us(latency_us: f64) {
    histogram!("datagen_materialize_latency_us").record(latency_us);
}

/// 记录 sink 写入结果
pub fn record_sink_write(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "datagen_sink_writes_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录 sink 写入重试
pub fn record_sink_retry(sink_name: &str) {
    counter!(
        "datagen_sink_retries_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// 记录被 sink 丢弃的记录
///
/// `reason`: `retries_exhausted` / `queue_full` / `shutdown`
pub fn record_sink_dropped(sink_name: &str, reason: &'static str, count: u64) {
    counter!(
        "datagen_sink_dropped_total",
        "sink" => sink_name.to_string(),
        "reason" => reason
    )
    .increment(count);
}

/// 记录 sink 队列深度
pub fn record_sink_queue_depth(sink_name: &str, depth: usize) {
    gauge!(
        "datagen_sink_queue_depth",
        "sink" => sink_name.to_string()
    )
    .set(depth as f64);
}

/// 记录消息队列投递回执
pub fn record_queue_delivery(sink_name: &str, success: bool) {
    let status = if success { "delivered" } else { "failed" };
    counter!(
        "datagen_queue_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录关闭时仍未收到回执的消息 (计为失败)
pub fn record_queue_undelivered(sink_name: &str, count: u64) {
    counter!(
        "datagen_queue_deliveries_total",
        "sink" => sink_name.to_string(),
        "status" => "undelivered".to_string()
    )
    .increment(count);
}

/// 生成指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct EmissionMetricsAggregator {
    /// 总记录数
    pub total_records: u64,

    /// 总字节数
    pub total_bytes: u64,

    /// 记录大小统计 (字节)
    pub record_size: RunningStats,

    /// 物化耗时统计 (微秒)
    pub materialize_us: RunningStats,
}

impl EmissionMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, bytes: usize, materialize_us: f64) {
        self.total_records += 1;
        self.total_bytes += bytes as u64;
        self.record_size.push(bytes as f64);
        self.materialize_us.push(materialize_us);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> EmissionSummary {
        EmissionSummary {
            total_records: self.total_records,
            total_bytes: self.total_bytes,
            record_size: StatsSummary::from(&self.record_size),
            materialize_us: StatsSummary::from(&self.materialize_us),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct EmissionSummary {
    pub total_records: u64,
    pub total_bytes: u64,
    pub record_size: StatsSummary,
    pub materialize_us: StatsSummary,
}

impl std::fmt::Display for EmissionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Emission Metrics Summary ===")?;
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f, "Total bytes: {}", self.total_bytes)?;
        writeln!(f, "Record size (bytes): {}", self.record_size)?;
        writeln!(f, "Materialize latency (us): {}", self.materialize_us)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            stats.push(v);
        }

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = EmissionMetricsAggregator::new();
        aggregator.update(100, 12.0);
        aggregator.update(300, 8.0);

        assert_eq!(aggregator.total_records, 2);
        assert_eq!(aggregator.total_bytes, 400);
        let summary = aggregator.summary();
        assert!((summary.record_size.mean - 200.0).abs() < 1e-10);
        assert!((summary.materialize_us.max - 12.0).abs() < 1e-10);

        aggregator.reset();
        assert_eq!(aggregator.total_records, 0);
    }

    #[test]
    fn test_summary_display() {
        let summary = EmissionSummary {
            total_records: 1000,
            total_bytes: 64_000,
            record_size: StatsSummary {
                count: 1000,
                min: 60.0,
                max: 70.0,
                mean: 64.0,
                std_dev: 1.5,
            },
            materialize_us: StatsSummary::default(),
        };

        let output = format!("{}", summary);
        assert!(output.contains("Total records: 1000"));
        assert!(output.contains("mean=64.000"));
        assert!(output.contains("Materialize latency (us): N/A"));
    }

    #[test]
    fn test_recorders_without_exporter() {
        // No recorder installed: calls are no-ops
        record_record_emitted(10);
        record_field_fallback("unknown_generator");
        record_sink_write("file", true);
        record_sink_dropped("file", "queue_full", 3);
        record_queue_delivery("kafka", false);
    }
}

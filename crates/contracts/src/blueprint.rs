//! RunBlueprint - Config Loader 输出
//!
//! 描述一次生成任务的完整配置：模板、数量上限、字段错误策略、输出路由、重试策略。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::SinkKind;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的生成任务蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 模板文件路径 (JSON, 根节点必须是 object)
    pub template: PathBuf,

    /// 生成数量上限，0 表示使用默认停止策略
    #[serde(default)]
    pub limit: u64,

    /// 运行超时 (秒)，0 表示不限时
    #[serde(default)]
    pub timeout_secs: u64,

    /// 生成策略
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 输出路由配置
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,

    /// Sink 写入重试策略
    #[serde(default)]
    pub retry: RetryPolicy,

    /// 关闭时等待 sink 刷新的上限 (毫秒)
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,

    /// sink 队列满时等待空位的上限 (毫秒)，超时则该 sink 丢弃此记录
    #[serde(default = "default_enqueue_timeout_ms")]
    pub enqueue_timeout_ms: u64,
}

fn default_shutdown_timeout_ms() -> u64 {
    5000
}

fn default_enqueue_timeout_ms() -> u64 {
    1000
}

impl RunBlueprint {
    /// 仅指定模板的最小蓝图，其余字段取默认值
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            version: ConfigVersion::V1,
            template: template.into(),
            limit: 0,
            timeout_secs: 0,
            generation: GenerationConfig::default(),
            sinks: Vec::new(),
            retry: RetryPolicy::default(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            enqueue_timeout_ms: default_enqueue_timeout_ms(),
        }
    }

    /// 是否存在无界 (queue) sink
    pub fn has_unbounded_sink(&self) -> bool {
        self.sinks.iter().any(|s| s.sink_type.is_unbounded())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn enqueue_timeout(&self) -> Duration {
        Duration::from_millis(self.enqueue_timeout_ms)
    }
}

/// 生成策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// 字段级错误处理策略
    #[serde(default)]
    pub on_field_error: FieldErrorPolicy,

    /// limit 为 0 时有界 sink 接收的记录数
    #[serde(default = "default_record_ceiling")]
    pub record_ceiling: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            on_field_error: FieldErrorPolicy::default(),
            record_ceiling: default_record_ceiling(),
        }
    }
}

fn default_record_ceiling() -> u64 {
    1000
}

/// 字段错误策略 (指令解析失败 / 生成器不存在 / 生成器调用失败)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorPolicy {
    /// 字段置为 JSON null
    #[default]
    Null,
    /// 保留原始指令字符串
    Literal,
    /// 终止整个任务
    Abort,
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 名称
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkKind,

    /// 队列容量
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

fn default_queue_capacity() -> usize {
    100
}

impl SinkConfig {
    pub fn new(name: impl Into<String>, sink_type: SinkKind) -> Self {
        Self {
            name: name.into(),
            sink_type,
            queue_capacity: default_queue_capacity(),
            params: HashMap::new(),
        }
    }

    /// 设置类型特定参数
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// 写入重试策略 (指数退避)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// 最大重试次数，0 表示不重试
    #[serde(default)]
    pub max_retries: u32,

    /// 首次退避 (毫秒)
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// 退避上限 (毫秒)
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// 退避倍率，必须 >= 1
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    5000
}

fn default_multiplier() -> f64 {
    2.0
}

impl RetryPolicy {
    /// 第 `attempt` 次重试前的等待时间 (attempt 从 0 开始)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(i32::MAX as u32) as i32);
        let millis = (self.initial_backoff_ms as f64 * factor).min(self.max_backoff_ms as f64);
        Duration::from_millis(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
            multiplier: 2.0,
        };
        assert_eq!(policy.backoff_for(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(800));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(30), Duration::from_millis(1000));
    }

    #[test]
    fn blueprint_defaults_from_minimal_json() {
        let bp: RunBlueprint = serde_json::from_str(r#"{ "template": "t.json" }"#).unwrap();
        assert_eq!(bp.limit, 0);
        assert_eq!(bp.generation.record_ceiling, 1000);
        assert_eq!(bp.generation.on_field_error, FieldErrorPolicy::Null);
        assert_eq!(bp.retry.max_retries, 0);
        assert_eq!(bp.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(bp.enqueue_timeout(), Duration::from_secs(1));
        assert!(bp.timeout().is_none());
        assert!(!bp.has_unbounded_sink());
    }

    #[test]
    fn sink_kind_from_toml() {
        let bp: RunBlueprint = toml::from_str(
            r#"
template = "t.json"
limit = 5

[[sinks]]
name = "events"
sink_type = "queue"
params = { topic = "users" }
"#,
        )
        .unwrap();
        assert_eq!(bp.sinks[0].sink_type, SinkKind::Queue);
        assert_eq!(bp.sinks[0].queue_capacity, 100);
        assert!(bp.has_unbounded_sink());
    }
}

//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, RunBlueprint};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<RunBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<RunBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<RunBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FieldErrorPolicy, SinkKind};

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
template = "templates/user.json"
limit = 500
timeout_secs = 30

[generation]
on_field_error = "literal"
record_ceiling = 250

[retry]
max_retries = 3
initial_backoff_ms = 50

[[sinks]]
name = "file"
sink_type = "file"
params = { path = "./data/users.txt" }

[[sinks]]
name = "kafka"
sink_type = "queue"
queue_capacity = 1000
params = { topic = "users", properties = "./conf/kafka.properties" }
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.limit, 500);
        assert_eq!(bp.timeout_secs, 30);
        assert_eq!(bp.generation.on_field_error, FieldErrorPolicy::Literal);
        assert_eq!(bp.generation.record_ceiling, 250);
        assert_eq!(bp.retry.max_retries, 3);
        assert_eq!(bp.retry.max_backoff_ms, 5000);
        assert_eq!(bp.sinks.len(), 2);
        assert_eq!(bp.sinks[1].sink_type, SinkKind::Queue);
        assert_eq!(bp.sinks[1].params.get("topic").map(String::as_str), Some("users"));
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "template": "t.json",
            "sinks": [{ "name": "out", "sink_type": "console" }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        assert_eq!(result.unwrap().sinks[0].sink_type, SinkKind::Console);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_unknown_sink_type() {
        let content = r#"
template = "t.json"
[[sinks]]
name = "udp"
sink_type = "network"
"#;
        assert!(matches!(
            parse_toml(content),
            Err(ContractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}

//! 配置校验模块
//!
//! 校验规则：
//! - template 路径非空
//! - record_ceiling > 0
//! - sink 名称非空且唯一
//! - queue sink 必须配置 topic
//! - queue_capacity > 0
//! - retry 参数合法

use std::collections::HashSet;

use contracts::{ContractError, RunBlueprint, SinkKind};

/// 校验 RunBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    validate_template(blueprint)?;
    validate_generation(blueprint)?;
    validate_sinks(blueprint)?;
    validate_retry(blueprint)?;
    Ok(())
}

fn validate_template(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    if blueprint.template.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "template",
            "template path cannot be empty",
        ));
    }
    Ok(())
}

fn validate_generation(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    if blueprint.generation.record_ceiling == 0 {
        return Err(ContractError::config_validation(
            "generation.record_ceiling",
            "record_ceiling must be > 0",
        ));
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].queue_capacity", sink.name),
                "queue_capacity must be > 0",
            ));
        }
        if sink.sink_type == SinkKind::Queue
            && sink.params.get("topic").is_none_or(|t| t.trim().is_empty())
        {
            return Err(ContractError::config_validation(
                format!("sinks[{}].params.topic", sink.name),
                "queue sink requires a topic",
            ));
        }
    }
    Ok(())
}

fn validate_retry(blueprint: &RunBlueprint) -> Result<(), ContractError> {
    let retry = &blueprint.retry;
    if !retry.multiplier.is_finite() || retry.multiplier < 1.0 {
        return Err(ContractError::config_validation(
            "retry.multiplier",
            format!("multiplier must be >= 1, got {}", retry.multiplier),
        ));
    }
    if retry.initial_backoff_ms > retry.max_backoff_ms {
        return Err(ContractError::config_validation(
            "retry.initial_backoff_ms / retry.max_backoff_ms",
            format!(
                "initial_backoff_ms ({}) must be <= max_backoff_ms ({})",
                retry.initial_backoff_ms, retry.max_backoff_ms
            ),
        ));
    }
    Ok(())
}

//! Broker 连接属性 (`key=value` 行格式)
//!
//! - `#` 开头的行与空行忽略
//! - 其余每行恰好一个 `=`
//! - key / value 去除首尾空白，key 不能为空

use std::collections::BTreeMap;
use std::path::Path;

use contracts::ContractError;
use tracing::debug;

/// 有序的 broker 属性表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerProperties {
    entries: BTreeMap<String, String>,
}

impl BrokerProperties {
    /// 从文件加载
    ///
    /// # Errors
    /// - 文件读取失败
    /// - 行格式不合法
    pub fn load(path: &Path) -> Result<Self, ContractError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read properties file '{}': {e}", path.display()),
            source: Some(Box::new(e)),
        })?;
        let props = Self::parse(&content)?;
        debug!(path = %path.display(), entries = props.len(), "Broker properties loaded");
        Ok(props)
    }

    /// 从字符串解析
    pub fn parse(content: &str) -> Result<Self, ContractError> {
        let mut entries = BTreeMap::new();
        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) if !value.contains('=') => (key.trim(), value.trim()),
                Some(_) => {
                    return Err(ContractError::properties_parse(
                        line_no,
                        "expected exactly one '=' per line",
                    ))
                }
                None => {
                    return Err(ContractError::properties_parse(
                        line_no,
                        "expected 'key=value'",
                    ))
                }
            };

            if key.is_empty() {
                return Err(ContractError::properties_parse(line_no, "empty key"));
            }
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// 设置或覆盖属性
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for BrokerProperties {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

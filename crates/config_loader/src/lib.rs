//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON run profiles
//! - Validate configuration legality
//! - Generate `RunBlueprint`
//! - Parse broker `key=value` properties files
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("profile.toml")).unwrap();
//! println!("Template: {}", blueprint.template.display());
//! ```

mod parser;
mod properties;
mod validator;

pub use contracts::RunBlueprint;
pub use parser::ConfigFormat;
pub use properties::BrokerProperties;

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RunBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        debug!(path = %path.display(), ?format, "Loading run profile");
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RunBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        Self::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Validate a blueprint assembled elsewhere (e.g. from CLI flags)
    pub fn validate(blueprint: &RunBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    /// Serialize RunBlueprint to TOML string
    pub fn to_toml(blueprint: &RunBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize RunBlueprint to JSON string
    pub fn to_json(blueprint: &RunBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
template = "templates/user.json"
limit = 10

[[sinks]]
name = "file"
sink_type = "file"

[[sinks]]
name = "kafka"
sink_type = "queue"
params = { topic = "users" }
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.limit, 10);
        assert_eq!(bp.sinks.len(), 2);
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.template, bp2.template);
        assert_eq!(bp.sinks.len(), bp2.sinks.len());
        assert_eq!(bp.sinks[1].params, bp2.sinks[1].params);
    }

    #[test]
    fn test_round_trip_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.limit, bp2.limit);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
template = "t.json"

[[sinks]]
name = "kafka"
sink_type = "queue"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("topic"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_path(Path::new("profile.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}

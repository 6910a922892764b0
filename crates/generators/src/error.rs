//! Generator error types

use thiserror::Error;

/// Errors raised while resolving or invoking a generator.
///
/// All variants are field-scoped: the caller decides whether the field falls
/// back or the run aborts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    /// No generator registered under this name
    #[error("unknown generator '{name}'")]
    NotFound { name: String },

    /// Wrong number of parameters
    #[error("generator '{name}' expects {expected} parameter(s), got {actual}")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A parameter could not be interpreted
    #[error("generator '{name}' parameter '{param}': {message}")]
    InvalidParam {
        name: String,
        param: String,
        message: String,
    },

    /// Bounds parsed but do not form a usable range
    #[error("generator '{name}' invalid range [{min}, {max}]: {message}")]
    InvalidRange {
        name: String,
        min: String,
        max: String,
        message: String,
    },

    /// Generation itself failed
    #[error("generator '{name}' failed: {message}")]
    Failed { name: String, message: String },
}

impl GeneratorError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid_param(
        name: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParam {
            name: name.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    pub fn invalid_range(
        name: impl Into<String>,
        min: impl Into<String>,
        max: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRange {
            name: name.into(),
            min: min.into(),
            max: max.into(),
            message: message.into(),
        }
    }

    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "unknown_generator",
            Self::Arity { .. } => "arity",
            Self::InvalidParam { .. } | Self::InvalidRange { .. } => "invalid_params",
            Self::Failed { .. } => "generator_failed",
        }
    }
}

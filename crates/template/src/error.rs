//! Template error types

use std::path::PathBuf;

use generators::GeneratorError;
use thiserror::Error;

/// Directive grammar violations.
///
/// Raised only for strings that start with `fake:{`; anything else is a
/// plain literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("missing closing '}}'")]
    Unterminated,

    #[error("empty generator name")]
    EmptyName,

    #[error("'{name}' is not a valid generator name")]
    InvalidName { name: String },

    #[error("generator '{name}' requires a range 'min,max'")]
    MissingRange { name: String },

    #[error("generator '{name}' range needs exactly two non-empty values, got '{raw}'")]
    BadRange { name: String, raw: String },

    #[error("generator '{name}' takes no parameters")]
    UnexpectedParams { name: String },
}

/// Field-scoped failure, resolved by the field error policy
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("malformed directive: {0}")]
    Directive(#[from] DirectiveError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

impl FieldError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Directive(_) => "malformed_directive",
            Self::Generator(e) => e.kind(),
        }
    }
}

/// Template loading and materialization errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// Field failure under the abort policy
    #[error("field '{path}' ({raw}): {source}")]
    Field {
        path: String,
        raw: String,
        #[source]
        source: FieldError,
    },
}

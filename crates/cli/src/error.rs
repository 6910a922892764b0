//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Neither --from nor a profile names a template
    #[error("no template given: pass --from <template> or a profile with `template`")]
    MissingTemplate,

    /// --kafka without a topic
    #[error("--kafka requires --topic")]
    TopicRequired,

    /// Profile or assembled configuration rejected
    #[error("invalid configuration: {0}")]
    Config(#[from] contracts::ContractError),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

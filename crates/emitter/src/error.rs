//! Emitter error types

use thiserror::Error;

use crate::RunState;

/// Errors that end a run in the `Aborted` state
#[derive(Debug, Error)]
pub enum EmitterError {
    /// Run could not start
    #[error("setup failed: {message}")]
    Setup { message: String },

    /// The fan-out has no sinks
    #[error("no sinks configured")]
    NoSinks,

    /// Every sink stopped taking records mid-run
    #[error("all sinks stopped accepting records after {records} records")]
    SinksClosed { records: u64 },

    /// `run` called on an emitter that already ran
    #[error("emitter is {state}, expected idle")]
    NotIdle { state: RunState },

    #[error(transparent)]
    Template(#[from] template::TemplateError),

    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),

    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl EmitterError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }
}

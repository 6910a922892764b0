//! Run lifecycle

use std::fmt;

/// Emission run state
///
/// `Idle -> Running -> {Completed, Stopped, Aborted}`; setup failures go
/// straight from `Idle` to `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Built, not started
    Idle,
    /// Emitting records
    Running,
    /// Reached the record limit
    Completed,
    /// Cancelled from outside
    Stopped,
    /// Setup or fatal run error
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Aborted)
    }

    /// Whether the process should exit successfully
    pub fn is_success(self) -> bool {
        matches!(self, Self::Completed | Self::Stopped)
    }

    pub fn can_transition_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Idle, Self::Aborted)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Stopped)
                | (Self::Running, Self::Aborted)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

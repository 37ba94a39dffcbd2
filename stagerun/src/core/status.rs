//! Run state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a single pipeline execution.
///
/// `NotStarted` is initial, `Completed` and `Failed` are terminal. A run only
/// moves forward one stage at a time: `Running { index }` goes to
/// `Running { index + 1 }`, `Completed`, or `Failed { index }`. The stepping
/// methods never move backwards, skip an index, or leave a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// No stage has been invoked yet.
    NotStarted,
    /// The stage at `index` is executing.
    Running {
        /// Zero-based position of the executing stage.
        index: usize,
    },
    /// Every stage completed.
    Completed,
    /// The stage at `index` failed and the run was aborted.
    Failed {
        /// Zero-based position of the failed stage.
        index: usize,
    },
}

impl Default for RunState {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running { index } => write!(f, "running({index})"),
            Self::Completed => write!(f, "completed"),
            Self::Failed { index } => write!(f, "failed({index})"),
        }
    }
}

impl RunState {
    /// Returns the state a run over `stage_count` stages begins in.
    ///
    /// An empty pipeline completes immediately.
    #[must_use]
    pub fn begin(stage_count: usize) -> Self {
        if stage_count == 0 {
            Self::Completed
        } else {
            Self::Running { index: 0 }
        }
    }

    /// Records success of the running stage: moves to the next index, or to
    /// `Completed` after the last stage. Any other state is returned as is.
    #[must_use]
    pub fn advance(self, stage_count: usize) -> Self {
        match self {
            Self::Running { index } if index + 1 >= stage_count => Self::Completed,
            Self::Running { index } => Self::Running { index: index + 1 },
            other => other,
        }
    }

    /// Records failure of the running stage. Any other state is returned as
    /// is.
    #[must_use]
    pub fn fail(self) -> Self {
        match self {
            Self::Running { index } => Self::Failed { index },
            other => other,
        }
    }
}

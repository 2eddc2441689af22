use super::process::{Pid, ProcessState, StateEvent};
use thiserror::Error;

/// Invalid arguments handed to a process or scheduler constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("timer interrupt period must be positive, got {0}")]
    NonPositivePeriod(u64),

    #[error("process {pid} was built without a task")]
    MissingTask { pid: Pid },

    #[error("process {pid} has a burst time of zero")]
    ZeroBurst { pid: Pid },
}

/// Raised by a task while it runs. Schedulers hand it back untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task failed: {reason}")]
pub struct TaskFailure {
    reason: String,
}

impl TaskFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("process {pid} cannot {event:?} while {from:?}")]
pub struct TransitionError {
    pub pid: Pid,
    pub from: ProcessState,
    pub event: StateEvent,
}

#[derive(Debug, Error)]
pub enum SchedError {
    #[error(transparent)]
    Task(#[from] TaskFailure),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

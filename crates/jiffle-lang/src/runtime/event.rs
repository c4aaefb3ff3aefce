use std::fmt;
use std::sync::Arc;

use crate::error::JobFailure;
use crate::script::Script;

/// Identifies one submitted job. Ids increase monotonically per interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Notification delivered to listeners during dispatch.
#[derive(Debug, Clone)]
pub enum Event {
    Progress { job: JobId, fraction: f64 },
    Completed { job: JobId, script: Arc<Script> },
    Failed { job: JobId, cause: JobFailure },
}

impl Event {
    pub fn job(&self) -> JobId {
        match self {
            Event::Progress { job, .. }
            | Event::Completed { job, .. }
            | Event::Failed { job, .. } => *job,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Event::Progress { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Running,
    Completed,
    Failed,
}

/// Snapshot of a job as of the last dispatched event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobStatus {
    pub state: JobState,
    pub fraction: f64,
}

impl JobStatus {
    pub(crate) fn submitted() -> Self {
        Self { state: JobState::Submitted, fraction: 0.0 }
    }

    pub(crate) fn apply(&mut self, event: &Event) {
        match event {
            Event::Progress { fraction, .. } => {
                self.state = JobState::Running;
                self.fraction = *fraction;
            }
            Event::Completed { .. } => {
                self.state = JobState::Completed;
                self.fraction = 1.0;
            }
            Event::Failed { .. } => self.state = JobState::Failed,
        }
    }
}

use std::{fmt, sync::Arc};

use tokio::time::{Duration, Instant};

use crate::error::{Result, SimError};

/// Position of a task in the configured task list.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    NotStarted,
    Started,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::NotStarted => "NOT_STARTED",
            TaskStatus::Started => "STARTED",
            TaskStatus::Completed => "COMPLETED",
        };
        f.write_str(label)
    }
}

/// A named unit of simulated work.
///
/// Status only ever moves forward: `NotStarted -> Started -> Completed`.
/// Any other transition is rejected and leaves the task untouched.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub name: Arc<str>,
    status: TaskStatus,
    started_at: Option<Instant>,
    duration: Option<Duration>,
}

impl Task {
    pub fn new(id: TaskId, name: &str) -> Self {
        Self {
            id,
            name: Arc::from(name),
            status: TaskStatus::NotStarted,
            started_at: None,
            duration: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// How long the task spent between STARTED and COMPLETED.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::NotStarted
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn start(&mut self, now: Instant) -> Result<()> {
        match self.status {
            TaskStatus::NotStarted => {
                self.status = TaskStatus::Started;
                self.started_at = Some(now);
                Ok(())
            }
            from => Err(self.rejected(from, TaskStatus::Started)),
        }
    }

    pub fn complete(&mut self, now: Instant) -> Result<Duration> {
        match (self.status, self.started_at) {
            (TaskStatus::Started, Some(started_at)) => {
                let elapsed = now.saturating_duration_since(started_at);
                self.status = TaskStatus::Completed;
                self.duration = Some(elapsed);
                Ok(elapsed)
            }
            (from, _) => Err(self.rejected(from, TaskStatus::Completed)),
        }
    }

    fn rejected(&self, from: TaskStatus, to: TaskStatus) -> SimError {
        SimError::InvalidTaskTransition {
            task: self.name.to_string(),
            from,
            to,
        }
    }
}

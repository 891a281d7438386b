use thiserror::Error;

use crate::{task::TaskStatus, TaskId, WorkerIndex};

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("concurrency level must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("at least one task is required")]
    NoTasks,

    #[error("task names must not be empty (position {0})")]
    EmptyTaskName(usize),

    #[error("duplicate task name: {0}")]
    DuplicateTaskName(String),

    #[error("maximum task delay must be greater than zero")]
    InvalidDelay,

    #[error("tick interval must be greater than zero")]
    InvalidTick,

    #[error("task {task} cannot move from {from} to {to}")]
    InvalidTaskTransition {
        task: String,
        from: TaskStatus,
        to: TaskStatus,
    },

    #[error("worker {worker} is busy with task {current:?}")]
    WorkerBusy {
        worker: WorkerIndex,
        current: Option<TaskId>,
    },

    #[error("worker {0} is already idle")]
    WorkerIdle(WorkerIndex),

    #[error("unknown task {0:?}")]
    UnknownTask(TaskId),

    #[error("unknown worker {0}")]
    UnknownWorker(WorkerIndex),

    #[error("ticker fiber stopped before every task completed")]
    TickerStopped,
}

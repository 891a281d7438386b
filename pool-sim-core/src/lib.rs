pub mod error;
pub mod summary;
pub mod task;
pub mod task_runner;
pub mod worker;

pub use error::{Result, SimError};
pub use summary::Summary;
pub use task::{Task, TaskId, TaskStatus};
pub use task_runner::{DelayModel, FixedDelay, RandomDelay, TaskRun, TaskRunner};
pub use worker::{Worker, WorkerIndex, WorkerStatus};

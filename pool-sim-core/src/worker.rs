use std::fmt;

use crate::{
    error::{Result, SimError},
    TaskId,
};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkerIndex(pub usize);

impl fmt::Display for WorkerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Idle,
    Busy,
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerStatus::Idle => f.write_str("IDLE"),
            WorkerStatus::Busy => f.write_str("BUSY"),
        }
    }
}

/// An execution slot. Busy exactly while it holds a task.
#[derive(Debug, Clone)]
pub struct Worker {
    pub index: WorkerIndex,
    current_task: Option<TaskId>,
}

impl Worker {
    // A freshly spawned worker is idle.
    pub fn new(index: WorkerIndex) -> Self {
        Self {
            index,
            current_task: None,
        }
    }

    pub fn status(&self) -> WorkerStatus {
        match self.current_task {
            Some(_) => WorkerStatus::Busy,
            None => WorkerStatus::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.current_task.is_none()
    }

    pub fn current_task(&self) -> Option<TaskId> {
        self.current_task
    }

    pub fn occupy(&mut self, task: TaskId) -> Result<()> {
        match self.current_task {
            None => {
                self.current_task = Some(task);
                Ok(())
            }
            current => Err(SimError::WorkerBusy {
                worker: self.index,
                current,
            }),
        }
    }

    /// Frees the worker, returning the task it was holding.
    pub fn release(&mut self) -> Result<TaskId> {
        self.current_task
            .take()
            .ok_or(SimError::WorkerIdle(self.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_starts_idle() {
        let worker = Worker::new(WorkerIndex(0));
        assert_eq!(worker.status(), WorkerStatus::Idle);
        assert_eq!(worker.current_task(), None);
    }

    #[test]
    fn test_worker_cycles_between_idle_and_busy() {
        let mut worker = Worker::new(WorkerIndex(1));

        worker.occupy(TaskId(4)).unwrap();
        assert_eq!(worker.status(), WorkerStatus::Busy);
        assert_eq!(worker.current_task(), Some(TaskId(4)));

        assert_eq!(worker.release().unwrap(), TaskId(4));
        assert!(worker.is_idle());

        worker.occupy(TaskId(5)).unwrap();
        assert_eq!(worker.current_task(), Some(TaskId(5)));
    }

    #[test]
    fn test_busy_worker_rejects_second_task() {
        let mut worker = Worker::new(WorkerIndex(2));
        worker.occupy(TaskId(0)).unwrap();

        let error = worker.occupy(TaskId(1)).unwrap_err();
        assert_eq!(
            error,
            SimError::WorkerBusy {
                worker: WorkerIndex(2),
                current: Some(TaskId(0)),
            }
        );
        assert_eq!(worker.current_task(), Some(TaskId(0)));
    }

    #[test]
    fn test_idle_worker_cannot_be_released() {
        let mut worker = Worker::new(WorkerIndex(3));
        assert_eq!(worker.release(), Err(SimError::WorkerIdle(WorkerIndex(3))));
    }
}

use std::{collections::HashSet, sync::Arc};

use pool_sim_core::{Result, SimError, Task, TaskId, TaskStatus, Worker, WorkerIndex};
use tokio::{sync::RwLock, time::Instant};

pub type SharedState = Arc<RwLock<SimulationState>>;

/// One worker picking up one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub worker: WorkerIndex,
    pub task: TaskId,
}

#[derive(Debug)]
pub struct SimulationState {
    pub tasks: Vec<Task>,
    pub workers: Vec<Worker>,
    // When the task list was populated; the summary measures from here.
    pub started_at: Instant,
    // Every assignment made during the run, in order.
    pub assignments: Vec<Assignment>,
    // Highest number of simultaneously STARTED tasks seen.
    pub peak_in_flight: usize,
}

impl SimulationState {
    pub fn new(task_names: &[String], concurrency_level: usize, started_at: Instant) -> Result<Self> {
        if concurrency_level == 0 {
            return Err(SimError::InvalidConcurrency(concurrency_level));
        }
        if task_names.is_empty() {
            return Err(SimError::NoTasks);
        }

        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(task_names.len());
        for (position, name) in task_names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SimError::EmptyTaskName(position));
            }
            if !seen.insert(name.as_str()) {
                return Err(SimError::DuplicateTaskName(name.clone()));
            }
            tasks.push(Task::new(TaskId(position), name));
        }

        let workers = (0..concurrency_level)
            .map(|index| Worker::new(WorkerIndex(index)))
            .collect();

        Ok(Self {
            tasks,
            workers,
            started_at,
            assignments: Vec::new(),
            peak_in_flight: 0,
        })
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    pub fn concurrency_level(&self) -> usize {
        self.workers.len()
    }

    /// First NOT_STARTED task in list order.
    pub fn next_pending(&self) -> Option<TaskId> {
        self.tasks.iter().find(|task| task.is_pending()).map(|task| task.id)
    }

    /// Idle workers in ascending index order.
    pub fn idle_workers(&self) -> Vec<WorkerIndex> {
        self.workers
            .iter()
            .filter(|worker| worker.is_idle())
            .map(|worker| worker.index)
            .collect()
    }

    pub fn busy_workers(&self) -> usize {
        self.workers.iter().filter(|worker| !worker.is_idle()).count()
    }

    pub fn in_flight(&self) -> usize {
        self.count(TaskStatus::Started)
    }

    pub fn completed(&self) -> usize {
        self.count(TaskStatus::Completed)
    }

    pub fn all_completed(&self) -> bool {
        self.completed() == self.tasks.len()
    }

    fn count(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|task| task.status() == status).count()
    }

    pub fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks.get_mut(id.0).ok_or(SimError::UnknownTask(id))
    }

    pub fn worker_mut(&mut self, index: WorkerIndex) -> Result<&mut Worker> {
        self.workers
            .get_mut(index.0)
            .ok_or(SimError::UnknownWorker(index))
    }

    pub fn record_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
        self.peak_in_flight = self.peak_in_flight.max(self.in_flight());
    }
}

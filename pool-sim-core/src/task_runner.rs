use std::sync::{Arc, Mutex};

use tokio::time::{sleep, Duration, Instant};
use tracing::info;

use crate::{
    error::{Result, SimError},
    Task, TaskId,
};

/// Source of simulated task cost.
pub trait DelayModel: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Draws each delay independently and uniformly from `[0, max)`.
#[derive(Debug)]
pub struct RandomDelay {
    max: Duration,
    rng: Mutex<fastrand::Rng>,
}

impl RandomDelay {
    pub fn new(max: Duration) -> Result<Self> {
        Self::with_rng(max, fastrand::Rng::new())
    }

    pub fn with_seed(max: Duration, seed: u64) -> Result<Self> {
        Self::with_rng(max, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(max: Duration, rng: fastrand::Rng) -> Result<Self> {
        if max.is_zero() {
            return Err(SimError::InvalidDelay);
        }
        Ok(Self {
            max,
            rng: Mutex::new(rng),
        })
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl DelayModel for RandomDelay {
    fn next_delay(&self) -> Duration {
        let bound = u64::try_from(self.max.as_nanos()).unwrap_or(u64::MAX);
        // a poisoned rng is still a valid rng
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Duration::from_nanos(rng.u64(..bound))
    }
}

/// Every task costs the same.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelayModel for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

/// Simulates doing a task's work.
#[derive(Debug)]
pub struct TaskRunner<D> {
    delay: Arc<D>,
}

impl<D> Clone for TaskRunner<D> {
    fn clone(&self) -> Self {
        Self {
            delay: self.delay.clone(),
        }
    }
}

impl<D: DelayModel> TaskRunner<D> {
    pub fn new(delay: D) -> Self {
        Self {
            delay: Arc::new(delay),
        }
    }

    /// Claims `task` and draws its cost.
    ///
    /// The task is STARTED as soon as this returns, before any time passes, so
    /// whoever holds the task list next will not pick it again. The returned
    /// [`TaskRun`] carries the rest of the work.
    pub fn start(&self, task: &mut Task, now: Instant) -> Result<TaskRun> {
        task.start(now)?;
        info!(task = %task.name, "taskRunner: Task {} started.", task.name);
        Ok(TaskRun {
            task: task.id,
            name: task.name.clone(),
            delay: self.delay.next_delay(),
        })
    }
}

/// A started task whose simulated work has not finished yet.
#[derive(Debug, Clone)]
pub struct TaskRun {
    pub task: TaskId,
    pub name: Arc<str>,
    pub delay: Duration,
}

impl TaskRun {
    /// Suspends for the drawn delay.
    pub async fn work(&self) {
        sleep(self.delay).await;
    }

    pub fn finish(self, task: &mut Task, now: Instant) -> Result<Duration> {
        let elapsed = task.complete(now)?;
        info!(
            task = %self.name,
            ?elapsed,
            "taskRunner: Task {} finished in {} ms",
            self.name,
            elapsed.as_millis()
        );
        Ok(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use crate::TaskStatus;

    use super::*;

    #[test]
    fn test_random_delay_stays_below_max() {
        let max = Duration::from_millis(200);
        let delay = RandomDelay::new(max).unwrap();
        for _ in 0..1_000 {
            assert!(delay.next_delay() < max);
        }
    }

    #[test]
    fn test_seeded_delays_repeat() {
        let max = Duration::from_millis(200);
        let first = RandomDelay::with_seed(max, 7).unwrap();
        let second = RandomDelay::with_seed(max, 7).unwrap();
        let a: Vec<_> = (0..16).map(|_| first.next_delay()).collect();
        let b: Vec<_> = (0..16).map(|_| second.next_delay()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_max_delay_is_rejected() {
        assert_eq!(
            RandomDelay::new(Duration::ZERO).unwrap_err(),
            SimError::InvalidDelay
        );
    }

    #[test]
    fn test_start_claims_task_immediately() {
        let runner = TaskRunner::new(FixedDelay(Duration::from_millis(30)));
        let mut task = Task::new(TaskId(0), "A");
        let now = Instant::now();

        let run = runner.start(&mut task, now).unwrap();

        assert_eq!(task.status(), TaskStatus::Started);
        assert_eq!(run.task, TaskId(0));
        assert_eq!(run.delay, Duration::from_millis(30));
        assert_eq!(&*run.name, "A");
    }

    #[test]
    fn test_start_refuses_claimed_task() {
        let runner = TaskRunner::new(FixedDelay(Duration::ZERO));
        let mut task = Task::new(TaskId(0), "A");
        runner.start(&mut task, Instant::now()).unwrap();
        assert!(runner.start(&mut task, Instant::now()).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_after_delay() {
        let runner = TaskRunner::new(FixedDelay(Duration::from_millis(120)));
        let mut task = Task::new(TaskId(0), "A");

        let run = runner.start(&mut task, Instant::now()).unwrap();
        run.work().await;
        let elapsed = run.finish(&mut task, Instant::now()).unwrap();

        assert_eq!(elapsed, Duration::from_millis(120));
        assert_eq!(task.status(), TaskStatus::Completed);
    }
}

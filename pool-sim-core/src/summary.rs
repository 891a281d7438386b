use std::fmt;

use tokio::time::Duration;

use crate::Task;

/// Metrics reported once every task has completed.
///
/// `average_per_task` is total wall time divided by task count, a throughput
/// figure. The mean of the individual task durations is `mean_task_duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_tasks: usize,
    pub concurrency_level: usize,
    pub total_elapsed: Duration,
    pub average_per_task: Duration,
    pub mean_task_duration: Duration,
}

impl Summary {
    /// Returns `None` until every task is COMPLETED.
    pub fn compute(tasks: &[Task], concurrency_level: usize, total_elapsed: Duration) -> Option<Self> {
        if tasks.is_empty() || !tasks.iter().all(Task::is_completed) {
            return None;
        }
        let count = u32::try_from(tasks.len()).ok()?;
        let busy_time: Duration = tasks.iter().filter_map(Task::duration).sum();

        Some(Self {
            total_tasks: tasks.len(),
            concurrency_level,
            total_elapsed,
            average_per_task: total_elapsed / count,
            mean_task_duration: busy_time / count,
        })
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1_000.0
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*** ALL TASKS COMPLETED ***")?;
        writeln!(f, "*** Total Tasks: {} ***", self.total_tasks)?;
        writeln!(f, "*** Concurrency Level: {} ***", self.concurrency_level)?;
        writeln!(
            f,
            "*** Program Execution Time: {} ms ***",
            self.total_elapsed.as_millis()
        )?;
        writeln!(
            f,
            "*** Avg Program Execution Time Per Task: {:.3} ms ***",
            millis(self.average_per_task)
        )?;
        write!(
            f,
            "*** Mean Task Duration: {:.3} ms ***",
            millis(self.mean_task_duration)
        )
    }
}

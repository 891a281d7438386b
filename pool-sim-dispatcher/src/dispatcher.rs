use pool_sim_core::{DelayModel, Result, SimError, Summary, TaskRun, TaskRunner};
use tokio::time::Instant;
use tracing::{debug, error, info, trace};

use crate::{
    assign::assign,
    config::DispatcherConfig,
    state::{Assignment, SharedState, SimulationState},
    ticker::start_ticker_fiber,
};

/// Owns one simulation run: the task list, the worker pool and the runner
/// that fakes the work.
pub struct Dispatcher<D> {
    config: DispatcherConfig,
    state: SharedState,
    runner: TaskRunner<D>,
}

impl<D: DelayModel + 'static> Dispatcher<D> {
    pub fn new(config: DispatcherConfig, delay: D) -> Result<Self> {
        config.validate()?;

        let state = SimulationState::new(&config.task_names, config.concurrency_level, Instant::now())?;
        info!(
            tasks = state.tasks.len(),
            concurrency_level = state.concurrency_level(),
            "Populated tasks and spawned workers"
        );

        Ok(Self {
            config,
            state: state.into_shared(),
            runner: TaskRunner::new(delay),
        })
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Drives the run to completion and returns its summary.
    pub async fn run(self) -> Result<Summary> {
        start_ticker_fiber(self.state, self.runner, self.config.tick_interval)
            .await
            .map_err(|error| {
                error!(%error, "Ticker fiber did not finish");
                SimError::TickerStopped
            })?
    }
}

/// One scheduling pass.
///
/// Returns the summary once every task is COMPLETED. Otherwise hands the first
/// pending task to each idle worker, lowest index first, and returns without
/// waiting for any of them. Claims happen under a single write lock, so a task
/// is never picked by two workers.
pub async fn schedule_pass<D: DelayModel + 'static>(
    state: &SharedState,
    runner: &TaskRunner<D>,
) -> Result<Option<Summary>> {
    let mut guard = state.write().await;

    if guard.all_completed() {
        let total_elapsed = Instant::now().saturating_duration_since(guard.started_at);
        return Ok(Summary::compute(
            &guard.tasks,
            guard.concurrency_level(),
            total_elapsed,
        ));
    }

    for worker in guard.idle_workers() {
        let Some(task) = guard.next_pending() else {
            break;
        };

        let run = runner.start(guard.task_mut(task)?, Instant::now())?;
        let work = finish_run(state.clone(), run);
        assign(&mut guard, state, worker, task, work)?;
        guard.record_assignment(Assignment { worker, task });
        debug!(worker = %worker, task = task.0, "Assigned task to worker");
    }

    trace!(
        busy = guard.busy_workers(),
        in_flight = guard.in_flight(),
        completed = guard.completed(),
        "Scheduling pass done"
    );

    Ok(None)
}

async fn finish_run(state: SharedState, run: TaskRun) {
    run.work().await;

    let mut guard = state.write().await;
    let task = run.task;
    if let Err(error) = guard
        .task_mut(task)
        .and_then(|task| run.finish(task, Instant::now()))
    {
        error!(%error, "Failed to complete task");
    }
}

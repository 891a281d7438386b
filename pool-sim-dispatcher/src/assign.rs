use std::future::Future;

use pool_sim_core::{Result, TaskId, WorkerIndex};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::state::{SharedState, SimulationState};

/// Puts `worker` to work on `task`.
///
/// The worker is marked BUSY on `state` before this returns. `work` then runs on
/// its own fiber and the worker goes back to IDLE once it resolves. Callers
/// hold the write lock on `shared` while calling this and must not await the
/// returned handle from inside that lock.
pub fn assign<F>(
    state: &mut SimulationState,
    shared: &SharedState,
    worker: WorkerIndex,
    task: TaskId,
    work: F,
) -> Result<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let slot = state.worker_mut(worker)?;
    slot.occupy(task)?;
    debug!(
        worker = %worker,
        status = %slot.status(),
        task = ?slot.current_task(),
        "Worker occupied"
    );

    let shared = shared.clone();
    Ok(tokio::spawn(async move {
        work.await;

        let mut state = shared.write().await;
        match state.worker_mut(worker) {
            Ok(slot) => match slot.release() {
                Ok(task) => debug!(
                    worker = %worker,
                    status = %slot.status(),
                    task = task.0,
                    "Worker released"
                ),
                Err(error) => error!(%error, "Failed to release worker"),
            },
            Err(error) => error!(%error, "Failed to release worker"),
        }
    }))
}

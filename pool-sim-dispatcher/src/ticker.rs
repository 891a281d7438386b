use std::time::Duration;

use pool_sim_core::{DelayModel, Result, Summary, TaskRunner};
use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{error, info};

use crate::{dispatcher::schedule_pass, state::SharedState};

/// Runs a scheduling pass every `tick_interval`. The fiber ends on its own with
/// the summary once a pass sees every task completed, or with the first error
/// a pass returns.
pub fn start_ticker_fiber<D: DelayModel + 'static>(
    state: SharedState,
    runner: TaskRunner<D>,
    tick_interval: Duration,
) -> JoinHandle<Result<Summary>> {
    tokio::spawn(async move {
        let mut ticker = interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match schedule_pass(&state, &runner).await {
                Ok(None) => {}
                Ok(Some(summary)) => {
                    info!("All tasks completed, stopping the ticker");
                    return Ok(summary);
                }
                Err(error) => {
                    error!(%error, "Scheduling pass failed, stopping the ticker");
                    return Err(error);
                }
            }
        }
    })
}

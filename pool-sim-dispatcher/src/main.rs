use clap::Parser;
use config::{Cli, DispatcherConfig};
use dispatcher::Dispatcher;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod assign;
mod config;
mod dispatcher;
mod state;
mod ticker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DispatcherConfig::from(Cli::parse());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting simulation with config: {:?}", config);

    let delay = config.delay_model()?;
    info!(
        max_delay = ?delay.max(),
        seeded = config.seed.is_some(),
        "Task delays drawn uniformly below max"
    );
    let dispatcher = Dispatcher::new(config, delay)?;
    let state = dispatcher.state();

    let summary = dispatcher.run().await?;

    for line in summary.to_string().lines() {
        info!("{}", line);
    }

    let state = state.read().await;
    info!(
        peak_in_flight = state.peak_in_flight,
        assignments = state.assignments.len(),
        "Run finished"
    );

    Ok(())
}

use clap::Parser;
use pool_sim_core::{RandomDelay, Result, SimError};
use tokio::time::Duration;

const DEFAULT_TASKS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
  // Number of worker slots, fixed for the whole run.
  pub concurrency_level: usize,
  // Tasks to simulate, dispatched in this order.
  pub task_names: Vec<String>,
  // How often the dispatcher runs a scheduling pass.
  pub tick_interval: Duration,
  // Exclusive upper bound of the random per-task delay.
  pub max_task_delay: Duration,
  // Seed for the delay generator. Unseeded runs differ from one another.
  pub seed: Option<u64>,
}

impl Default for DispatcherConfig {
  fn default() -> Self {
    Self {
      concurrency_level: 4,
      task_names: DEFAULT_TASKS.map(String::from).to_vec(),
      tick_interval: Duration::from_millis(1),
      max_task_delay: Duration::from_millis(200),
      seed: None,
    }
  }
}

impl DispatcherConfig {
  /// Checks the timing settings. Tasks and concurrency are checked when the
  /// simulation state is built from them.
  pub fn validate(&self) -> Result<()> {
    if self.tick_interval.is_zero() {
      return Err(SimError::InvalidTick);
    }
    if self.max_task_delay.is_zero() {
      return Err(SimError::InvalidDelay);
    }
    Ok(())
  }

  pub fn delay_model(&self) -> Result<RandomDelay> {
    match self.seed {
      Some(seed) => RandomDelay::with_seed(self.max_task_delay, seed),
      None => RandomDelay::new(self.max_task_delay),
    }
  }
}

/// Simulates a fixed-size worker pool draining a static task list.
#[derive(Parser, Debug)]
#[command(name = "pool-sim", version, about, long_about = None)]
pub struct Cli {
  /// Number of workers
  #[arg(short, long, env = "POOL_SIM_CONCURRENCY", default_value_t = 4)]
  pub concurrency: usize,

  /// Comma-separated task names
  #[arg(
    short,
    long,
    env = "POOL_SIM_TASKS",
    value_delimiter = ',',
    default_values_t = DEFAULT_TASKS.map(String::from)
  )]
  pub tasks: Vec<String>,

  /// Scheduling interval in milliseconds
  #[arg(long, default_value_t = 1)]
  pub tick_ms: u64,

  /// Upper bound of the random task delay in milliseconds
  #[arg(long, default_value_t = 200)]
  pub max_delay_ms: u64,

  /// Seed for reproducible delays
  #[arg(long, env = "POOL_SIM_SEED")]
  pub seed: Option<u64>,
}

impl From<Cli> for DispatcherConfig {
  fn from(cli: Cli) -> Self {
    Self {
      concurrency_level: cli.concurrency,
      task_names: cli
        .tasks
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect(),
      tick_interval: Duration::from_millis(cli.tick_ms),
      max_task_delay: Duration::from_millis(cli.max_delay_ms),
      seed: cli.seed,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cli_defaults_match_default_config() {
    let config = DispatcherConfig::from(Cli::try_parse_from(["pool-sim"]).unwrap());
    let default = DispatcherConfig::default();
    assert_eq!(config.concurrency_level, default.concurrency_level);
    assert_eq!(config.task_names, default.task_names);
    assert_eq!(config.tick_interval, default.tick_interval);
    assert_eq!(config.max_task_delay, default.max_task_delay);
    assert_eq!(config.seed, None);
  }

  #[test]
  fn test_cli_overrides() {
    let cli = Cli::try_parse_from([
      "pool-sim",
      "-c",
      "2",
      "--tasks",
      "build,test,deploy",
      "--tick-ms",
      "5",
      "--max-delay-ms",
      "50",
      "--seed",
      "9",
    ])
    .unwrap();
    let config = DispatcherConfig::from(cli);
    assert_eq!(config.concurrency_level, 2);
    assert_eq!(config.task_names, vec!["build", "test", "deploy"]);
    assert_eq!(config.tick_interval, Duration::from_millis(5));
    assert_eq!(config.max_task_delay, Duration::from_millis(50));
    assert_eq!(config.seed, Some(9));
  }

  #[test]
  fn test_task_names_are_trimmed() {
    let cli = Cli::try_parse_from(["pool-sim", "--tasks", "A, B ,C"]).unwrap();
    let config = DispatcherConfig::from(cli);
    assert_eq!(config.task_names, vec!["A", "B", "C"]);
  }

  #[test]
  fn test_padded_duplicate_names_collide() {
    let cli = Cli::try_parse_from(["pool-sim", "--tasks", "A, A"]).unwrap();
    let config = DispatcherConfig::from(cli);
    let error = crate::state::SimulationState::new(
      &config.task_names,
      config.concurrency_level,
      tokio::time::Instant::now(),
    )
    .unwrap_err();
    assert_eq!(error, SimError::DuplicateTaskName("A".to_string()));
  }

  #[test]
  fn test_cli_rejects_negative_concurrency() {
    assert!(Cli::try_parse_from(["pool-sim", "-c", "-1"]).is_err());
  }

  #[test]
  fn test_validate_rejects_zero_tick() {
    let config = DispatcherConfig {
      tick_interval: Duration::ZERO,
      ..DispatcherConfig::default()
    };
    assert_eq!(config.validate(), Err(SimError::InvalidTick));
  }

  #[test]
  fn test_validate_rejects_zero_delay() {
    let config = DispatcherConfig {
      max_task_delay: Duration::ZERO,
      ..DispatcherConfig::default()
    };
    assert_eq!(config.validate(), Err(SimError::InvalidDelay));
    assert!(config.delay_model().is_err());
  }

  #[test]
  fn test_seeded_config_builds_seeded_delay() {
    let config = DispatcherConfig {
      seed: Some(3),
      ..DispatcherConfig::default()
    };
    let delay = config.delay_model().unwrap();
    assert_eq!(delay.max(), Duration::from_millis(200));
  }
}

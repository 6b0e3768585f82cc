use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use log::{info, warn};
use structopt::StructOpt;

use warehouse_rl::config::{ExperimentConfig, WarehouseConfig};
use warehouse_rl::env::{Warehouse, WarehouseMdp};
use warehouse_rl::persistence;
use warehouse_rl::trainer::Trainer;
use warehouse_rl::utils::moving_average;
use warehouse_rl::QLearningAgent;

#[derive(Debug, Clone, Copy)]
enum Variant {
    Static,
    Dynamic,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Variant::Static),
            "dynamic" => Ok(Variant::Dynamic),
            other => Err(format!("unknown variant {other:?}, expected static or dynamic")),
        }
    }
}

/// Train a Q-learning agent to navigate a warehouse floor
#[derive(StructOpt, Debug)]
#[structopt(name = "warehouse_rl")]
struct Cli {
    /// JSON experiment file; built-in defaults are used without it
    #[structopt(long = "config", short = "c", parse(from_os_str))]
    config: Option<PathBuf>,

    /// Replace the configured floor with a preset layout (static or dynamic)
    #[structopt(long = "variant")]
    variant: Option<Variant>,

    /// Number of training episodes
    #[structopt(long = "episodes", short = "n")]
    episodes: Option<usize>,

    /// Maximum number of steps per episode
    #[structopt(long = "max_steps")]
    max_steps: Option<usize>,

    /// Seed shared by the agent and the moving obstacle
    #[structopt(long = "seed")]
    seed: Option<u64>,

    /// Value table to start from
    #[structopt(long = "load", parse(from_os_str))]
    load: Option<PathBuf>,

    /// Where to write the learned value table
    #[structopt(long = "save", parse(from_os_str))]
    save: Option<PathBuf>,

    /// Where to write the final greedy trajectory
    #[structopt(long = "trajectory", parse(from_os_str))]
    trajectory: Option<PathBuf>,

    /// Show a progress bar while training
    #[structopt(long = "progress", short = "p")]
    progress: bool,

    /// Moving average window for the learning curve summary
    #[structopt(long = "moving_average_window", default_value = "500")]
    moving_average_window: usize,
}

fn build_config(cli: &Cli) -> anyhow::Result<ExperimentConfig> {
    let mut config = match &cli.config {
        Some(path) => ExperimentConfig::from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    match cli.variant {
        Some(Variant::Static) => config.environment = WarehouseConfig::static_layout(),
        Some(Variant::Dynamic) => config.environment = WarehouseConfig::dynamic_layout(),
        None => {}
    }
    if let Some(episodes) = cli.episodes {
        config.training.episodes = episodes;
    }
    if let Some(max_steps) = cli.max_steps {
        config.training.max_steps = max_steps;
    }
    if let Some(seed) = cli.seed {
        config.agent.seed = seed;
    }
    config.training.show_progress |= cli.progress;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::from_args();
    if cli.moving_average_window == 0 {
        bail!("moving average window must be positive");
    }
    let config = build_config(&cli)?;

    let mut env = Warehouse::from_config(&config.environment, config.agent.seed)?;
    let mut agent = QLearningAgent::new(&config.agent)?;
    info!(
        "{}x{} floor, start {}, goals {:?}, {} states",
        env.grid().width(),
        env.grid().height(),
        env.initial_state(),
        env.goals(),
        env.state_space().len()
    );

    if let Some(path) = &cli.load {
        match persistence::load_table_from_file(path) {
            Ok(table) => agent.replace_table(table),
            Err(e) if path.exists() => {
                return Err(e).with_context(|| format!("loading {}", path.display()))
            }
            Err(e) => warn!("{}: {}, starting from an empty table", path.display(), e),
        }
    }

    let trainer = Trainer::new(config.training.clone());
    let results = trainer.train(&mut env, &mut agent);
    let curve = moving_average(cli.moving_average_window, &results.returns);
    info!(
        "mean return per {} episodes: {:?}",
        cli.moving_average_window,
        curve.iter().map(|r| format!("{r:.1}")).collect::<Vec<_>>()
    );
    let error_curve = moving_average(cli.moving_average_window, agent.training_error());
    info!(
        "mean |TD error| per {} episodes: {:?}",
        cli.moving_average_window,
        error_curve.iter().map(|e| format!("{e:.3}")).collect::<Vec<_>>()
    );

    let mean = trainer.evaluate(&mut env, &mut agent);
    info!(
        "greedy evaluation over {} episodes: mean return {:.2}",
        config.training.eval_episodes, mean
    );

    for (state, values) in Trainer::q_table_sample(&mut env, &agent) {
        info!("Q{} = {:?}", state, values);
    }

    let rollout = trainer.rollout(&mut env, &mut agent);
    let path: Vec<String> = rollout
        .trajectory
        .states
        .iter()
        .map(|s| format!("({s})"))
        .collect();
    info!("greedy path: {}", path.join(" -> "));

    if let Some(path) = &cli.save {
        persistence::save_table_to_file(agent.policy(), path)
            .with_context(|| format!("saving {}", path.display()))?;
    }
    if let Some(path) = &cli.trajectory {
        persistence::save_trajectory(&rollout.trajectory, path)
            .with_context(|| format!("saving {}", path.display()))?;
    }
    Ok(())
}

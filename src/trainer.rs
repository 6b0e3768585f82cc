use kdam::{tqdm, Bar, BarExt};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, QLearningAgent};
use crate::config::TrainingConfig;
use crate::env::{StateKey, WarehouseMdp, WarehouseState};
use crate::policy::ActionValues;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub states: Vec<StateKey>,
    pub total_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeResult {
    pub total_return: f64,
    pub terminated: bool,
    pub steps: usize,
    pub trajectory: Trajectory,
}

/// Runs one episode from the initial state. With `learning` set the agent
/// explores, is updated after every transition and decays its exploration
/// rate once at the end; otherwise the episode is purely greedy.
pub fn run_episode(
    env: &mut dyn WarehouseMdp,
    agent: &mut dyn Agent,
    max_steps: usize,
    learning: bool,
) -> EpisodeResult {
    let mut state: WarehouseState = env.initial_state();
    let mut states: Vec<StateKey> = vec![state.key()];
    let mut epi_reward: f64 = 0.0;
    let mut steps: usize = 0;
    let mut terminated: bool = env.is_terminal(&state);

    while !terminated && steps < max_steps {
        let action = agent.select_action(&state, learning);
        let next_state = env.step(&state, action);
        let reward = env.reward(&state, action, &next_state);
        let done = env.is_terminal(&next_state);
        if learning {
            agent.update(&state, action, reward, &next_state, done);
        }
        epi_reward += reward;
        steps += 1;
        state = next_state;
        states.push(state.key());
        terminated = done;
    }

    if learning {
        agent.end_episode();
    }
    EpisodeResult {
        total_return: epi_reward,
        terminated,
        steps,
        trajectory: Trajectory {
            states,
            total_return: epi_reward,
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainResults {
    pub returns: Vec<f64>,
    pub lengths: Vec<usize>,
    pub terminated: Vec<bool>,
}

impl TrainResults {
    pub fn success_rate(&self) -> f64 {
        if self.terminated.is_empty() {
            return 0.0;
        }
        self.terminated.iter().filter(|t| **t).count() as f64 / self.terminated.len() as f64
    }
}

pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn train(&self, env: &mut dyn WarehouseMdp, agent: &mut dyn Agent) -> TrainResults {
        let mut results = TrainResults::default();
        let mut pb: Option<Bar> = if self.config.show_progress {
            let mut pb = tqdm!(total = self.config.episodes);
            pb.set_description("Q-learning".to_string());
            Some(pb)
        } else {
            None
        };

        for episode in 0..self.config.episodes {
            let result = run_episode(env, agent, self.config.max_steps, true);
            debug!(
                "episode {} finished after {} steps (terminated: {})",
                episode + 1,
                result.steps,
                result.terminated
            );
            if self.should_log(episode) {
                info!(
                    "episode {}/{} - return: {:.2} - epsilon: {:.3}",
                    episode + 1,
                    self.config.episodes,
                    result.total_return,
                    agent.exploration_rate()
                );
            }
            if let Some(bar) = pb.as_mut() {
                bar.set_postfix(format!(
                    "return={:.2}, epsilon={:.3}",
                    result.total_return,
                    agent.exploration_rate()
                ));
                bar.update(1);
            }
            results.returns.push(result.total_return);
            results.lengths.push(result.steps);
            results.terminated.push(result.terminated);
        }
        info!(
            "training finished: {} episodes, {:.1}% reached the goal",
            self.config.episodes,
            results.success_rate() * 100.0
        );
        results
    }

    fn should_log(&self, episode: usize) -> bool {
        self.config.log_every != 0 && (episode == 0 || (episode + 1) % self.config.log_every == 0)
    }

    /// Mean return of `eval_episodes` greedy runs. The agent is left untouched.
    pub fn evaluate(&self, env: &mut dyn WarehouseMdp, agent: &mut dyn Agent) -> f64 {
        if self.config.eval_episodes == 0 {
            return 0.0;
        }
        let total: f64 = (0..self.config.eval_episodes)
            .map(|_| run_episode(env, agent, self.config.max_steps, false).total_return)
            .sum();
        total / self.config.eval_episodes as f64
    }

    pub fn rollout(&self, env: &mut dyn WarehouseMdp, agent: &mut dyn Agent) -> EpisodeResult {
        let result = run_episode(env, agent, self.config.max_steps, false);
        if result.terminated {
            info!("goal reached in {} steps", result.steps);
        } else {
            info!("goal not reached within {} steps", self.config.max_steps);
        }
        result
    }

    pub fn q_table_sample(
        env: &mut dyn WarehouseMdp,
        agent: &QLearningAgent,
    ) -> Vec<(WarehouseState, ActionValues)> {
        let start = env.initial_state();
        let mut states = vec![start];
        for action in env.actions() {
            let next = env.step(&start, action);
            if !states.contains(&next) {
                states.push(next);
            }
        }
        states
            .into_iter()
            .map(|s| (s, agent.q_values(&s)))
            .collect()
    }
}

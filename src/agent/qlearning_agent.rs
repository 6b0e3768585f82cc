use log::debug;

use super::Agent;
use crate::action_selection::EpsilonGreedy;
use crate::config::AgentConfig;
use crate::env::{Action, StateKey, WarehouseState};
use crate::error::Result;
use crate::policy::{ActionValues, TabularPolicy};

#[derive(Debug, Clone)]
pub struct QLearningAgent {
    policy: TabularPolicy<StateKey>,
    action_selection: EpsilonGreedy,
    learning_rate: f64,
    discount_factor: f64,
    epsilon_decay: f64,
    final_epsilon: f64,
    episode_error: (f64, usize),
    training_error: Vec<f64>,
}

impl QLearningAgent {
    pub fn new(config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            policy: TabularPolicy::new(0.0),
            action_selection: EpsilonGreedy::new(config.initial_epsilon, config.seed),
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            epsilon_decay: config.epsilon_decay,
            final_epsilon: config.final_epsilon,
            episode_error: (0.0, 0),
            training_error: vec![],
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.action_selection.epsilon()
    }

    /// Q-values of every action in `state`; unseen states read as zero.
    pub fn q_values(&self, state: &WarehouseState) -> ActionValues {
        self.policy.get_values(&state.key())
    }

    pub fn greedy_action(&mut self, state: &WarehouseState) -> Action {
        self.select_action(state, false)
    }

    pub fn decay_epsilon(&mut self, rate: f64, floor: f64) {
        self.action_selection.decay_epsilon(rate, floor);
    }

    pub fn policy(&self) -> &TabularPolicy<StateKey> {
        &self.policy
    }

    pub fn replace_table(&mut self, table: TabularPolicy<StateKey>) {
        debug!("replacing value table ({} states)", table.len());
        self.policy = table;
    }

    /// Mean absolute temporal-difference error of each finished episode.
    pub fn training_error(&self) -> &[f64] {
        &self.training_error
    }

    pub fn reset(&mut self) {
        self.policy.reset();
        self.action_selection.reset();
        self.training_error.clear();
        self.episode_error = (0.0, 0);
    }
}

impl Agent for QLearningAgent {
    fn select_action(&mut self, state: &WarehouseState, explore: bool) -> Action {
        let values = self.q_values(state);
        self.action_selection.get_action(&values, explore)
    }

    fn update(
        &mut self,
        state: &WarehouseState,
        action: Action,
        reward: f64,
        next_state: &WarehouseState,
        done: bool,
    ) -> f64 {
        let key = state.key();
        let future_q_value: f64 = if done {
            0.0
        } else {
            self.policy.max_value(&next_state.key())
        };
        let curr_q_value: f64 = self.policy.get(&key, action);
        let temporal_difference: f64 =
            reward + self.discount_factor * future_q_value - curr_q_value;
        self.policy.set(
            &key,
            action,
            curr_q_value + self.learning_rate * temporal_difference,
        );
        self.episode_error.0 += temporal_difference.abs();
        self.episode_error.1 += 1;
        temporal_difference
    }

    fn end_episode(&mut self) {
        let (sum, count) = std::mem::take(&mut self.episode_error);
        if count > 0 {
            self.training_error.push(sum / count as f64);
        }
        self.decay_epsilon(self.epsilon_decay, self.final_epsilon);
    }

    fn exploration_rate(&self) -> f64 {
        self.epsilon()
    }
}

mod qlearning_agent;

pub use qlearning_agent::QLearningAgent;

use crate::env::{Action, WarehouseState};

pub trait Agent {
    /// Picks the next action. `explore` is false in evaluation runs.
    fn select_action(&mut self, state: &WarehouseState, explore: bool) -> Action;

    /// Learns from one transition and returns the temporal-difference error.
    fn update(
        &mut self,
        state: &WarehouseState,
        action: Action,
        reward: f64,
        next_state: &WarehouseState,
        done: bool,
    ) -> f64;

    fn end_episode(&mut self) {}

    fn exploration_rate(&self) -> f64 {
        0.0
    }
}

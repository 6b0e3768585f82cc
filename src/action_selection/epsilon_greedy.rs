use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::env::Action;
use crate::policy::ActionValues;

/// Epsilon-greedy selection with a uniform tie-break among the best actions.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    exploration_decider: Uniform<f64>,
    rand_action_selecter: Uniform<usize>,
    pub initial_epsilon: f64,
    epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self {
            exploration_decider: Uniform::from(0.0..1.0),
            rand_action_selecter: Uniform::from(0..Action::COUNT),
            initial_epsilon: epsilon,
            epsilon,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn decay_epsilon(&mut self, rate: f64, floor: f64) {
        self.epsilon = floor.max(self.epsilon * rate);
    }

    fn should_explore(&mut self) -> bool {
        self.exploration_decider.sample(&mut self.rng) < self.epsilon
    }

    /// The exploration draw only happens when `explore` is set, so greedy
    /// calls consume randomness for tie-breaks alone.
    pub fn get_action(&mut self, values: &ActionValues, explore: bool) -> Action {
        if explore && self.should_explore() {
            return Action::ALL[self.rand_action_selecter.sample(&mut self.rng)];
        }
        let max = values.iter().skip(1).fold(values[0], |acc, x| acc.max(*x));
        let best: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|a| values[*a] == max)
            .collect();
        match best.choose(&mut self.rng) {
            Some(action) => *action,
            // only reachable when every value is NaN
            None => Action::ALL[self.rand_action_selecter.sample(&mut self.rng)],
        }
    }

    pub fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn greedy_picks_unique_maximum() {
        let mut selector = EpsilonGreedy::new(1.0, 0);
        let values = [0.0, 3.0, -1.0, 2.9];
        for _ in 0..100 {
            assert_eq!(selector.get_action(&values, false), Action::SOUTH);
        }
    }

    #[test]
    fn ties_are_broken_uniformly() {
        let mut selector = EpsilonGreedy::new(0.0, 5);
        let values = [1.0, 1.0, 0.0, 1.0];
        let mut counts = [0usize; Action::COUNT];
        for _ in 0..3000 {
            counts[selector.get_action(&values, true) as usize] += 1;
        }
        assert_eq!(counts[Action::EAST as usize], 0);
        for action in [Action::NORTH, Action::SOUTH, Action::WEST] {
            let c = counts[action as usize];
            assert!((850..1150).contains(&c), "{action}: {c}");
        }
    }

    #[test]
    fn full_exploration_reaches_every_action() {
        let mut selector = EpsilonGreedy::new(1.0, 9);
        let values = [5.0, 0.0, 0.0, 0.0];
        let seen: HashSet<Action> = (0..400)
            .map(|_| selector.get_action(&values, true))
            .collect();
        assert_eq!(seen.len(), Action::COUNT);
    }

    #[test]
    fn same_seed_same_choices() {
        let mut a = EpsilonGreedy::new(0.3, 21);
        let mut b = EpsilonGreedy::new(0.3, 21);
        let values = [0.0; Action::COUNT];
        for _ in 0..100 {
            assert_eq!(a.get_action(&values, true), b.get_action(&values, true));
        }
    }

    #[test]
    fn decay_is_multiplicative_with_floor() {
        let mut selector = EpsilonGreedy::new(1.0, 0);
        selector.decay_epsilon(0.995, 0.05);
        assert_eq!(selector.epsilon(), 0.995);
        for _ in 0..2000 {
            selector.decay_epsilon(0.995, 0.05);
            assert!(selector.epsilon() >= 0.05);
        }
        assert_eq!(selector.epsilon(), 0.05);
        selector.decay_epsilon(0.995, 0.05);
        assert_eq!(selector.epsilon(), 0.05);

        selector.reset();
        assert_eq!(selector.epsilon(), 1.0);
    }

    #[test]
    fn decay_lifts_epsilon_to_floor() {
        let mut selector = EpsilonGreedy::new(0.1, 0);
        selector.decay_epsilon(0.5, 0.2);
        assert_eq!(selector.epsilon(), 0.2);
    }
}

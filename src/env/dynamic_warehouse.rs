use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Action, DynamicState, GridGeometry, Position, WarehouseMdp, WarehouseState};
use crate::config::{ObstacleSpec, WarehouseConfig};
use crate::error::{Result, WarehouseError};

/// Open floor shared with one obstacle that wanders at random. The obstacle
/// never blocks the robot; sharing its cell is only penalized.
#[derive(Debug, Clone)]
pub struct DynamicWarehouse {
    grid: GridGeometry,
    goals: Vec<Position>,
    start: Position,
    obstacle_start: Position,
    rng: StdRng,
    direction: Uniform<usize>,
}

impl DynamicWarehouse {
    const GOAL_REWARD: f64 = 10.0;
    const COLLISION_PENALTY: f64 = -10.0;
    const PROXIMITY_PENALTY: f64 = -2.0;
    const STEP_COST: f64 = -0.1;
    const STAY_PROBABILITY: f64 = 0.5;
    const DISCOUNT: f64 = 0.9;

    pub fn new(config: &WarehouseConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: &WarehouseConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let obstacle_start = match config.obstacles {
            ObstacleSpec::Moving { start } => start,
            ObstacleSpec::Fixed { .. } => {
                return Err(WarehouseError::InvalidConfiguration(
                    "dynamic warehouse needs a moving obstacle".to_string(),
                ))
            }
        };
        Ok(Self {
            grid: config.grid()?,
            goals: config.goals.clone(),
            start: config.start,
            obstacle_start,
            rng,
            direction: Uniform::from(0..Action::COUNT),
        })
    }

    fn state(&self, robot: Position, obstacle: Position) -> WarehouseState {
        DynamicState::new(robot, obstacle, self.goals.contains(&robot)).into()
    }

    fn move_obstacle(&mut self, obstacle: Position) -> Position {
        if self.rng.gen_bool(Self::STAY_PROBABILITY) {
            return obstacle;
        }
        let direction = Action::ALL[self.direction.sample(&mut self.rng)];
        self.grid.step(obstacle, direction)
    }
}

impl WarehouseMdp for DynamicWarehouse {
    fn initial_state(&self) -> WarehouseState {
        self.state(self.start, self.obstacle_start)
    }

    fn is_terminal(&self, state: &WarehouseState) -> bool {
        self.goals.contains(&state.robot())
    }

    fn step(&mut self, state: &WarehouseState, action: Action) -> WarehouseState {
        if self.is_terminal(state) {
            return *state;
        }
        let robot = self.grid.step(state.robot(), action);
        let obstacle = state.obstacle().unwrap_or(self.obstacle_start);
        let obstacle = self.move_obstacle(obstacle);
        self.state(robot, obstacle)
    }

    fn reward(&self, state: &WarehouseState, _action: Action, next_state: &WarehouseState) -> f64 {
        if self.is_terminal(state) {
            return 0.0;
        }
        if self.is_terminal(next_state) {
            return Self::GOAL_REWARD;
        }
        let robot = next_state.robot();
        let obstacle = next_state.obstacle().unwrap_or(self.obstacle_start);
        if robot == obstacle {
            Self::COLLISION_PENALTY
        } else if robot.manhattan(&obstacle) <= 1 {
            Self::PROXIMITY_PENALTY
        } else {
            Self::STEP_COST
        }
    }

    fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    fn goals(&self) -> &[Position] {
        &self.goals
    }

    fn state_space(&self) -> Vec<WarehouseState> {
        let mut states = Vec::with_capacity(self.grid.len() * self.grid.len());
        for robot in self.grid.cells() {
            for obstacle in self.grid.cells() {
                states.push(self.state(robot, obstacle));
            }
        }
        states
    }

    fn discount_factor(&self) -> f64 {
        Self::DISCOUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(seed: u64) -> DynamicWarehouse {
        DynamicWarehouse::new(&WarehouseConfig::dynamic_layout(), seed).unwrap()
    }

    fn at(robot: (usize, usize), obstacle: (usize, usize)) -> WarehouseState {
        DynamicState::new(robot.into(), obstacle.into(), robot == (4, 4)).into()
    }

    #[test]
    fn initial_state_places_both_entities() {
        let env = env(0);
        let s = env.initial_state();
        assert_eq!(s.robot(), Position::new(0, 0));
        assert_eq!(s.obstacle(), Some(Position::new(2, 2)));
        assert!(!env.is_terminal(&s));
    }

    #[test]
    fn robot_moves_deterministically_obstacle_stays_adjacent() {
        let mut env = env(7);
        let s = at((2, 2), (0, 4));
        for _ in 0..200 {
            let next = env.step(&s, Action::NORTH);
            assert_eq!(next.robot(), Position::new(2, 3));
            let obstacle = next.obstacle().unwrap();
            assert!(obstacle.manhattan(&Position::new(0, 4)) <= 1);
        }
    }

    #[test]
    fn obstacle_walk_visits_every_outcome() {
        let mut env = env(3);
        let s = at((0, 0), (2, 2));
        let mut stays = 0;
        let mut seen = std::collections::HashSet::new();
        let trials = 4000;
        for _ in 0..trials {
            let obstacle = env.step(&s, Action::WEST).obstacle().unwrap();
            if obstacle == Position::new(2, 2) {
                stays += 1;
            }
            seen.insert(obstacle);
        }
        assert_eq!(seen.len(), 5);
        let ratio = stays as f64 / trials as f64;
        assert!((0.45..0.55).contains(&ratio), "stay ratio {ratio}");
    }

    #[test]
    fn same_seed_same_walk() {
        let (mut a, mut b) = (env(11), env(11));
        let (mut sa, mut sb) = (a.initial_state(), b.initial_state());
        for _ in 0..50 {
            sa = a.step(&sa, Action::EAST);
            sb = b.step(&sb, Action::EAST);
            assert_eq!(sa, sb);
        }
    }

    #[test]
    fn terminal_flag_tracks_goal() {
        let mut env = env(0);
        let next = env.step(&at((4, 3), (0, 0)), Action::NORTH);
        match next {
            WarehouseState::Dynamic(d) => assert!(d.is_terminal()),
            WarehouseState::Static(_) => panic!("expected a dynamic state"),
        }
        assert!(env.is_terminal(&next));
        for action in Action::ALL {
            assert_eq!(env.step(&next, action), next);
        }
    }

    #[test]
    fn reward_branches_in_priority_order() {
        let env = env(0);
        let from = at((3, 4), (0, 0));
        // goal wins even when the obstacle shares the cell
        assert_eq!(env.reward(&from, Action::EAST, &at((4, 4), (4, 4))), 10.0);
        assert_eq!(env.reward(&from, Action::WEST, &at((2, 4), (2, 4))), -10.0);
        assert_eq!(env.reward(&from, Action::WEST, &at((2, 4), (2, 3))), -2.0);
        assert_eq!(env.reward(&from, Action::WEST, &at((2, 4), (0, 0))), -0.1);
    }

    #[test]
    fn state_space_is_robot_times_obstacle() {
        let env = env(0);
        let states = env.state_space();
        assert_eq!(states.len(), 25 * 25);
        let terminal = states.iter().filter(|s| env.is_terminal(s)).count();
        assert_eq!(terminal, 25);
    }
}

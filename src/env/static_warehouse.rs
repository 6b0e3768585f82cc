use fxhash::FxHashSet;

use super::{Action, GridGeometry, Position, StaticState, WarehouseMdp, WarehouseState};
use crate::config::{ObstacleSpec, WarehouseConfig};
use crate::error::{Result, WarehouseError};

/// Floor with impassable shelving. Transitions are deterministic.
#[derive(Debug, Clone)]
pub struct StaticWarehouse {
    grid: GridGeometry,
    goals: Vec<Position>,
    start: Position,
    obstacles: FxHashSet<Position>,
}

impl StaticWarehouse {
    const GOAL_REWARD: f64 = 500.0;
    const STEP_COST: f64 = -1.0;
    const BUMP_PENALTY: f64 = -3.0;
    const OBSTACLE_PENALTY: f64 = -10.0;
    const PROGRESS_SHAPING: f64 = 2.0;
    const DISCOUNT: f64 = 0.95;

    pub fn new(config: &WarehouseConfig) -> Result<Self> {
        config.validate()?;
        let cells = match &config.obstacles {
            ObstacleSpec::Fixed { cells } => cells,
            ObstacleSpec::Moving { .. } => {
                return Err(WarehouseError::InvalidConfiguration(
                    "static warehouse needs fixed obstacles".to_string(),
                ))
            }
        };
        Ok(Self {
            grid: config.grid()?,
            goals: config.goals.clone(),
            start: config.start,
            obstacles: cells.iter().copied().collect(),
        })
    }

    pub fn is_obstacle(&self, pos: &Position) -> bool {
        self.obstacles.contains(pos)
    }

    pub fn obstacles(&self) -> &FxHashSet<Position> {
        &self.obstacles
    }

    fn state(robot: Position) -> WarehouseState {
        StaticState::new(robot).into()
    }
}

impl WarehouseMdp for StaticWarehouse {
    fn initial_state(&self) -> WarehouseState {
        Self::state(self.start)
    }

    fn is_terminal(&self, state: &WarehouseState) -> bool {
        self.goals.contains(&state.robot())
    }

    fn step(&mut self, state: &WarehouseState, action: Action) -> WarehouseState {
        if self.is_terminal(state) {
            return *state;
        }
        let robot = state.robot();
        let target = self.grid.step(robot, action);
        if self.is_obstacle(&target) {
            Self::state(robot)
        } else {
            Self::state(target)
        }
    }

    fn reward(&self, state: &WarehouseState, _action: Action, next_state: &WarehouseState) -> f64 {
        if self.is_terminal(state) {
            return 0.0;
        }
        if self.is_terminal(next_state) {
            return Self::GOAL_REWARD;
        }
        let (curr, next) = (state.robot(), next_state.robot());
        let mut reward = Self::STEP_COST;
        if next == curr {
            reward += Self::BUMP_PENALTY;
        }
        if self.is_obstacle(&next) {
            reward += Self::OBSTACLE_PENALTY;
        }
        // shaping is measured against the first goal only
        let goal = self.goals[0];
        if next.manhattan(&goal) < curr.manhattan(&goal) {
            reward += Self::PROGRESS_SHAPING;
        } else {
            reward -= Self::PROGRESS_SHAPING;
        }
        reward
    }

    fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    fn goals(&self) -> &[Position] {
        &self.goals
    }

    fn state_space(&self) -> Vec<WarehouseState> {
        self.grid
            .cells()
            .filter(|cell| !self.is_obstacle(cell))
            .map(Self::state)
            .collect()
    }

    fn discount_factor(&self) -> f64 {
        Self::DISCOUNT
    }
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::env::{GridGeometry, Position};
use crate::error::{Result, WarehouseError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObstacleSpec {
    Fixed { cells: Vec<Position> },
    Moving { start: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub width: usize,
    pub height: usize,
    pub goals: Vec<Position>,
    pub start: Position,
    pub obstacles: ObstacleSpec,
}

impl WarehouseConfig {
    /// 7x6 floor with seven shelving cells between the dock and the target.
    pub fn static_layout() -> Self {
        Self {
            width: 7,
            height: 6,
            goals: vec![Position::new(6, 0)],
            start: Position::new(0, 5),
            obstacles: ObstacleSpec::Fixed {
                cells: vec![
                    Position::new(1, 5),
                    Position::new(1, 3),
                    Position::new(1, 1),
                    Position::new(3, 4),
                    Position::new(4, 4),
                    Position::new(5, 1),
                    Position::new(6, 1),
                ],
            },
        }
    }

    pub fn dynamic_layout() -> Self {
        Self {
            width: 5,
            height: 5,
            goals: vec![Position::new(4, 4)],
            start: Position::new(0, 0),
            obstacles: ObstacleSpec::Moving {
                start: Position::new(2, 2),
            },
        }
    }

    pub fn grid(&self) -> Result<GridGeometry> {
        GridGeometry::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        let grid = self.grid()?;
        let out_of_bounds = |what: &str, pos: &Position| {
            WarehouseError::InvalidConfiguration(format!(
                "{what} {pos} is outside the {}x{} grid",
                grid.width(),
                grid.height()
            ))
        };

        if self.goals.is_empty() {
            return Err(WarehouseError::InvalidConfiguration(
                "at least one goal location is required".to_string(),
            ));
        }
        if !grid.contains(&self.start) {
            return Err(out_of_bounds("start", &self.start));
        }
        if let Some(goal) = self.goals.iter().find(|g| !grid.contains(g)) {
            return Err(out_of_bounds("goal", goal));
        }

        let obstacle_cells: &[Position] = match &self.obstacles {
            ObstacleSpec::Fixed { cells } => {
                if cells.contains(&self.start) {
                    return Err(WarehouseError::InvalidConfiguration(format!(
                        "start {} is blocked by a fixed obstacle",
                        self.start
                    )));
                }
                cells
            }
            ObstacleSpec::Moving { start } => std::slice::from_ref(start),
        };
        for cell in obstacle_cells {
            if !grid.contains(cell) {
                return Err(out_of_bounds("obstacle", cell));
            }
            if self.goals.contains(cell) {
                return Err(WarehouseError::InvalidConfiguration(format!(
                    "obstacle {cell} coincides with a goal"
                )));
            }
        }
        Ok(())
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::static_layout()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    pub final_epsilon: f64,
    pub epsilon_decay: f64,
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.7,
            discount_factor: 0.95,
            initial_epsilon: 1.0,
            final_epsilon: 0.05,
            epsilon_decay: 0.995,
            seed: 42,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(WarehouseError::InvalidConfiguration(format!(
                    "{name} must be in [0, 1], got {value}"
                )))
            }
        };
        in_unit("learning_rate", self.learning_rate)?;
        in_unit("discount_factor", self.discount_factor)?;
        in_unit("initial_epsilon", self.initial_epsilon)?;
        in_unit("final_epsilon", self.final_epsilon)?;
        if self.final_epsilon > self.initial_epsilon {
            return Err(WarehouseError::InvalidConfiguration(format!(
                "final_epsilon {} exceeds initial_epsilon {}",
                self.final_epsilon, self.initial_epsilon
            )));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(WarehouseError::InvalidConfiguration(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub episodes: usize,
    pub max_steps: usize,
    pub eval_episodes: usize,
    pub log_every: usize,
    pub show_progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            max_steps: 200,
            eval_episodes: 50,
            log_every: 50,
            show_progress: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub environment: WarehouseConfig,
    pub agent: AgentConfig,
    pub training: TrainingConfig,
}

impl ExperimentConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ExperimentConfig = serde_json::from_str(text)
            .map_err(|e| WarehouseError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.environment.validate()?;
        self.agent.validate()
    }
}

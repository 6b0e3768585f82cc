mod action;
mod dynamic_warehouse;
mod grid;
mod state;
mod static_warehouse;

use enum_dispatch::enum_dispatch;

pub use action::Action;
pub use dynamic_warehouse::DynamicWarehouse;
pub use grid::{GridGeometry, Position};
pub use state::{DynamicState, StateKey, StaticState, WarehouseState};
pub use static_warehouse::StaticWarehouse;

use crate::config::{ObstacleSpec, WarehouseConfig};
use crate::error::Result;

#[enum_dispatch]
pub trait WarehouseMdp {
    fn initial_state(&self) -> WarehouseState;

    fn actions(&self) -> [Action; Action::COUNT] {
        Action::ALL
    }

    fn is_terminal(&self, state: &WarehouseState) -> bool;

    /// Successor of `state` under `action`. Terminal states are returned
    /// unchanged.
    fn step(&mut self, state: &WarehouseState, action: Action) -> WarehouseState;

    /// Reward for the transition, judged on `next_state`. Leaving a terminal
    /// state yields nothing.
    fn reward(&self, state: &WarehouseState, action: Action, next_state: &WarehouseState) -> f64;

    fn grid(&self) -> &GridGeometry;

    fn goals(&self) -> &[Position];

    fn state_space(&self) -> Vec<WarehouseState>;

    fn discount_factor(&self) -> f64;
}

#[enum_dispatch(WarehouseMdp)]
#[derive(Debug, Clone)]
pub enum Warehouse {
    Static(StaticWarehouse),
    Dynamic(DynamicWarehouse),
}

impl Warehouse {
    /// Builds the variant selected by the obstacle specification. `seed`
    /// drives the moving obstacle and is unused for fixed layouts.
    pub fn from_config(config: &WarehouseConfig, seed: u64) -> Result<Self> {
        match config.obstacles {
            ObstacleSpec::Fixed { .. } => Ok(StaticWarehouse::new(config)?.into()),
            ObstacleSpec::Moving { .. } => Ok(DynamicWarehouse::new(config, seed)?.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_variant_from_obstacle_spec() {
        let env = Warehouse::from_config(&WarehouseConfig::static_layout(), 0).unwrap();
        assert!(matches!(env, Warehouse::Static(_)));
        assert!(matches!(env.initial_state(), WarehouseState::Static(_)));

        let env = Warehouse::from_config(&WarehouseConfig::dynamic_layout(), 0).unwrap();
        assert!(matches!(env, Warehouse::Dynamic(_)));
        assert_eq!(env.initial_state().obstacle(), Some(Position::new(2, 2)));
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = WarehouseConfig {
            height: 0,
            ..WarehouseConfig::dynamic_layout()
        };
        assert!(Warehouse::from_config(&config, 0).is_err());
    }

    #[test]
    fn both_variants_expose_the_same_actions() {
        let mut envs = vec![
            Warehouse::from_config(&WarehouseConfig::static_layout(), 1).unwrap(),
            Warehouse::from_config(&WarehouseConfig::dynamic_layout(), 1).unwrap(),
        ];
        for env in envs.iter_mut() {
            assert_eq!(env.actions(), Action::ALL);
            let s = env.initial_state();
            for action in env.actions() {
                let next = env.step(&s, action);
                assert!(env.grid().contains(&next.robot()));
            }
        }
    }
}

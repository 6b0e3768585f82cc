pub mod action_selection;
pub mod agent;
pub mod config;
pub mod env;
pub mod error;
pub mod persistence;
pub mod policy;
pub mod trainer;
pub mod utils;

pub use agent::{Agent, QLearningAgent};
pub use config::ExperimentConfig;
pub use env::{Action, Warehouse, WarehouseMdp, WarehouseState};
pub use error::{Result, WarehouseError};
pub use trainer::Trainer;

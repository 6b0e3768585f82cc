use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Position;
use crate::error::WarehouseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticState {
    pub robot: Position,
}

impl StaticState {
    pub fn new(robot: Position) -> Self {
        Self { robot }
    }
}

/// Robot and moving obstacle positions. The terminal flag is fixed when the
/// state is built and does not take part in equality or hashing.
#[derive(Debug, Clone, Copy)]
pub struct DynamicState {
    pub robot: Position,
    pub obstacle: Position,
    terminal: bool,
}

impl DynamicState {
    pub fn new(robot: Position, obstacle: Position, terminal: bool) -> Self {
        Self {
            robot,
            obstacle,
            terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl PartialEq for DynamicState {
    fn eq(&self, other: &Self) -> bool {
        self.robot == other.robot && self.obstacle == other.obstacle
    }
}

impl Eq for DynamicState {}

impl Hash for DynamicState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.robot.hash(state);
        self.obstacle.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarehouseState {
    Static(StaticState),
    Dynamic(DynamicState),
}

impl WarehouseState {
    pub fn robot(&self) -> Position {
        match self {
            WarehouseState::Static(s) => s.robot,
            WarehouseState::Dynamic(s) => s.robot,
        }
    }

    pub fn obstacle(&self) -> Option<Position> {
        match self {
            WarehouseState::Static(_) => None,
            WarehouseState::Dynamic(s) => Some(s.obstacle),
        }
    }

    pub fn key(&self) -> StateKey {
        match self {
            WarehouseState::Static(s) => StateKey::Robot(s.robot),
            WarehouseState::Dynamic(s) => StateKey::RobotObstacle(s.robot, s.obstacle),
        }
    }
}

impl From<StaticState> for WarehouseState {
    fn from(value: StaticState) -> Self {
        WarehouseState::Static(value)
    }
}

impl From<DynamicState> for WarehouseState {
    fn from(value: DynamicState) -> Self {
        WarehouseState::Dynamic(value)
    }
}

impl fmt::Display for WarehouseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseState::Static(s) => write!(f, "R:{}", s.robot),
            WarehouseState::Dynamic(s) => write!(f, "R:{} O:{}", s.robot, s.obstacle),
        }
    }
}

/// Ordered coordinate tuple `(x, y)` or `(rx, ry, ox, oy)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Robot(Position),
    RobotObstacle(Position, Position),
}

impl StateKey {
    pub fn coords(&self) -> Vec<usize> {
        match self {
            StateKey::Robot(r) => vec![r.x, r.y],
            StateKey::RobotObstacle(r, o) => vec![r.x, r.y, o.x, o.y],
        }
    }
}

impl TryFrom<&[usize]> for StateKey {
    type Error = WarehouseError;

    fn try_from(coords: &[usize]) -> Result<Self, Self::Error> {
        match *coords {
            [x, y] => Ok(StateKey::Robot(Position::new(x, y))),
            [rx, ry, ox, oy] => Ok(StateKey::RobotObstacle(
                Position::new(rx, ry),
                Position::new(ox, oy),
            )),
            _ => Err(WarehouseError::Deserialization(format!(
                "state key needs 2 or 4 coordinates, got {}",
                coords.len()
            ))),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coords: Vec<String> = self.coords().iter().map(|c| c.to_string()).collect();
        f.write_str(&coords.join(","))
    }
}

impl FromStr for StateKey {
    type Err = WarehouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(',')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<usize>, _>>()
            .map_err(|e| WarehouseError::Deserialization(format!("state key {s:?}: {e}")))?;
        StateKey::try_from(coords.as_slice())
    }
}

impl Serialize for StateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.coords())
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coords = Vec::<usize>::deserialize(deserializer)?;
        StateKey::try_from(coords.as_slice()).map_err(serde::de::Error::custom)
    }
}

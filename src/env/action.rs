use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WarehouseError;

/// Cardinal moves of the robot. NORTH increases `y`, SOUTH decreases it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Action {
    NORTH,
    SOUTH,
    EAST,
    WEST,
}

impl Action {
    pub const COUNT: usize = 4;
    pub const ALL: [Action; Action::COUNT] =
        [Action::NORTH, Action::SOUTH, Action::EAST, Action::WEST];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::NORTH => (0, 1),
            Action::SOUTH => (0, -1),
            Action::EAST => (1, 0),
            Action::WEST => (-1, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::NORTH => "NORTH",
            Action::SOUTH => "SOUTH",
            Action::EAST => "EAST",
            Action::WEST => "WEST",
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = WarehouseError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NORTH),
            1 => Ok(Self::SOUTH),
            2 => Ok(Self::EAST),
            3 => Ok(Self::WEST),
            _ => Err(WarehouseError::InvalidAction(format!(
                "index {value} is outside 0..{}",
                Action::COUNT
            ))),
        }
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action as usize
    }
}

impl FromStr for Action {
    type Err = WarehouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORTH" => Ok(Self::NORTH),
            "SOUTH" => Ok(Self::SOUTH),
            "EAST" => Ok(Self::EAST),
            "WEST" => Ok(Self::WEST),
            other => Err(WarehouseError::InvalidAction(format!(
                "unknown action name {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Index<Action> for [f64] {
    type Output = f64;

    fn index(&self, index: Action) -> &Self::Output {
        &self[index as usize]
    }
}

impl IndexMut<Action> for [f64] {
    fn index_mut(&mut self, index: Action) -> &mut Self::Output {
        &mut self[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversion_matches_all_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(Action::try_from(i).unwrap(), *action);
            assert_eq!(usize::from(*action), i);
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert!(matches!(
            Action::try_from(4),
            Err(WarehouseError::InvalidAction(_))
        ));
    }

    #[test]
    fn names_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        assert!("UP".parse::<Action>().is_err());
        assert!("north".parse::<Action>().is_err());
    }

    #[test]
    fn values_index_by_action() {
        let mut values = [0.0; Action::COUNT];
        values[Action::EAST] = 2.5;
        assert_eq!(values[2], 2.5);
        assert_eq!(values[Action::EAST], 2.5);
    }
}

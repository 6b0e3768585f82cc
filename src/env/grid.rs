use std::fmt;

use serde::{Deserialize, Serialize};

use super::Action;
use crate::error::{Result, WarehouseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Bounds of a `width` x `height` grid with clamped movement. Only built
/// through [`GridGeometry::new`], so both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    width: usize,
    height: usize,
}

impl GridGeometry {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(WarehouseError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, pos: &Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Moves one cell along the action's axis. A move that would leave the
    /// grid keeps the coordinate at the border.
    #[inline]
    pub fn step(&self, pos: Position, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position {
            x: Self::clamp_axis(pos.x, dx, self.width),
            y: Self::clamp_axis(pos.y, dy, self.height),
        }
    }

    #[inline(always)]
    fn clamp_axis(value: usize, delta: isize, size: usize) -> usize {
        value.saturating_add_signed(delta).min(size - 1)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position { x, y }))
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

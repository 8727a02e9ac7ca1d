//! Basic types for the batched Snake environments
//!
//! This module defines the channel layout of the grid, the four movement
//! directions and the small value types shared by the other submodules.

use serde::{Deserialize, Serialize};

/// Number of planes per environment
pub const NUM_CHANNELS: usize = 3;

/// Food plane: 1 where food lies, 0 elsewhere
pub const FOOD_CHANNEL: usize = 0;

/// Head plane: 1 at the snake's head, 0 elsewhere
pub const HEAD_CHANNEL: usize = 1;

/// Body plane: 1 at the tail rising to the snake length at the head
pub const BODY_CHANNEL: usize = 2;

/// Number of discrete actions
pub const NUM_ACTIONS: usize = 4;

/// Direction a snake can move
///
/// Action codes run clockwise starting from `Up`, so `(code + 2) % 4` is
/// always the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last column
    Right,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
}

impl Direction {
    /// All directions in action-code order
    pub const ALL: [Direction; NUM_ACTIONS] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Create direction from action index
    pub fn from_action(action: i64) -> Option<Self> {
        match action {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Action index of this direction
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Orientation code reported for a snake heading this way
    ///
    /// Orientation codes are numbered from the opposite side of the compass:
    /// a snake heading `Right` reports the code of `Left`. The step rule
    /// compares raw actions against this code.
    pub fn orientation_code(self) -> i64 {
        self.opposite().index() as i64
    }

    /// Convert direction to (d_row, d_col) delta
    pub fn to_delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Get opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// A single cell of one environment in the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    /// Environment row in the batch
    pub env: usize,
    /// Grid row
    pub row: usize,
    /// Grid column
    pub col: usize,
}

impl CellIndex {
    /// Create new cell index
    pub fn new(env: usize, row: usize, col: usize) -> Self {
        Self { env, row, col }
    }
}

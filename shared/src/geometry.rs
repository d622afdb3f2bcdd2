use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position on the lattice, in cells rather than pixels.
///
/// Cells held by snakes or food may lie outside the current grid after the
/// surface shrinks, so coordinates are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Largest coordinate magnitude a cell may hold. Anything further out
    /// could overflow while stepping or comparing against the midlines.
    pub const LIMIT: i32 = i32::MAX / 4;

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `direction`
    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance (same ordering as the real distance)
    pub fn distance_squared(self, other: Cell) -> i64 {
        let dx = other.x as i64 - self.x as i64;
        let dy = other.y as i64 - self.y as i64;
        dx * dx + dy * dy
    }

    /// Both coordinates within `[-LIMIT, LIMIT]`
    pub fn in_range(self) -> bool {
        let range = -Self::LIMIT..=Self::LIMIT;
        range.contains(&self.x) && range.contains(&self.y)
    }

    /// Pull the cell into `[0, cols - 1] x [0, rows - 1]`
    pub fn clamped(self, cols: i32, rows: i32) -> Cell {
        Cell::new(self.x.min(cols - 1).max(0), self.y.min(rows - 1).max(0))
    }
}

/// Rejected direction vector
#[derive(Debug, Error, PartialEq)]
#[error("({x}, {y}) is not a unit direction")]
pub struct DirectionError {
    pub x: i32,
    pub y: i32,
}

/// One of the four axis-aligned unit vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Delta", into = "Delta")]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
    ];

    /// Pick one of the four directions uniformly
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Map a delta back to a direction. Anything that is not a unit vector,
    /// including `(0, 0)`, has no direction.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }
}

/// Wire form of a direction: `{"x": 1, "y": 0}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Delta {
    x: i32,
    y: i32,
}

impl TryFrom<Delta> for Direction {
    type Error = DirectionError;

    fn try_from(delta: Delta) -> Result<Self, Self::Error> {
        Direction::from_delta(delta.x, delta.y).ok_or(DirectionError {
            x: delta.x,
            y: delta.y,
        })
    }
}

impl From<Direction> for Delta {
    fn from(direction: Direction) -> Self {
        let (x, y) = direction.delta();
        Delta { x, y }
    }
}

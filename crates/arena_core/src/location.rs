//! Signed grid coordinates and unit movement directions.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A position on the arena grid.
///
/// Coordinates are centered: `(0, 0)` is the middle of the map, `x` grows
/// east and `y` grows north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Location {
    /// The center of every arena.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new location.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two locations.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add<Direction> for Location {
    type Output = Self;

    fn add(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit moves. Adjacency never includes diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `(0, 1)`
    North,
    /// `(1, 0)`
    East,
    /// `(0, -1)`
    South,
    /// `(-1, 0)`
    West,
}

impl Direction {
    /// All directions, in the order neighbours are visited.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The `(dx, dy)` offset of this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_direction() {
        let origin = Location::ORIGIN;
        assert_eq!(origin + Direction::North, Location::new(0, 1));
        assert_eq!(origin + Direction::East, Location::new(1, 0));
        assert_eq!(origin + Direction::South, Location::new(0, -1));
        assert_eq!(origin + Direction::West, Location::new(-1, 0));
    }

    #[test]
    fn test_directions_cancel_out() {
        let start = Location::new(-3, 7);
        let end = Direction::ALL.iter().fold(start, |loc, &d| loc + d);
        assert_eq!(start, end);
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Location::new(-2, 3).manhattan_distance(Location::new(1, -1)), 7);
        assert_eq!(Location::ORIGIN.manhattan_distance(Location::ORIGIN), 0);
    }
}

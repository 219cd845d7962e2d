//! # Grid Locations
//!
//! Integer cell coordinates used by every part of the generator.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Represents a single cell coordinate on the level grid.
///
/// The origin is the top-left cell and `y` grows downward.
///
/// # Examples
///
/// ```
/// use arenagen::Location;
///
/// let loc = Location::new(10, 5);
/// assert_eq!(loc.below(), Location::new(10, 6));
/// assert_eq!(loc.neighbors4().len(), 4);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    /// Creates a new location with the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin location (0, 0).
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }

    pub fn left(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    pub fn right(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    pub fn above(self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    pub fn below(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    /// Squared euclidean distance to another location.
    pub fn distance_sqr(self, other: Location) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Calculates the Manhattan distance to another location.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::Location;
    ///
    /// assert_eq!(Location::new(0, 0).manhattan_distance(Location::new(3, 4)), 7);
    /// ```
    pub fn manhattan_distance(self, other: Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the 4 orthogonal neighbors (left, right, above, below).
    pub fn neighbors4(self) -> [Location; 4] {
        [self.left(), self.right(), self.above(), self.below()]
    }

    /// Returns all 8 surrounding locations, diagonals included.
    pub fn neighbors8(self) -> [Location; 8] {
        [
            Location::new(self.x - 1, self.y - 1),
            self.above(),
            Location::new(self.x + 1, self.y - 1),
            self.left(),
            self.right(),
            Location::new(self.x - 1, self.y + 1),
            self.below(),
            Location::new(self.x + 1, self.y + 1),
        ]
    }
}

impl Add for Location {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Location {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<i32> for Location {
    type Output = Self;

    fn mul(self, scale: i32) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }
}

impl Neg for Location {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_arithmetic() {
        let a = Location::new(5, 10);
        let b = Location::new(3, 2);
        assert_eq!(a + b, Location::new(8, 12));
        assert_eq!(a - b, Location::new(2, 8));
        assert_eq!(b * 3, Location::new(9, 6));
        assert_eq!(-b, Location::new(-3, -2));
    }

    #[test]
    fn test_location_distances() {
        let a = Location::origin();
        let b = Location::new(3, 4);
        assert_eq!(a.distance_sqr(b), 25);
        assert_eq!(a.manhattan_distance(b), 7);
    }

    #[test]
    fn test_location_neighbors() {
        let loc = Location::new(5, 5);
        let four = loc.neighbors4();
        assert!(four.contains(&Location::new(5, 4)));
        assert!(four.contains(&Location::new(4, 5)));
        assert!(!four.contains(&Location::new(4, 4)));

        let eight = loc.neighbors8();
        assert!(eight.contains(&Location::new(4, 4)));
        assert!(eight.contains(&Location::new(6, 6)));
        assert!(!eight.contains(&loc));
    }

    #[test]
    fn test_location_ordering_compares_x_then_y() {
        let mut locs = vec![Location::new(2, 0), Location::new(1, 5), Location::new(1, 2)];
        locs.sort();
        assert_eq!(
            locs,
            vec![Location::new(1, 2), Location::new(1, 5), Location::new(2, 0)]
        );
    }
}

//! # Regions
//!
//! Axis-aligned integer rectangles of grid cells.

use super::Location;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle of grid cells.
///
/// Both corners are inclusive: `right() == x + width` is the last column the region
/// covers, so a single-column region has `width == 0`. Use [`Region::columns`] and
/// [`Region::rows`] for cell counts.
///
/// # Examples
///
/// ```
/// use arenagen::{Location, Region};
///
/// let region = Region::new(5, 5, 9, 7);
/// assert_eq!(region.columns(), 10);
/// assert_eq!(region.rows(), 8);
/// assert!(region.contains(Location::new(14, 12)));
/// assert!(!region.contains(Location::new(15, 12)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// Creates a new region from its top-left corner and extents.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates the smallest region containing both corner cells.
    pub fn from_corners(a: Location, b: Location) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, a.x.max(b.x) - left, a.y.max(b.y) - top)
    }

    /// A region covering exactly one cell.
    pub const fn single(loc: Location) -> Self {
        Self::new(loc.x, loc.y, 0, 0)
    }

    /// Creates a region from a top-left cell and cell counts.
    pub fn with_cells(top_left: Location, columns: i32, rows: i32) -> Self {
        Self::new(top_left.x, top_left.y, columns - 1, rows - 1)
    }

    /// Normalizes negative extents by moving the origin.
    pub fn sanity_checked(self) -> Self {
        let mut region = self;
        if region.width < 0 {
            region.x += region.width;
            region.width = -region.width;
        }
        if region.height < 0 {
            region.y += region.height;
            region.height = -region.height;
        }
        region
    }

    pub fn is_valid(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn columns(&self) -> i32 {
        self.width + 1
    }

    pub fn rows(&self) -> i32 {
        self.height + 1
    }

    /// Number of cells covered.
    pub fn area(&self) -> i32 {
        self.columns() * self.rows()
    }

    pub fn top_left(&self) -> Location {
        Location::new(self.left(), self.top())
    }

    pub fn top_right(&self) -> Location {
        Location::new(self.right(), self.top())
    }

    pub fn bottom_left(&self) -> Location {
        Location::new(self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> Location {
        Location::new(self.right(), self.bottom())
    }

    /// The center cell, rounded toward the top-left.
    pub fn center(&self) -> Location {
        Location::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn corners(&self) -> [Location; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_left(),
            self.bottom_right(),
        ]
    }

    pub fn left_edge(&self) -> Region {
        Region::new(self.left(), self.top(), 0, self.height)
    }

    pub fn right_edge(&self) -> Region {
        Region::new(self.right(), self.top(), 0, self.height)
    }

    pub fn top_edge(&self) -> Region {
        Region::new(self.left(), self.top(), self.width, 0)
    }

    pub fn bottom_edge(&self) -> Region {
        Region::new(self.left(), self.bottom(), self.width, 0)
    }

    /// Length of the longer side, in cells.
    pub fn long_side(&self) -> i32 {
        self.columns().max(self.rows())
    }

    /// Length of the shorter side, in cells.
    pub fn short_side(&self) -> i32 {
        self.columns().min(self.rows())
    }

    /// Checks if a location is inside this region.
    pub fn contains(&self, loc: Location) -> bool {
        loc.x >= self.left() && loc.x <= self.right() && loc.y >= self.top() && loc.y <= self.bottom()
    }

    pub fn contains_region(&self, other: &Region) -> bool {
        self.contains(other.top_left()) && self.contains(other.bottom_right())
    }

    /// Checks if a location is on the outermost ring of this region.
    pub fn is_on_border(&self, loc: Location) -> bool {
        self.contains(loc)
            && (loc.x == self.left()
                || loc.x == self.right()
                || loc.y == self.top()
                || loc.y == self.bottom())
    }

    /// Checks if this region overlaps with another region.
    pub fn intersects(&self, other: &Region) -> bool {
        !(self.left() > other.right()
            || other.left() > self.right()
            || self.top() > other.bottom()
            || other.top() > self.bottom())
    }

    pub fn intersection(&self, other: &Region) -> Option<Region> {
        if !self.intersects(other) {
            return None;
        }
        Some(Region::from_corners(
            Location::new(self.left().max(other.left()), self.top().max(other.top())),
            Location::new(
                self.right().min(other.right()),
                self.bottom().min(other.bottom()),
            ),
        ))
    }

    /// True when the regions do not overlap but share part of an edge.
    pub fn touches(&self, other: &Region) -> bool {
        let rows_overlap = self.top() <= other.bottom() && other.top() <= self.bottom();
        let columns_overlap = self.left() <= other.right() && other.left() <= self.right();
        let side_by_side =
            rows_overlap && (self.right() + 1 == other.left() || other.right() + 1 == self.left());
        let stacked = columns_overlap
            && (self.bottom() + 1 == other.top() || other.bottom() + 1 == self.top());
        side_by_side || stacked
    }

    /// The smallest region containing both regions.
    pub fn bounding(&self, other: &Region) -> Region {
        Region::from_corners(
            Location::new(self.left().min(other.left()), self.top().min(other.top())),
            Location::new(
                self.right().max(other.right()),
                self.bottom().max(other.bottom()),
            ),
        )
    }

    /// Merges two regions when together they form exactly one rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::Region;
    ///
    /// let left = Region::new(0, 0, 2, 3);
    /// let right = Region::new(3, 0, 4, 3);
    /// assert_eq!(Region::combine(&left, &right), Some(Region::new(0, 0, 7, 3)));
    /// assert_eq!(Region::combine(&left, &Region::new(3, 1, 4, 3)), None);
    /// ```
    pub fn combine(a: &Region, b: &Region) -> Option<Region> {
        let same_rows = a.top() == b.top() && a.bottom() == b.bottom();
        let same_columns = a.left() == b.left() && a.right() == b.right();
        let side_by_side = a.right() + 1 == b.left() || b.right() + 1 == a.left();
        let stacked = a.bottom() + 1 == b.top() || b.bottom() + 1 == a.top();

        if (same_rows && side_by_side) || (same_columns && stacked) {
            Some(a.bounding(b))
        } else if a.contains_region(b) {
            Some(*a)
        } else if b.contains_region(a) {
            Some(*b)
        } else {
            None
        }
    }

    /// Returns the parts of this region not covered by `other` grown by `border`.
    ///
    /// The result is at most four disjoint regions: full-width bands above and below
    /// the cut, then the left and right pieces beside it.
    pub fn subtract(&self, other: &Region, border: i32) -> Vec<Region> {
        let cut = match self.intersection(&other.inflate(border, border)) {
            Some(cut) => cut,
            None => return vec![*self],
        };

        let mut pieces = Vec::new();
        if cut.top() > self.top() {
            pieces.push(Region::from_corners(
                self.top_left(),
                Location::new(self.right(), cut.top() - 1),
            ));
        }
        if cut.bottom() < self.bottom() {
            pieces.push(Region::from_corners(
                Location::new(self.left(), cut.bottom() + 1),
                self.bottom_right(),
            ));
        }
        if cut.left() > self.left() {
            pieces.push(Region::from_corners(
                Location::new(self.left(), cut.top()),
                Location::new(cut.left() - 1, cut.bottom()),
            ));
        }
        if cut.right() < self.right() {
            pieces.push(Region::from_corners(
                Location::new(cut.right() + 1, cut.top()),
                Location::new(self.right(), cut.bottom()),
            ));
        }
        pieces
    }

    pub fn translate(&self, delta: Location) -> Region {
        Region::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Grows every side outward; negative amounts shrink it.
    pub fn inflate(&self, dx: i32, dy: i32) -> Region {
        Region::new(
            self.x - dx,
            self.y - dy,
            self.width + 2 * dx,
            self.height + 2 * dy,
        )
    }

    /// Mirrors the region vertically inside a grid of the given height.
    pub fn flip_y(&self, grid_height: i32) -> Region {
        Region::new(self.x, grid_height - 1 - self.bottom(), self.width, self.height)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Location> {
        let (left, right) = (self.left(), self.right());
        (self.top()..=self.bottom())
            .flat_map(move |y| (left..=right).map(move |x| Location::new(x, y)))
    }

    /// The outermost ring of cells, each listed once.
    pub fn perimeter(&self) -> Vec<Location> {
        self.cells().filter(|loc| self.is_on_border(*loc)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_region_geometry() {
        let region = Region::new(5, 5, 9, 7);

        assert_eq!(region.right(), 14);
        assert_eq!(region.bottom(), 12);
        assert_eq!(region.area(), 80);
        assert_eq!(region.center(), Location::new(9, 8));
        assert_eq!(region.bottom_right(), Location::new(14, 12));
        assert_eq!(region.short_side(), 8);
        assert_eq!(region.long_side(), 10);

        assert!(region.is_on_border(Location::new(5, 5)));
        assert!(region.is_on_border(Location::new(10, 12)));
        assert!(!region.is_on_border(Location::new(7, 7)));
    }

    #[test]
    fn test_region_thin_regions_cover_cells() {
        let column = Region::new(3, 1, 0, 4);
        assert!(column.is_valid());
        assert_eq!(column.area(), 5);
        assert_eq!(column.cells().count(), 5);
        assert_eq!(column.left_edge(), column);
    }

    #[test]
    fn test_region_sanity_check() {
        let flipped = Region::new(10, 10, -4, -2).sanity_checked();
        assert_eq!(flipped, Region::new(6, 8, 4, 2));
        assert!(!Region::new(0, 0, -1, 0).is_valid());
    }

    #[test]
    fn test_region_intersection_and_touching() {
        let a = Region::new(0, 0, 4, 4);
        let b = Region::new(3, 2, 4, 4);
        let beside = Region::new(5, 1, 2, 2);
        let diagonal = Region::new(5, 5, 1, 1);

        assert_eq!(a.intersection(&b), Some(Region::new(3, 2, 1, 2)));
        assert!(a.touches(&beside));
        assert!(!a.intersects(&beside));
        assert!(!a.touches(&diagonal));
        assert!(!a.touches(&b));
    }

    #[test]
    fn test_region_subtract_middle() {
        let outer = Region::new(0, 0, 9, 9);
        let pieces = outer.subtract(&Region::new(4, 4, 1, 1), 0);
        assert_eq!(pieces.len(), 4);

        let covered: HashSet<Location> = pieces.iter().flat_map(|r| r.cells()).collect();
        assert_eq!(covered.len() as i32, outer.area() - 4);
        assert!(!covered.contains(&Location::new(4, 4)));
        assert!(covered.contains(&Location::new(3, 4)));
    }

    #[test]
    fn test_region_subtract_with_border() {
        let outer = Region::new(0, 0, 9, 0);
        let pieces = outer.subtract(&Region::single(Location::new(5, 0)), 1);
        assert_eq!(pieces, vec![Region::new(0, 0, 3, 0), Region::new(7, 0, 2, 0)]);
    }

    #[test]
    fn test_region_combine_and_bounding() {
        let top = Region::new(2, 0, 3, 1);
        let bottom = Region::new(2, 2, 3, 4);
        assert_eq!(Region::combine(&top, &bottom), Some(Region::new(2, 0, 3, 6)));
        assert_eq!(Region::combine(&top, &Region::new(2, 3, 3, 4)), None);
        assert_eq!(top.bounding(&Region::new(8, 8, 0, 0)), Region::new(2, 0, 6, 8));
    }

    #[test]
    fn test_region_flip_and_translate() {
        let region = Region::new(1, 0, 2, 1);
        assert_eq!(region.flip_y(10), Region::new(1, 8, 2, 1));
        assert_eq!(region.flip_y(10).flip_y(10), region);
        assert_eq!(region.translate(Location::new(3, -1)), Region::new(4, -1, 2, 1));
    }

    #[test]
    fn test_region_perimeter() {
        let region = Region::new(0, 0, 3, 3);
        assert_eq!(region.perimeter().len(), 12);
        assert_eq!(Region::new(0, 0, 0, 0).perimeter().len(), 1);
    }

    proptest! {
        #[test]
        fn test_region_subtract_self_is_empty(
            x in -50i32..50,
            y in -50i32..50,
            width in 0i32..40,
            height in 0i32..40,
        ) {
            let region = Region::new(x, y, width, height);
            prop_assert!(region.subtract(&region, 0).is_empty());
        }
    }
}

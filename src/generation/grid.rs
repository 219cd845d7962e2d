//! # Level Grid
//!
//! The mutable occupancy grid every generator and fill pattern writes into.
//!
//! Cells hold `true` for walls. Coordinates outside the grid are folded back in on
//! wrapping axes; on non-wrapping axes reads return the configurable `outside` value
//! and writes are dropped.

use crate::{Interval, Location, Region};
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A hole seen from inside a region: the hole cell, the region cell next to it, and
/// the unit step pointing from the hole into the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleAccess {
    pub hole: Location,
    pub inner: Location,
    pub inward: Location,
}

/// Boolean wall grid with wrap-aware addressing and hole bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGrid {
    width: i32,
    height: i32,
    /// Row-major cells, `true` = wall
    cells: Vec<bool>,
    wrap_x: bool,
    wrap_y: bool,
    /// Value reported for out-of-range reads on non-wrapping axes
    outside: bool,
    /// Deliberate single-cell gaps that keep neighbouring regions connected
    holes: BTreeSet<Location>,
}

impl LevelGrid {
    /// Creates an empty (all open) grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::{LevelGrid, Location};
    ///
    /// let grid = LevelGrid::new(8, 4, true, false);
    /// assert!(!grid.is_wall(Location::new(-1, 0)));
    /// assert!(grid.is_wall(Location::new(0, -1)));
    /// ```
    pub fn new(width: i32, height: i32, wrap_x: bool, wrap_y: bool) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
            wrap_x,
            wrap_y,
            outside: true,
            holes: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn wrap_x(&self) -> bool {
        self.wrap_x
    }

    pub fn wrap_y(&self) -> bool {
        self.wrap_y
    }

    pub fn outside(&self) -> bool {
        self.outside
    }

    pub fn set_outside(&mut self, value: bool) {
        self.outside = value;
    }

    /// The region covering the whole grid.
    pub fn bounds(&self) -> Region {
        Region::with_cells(Location::origin(), self.width, self.height)
    }

    /// Folds a location into the grid, or `None` if it lies past a non-wrapping edge.
    pub fn normalize(&self, loc: Location) -> Option<Location> {
        let x = Self::fold_axis(loc.x, self.width, self.wrap_x)?;
        let y = Self::fold_axis(loc.y, self.height, self.wrap_y)?;
        Some(Location::new(x, y))
    }

    fn fold_axis(value: i32, length: i32, wraps: bool) -> Option<i32> {
        if (0..length).contains(&value) {
            Some(value)
        } else if wraps {
            let axis = Interval::new(0.0, length as f64, true, false, 0);
            Some(axis.wrap(value as f64) as i32)
        } else {
            None
        }
    }

    fn index(&self, loc: Location) -> usize {
        (loc.y * self.width + loc.x) as usize
    }

    pub fn get(&self, loc: Location) -> bool {
        self.normalize(loc)
            .map_or(self.outside, |loc| self.cells[self.index(loc)])
    }

    pub fn is_wall(&self, loc: Location) -> bool {
        self.get(loc)
    }

    pub fn is_open(&self, loc: Location) -> bool {
        !self.get(loc)
    }

    /// Writes one cell. Returns false when the location fell off a non-wrapping edge.
    pub fn set(&mut self, loc: Location, wall: bool) -> bool {
        match self.normalize(loc) {
            Some(loc) => {
                let index = self.index(loc);
                self.cells[index] = wall;
                true
            }
            None => false,
        }
    }

    pub fn fill_all(&mut self, wall: bool) {
        self.cells.iter_mut().for_each(|cell| *cell = wall);
    }

    pub fn fill_region(&mut self, region: &Region, wall: bool) {
        for loc in region.cells() {
            self.set(loc, wall);
        }
    }

    pub fn fill_perimeter(&mut self, region: &Region, wall: bool) {
        for loc in region.perimeter() {
            self.set(loc, wall);
        }
    }

    /// Draws a 4-connected line so that walls drawn diagonally still block movement.
    pub fn fill_line(&mut self, from: Location, to: Location, wall: bool) {
        for loc in line_cells(from, to) {
            self.set(loc, wall);
        }
    }

    /// Fills every cell whose center lies at a distance in `[inner_radius, outer_radius)`
    /// from `center`. An inner radius of zero fills a disc.
    pub fn fill_circle(&mut self, center: Location, outer_radius: f64, inner_radius: f64, wall: bool) {
        for loc in circle_cells(center, outer_radius, inner_radius) {
            self.set(loc, wall);
        }
    }

    /// Marks a hole: the cell is cleared and remembered as a required passage.
    pub fn add_hole(&mut self, loc: Location) {
        if let Some(loc) = self.normalize(loc) {
            self.set(loc, false);
            self.holes.insert(loc);
        }
    }

    pub fn remove_hole(&mut self, loc: Location) -> bool {
        self.normalize(loc)
            .map_or(false, |loc| self.holes.remove(&loc))
    }

    pub fn is_hole(&self, loc: Location) -> bool {
        self.normalize(loc)
            .map_or(false, |loc| self.holes.contains(&loc))
    }

    pub fn holes(&self) -> &BTreeSet<Location> {
        &self.holes
    }

    /// Keeps only the holes for which `keep` returns true.
    pub fn retain_holes<F: FnMut(&Location) -> bool>(&mut self, keep: F) {
        self.holes.retain(keep);
    }

    /// Every hole orthogonally adjacent to the region from the outside.
    pub fn holes_around(&self, region: &Region) -> Vec<HoleAccess> {
        let mut accesses = Vec::new();
        for inner in region.perimeter() {
            for outward in [
                Location::new(-1, 0),
                Location::new(1, 0),
                Location::new(0, -1),
                Location::new(0, 1),
            ] {
                let neighbor = inner + outward;
                if region.contains(neighbor) {
                    continue;
                }
                let Some(hole) = self.normalize(neighbor) else {
                    continue;
                };
                if self.holes.contains(&hole) && !region.contains(hole) {
                    accesses.push(HoleAccess {
                        hole,
                        inner,
                        inward: -outward,
                    });
                }
            }
        }
        accesses
    }

    /// Count of wall cells inside a region.
    pub fn walls_in(&self, region: &Region) -> usize {
        region.cells().filter(|loc| self.is_wall(*loc)).count()
    }

    /// The grid as `occupancy[x][y]`, `true` = wall.
    pub fn occupancy(&self) -> Vec<Vec<bool>> {
        (0..self.width)
            .map(|x| {
                (0..self.height)
                    .map(|y| self.cells[self.index(Location::new(x, y))])
                    .collect()
            })
            .collect()
    }

    /// All open cells, row by row.
    pub fn open_cells(&self) -> Vec<Location> {
        self.bounds().cells().filter(|loc| self.is_open(*loc)).collect()
    }

    /// Open neighbours of a cell, following wrapped edges.
    pub fn open_neighbors(&self, loc: Location) -> Vec<Location> {
        loc.neighbors4()
            .into_iter()
            .filter_map(|n| self.normalize(n))
            .filter(|n| self.is_open(*n))
            .collect()
    }

    /// Checks that every open cell can reach every other open cell.
    pub fn is_connected(&self) -> bool {
        let open = self.open_cells();
        let Some(&start) = open.first() else {
            return true;
        };
        let reached = bfs_reach(start, |loc| self.open_neighbors(*loc)).count();
        reached == open.len()
    }

    /// Returns the grid mirrored top-to-bottom, holes included.
    pub fn flipped_y(&self) -> LevelGrid {
        let mut flipped = self.clone();
        for loc in self.bounds().cells() {
            let mirrored = Location::new(loc.x, self.height - 1 - loc.y);
            let index = flipped.index(mirrored);
            flipped.cells[index] = self.cells[self.index(loc)];
        }
        flipped.holes = self
            .holes
            .iter()
            .map(|hole| Location::new(hole.x, self.height - 1 - hole.y))
            .collect();
        flipped
    }

    /// Debug view: `#` wall, `.` open, `o` hole when requested.
    pub fn render_ascii(&self, show_holes: bool) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let loc = Location::new(x, y);
                let glyph = if show_holes && self.holes.contains(&loc) {
                    'o'
                } else if self.is_wall(loc) {
                    '#'
                } else {
                    '.'
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// Cells of a 4-connected line from `from` to `to`, both ends included.
pub fn line_cells(from: Location, to: Location) -> Vec<Location> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step_x = if from.x < to.x { 1 } else { -1 };
    let step_y = if from.y < to.y { 1 } else { -1 };

    let mut cells = vec![from];
    let mut current = from;
    let mut error = dx + dy;
    while current != to {
        // Take one axis step at a time so consecutive cells always share an edge.
        if 2 * error - dy > dx - 2 * error {
            error += dy;
            current.x += step_x;
        } else {
            error += dx;
            current.y += step_y;
        }
        cells.push(current);
    }
    cells
}

/// Cells whose centers lie at a distance in `[inner_radius, outer_radius)` of `center`.
pub fn circle_cells(center: Location, outer_radius: f64, inner_radius: f64) -> Vec<Location> {
    let reach = outer_radius.ceil() as i32;
    let mut cells = Vec::new();
    for y in -reach..=reach {
        for x in -reach..=reach {
            let distance = ((x * x + y * y) as f64).sqrt();
            if distance >= inner_radius && distance < outer_radius {
                cells.push(center + Location::new(x, y));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_wrapping_reads_and_writes() {
        let mut grid = LevelGrid::new(5, 4, true, false);
        assert!(grid.set(Location::new(-1, 2), true));
        assert!(grid.is_wall(Location::new(4, 2)));
        assert!(grid.is_wall(Location::new(9, 2)));

        assert!(!grid.set(Location::new(2, 4), true));
        assert!(grid.is_wall(Location::new(2, 4)));
        grid.set_outside(false);
        assert!(!grid.is_wall(Location::new(2, -3)));
    }

    #[test]
    fn test_grid_fill_primitives() {
        let mut grid = LevelGrid::new(6, 6, false, false);
        grid.fill_perimeter(&grid.bounds(), true);
        assert_eq!(grid.walls_in(&grid.bounds()), 20);

        grid.fill_region(&Region::new(2, 2, 1, 1), true);
        assert_eq!(grid.walls_in(&grid.bounds()), 24);

        grid.fill_all(false);
        assert_eq!(grid.open_cells().len(), 36);
    }

    #[test]
    fn test_line_cells_are_edge_connected() {
        let cells = line_cells(Location::new(0, 0), Location::new(4, 3));
        assert_eq!(cells.first(), Some(&Location::new(0, 0)));
        assert_eq!(cells.last(), Some(&Location::new(4, 3)));
        for pair in cells.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn test_circle_ring_excludes_center() {
        let ring = circle_cells(Location::new(5, 5), 2.5, 1.5);
        assert!(!ring.contains(&Location::new(5, 5)));
        assert!(ring.contains(&Location::new(7, 5)));
        assert!(!ring.contains(&Location::new(6, 5)));

        let disc = circle_cells(Location::new(0, 0), 1.5, 0.0);
        assert_eq!(disc.len(), 9);
    }

    #[test]
    fn test_holes_clear_cells_and_are_found_from_regions() {
        let mut grid = LevelGrid::new(9, 5, false, false);
        grid.fill_region(&Region::new(4, 0, 0, 4), true);
        grid.add_hole(Location::new(4, 2));
        assert!(grid.is_open(Location::new(4, 2)));
        assert!(grid.is_hole(Location::new(4, 2)));

        let left = Region::new(0, 0, 3, 4);
        let accesses = grid.holes_around(&left);
        assert_eq!(
            accesses,
            vec![HoleAccess {
                hole: Location::new(4, 2),
                inner: Location::new(3, 2),
                inward: Location::new(-1, 0),
            }]
        );
        assert!(grid.holes_around(&Region::new(0, 0, 1, 4)).is_empty());

        assert!(grid.remove_hole(Location::new(4, 2)));
        assert!(!grid.is_hole(Location::new(4, 2)));
    }

    #[test]
    fn test_holes_around_follows_wrapping() {
        let mut grid = LevelGrid::new(10, 3, true, false);
        grid.add_hole(Location::new(9, 1));
        let accesses = grid.holes_around(&Region::new(0, 0, 3, 2));
        assert_eq!(accesses.len(), 1);
        assert_eq!(accesses[0].inner, Location::new(0, 1));
        assert_eq!(accesses[0].inward, Location::new(1, 0));
    }

    #[test]
    fn test_connectivity() {
        let mut grid = LevelGrid::new(7, 3, false, false);
        assert!(grid.is_connected());
        grid.fill_region(&Region::new(3, 0, 0, 2), true);
        assert!(!grid.is_connected());
        grid.add_hole(Location::new(3, 1));
        assert!(grid.is_connected());
    }

    #[test]
    fn test_connectivity_across_wrapped_edge() {
        let mut grid = LevelGrid::new(7, 3, true, false);
        grid.fill_region(&Region::new(3, 0, 0, 2), true);
        assert!(grid.is_connected());
    }

    #[test]
    fn test_occupancy_and_flip() {
        let mut grid = LevelGrid::new(3, 4, false, false);
        grid.set(Location::new(2, 0), true);
        grid.add_hole(Location::new(1, 1));

        let occupancy = grid.occupancy();
        assert_eq!(occupancy.len(), 3);
        assert_eq!(occupancy[0].len(), 4);
        assert!(occupancy[2][0]);

        let flipped = grid.flipped_y();
        assert!(flipped.is_wall(Location::new(2, 3)));
        assert!(!flipped.is_wall(Location::new(2, 0)));
        assert!(flipped.is_hole(Location::new(1, 2)));
        assert_eq!(flipped.flipped_y(), grid);
    }

    #[test]
    fn test_render_ascii() {
        let mut grid = LevelGrid::new(3, 2, false, false);
        grid.set(Location::new(0, 0), true);
        grid.add_hole(Location::new(2, 1));
        assert_eq!(grid.render_ascii(true), "#..\n..o\n");
        assert_eq!(grid.render_ascii(false), "#..\n...\n");
    }
}

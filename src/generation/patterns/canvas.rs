//! # Region Canvas
//!
//! A pattern's window onto the level grid. Writes outside the region are discarded,
//! so a pattern can draw shapes that overhang its bounds without touching neighbours.

use crate::generation::grid::{circle_cells, line_cells};
use crate::{LevelGrid, Location, Region};
use pathfinding::prelude::bfs_reach;
use std::collections::{BTreeSet, HashSet};

pub struct RegionCanvas<'a> {
    grid: &'a mut LevelGrid,
    region: Region,
    /// Cells this canvas has turned into walls
    written: BTreeSet<Location>,
}

impl<'a> RegionCanvas<'a> {
    pub fn new(grid: &'a mut LevelGrid, region: Region) -> Self {
        Self {
            grid,
            region,
            written: BTreeSet::new(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn grid(&self) -> &LevelGrid {
        self.grid
    }

    pub fn is_wall(&self, loc: Location) -> bool {
        self.grid.is_wall(loc)
    }

    pub fn is_open(&self, loc: Location) -> bool {
        self.grid.is_open(loc)
    }

    pub fn set(&mut self, loc: Location, wall: bool) {
        if !self.region.contains(loc) {
            return;
        }
        if self.grid.set(loc, wall) && wall {
            self.written.insert(loc);
        }
    }

    pub fn wall(&mut self, loc: Location) {
        self.set(loc, true);
    }

    pub fn clear(&mut self, loc: Location) {
        self.set(loc, false);
    }

    pub fn fill(&mut self, area: &Region, wall: bool) {
        if let Some(clipped) = self.region.intersection(area) {
            for loc in clipped.cells() {
                self.set(loc, wall);
            }
        }
    }

    pub fn fill_perimeter(&mut self, area: &Region, wall: bool) {
        for loc in area.perimeter() {
            self.set(loc, wall);
        }
    }

    pub fn line(&mut self, from: Location, to: Location, wall: bool) {
        for loc in line_cells(from, to) {
            self.set(loc, wall);
        }
    }

    pub fn circle(&mut self, center: Location, outer_radius: f64, inner_radius: f64, wall: bool) {
        for loc in circle_cells(center, outer_radius, inner_radius) {
            self.set(loc, wall);
        }
    }

    /// Number of cells this canvas walled that are still walls.
    pub fn walls_placed(&self) -> usize {
        self.written
            .iter()
            .filter(|loc| self.grid.is_wall(**loc))
            .count()
    }

    /// Walls in every open cell of the region that `anchor` cannot reach without
    /// leaving the region. Does nothing if `anchor` is a wall.
    pub fn seal_pockets(&mut self, anchor: Location) {
        if !self.region.contains(anchor) || self.is_wall(anchor) {
            return;
        }
        let pockets: Vec<Location> = {
            let region = self.region;
            let grid = &*self.grid;
            let reached: HashSet<Location> = bfs_reach(anchor, |loc| {
                loc.neighbors4()
                    .into_iter()
                    .filter(|n| region.contains(*n) && grid.is_open(*n))
                    .collect::<Vec<_>>()
            })
            .collect();
            region
                .cells()
                .filter(|loc| grid.is_open(*loc) && !reached.contains(loc))
                .collect()
        };
        for loc in pockets {
            self.wall(loc);
        }
    }

    /// Carves from every adjacent hole straight into the region until the carved cell
    /// meets open space, or the tunnel runs out of the far side.
    ///
    /// Returns the number of cells turned from wall to open.
    pub fn tunnel_to_holes(&mut self) -> usize {
        let mut carved = 0;
        for access in self.grid.holes_around(&self.region) {
            let mut behind = access.hole;
            let mut current = access.inner;
            while self.region.contains(current) {
                if self.grid.is_wall(current) {
                    self.grid.set(current, false);
                    carved += 1;
                }
                let reached_open = current.neighbors4().into_iter().any(|n| {
                    n != behind && self.region.contains(n) && self.grid.is_open(n)
                });
                if reached_open {
                    break;
                }
                behind = current;
                current = current + access.inward;
            }
        }
        carved
    }
}

//! # Recursive Division
//!
//! Maze-style base layout. The interior starts as one region; regions are popped off a
//! stack and either kept as final regions or split in two by a full-length wall with
//! one or more single-cell holes in it.
//!
//! Every split keeps both halves connected through its holes, so the final set of
//! regions forms a connected tree and the level stays connected as long as every
//! pattern tunnels to the holes around its region.

use crate::{ArenaError, ArenaResult, LevelGrid, Location, Region};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a split line is chosen among the valid ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitStrategy {
    /// Any valid line, uniformly
    Uniform,
    /// The valid line closest to the middle of the region
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecursiveDivisionParams {
    /// Smallest extent, in cells, either half of a split may have
    pub min_split_size: i32,
    /// Regions at or below this area may stop splitting early
    pub ignore_area: i32,
    /// Chance that a region of exactly `ignore_area` cells stops splitting
    pub ignore_chance: f64,
    pub split_strategy: SplitStrategy,
    /// One hole per this many cells of dividing wall
    pub hole_spacing: i32,
}

impl Default for RecursiveDivisionParams {
    fn default() -> Self {
        Self {
            min_split_size: 3,
            ignore_area: 80,
            ignore_chance: 0.35,
            split_strategy: SplitStrategy::Uniform,
            hole_spacing: 8,
        }
    }
}

impl RecursiveDivisionParams {
    pub fn validate(&self) -> ArenaResult<()> {
        if self.min_split_size < 1 {
            return Err(ArenaError::Config(format!(
                "min_split_size must be at least 1, got {}",
                self.min_split_size
            )));
        }
        if !(0.0..=1.0).contains(&self.ignore_chance) {
            return Err(ArenaError::Config(format!(
                "ignore_chance must be in [0, 1], got {}",
                self.ignore_chance
            )));
        }
        if self.hole_spacing < 1 {
            return Err(ArenaError::Config(format!(
                "hole_spacing must be at least 1, got {}",
                self.hole_spacing
            )));
        }
        Ok(())
    }

    /// Whether a region is long enough along an axis of `extent` cells to split.
    fn can_split(&self, extent: i32) -> bool {
        extent >= 2 * self.min_split_size + 1
    }

    /// Probability that a region is kept whole instead of split.
    ///
    /// Regions too small to split along either axis are always kept; otherwise the
    /// chance grows as the area shrinks below `ignore_area`.
    pub fn ignore_region_chance(&self, region: &Region) -> f64 {
        if !self.can_split(region.columns()) && !self.can_split(region.rows()) {
            return 1.0;
        }
        let ratio = self.ignore_area as f64 / region.area() as f64;
        (self.ignore_chance * ratio.min(1.0)).clamp(0.0, 1.0)
    }

    /// Whether to divide with a horizontal wall (splitting rows) rather than a vertical one.
    pub fn should_split_horizontally(&self, columns: i32, rows: i32, rng: &mut StdRng) -> bool {
        match (self.can_split(columns), self.can_split(rows)) {
            (false, _) => true,
            (_, false) => false,
            _ if rows > columns => true,
            _ if columns > rows => false,
            _ => rng.gen_bool(0.5),
        }
    }

    /// Number of holes to punch in a dividing wall of `length` cells.
    pub fn holes_in_line(&self, length: i32) -> i32 {
        ((length + self.hole_spacing - 1) / self.hole_spacing).max(1)
    }

    /// Picks one of the candidate split coordinates, which must be sorted.
    pub fn split_location(&self, candidates: &[i32], rng: &mut StdRng) -> Option<i32> {
        match self.split_strategy {
            SplitStrategy::Uniform => candidates.choose(rng).copied(),
            SplitStrategy::Middle => {
                let (first, last) = (*candidates.first()?, *candidates.last()?);
                let middle = (first + last) / 2;
                candidates
                    .iter()
                    .copied()
                    .min_by_key(|value| (value - middle).abs())
            }
        }
    }
}

/// Stack-driven state of one recursive-division run.
#[derive(Debug, Clone)]
pub struct RecursiveDivision {
    params: RecursiveDivisionParams,
    stack: Vec<Region>,
}

impl RecursiveDivision {
    pub fn new(params: RecursiveDivisionParams) -> Self {
        Self {
            params,
            stack: Vec::new(),
        }
    }

    pub fn params(&self) -> &RecursiveDivisionParams {
        &self.params
    }

    /// Walls the border on non-wrapping axes and seeds the stack with the interior.
    pub fn initialize(&mut self, grid: &mut LevelGrid) -> ArenaResult<()> {
        self.stack.clear();
        let bounds = grid.bounds();
        let border_x = if grid.wrap_x() { 0 } else { 1 };
        let border_y = if grid.wrap_y() { 0 } else { 1 };

        if !grid.wrap_x() {
            grid.fill_region(&bounds.left_edge(), true);
            grid.fill_region(&bounds.right_edge(), true);
        }
        if !grid.wrap_y() {
            grid.fill_region(&bounds.top_edge(), true);
            grid.fill_region(&bounds.bottom_edge(), true);
        }

        let interior = bounds.inflate(-border_x, -border_y);
        if !interior.is_valid() {
            return Err(ArenaError::GenerationFailed(format!(
                "{}x{} grid has no interior",
                grid.width(),
                grid.height()
            )));
        }
        log::debug!("Recursive division starting from {:?}", interior);
        self.stack.push(interior);
        Ok(())
    }

    /// Processes one region from the stack. Returns whether work remains.
    pub fn iterate(
        &mut self,
        grid: &mut LevelGrid,
        regions: &mut Vec<Region>,
        rng: &mut StdRng,
    ) -> bool {
        let Some(region) = self.stack.pop() else {
            return false;
        };

        if rng.gen_bool(self.params.ignore_region_chance(&region)) {
            log::trace!("Keeping {:?} whole", region);
            regions.push(region);
            return !self.stack.is_empty();
        }

        match self.split(&region, grid, rng) {
            Some((first, second)) => {
                let bounds = grid.bounds();
                for half in [first, second] {
                    if half.is_valid() && bounds.contains_region(&half) {
                        self.stack.push(half);
                    } else {
                        log::warn!("Dropping out-of-bounds half {:?}", half);
                    }
                }
            }
            None => regions.push(region),
        }
        !self.stack.is_empty()
    }

    /// Divides a region with a holed wall, or returns `None` if no valid split exists.
    fn split(
        &self,
        region: &Region,
        grid: &mut LevelGrid,
        rng: &mut StdRng,
    ) -> Option<(Region, Region)> {
        let horizontal = self
            .params
            .should_split_horizontally(region.columns(), region.rows(), rng);
        let min = self.params.min_split_size;

        // A wall whose end faces a hole would seal that hole off.
        let candidates: Vec<i32> = if horizontal {
            (region.top() + min..=region.bottom() - min)
                .filter(|&y| {
                    !grid.is_hole(Location::new(region.left() - 1, y))
                        && !grid.is_hole(Location::new(region.right() + 1, y))
                })
                .collect()
        } else {
            (region.left() + min..=region.right() - min)
                .filter(|&x| {
                    !grid.is_hole(Location::new(x, region.top() - 1))
                        && !grid.is_hole(Location::new(x, region.bottom() + 1))
                })
                .collect()
        };
        let at = self.params.split_location(&candidates, rng)?;

        let wall = if horizontal {
            Region::new(region.left(), at, region.width, 0)
        } else {
            Region::new(at, region.top(), 0, region.height)
        };
        let length = wall.area();
        let hole_count = self.params.holes_in_line(length);
        if hole_count >= length {
            log::trace!("Abandoning split of {:?}: wall too short for its holes", region);
            return None;
        }

        grid.fill_region(&wall, true);
        let cells: Vec<Location> = wall.cells().collect();
        for hole in cells.choose_multiple(rng, hole_count as usize) {
            grid.add_hole(*hole);
        }
        log::trace!(
            "Split {:?} {} at {} with {} holes",
            region,
            if horizontal { "horizontally" } else { "vertically" },
            at,
            hole_count
        );

        Some(if horizontal {
            (
                Region::from_corners(region.top_left(), Location::new(region.right(), at - 1)),
                Region::from_corners(Location::new(region.left(), at + 1), region.bottom_right()),
            )
        } else {
            (
                Region::from_corners(region.top_left(), Location::new(at - 1, region.bottom())),
                Region::from_corners(Location::new(at + 1, region.top()), region.bottom_right()),
            )
        })
    }

    /// Drops holes that ended up inside a region or no longer join two regions.
    ///
    /// A dropped hole outside every region is walled back up.
    pub fn prune_holes(grid: &mut LevelGrid, regions: &[Region]) {
        let region_of = |loc: Location| regions.iter().position(|region| region.contains(loc));
        let keep: HashSet<Location> = grid
            .holes()
            .iter()
            .copied()
            .filter(|&hole| {
                if region_of(hole).is_some() {
                    return false;
                }
                let touching: HashSet<usize> = hole
                    .neighbors4()
                    .into_iter()
                    .filter_map(|n| grid.normalize(n))
                    .filter_map(region_of)
                    .collect();
                touching.len() >= 2
            })
            .collect();

        let pruned: Vec<Location> = grid
            .holes()
            .iter()
            .copied()
            .filter(|hole| !keep.contains(hole))
            .collect();
        if pruned.is_empty() {
            return;
        }
        grid.retain_holes(|hole| keep.contains(hole));
        for hole in &pruned {
            if region_of(*hole).is_none() {
                grid.set(*hole, true);
            }
        }
        log::debug!("Pruned {} stray holes", pruned.len());
    }
}

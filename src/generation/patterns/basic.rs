//! Simple patterns: open space, corridors, posts and a single central block.

use super::{FillKind, FilledRegion, RegionCanvas, SpawnCategory, Suitability};
use crate::{Location, Region};
use serde::{Deserialize, Serialize};

/// Leaves the region open. The universal fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankRegion {
    /// Regions smaller than this are very suitable to leave blank
    pub min_area: i32,
}

impl Default for BlankRegion {
    fn default() -> Self {
        Self { min_area: 6 }
    }
}

impl BlankRegion {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.area() < self.min_area {
            Suitability::Very
        } else {
            Suitability::Little
        }
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::Blank);
        filled.add_spawn_cell(SpawnCategory::TeamBase, region.center());
        filled.add_spawn(SpawnCategory::Enemy, region);
        filled.add_spawn(SpawnCategory::Powerup, region);
        filled.add_spawn(SpawnCategory::Waypoint, region);
        filled
    }
}

/// A corridor. Thin regions stay open along their centerline; one row thicker than
/// `max_thickness` gets a dividing wall down the middle with open ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePattern {
    pub max_thickness: i32,
    /// Open cells left at each end of the dividing wall
    pub end_gap: i32,
}

impl Default for LinePattern {
    fn default() -> Self {
        Self {
            max_thickness: 2,
            end_gap: 1,
        }
    }
}

impl LinePattern {
    pub fn suitability(&self, region: &Region) -> Suitability {
        let short = region.short_side();
        let long = region.long_side();
        if short <= self.max_thickness && long >= 3 {
            Suitability::Very
        } else if short == self.max_thickness + 1 && long >= 2 * self.end_gap.max(1) + 3 {
            Suitability::Moderate
        } else {
            Suitability::Not
        }
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::Line);
        let horizontal = region.columns() >= region.rows();
        let center = region.center();
        let centerline = if horizontal {
            Region::new(region.left(), center.y, region.width, 0)
        } else {
            Region::new(center.x, region.top(), 0, region.height)
        };

        if region.short_side() <= self.max_thickness {
            filled.add_spawn(SpawnCategory::Waypoint, centerline);
            filled.add_spawn(SpawnCategory::Enemy, centerline);
            filled.add_spawn_cell(SpawnCategory::Powerup, centerline.top_left());
            filled.add_spawn_cell(SpawnCategory::Powerup, centerline.bottom_right());
            return filled;
        }

        let gap = self.end_gap.max(1);
        let divider = if horizontal {
            let y = region.top() + region.rows() / 2;
            Region::from_corners(
                Location::new(region.left() + gap, y),
                Location::new(region.right() - gap, y),
            )
        } else {
            let x = region.left() + region.columns() / 2;
            Region::from_corners(
                Location::new(x, region.top() + gap),
                Location::new(x, region.bottom() - gap),
            )
        };
        canvas.fill(&divider, true);

        let (first_lane, second_lane) = if horizontal {
            (region.top_edge(), region.bottom_edge())
        } else {
            (region.left_edge(), region.right_edge())
        };
        for lane in [first_lane, second_lane] {
            filled.add_spawn(SpawnCategory::Waypoint, lane);
            filled.add_spawn(SpawnCategory::Enemy, lane);
        }
        let (start, end) = if horizontal {
            (
                Location::new(region.left(), divider.top()),
                Location::new(region.right(), divider.top()),
            )
        } else {
            (
                Location::new(divider.left(), region.top()),
                Location::new(divider.left(), region.bottom()),
            )
        };
        filled.add_spawn_cell(SpawnCategory::Powerup, start);
        filled.add_spawn_cell(SpawnCategory::Powerup, end);
        filled.add_spawn(SpawnCategory::SpecialWall, divider);
        filled
    }
}

/// A lattice of single-cell posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pillars {
    pub spacing: i32,
}

impl Default for Pillars {
    fn default() -> Self {
        Self { spacing: 2 }
    }
}

impl Pillars {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.short_side() < 5 {
            Suitability::Not
        } else if region.area() >= 25 {
            Suitability::Moderate
        } else {
            Suitability::Little
        }
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::Pillars);
        let step = self.spacing.max(2) as usize;

        for y in (region.top() + 1..region.bottom()).step_by(step) {
            for x in (region.left() + 1..region.right()).step_by(step) {
                canvas.wall(Location::new(x, y));
            }
        }

        filled.add_spawn_cell(
            SpawnCategory::TeamBase,
            Location::new(region.center().x, region.bottom()),
        );
        filled.add_spawn(SpawnCategory::Powerup, region.top_edge());
        filled.add_spawn(SpawnCategory::Powerup, region.bottom_edge());
        filled.add_spawn(SpawnCategory::Enemy, region.left_edge());
        filled.add_spawn(SpawnCategory::Enemy, region.right_edge());
        for corner in region.corners() {
            filled.add_spawn_cell(SpawnCategory::Waypoint, corner);
        }
        filled
    }
}

/// One solid block inset from the region's edges by `margin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterBlock {
    pub margin: i32,
}

impl Default for CenterBlock {
    fn default() -> Self {
        Self { margin: 1 }
    }
}

impl CenterBlock {
    pub fn suitability(&self, region: &Region) -> Suitability {
        let margin = self.margin.max(1);
        let smallest = region.columns().min(region.rows());
        if smallest < 2 * margin + 2 {
            Suitability::Not
        } else if smallest >= 2 * margin + 3 {
            Suitability::Moderate
        } else {
            Suitability::Little
        }
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::CenterBlock);
        let margin = self.margin.max(1);
        let block = region.inflate(-margin, -margin);
        canvas.fill(&block, true);

        let ledge = Region::new(block.left(), block.top() - 1, block.width, 0);
        filled.add_spawn(SpawnCategory::TeamBase, ledge);
        filled.add_spawn(SpawnCategory::Powerup, ledge);
        filled.add_spawn(SpawnCategory::Enemy, region.bottom_edge());
        for corner in region.corners() {
            filled.add_spawn_cell(SpawnCategory::Waypoint, corner);
        }
        filled.add_spawn(SpawnCategory::SpecialWall, block);
        filled.add_spawn(SpawnCategory::TeamSpecialWall, block);
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::walled_grid;
    use super::*;

    #[test]
    fn test_blank_prefers_small_regions() {
        let blank = BlankRegion::default();
        assert_eq!(blank.suitability(&Region::new(0, 0, 1, 1)), Suitability::Very);
        assert_eq!(blank.suitability(&Region::new(0, 0, 9, 9)), Suitability::Little);
    }

    #[test]
    fn test_line_suitability() {
        let line = LinePattern::default();
        assert_eq!(line.suitability(&Region::with_cells(Location::origin(), 10, 1)), Suitability::Very);
        assert_eq!(line.suitability(&Region::with_cells(Location::origin(), 2, 8)), Suitability::Very);
        assert_eq!(line.suitability(&Region::with_cells(Location::origin(), 9, 3)), Suitability::Moderate);
        assert_eq!(line.suitability(&Region::with_cells(Location::origin(), 4, 3)), Suitability::Not);
        assert_eq!(line.suitability(&Region::with_cells(Location::origin(), 9, 9)), Suitability::Not);
    }

    #[test]
    fn test_thin_line_places_no_walls() {
        let (mut grid, _) = walled_grid(12, 4);
        let region = Region::with_cells(Location::new(1, 1), 10, 2);
        let filled = LinePattern::default().apply(&mut RegionCanvas::new(&mut grid, region));
        assert_eq!(grid.walls_in(&region), 0);
        assert_eq!(filled.spawns(SpawnCategory::Powerup).len(), 2);
    }

    #[test]
    fn test_three_thick_line_divider() {
        let (mut grid, _) = walled_grid(11, 5);
        let region = Region::with_cells(Location::new(1, 1), 9, 3);
        LinePattern::default().apply(&mut RegionCanvas::new(&mut grid, region));
        assert!(grid.is_open(Location::new(1, 2)));
        assert!(grid.is_wall(Location::new(2, 2)));
        assert!(grid.is_wall(Location::new(8, 2)));
        assert!(grid.is_open(Location::new(9, 2)));
        assert_eq!(grid.walls_in(&region), 7);
    }

    #[test]
    fn test_pillars_lattice() {
        let (mut grid, _) = walled_grid(9, 9);
        let region = Region::with_cells(Location::new(1, 1), 7, 7);
        Pillars::default().apply(&mut RegionCanvas::new(&mut grid, region));
        assert!(grid.is_wall(Location::new(2, 2)));
        assert!(grid.is_open(Location::new(3, 2)));
        assert!(grid.is_wall(Location::new(6, 6)));
        assert_eq!(grid.walls_in(&region), 9);
    }

    #[test]
    fn test_center_block() {
        let (mut grid, _) = walled_grid(9, 8);
        let region = Region::with_cells(Location::new(1, 1), 7, 6);
        let filled = CenterBlock::default().apply(&mut RegionCanvas::new(&mut grid, region));
        assert_eq!(grid.walls_in(&region), 5 * 4);
        assert_eq!(
            filled.spawns(SpawnCategory::TeamBase),
            &[Region::new(2, 1, 4, 0)]
        );
    }
}

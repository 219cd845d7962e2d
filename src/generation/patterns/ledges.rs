//! Side-view patterns built from one-cell-thick horizontal ledges.
//!
//! Row indices grow downward, so "above a ledge" is `y - 1` and the floor of a
//! region is its bottom row.

use super::{FillKind, FilledRegion, RegionCanvas, SpawnCategory, Suitability};
use crate::{Location, Region};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ledges hanging alternately off the left and right walls of a tall shaft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlternatingSteps {
    /// Rows from one ledge to the next
    pub step_spacing: i32,
    /// Ledge length as a fraction of the region width
    pub ledge_ratio: f64,
}

impl Default for AlternatingSteps {
    fn default() -> Self {
        Self {
            step_spacing: 3,
            ledge_ratio: 0.5,
        }
    }
}

impl AlternatingSteps {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.columns() < 4 || region.rows() < 2 * self.step_spacing.max(2) + 1 {
            return Suitability::Not;
        }
        Suitability::interpolate(
            region.rows() as f64 / region.columns() as f64,
            1.0,
            3.0,
        )
    }

    pub fn apply(&self, canvas: &mut RegionCanvas, rng: &mut StdRng) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::AlternatingSteps);
        let spacing = self.step_spacing.max(2);
        let columns = region.columns();
        let length = ((columns as f64 * self.ledge_ratio).round() as i32)
            .min(columns - 2)
            .max(1);

        let mut from_left = rng.gen_bool(0.5);
        let mut y = region.bottom() - spacing;
        while y > region.top() {
            let ledge = if from_left {
                Region::new(region.left(), y, length - 1, 0)
            } else {
                Region::new(region.right() - length + 1, y, length - 1, 0)
            };
            canvas.fill(&ledge, true);

            let standing = ledge.translate(Location::new(0, -1));
            filled.add_spawn(SpawnCategory::Enemy, standing);
            filled.add_spawn_cell(SpawnCategory::Powerup, standing.center());
            filled.add_spawn_cell(SpawnCategory::Waypoint, standing.center());
            filled.add_spawn(SpawnCategory::SpecialWall, ledge);

            from_left = !from_left;
            y -= spacing;
        }

        let floor = region.bottom_edge();
        filled.add_spawn_cell(SpawnCategory::TeamBase, floor.center());
        filled.add_spawn(SpawnCategory::Enemy, floor);
        filled.add_spawn_cell(SpawnCategory::Waypoint, floor.center());
        filled
    }
}

/// Full-width platforms every `spacing` rows, each broken by random drop-through gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platforms {
    pub spacing: i32,
    /// Per-cell chance of a gap; every platform gets at least one
    pub hole_chance: f64,
}

impl Default for Platforms {
    fn default() -> Self {
        Self {
            spacing: 3,
            hole_chance: 0.25,
        }
    }
}

impl Platforms {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.columns() < 5 || region.rows() < 2 * self.spacing.max(2) {
            Suitability::Not
        } else if region.columns() >= region.rows() {
            Suitability::Very
        } else {
            Suitability::Moderate
        }
    }

    pub fn apply(&self, canvas: &mut RegionCanvas, rng: &mut StdRng) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::Platforms);
        let spacing = self.spacing.max(2);
        let chance = self.hole_chance.clamp(0.0, 1.0);

        let mut y = region.top() + spacing;
        while y <= region.bottom() - (spacing - 1) {
            let mut gaps: Vec<bool> = (0..region.columns()).map(|_| rng.gen_bool(chance)).collect();
            if !gaps.contains(&true) {
                let forced = rng.gen_range(0..gaps.len());
                gaps[forced] = true;
            }

            let mut run_start = None;
            for (offset, gap) in gaps.iter().enumerate() {
                let x = region.left() + offset as i32;
                if *gap {
                    if let Some(start) = run_start.take() {
                        add_segment(&mut filled, start, x - 1, y);
                    }
                } else {
                    canvas.wall(Location::new(x, y));
                    run_start.get_or_insert(x);
                }
            }
            if let Some(start) = run_start {
                add_segment(&mut filled, start, region.right(), y);
            }
            y += spacing;
        }

        let floor = region.bottom_edge();
        filled.add_spawn(SpawnCategory::TeamBase, floor);
        filled.add_spawn(SpawnCategory::Enemy, floor);
        filled.add_spawn(SpawnCategory::Waypoint, floor);
        filled
    }
}

/// Registers the standing row above platform cells `start..=end` on row `y`.
fn add_segment(filled: &mut FilledRegion, start: i32, end: i32, y: i32) {
    let platform = Region::from_corners(Location::new(start, y), Location::new(end, y));
    let standing = platform.translate(Location::new(0, -1));
    filled.add_spawn(SpawnCategory::TeamBase, standing);
    filled.add_spawn(SpawnCategory::Powerup, standing);
    filled.add_spawn(SpawnCategory::Waypoint, standing);
    filled.add_spawn(SpawnCategory::SpecialWall, platform);
}

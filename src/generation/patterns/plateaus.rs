//! Side-view patterns that lay blocks ("plateaus") along the width of a hallway.

use super::{FillKind, FilledRegion, RegionCanvas, SpawnCategory, Suitability};
use crate::{Location, Region};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How plateaus are laid out along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum PlateauGenerationProperties {
    /// Exactly `count` plateaus; their width absorbs the remaining space.
    FixedCount { count: i32, spacing: i32 },
    /// As many `width`-wide plateaus as fit.
    FixedWidth { width: i32, spacing: i32 },
}

impl PlateauGenerationProperties {
    /// `(offset, width)` of each plateau along an axis of `length` cells.
    ///
    /// Every plateau keeps at least `spacing` open cells on both sides; leftover
    /// space is split evenly between the two ends. Returns `None` when not even one
    /// plateau fits.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::PlateauGenerationProperties;
    ///
    /// let layout = PlateauGenerationProperties::FixedCount { count: 3, spacing: 2 };
    /// assert_eq!(layout.spans(20), Some(vec![(2, 4), (8, 4), (14, 4)]));
    /// ```
    pub fn spans(&self, length: i32) -> Option<Vec<(i32, i32)>> {
        let (count, width, spacing) = match *self {
            PlateauGenerationProperties::FixedCount { count, spacing } => {
                if count < 1 {
                    return None;
                }
                let spacing = spacing.max(1);
                (count, (length - spacing * (count + 1)) / count, spacing)
            }
            PlateauGenerationProperties::FixedWidth { width, spacing } => {
                let spacing = spacing.max(1);
                if width < 1 {
                    return None;
                }
                ((length - spacing) / (width + spacing), width, spacing)
            }
        };
        if count < 1 || width < 1 {
            return None;
        }
        let used = count * width + (count + 1) * spacing;
        let first = spacing + (length - used) / 2;
        Some(
            (0..count)
                .map(|i| (first + i * (width + spacing), width))
                .collect(),
        )
    }
}

/// Open floor stretches of `row` not covered by the given plateau spans.
fn floor_gaps(region: &Region, spans: &[(i32, i32)], row: i32) -> Vec<Region> {
    let mut gaps = Vec::new();
    let mut cursor = region.left();
    for &(offset, width) in spans {
        let start = region.left() + offset;
        if start > cursor {
            gaps.push(Region::from_corners(
                Location::new(cursor, row),
                Location::new(start - 1, row),
            ));
        }
        cursor = start + width;
    }
    if cursor <= region.right() {
        gaps.push(Region::from_corners(
            Location::new(cursor, row),
            Location::new(region.right(), row),
        ));
    }
    gaps
}

fn hallway_suitability(region: &Region, spans: Option<Vec<(i32, i32)>>, best_ratio: f64) -> Suitability {
    if spans.is_none() {
        return Suitability::Not;
    }
    Suitability::interpolate(
        region.columns() as f64 / region.rows() as f64,
        1.0,
        best_ratio,
    )
}

/// Floor plateaus that climb toward the middle of the hallway and descend again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteppedHallway {
    pub plateaus: PlateauGenerationProperties,
}

impl Default for SteppedHallway {
    fn default() -> Self {
        Self {
            plateaus: PlateauGenerationProperties::FixedWidth {
                width: 2,
                spacing: 2,
            },
        }
    }
}

impl SteppedHallway {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.rows() < 3 {
            return Suitability::Not;
        }
        hallway_suitability(region, self.plateaus.spans(region.columns()), 3.0)
    }

    /// Plateau heights: one at each end, one more per step toward the middle.
    fn heights(count: usize, max_height: i32) -> Vec<i32> {
        (0..count)
            .map(|i| (i.min(count - 1 - i) as i32 + 1).min(max_height).max(1))
            .collect()
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::SteppedHallway);
        let Some(spans) = self.plateaus.spans(region.columns()) else {
            return filled;
        };
        let heights = Self::heights(spans.len(), region.rows() - 2);

        for (index, (&(offset, width), height)) in spans.iter().zip(heights).enumerate() {
            let plateau = Region::new(
                region.left() + offset,
                region.bottom() - height + 1,
                width - 1,
                height - 1,
            );
            canvas.fill(&plateau, true);
            let standing = Region::new(plateau.left(), plateau.top() - 1, plateau.width, 0);
            if index == 0 || index == spans.len() - 1 {
                filled.add_spawn(SpawnCategory::TeamBase, standing);
            }
            filled.add_spawn_cell(SpawnCategory::Powerup, standing.center());
            filled.add_spawn(SpawnCategory::Waypoint, standing);
            filled.add_spawn(SpawnCategory::SpecialWall, plateau);
        }
        for gap in floor_gaps(&region, &spans, region.bottom()) {
            filled.add_spawn(SpawnCategory::Enemy, gap);
            filled.add_spawn(SpawnCategory::Waypoint, gap);
        }
        filled
    }
}

/// Uniform tall floor blocks that must be climbed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThickHurdle {
    pub plateaus: PlateauGenerationProperties,
    /// Hurdle height as a fraction of the region height
    pub height_ratio: f64,
    /// Minimum open rows kept above every hurdle
    pub top_gap: i32,
}

impl Default for ThickHurdle {
    fn default() -> Self {
        Self {
            plateaus: PlateauGenerationProperties::FixedWidth {
                width: 3,
                spacing: 3,
            },
            height_ratio: 0.5,
            top_gap: 2,
        }
    }
}

impl ThickHurdle {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.rows() < self.top_gap.max(1) + 2 {
            return Suitability::Not;
        }
        hallway_suitability(region, self.plateaus.spans(region.columns()), 2.5)
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::ThickHurdle);
        let Some(spans) = self.plateaus.spans(region.columns()) else {
            return filled;
        };
        let height = ((region.rows() as f64 * self.height_ratio).round() as i32)
            .min(region.rows() - self.top_gap.max(1))
            .max(1);

        for &(offset, width) in &spans {
            let hurdle = Region::new(
                region.left() + offset,
                region.bottom() - height + 1,
                width - 1,
                height - 1,
            );
            canvas.fill(&hurdle, true);
            let standing = Region::new(hurdle.left(), hurdle.top() - 1, hurdle.width, 0);
            filled.add_spawn_cell(SpawnCategory::Powerup, standing.center());
            filled.add_spawn(SpawnCategory::Waypoint, standing);
            filled.add_spawn(SpawnCategory::SpecialWall, hurdle);
        }
        for gap in floor_gaps(&region, &spans, region.bottom()) {
            filled.add_spawn(SpawnCategory::TeamBase, gap);
            filled.add_spawn(SpawnCategory::Enemy, gap);
        }
        filled
    }
}

/// Teeth hanging alternately from the floor and the ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZipperPattern {
    pub plateaus: PlateauGenerationProperties,
    /// Rows left open between a tooth's tip and the opposite side
    pub gap: i32,
}

impl Default for ZipperPattern {
    fn default() -> Self {
        Self {
            plateaus: PlateauGenerationProperties::FixedWidth {
                width: 1,
                spacing: 2,
            },
            gap: 1,
        }
    }
}

impl ZipperPattern {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.rows() < self.gap.max(1) + 3 {
            return Suitability::Not;
        }
        hallway_suitability(region, self.plateaus.spans(region.columns()), 3.0)
    }

    pub fn apply(&self, canvas: &mut RegionCanvas, rng: &mut StdRng) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::Zipper);
        let Some(spans) = self.plateaus.spans(region.columns()) else {
            return filled;
        };
        let height = (region.rows() - self.gap.max(1) - 1).max(1);
        let mut from_floor = rng.gen_bool(0.5);

        for &(offset, width) in &spans {
            let x = region.left() + offset;
            let tooth = if from_floor {
                Region::new(x, region.bottom() - height + 1, width - 1, height - 1)
            } else {
                Region::new(x, region.top(), width - 1, height - 1)
            };
            canvas.fill(&tooth, true);
            if from_floor {
                let standing = Region::new(tooth.left(), tooth.top() - 1, tooth.width, 0);
                filled.add_spawn_cell(SpawnCategory::Powerup, standing.center());
                filled.add_spawn(SpawnCategory::Waypoint, standing);
            } else {
                let below = Region::new(tooth.left(), region.bottom(), tooth.width, 0);
                filled.add_spawn(SpawnCategory::Enemy, below);
            }
            filled.add_spawn(SpawnCategory::SpecialWall, tooth);
            from_floor = !from_floor;
        }
        for gap in floor_gaps(&region, &spans, region.bottom()) {
            filled.add_spawn(SpawnCategory::TeamBase, gap);
            filled.add_spawn(SpawnCategory::Waypoint, gap);
        }
        filled
    }
}

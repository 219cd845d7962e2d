//! Symmetric figures for roughly square regions.

use super::{aspect, band_start, FillKind, FilledRegion, RegionCanvas, SpawnCategory, Suitability};
use crate::{Location, Region};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A solid region with an open plus carved through its middle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarvedPlus {
    /// Width of each arm of the plus
    pub thickness: i32,
}

impl Default for CarvedPlus {
    fn default() -> Self {
        Self { thickness: 1 }
    }
}

impl CarvedPlus {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.short_side() < self.thickness.max(1) + 4 {
            return Suitability::Not;
        }
        Suitability::interpolate(aspect(region), 2.0, 1.0)
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::CarvedPlus);
        let thickness = self.thickness.max(1);
        let center = region.center();
        let x0 = band_start(center.x, thickness);
        let y0 = band_start(center.y, thickness);
        let vertical = Region::new(x0, region.top(), thickness - 1, region.height);
        let horizontal = Region::new(region.left(), y0, region.width, thickness - 1);

        canvas.fill(&region, true);
        canvas.fill(&vertical, false);
        canvas.fill(&horizontal, false);

        filled.add_spawn_cell(SpawnCategory::TeamBase, center);
        filled.add_spawn_cell(SpawnCategory::Waypoint, center);
        for end in [
            Location::new(region.left(), y0),
            Location::new(region.right(), y0),
            Location::new(x0, region.top()),
            Location::new(x0, region.bottom()),
        ] {
            filled.add_spawn_cell(SpawnCategory::Powerup, end);
        }
        filled.add_spawn(SpawnCategory::Enemy, horizontal);
        filled.add_spawn(SpawnCategory::Enemy, vertical);

        let (x1, y1) = (x0 + thickness, y0 + thickness);
        for (a, b) in [
            ((region.left(), region.top()), (x0 - 1, y0 - 1)),
            ((x1, region.top()), (region.right(), y0 - 1)),
            ((region.left(), y1), (x0 - 1, region.bottom())),
            ((x1, y1), (region.right(), region.bottom())),
        ] {
            let block = Region::from_corners(Location::new(a.0, a.1), Location::new(b.0, b.1));
            filled.add_spawn(SpawnCategory::SpecialWall, block);
        }
        filled
    }
}

/// Concentric rings around the region center, opened by four axis-aligned cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CirclePattern {
    /// Radial distance between consecutive rings
    pub ring_spacing: i32,
}

impl Default for CirclePattern {
    fn default() -> Self {
        Self { ring_spacing: 2 }
    }
}

impl CirclePattern {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.short_side() < 7 {
            return Suitability::Not;
        }
        Suitability::interpolate(aspect(region), 1.6, 1.0)
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::Circle);
        let center = region.center();
        let spacing = self.ring_spacing.max(2);
        // Keep at least one open cell between the outermost ring and the nearest edge.
        let max_radius = (region.columns() - 1).min(region.rows() - 1) / 2 - 1;

        let mut radius = spacing;
        while radius <= max_radius {
            canvas.circle(center, radius as f64 + 0.5, radius as f64 - 0.5, true);
            radius += spacing;
        }
        canvas.fill(&Region::new(region.left(), center.y, region.width, 0), false);
        canvas.fill(&Region::new(center.x, region.top(), 0, region.height), false);
        canvas.seal_pockets(center);

        filled.add_spawn_cell(SpawnCategory::TeamBase, center);
        filled.add_spawn_cell(SpawnCategory::Powerup, center);
        for end in [
            Location::new(region.left(), center.y),
            Location::new(region.right(), center.y),
            Location::new(center.x, region.top()),
            Location::new(center.x, region.bottom()),
        ] {
            filled.add_spawn_cell(SpawnCategory::Waypoint, end);
        }
        for corner in region.corners() {
            filled.add_spawn_cell(SpawnCategory::Enemy, corner);
        }
        filled
    }
}

/// Nested square shells, each with one opening on alternating opposite sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentricSquares {
    /// Inset between consecutive shells
    pub shell_spacing: i32,
}

impl Default for ConcentricSquares {
    fn default() -> Self {
        Self { shell_spacing: 2 }
    }
}

impl ConcentricSquares {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.short_side() < 7 {
            return Suitability::Not;
        }
        match (region.columns() - region.rows()).abs() {
            0 => Suitability::Very,
            1..=2 => Suitability::Moderate,
            _ if aspect(region) <= 1.5 => Suitability::Little,
            _ => Suitability::Not,
        }
    }

    pub fn apply(&self, canvas: &mut RegionCanvas, rng: &mut StdRng) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::ConcentricSquares);
        let spacing = self.shell_spacing.max(2);
        let first_side = rng.gen_range(0..4);

        let mut innermost = region;
        let mut shell_index = 0;
        loop {
            let inset = 1 + shell_index * spacing;
            let shell = region.inflate(-inset, -inset);
            if shell.width < 2 || shell.height < 2 {
                break;
            }
            canvas.fill_perimeter(&shell, true);
            let side = if shell_index % 2 == 0 {
                first_side
            } else {
                (first_side + 2) % 4
            };
            canvas.clear(opening(&shell, side, rng));
            innermost = shell.inflate(-1, -1);
            shell_index += 1;
        }

        filled.add_spawn_cell(SpawnCategory::TeamBase, innermost.center());
        filled.add_spawn(SpawnCategory::Powerup, innermost);
        filled.add_spawn_cell(SpawnCategory::Waypoint, region.center());
        for edge in [
            region.top_edge(),
            region.bottom_edge(),
            region.left_edge(),
            region.right_edge(),
        ] {
            filled.add_spawn(SpawnCategory::Enemy, edge);
        }
        filled
    }
}

/// A non-corner cell on one side of a shell: 0 top, 1 right, 2 bottom, 3 left.
fn opening(shell: &Region, side: i32, rng: &mut StdRng) -> Location {
    let x = rng.gen_range(shell.left() + 1..shell.right());
    let y = rng.gen_range(shell.top() + 1..shell.bottom());
    match side {
        0 => Location::new(x, shell.top()),
        1 => Location::new(shell.right(), y),
        2 => Location::new(x, shell.bottom()),
        _ => Location::new(shell.left(), y),
    }
}

/// Two diagonals inside a one-cell open border, crossing at an open center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XPattern {}

impl XPattern {
    pub fn suitability(&self, region: &Region) -> Suitability {
        if region.short_side() < 5 {
            return Suitability::Not;
        }
        Suitability::interpolate(aspect(region), 1.6, 1.0)
    }

    pub fn apply(&self, canvas: &mut RegionCanvas) -> FilledRegion {
        let region = canvas.region();
        let mut filled = FilledRegion::new(region, FillKind::X);
        let inner = region.inflate(-1, -1);
        let center = region.center();

        canvas.line(inner.top_left(), inner.bottom_right(), true);
        canvas.line(inner.top_right(), inner.bottom_left(), true);
        canvas.clear(center);
        for neighbor in center.neighbors4() {
            canvas.clear(neighbor);
        }
        canvas.seal_pockets(region.top_left());

        filled.add_spawn_cell(SpawnCategory::TeamBase, center);
        filled.add_spawn_cell(SpawnCategory::Powerup, center);
        for corner in region.corners() {
            filled.add_spawn_cell(SpawnCategory::Waypoint, corner);
        }
        filled.add_spawn(SpawnCategory::Enemy, region.left_edge());
        filled.add_spawn(SpawnCategory::Enemy, region.right_edge());
        filled
    }
}

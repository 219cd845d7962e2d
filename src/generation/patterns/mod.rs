//! # Fill Patterns
//!
//! The library of region-filling strategies. Every pattern answers two questions:
//! how well it fits a region ([`Suitability`]) and, once chosen, what walls and spawn
//! candidates it puts there ([`FillPattern::apply`]).
//!
//! Patterns are a closed set dispatched by `match`, so the settings layer can reason
//! about all of them exhaustively. Each application writes through a [`RegionCanvas`]
//! that confines the pattern to its region and afterwards tunnels to every hole the
//! region borders, which keeps the level connected no matter what the pattern drew.

pub mod basic;
pub mod canvas;
pub mod ledges;
pub mod plateaus;
pub mod shapes;

pub use basic::*;
pub use canvas::*;
pub use ledges::*;
pub use plateaus::*;
pub use shapes::*;

use crate::{LevelGrid, Location, Region};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How well a pattern fits a region.
///
/// Deliberately a 4-level ordinal so that equally good patterns tie exactly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Suitability {
    Not,
    Little,
    Moderate,
    #[default]
    Very,
}

impl Suitability {
    /// Maps a continuous measure onto the four levels.
    ///
    /// `worst` maps to `Not` and `best` to `Very`; either may be the larger bound.
    ///
    /// # Panics
    ///
    /// Panics when `worst == best`, since no ordering can be derived from an empty range.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::Suitability;
    ///
    /// assert_eq!(Suitability::interpolate(1.0, 2.0, 1.0), Suitability::Very);
    /// assert_eq!(Suitability::interpolate(1.5, 2.0, 1.0), Suitability::Moderate);
    /// assert_eq!(Suitability::interpolate(9.0, 2.0, 1.0), Suitability::Not);
    /// ```
    pub fn interpolate(value: f64, worst: f64, best: f64) -> Suitability {
        assert!(
            (best - worst).abs() > f64::EPSILON,
            "suitability range [{worst}, {best}] has zero width"
        );
        let t = ((value - worst) / (best - worst)).clamp(0.0, 1.0);
        match (t * 3.0).round() as u8 {
            0 => Suitability::Not,
            1 => Suitability::Little,
            2 => Suitability::Moderate,
            _ => Suitability::Very,
        }
    }
}

/// What a spawn candidate region may host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpawnCategory {
    TeamBase,
    Enemy,
    Powerup,
    SpecialWall,
    TeamSpecialWall,
    Waypoint,
}

impl SpawnCategory {
    pub const ALL: [SpawnCategory; 6] = [
        SpawnCategory::TeamBase,
        SpawnCategory::Enemy,
        SpawnCategory::Powerup,
        SpawnCategory::SpecialWall,
        SpawnCategory::TeamSpecialWall,
        SpawnCategory::Waypoint,
    ];

    /// Categories whose candidates are wall cells rather than open space.
    pub fn is_wall(self) -> bool {
        matches!(self, SpawnCategory::SpecialWall | SpawnCategory::TeamSpecialWall)
    }
}

/// Which rule produced a [`FilledRegion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillKind {
    Blank,
    Line,
    CarvedPlus,
    Circle,
    ConcentricSquares,
    X,
    AlternatingSteps,
    Platforms,
    SteppedHallway,
    ThickHurdle,
    Zipper,
    Pillars,
    CenterBlock,
    /// Corridor space of the room graph that no pattern was applied to
    Tunnel,
}

/// The outcome of filling one region: its bounds plus categorized spawn candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledRegion {
    pub covering: Region,
    pub kind: FillKind,
    /// Index of the source region in the generator's region list, if any
    pub region_index: Option<usize>,
    pub spawns: BTreeMap<SpawnCategory, Vec<Region>>,
}

impl FilledRegion {
    pub fn new(covering: Region, kind: FillKind) -> Self {
        Self {
            covering,
            kind,
            region_index: None,
            spawns: BTreeMap::new(),
        }
    }

    /// Adds a spawn candidate, ignoring exact duplicates.
    pub fn add_spawn(&mut self, category: SpawnCategory, region: Region) {
        let list = self.spawns.entry(category).or_default();
        if !list.contains(&region) {
            list.push(region);
        }
    }

    pub fn add_spawn_cell(&mut self, category: SpawnCategory, loc: Location) {
        self.add_spawn(category, Region::single(loc));
    }

    /// Candidates for one category; empty when there are none.
    pub fn spawns(&self, category: SpawnCategory) -> &[Region] {
        self.spawns.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn has_spawns(&self, category: SpawnCategory) -> bool {
        !self.spawns(category).is_empty()
    }

    pub fn clear_spawns(&mut self, category: SpawnCategory) {
        self.spawns.remove(&category);
    }

    /// Drops candidates that overlap a wall cell. Wall categories are left alone.
    pub fn retain_open_spawns(&mut self, grid: &LevelGrid) {
        for (category, list) in self.spawns.iter_mut() {
            if category.is_wall() {
                continue;
            }
            list.retain(|region| region.cells().all(|loc| grid.is_open(loc)));
        }
        self.spawns.retain(|_, list| !list.is_empty());
    }

    /// Mirrors the covering region and every candidate top-to-bottom.
    pub fn flip_y(&mut self, grid_height: i32) {
        self.covering = self.covering.flip_y(grid_height);
        for list in self.spawns.values_mut() {
            for region in list.iter_mut() {
                *region = region.flip_y(grid_height);
            }
        }
    }
}

/// The concrete rule behind a [`FillPattern`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatternKind {
    Blank(BlankRegion),
    Line(LinePattern),
    CarvedPlus(CarvedPlus),
    Circle(CirclePattern),
    ConcentricSquares(ConcentricSquares),
    X(XPattern),
    AlternatingSteps(AlternatingSteps),
    Platforms(Platforms),
    SteppedHallway(SteppedHallway),
    ThickHurdle(ThickHurdle),
    Zipper(ZipperPattern),
    Pillars(Pillars),
    CenterBlock(CenterBlock),
}

/// A registered pattern: the rule plus a ceiling on how suitable it may ever claim to be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPattern {
    /// Lower this to de-prioritize a pattern without disabling it
    #[serde(default)]
    pub max_suitability: Suitability,
    pub pattern: PatternKind,
}

impl FillPattern {
    pub fn new(pattern: PatternKind) -> Self {
        Self {
            max_suitability: Suitability::Very,
            pattern,
        }
    }

    pub fn with_max_suitability(mut self, max_suitability: Suitability) -> Self {
        self.max_suitability = max_suitability;
        self
    }

    /// Every pattern with its default parameters.
    pub fn default_library() -> Vec<FillPattern> {
        vec![
            FillPattern::new(PatternKind::Blank(BlankRegion::default())),
            FillPattern::new(PatternKind::Line(LinePattern::default())),
            FillPattern::new(PatternKind::CarvedPlus(CarvedPlus::default())),
            FillPattern::new(PatternKind::Circle(CirclePattern::default())),
            FillPattern::new(PatternKind::ConcentricSquares(ConcentricSquares::default())),
            FillPattern::new(PatternKind::X(XPattern::default())),
            FillPattern::new(PatternKind::AlternatingSteps(AlternatingSteps::default())),
            FillPattern::new(PatternKind::Platforms(Platforms::default())),
            FillPattern::new(PatternKind::SteppedHallway(SteppedHallway::default())),
            FillPattern::new(PatternKind::ThickHurdle(ThickHurdle::default())),
            FillPattern::new(PatternKind::Zipper(ZipperPattern::default())),
            FillPattern::new(PatternKind::Pillars(Pillars::default()))
                .with_max_suitability(Suitability::Moderate),
            FillPattern::new(PatternKind::CenterBlock(CenterBlock::default())),
        ]
    }

    pub fn kind(&self) -> FillKind {
        match &self.pattern {
            PatternKind::Blank(_) => FillKind::Blank,
            PatternKind::Line(_) => FillKind::Line,
            PatternKind::CarvedPlus(_) => FillKind::CarvedPlus,
            PatternKind::Circle(_) => FillKind::Circle,
            PatternKind::ConcentricSquares(_) => FillKind::ConcentricSquares,
            PatternKind::X(_) => FillKind::X,
            PatternKind::AlternatingSteps(_) => FillKind::AlternatingSteps,
            PatternKind::Platforms(_) => FillKind::Platforms,
            PatternKind::SteppedHallway(_) => FillKind::SteppedHallway,
            PatternKind::ThickHurdle(_) => FillKind::ThickHurdle,
            PatternKind::Zipper(_) => FillKind::Zipper,
            PatternKind::Pillars(_) => FillKind::Pillars,
            PatternKind::CenterBlock(_) => FillKind::CenterBlock,
        }
    }

    /// The pattern's own verdict, before the `max_suitability` ceiling.
    pub fn raw_suitability(&self, region: &Region) -> Suitability {
        if !region.is_valid() {
            return Suitability::Not;
        }
        match &self.pattern {
            PatternKind::Blank(p) => p.suitability(region),
            PatternKind::Line(p) => p.suitability(region),
            PatternKind::CarvedPlus(p) => p.suitability(region),
            PatternKind::Circle(p) => p.suitability(region),
            PatternKind::ConcentricSquares(p) => p.suitability(region),
            PatternKind::X(p) => p.suitability(region),
            PatternKind::AlternatingSteps(p) => p.suitability(region),
            PatternKind::Platforms(p) => p.suitability(region),
            PatternKind::SteppedHallway(p) => p.suitability(region),
            PatternKind::ThickHurdle(p) => p.suitability(region),
            PatternKind::Zipper(p) => p.suitability(region),
            PatternKind::Pillars(p) => p.suitability(region),
            PatternKind::CenterBlock(p) => p.suitability(region),
        }
    }

    /// Suitability capped by `max_suitability`.
    pub fn suitability(&self, region: &Region) -> Suitability {
        self.raw_suitability(region).min(self.max_suitability)
    }

    /// Fills an already-cleared region and reports what was placed.
    ///
    /// Afterwards every hole bordering the region is tunnelled to, a region left without
    /// walls is reported as [`FillKind::Blank`], and candidates overlapping walls are
    /// dropped.
    pub fn apply(&self, region: Region, grid: &mut LevelGrid, rng: &mut StdRng) -> FilledRegion {
        let mut canvas = RegionCanvas::new(grid, region);
        let mut filled = match &self.pattern {
            PatternKind::Blank(p) => p.apply(&mut canvas),
            PatternKind::Line(p) => p.apply(&mut canvas),
            PatternKind::CarvedPlus(p) => p.apply(&mut canvas),
            PatternKind::Circle(p) => p.apply(&mut canvas),
            PatternKind::ConcentricSquares(p) => p.apply(&mut canvas, rng),
            PatternKind::X(p) => p.apply(&mut canvas),
            PatternKind::AlternatingSteps(p) => p.apply(&mut canvas, rng),
            PatternKind::Platforms(p) => p.apply(&mut canvas, rng),
            PatternKind::SteppedHallway(p) => p.apply(&mut canvas),
            PatternKind::ThickHurdle(p) => p.apply(&mut canvas),
            PatternKind::Zipper(p) => p.apply(&mut canvas, rng),
            PatternKind::Pillars(p) => p.apply(&mut canvas),
            PatternKind::CenterBlock(p) => p.apply(&mut canvas),
        };

        let carved = canvas.tunnel_to_holes();
        if carved > 0 {
            log::trace!("{:?} carved {} tunnel cells in {:?}", filled.kind, carved, region);
        }
        if canvas.walls_placed() == 0 {
            filled.kind = FillKind::Blank;
        }
        filled.retain_open_spawns(canvas.grid());
        filled
    }
}

/// Ratio of the long side to the short side, always ≥ 1.
pub(crate) fn aspect(region: &Region) -> f64 {
    region.long_side() as f64 / region.short_side() as f64
}

/// Start of a band of `thickness` cells centered on `center`.
pub(crate) fn band_start(center: i32, thickness: i32) -> i32 {
    center - (thickness - 1) / 2
}

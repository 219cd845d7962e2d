//! # Level Generator
//!
//! Drives one generation run through its phases:
//!
//! 1. `initialize_base` prepares the grid for the chosen algorithm
//! 2. `iterate_base` advances the base layout one step at a time
//! 3. `before_fill_patterns` finalizes the region list
//! 4. `iterate_fill_pattern` fills one region per call
//! 5. `after_fill_patterns` adds algorithm-specific filled regions
//!
//! Callers that want to spread work over several frames drive the steps themselves;
//! everyone else calls [`LevelGenerator::full_generate`].

use crate::generation::patterns::{BlankRegion, FillPattern, FilledRegion, PatternKind};
use crate::generation::recursive_division::RecursiveDivision;
use crate::generation::room_graph::RoomGraph;
use crate::generation::settings::{GeneratorParams, GeneratorSettings};
use crate::{ArenaError, ArenaResult, LevelGrid, Location, Region};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Where a generator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    Base,
    BeforeFill,
    Fill,
    AfterFill,
    Done,
}

/// The base-layout algorithm and its run state.
#[derive(Debug, Clone)]
pub enum Algorithm {
    RecursiveDivision(RecursiveDivision),
    RoomGraph(RoomGraph),
}

impl Algorithm {
    pub fn from_params(params: &GeneratorParams) -> Self {
        match params {
            GeneratorParams::RecursiveDivision(params) => {
                Algorithm::RecursiveDivision(RecursiveDivision::new(params.clone()))
            }
            GeneratorParams::RoomGraph(params) => Algorithm::RoomGraph(RoomGraph::new(params.clone())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::RecursiveDivision(_) => "RecursiveDivision",
            Algorithm::RoomGraph(_) => "RoomGraph",
        }
    }
}

/// A finished level: the grid plus every region and what was put in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub grid: LevelGrid,
    pub regions: Vec<Region>,
    pub filled_regions: Vec<FilledRegion>,
}

impl GeneratedLevel {
    /// Mirrors the whole level top-to-bottom: grid, holes, regions and spawn candidates.
    pub fn mirror_y(&self) -> GeneratedLevel {
        let height = self.grid.height();
        let mut filled_regions = self.filled_regions.clone();
        for filled in &mut filled_regions {
            filled.flip_y(height);
        }
        GeneratedLevel {
            grid: self.grid.flipped_y(),
            regions: self.regions.iter().map(|r| r.flip_y(height)).collect(),
            filled_regions,
        }
    }
}

pub struct LevelGenerator {
    settings: GeneratorSettings,
    grid: LevelGrid,
    regions: Vec<Region>,
    filled_regions: Vec<FilledRegion>,
    algorithm: Algorithm,
    phase: Phase,
    fill_cursor: usize,
}

impl LevelGenerator {
    /// Validates the settings and prepares an empty grid.
    pub fn new(settings: GeneratorSettings) -> ArenaResult<Self> {
        settings.validate()?;
        let grid = LevelGrid::new(settings.width, settings.height, settings.wrap_x, settings.wrap_y);
        let algorithm = Algorithm::from_params(&settings.generator);
        Ok(Self {
            settings,
            grid,
            regions: Vec::new(),
            filled_regions: Vec::new(),
            algorithm,
            phase: Phase::Uninitialized,
            fill_cursor: 0,
        })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn grid(&self) -> &LevelGrid {
        &self.grid
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn filled_regions(&self) -> &[FilledRegion] {
        &self.filled_regions
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generator_type(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Discards all progress so the generator can run again.
    pub fn reset(&mut self) {
        self.grid = LevelGrid::new(
            self.settings.width,
            self.settings.height,
            self.settings.wrap_x,
            self.settings.wrap_y,
        );
        self.regions.clear();
        self.filled_regions.clear();
        self.algorithm = Algorithm::from_params(&self.settings.generator);
        self.phase = Phase::Uninitialized;
        self.fill_cursor = 0;
    }

    fn expect_phase(&self, expected: Phase, step: &str) -> ArenaResult<()> {
        if self.phase != expected {
            return Err(ArenaError::InvalidState(format!(
                "{} called in phase {:?}, expected {:?}",
                step, self.phase, expected
            )));
        }
        Ok(())
    }

    pub fn initialize_base(&mut self, rng: &mut StdRng) -> ArenaResult<()> {
        self.expect_phase(Phase::Uninitialized, "initialize_base")?;
        log::info!(
            "Generating {}x{} level with {}",
            self.grid.width(),
            self.grid.height(),
            self.algorithm.name()
        );
        match &mut self.algorithm {
            Algorithm::RecursiveDivision(division) => division.initialize(&mut self.grid)?,
            Algorithm::RoomGraph(graph) => graph.initialize(&mut self.grid, rng)?,
        }
        self.phase = Phase::Base;
        Ok(())
    }

    /// Advances the base layout by one step. Returns whether more steps remain.
    pub fn iterate_base(&mut self, rng: &mut StdRng) -> ArenaResult<bool> {
        self.expect_phase(Phase::Base, "iterate_base")?;
        let more = match &mut self.algorithm {
            Algorithm::RecursiveDivision(division) => {
                division.iterate(&mut self.grid, &mut self.regions, rng)
            }
            Algorithm::RoomGraph(graph) => graph.iterate(&mut self.grid),
        };
        if !more {
            self.phase = Phase::BeforeFill;
        }
        Ok(more)
    }

    pub fn before_fill_patterns(&mut self) -> ArenaResult<()> {
        self.expect_phase(Phase::BeforeFill, "before_fill_patterns")?;
        match &mut self.algorithm {
            Algorithm::RecursiveDivision(_) => {
                RecursiveDivision::prune_holes(&mut self.grid, &self.regions)
            }
            Algorithm::RoomGraph(graph) => graph.before_fill(&mut self.regions),
        }
        log::debug!(
            "{} regions, {} holes before filling",
            self.regions.len(),
            self.grid.holes().len()
        );
        self.fill_cursor = 0;
        self.phase = Phase::Fill;
        Ok(())
    }

    fn applies_patterns(&self, index: usize) -> bool {
        match &self.algorithm {
            Algorithm::RecursiveDivision(_) => true,
            Algorithm::RoomGraph(graph) => graph.applies_patterns(index),
        }
    }

    /// Fills the next region that takes a pattern. Returns whether more remain.
    pub fn iterate_fill_pattern(&mut self, rng: &mut StdRng) -> ArenaResult<bool> {
        self.expect_phase(Phase::Fill, "iterate_fill_pattern")?;
        while self.fill_cursor < self.regions.len() && !self.applies_patterns(self.fill_cursor) {
            self.fill_cursor += 1;
        }
        if self.fill_cursor >= self.regions.len() {
            self.phase = Phase::AfterFill;
            return Ok(false);
        }

        let index = self.fill_cursor;
        let region = self.regions[index];
        let mut filled = match self.settings.most_suitable(&region, rng) {
            Some(pattern) => {
                log::trace!("Region {} {:?} gets {:?}", index, region, pattern.kind());
                pattern.apply(region, &mut self.grid, rng)
            }
            None => {
                log::debug!("No pattern fits region {} {:?}; leaving it blank", index, region);
                FillPattern::new(PatternKind::Blank(BlankRegion::default()))
                    .apply(region, &mut self.grid, rng)
            }
        };
        filled.region_index = Some(index);
        self.filled_regions.push(filled);
        self.fill_cursor += 1;
        Ok(true)
    }

    pub fn after_fill_patterns(&mut self) -> ArenaResult<()> {
        self.expect_phase(Phase::AfterFill, "after_fill_patterns")?;
        if let Algorithm::RoomGraph(graph) = &self.algorithm {
            graph.after_fill(&self.regions, &mut self.filled_regions);
        }
        log::info!(
            "Level complete: {} regions, {} filled, {} holes",
            self.regions.len(),
            self.filled_regions.len(),
            self.grid.holes().len()
        );
        self.phase = Phase::Done;
        Ok(())
    }

    /// Runs every phase from scratch and returns the finished level.
    pub fn full_generate(&mut self, rng: &mut StdRng) -> ArenaResult<GeneratedLevel> {
        self.reset();
        self.initialize_base(rng)?;
        while self.iterate_base(rng)? {}
        self.before_fill_patterns()?;
        while self.iterate_fill_pattern(rng)? {}
        self.after_fill_patterns()?;
        self.level()
    }

    /// The finished level. Only available once every phase has run.
    pub fn level(&self) -> ArenaResult<GeneratedLevel> {
        self.expect_phase(Phase::Done, "level")?;
        Ok(GeneratedLevel {
            grid: self.grid.clone(),
            regions: self.regions.clone(),
            filled_regions: self.filled_regions.clone(),
        })
    }

    /// Checks that non-wrapping borders are walls and every open cell is reachable.
    pub fn validate(level: &GeneratedLevel) -> ArenaResult<()> {
        let grid = &level.grid;
        let bounds = grid.bounds();
        let mut border: Vec<Location> = Vec::new();
        if !grid.wrap_x() {
            border.extend(bounds.left_edge().cells());
            border.extend(bounds.right_edge().cells());
        }
        if !grid.wrap_y() {
            border.extend(bounds.top_edge().cells());
            border.extend(bounds.bottom_edge().cells());
        }
        if let Some(open) = border.into_iter().find(|loc| grid.is_open(*loc)) {
            return Err(ArenaError::GenerationFailed(format!(
                "Border cell {:?} is open",
                open
            )));
        }
        if !grid.is_connected() {
            return Err(ArenaError::GenerationFailed(
                "Open space is not connected".to_string(),
            ));
        }
        Ok(())
    }
}

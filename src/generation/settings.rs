//! # Generator Settings
//!
//! Everything a level generator needs to know up front: grid size, wrap flags, the
//! ordered fill-pattern library, the generation algorithm with its parameters, and how
//! many spawns to place afterwards.
//!
//! Settings are plain serde types so a level style can live in a JSON file.

use crate::generation::patterns::{FillPattern, Suitability};
use crate::generation::recursive_division::RecursiveDivisionParams;
use crate::generation::room_graph::RoomGraphParams;
use crate::{config, ArenaError, ArenaResult, Region};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which base-layout algorithm to run, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum GeneratorParams {
    RecursiveDivision(RecursiveDivisionParams),
    RoomGraph(RoomGraphParams),
}

/// How many spawns to place and how placement scores candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub powerups: usize,
    pub waypoints: usize,
    /// Base of the logarithm applied to spawn distances
    pub log_base: f64,
    /// Score multiplier per earlier placement on the same cell
    pub used_scale: f64,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            powerups: config::DEFAULT_POWERUP_COUNT,
            waypoints: config::DEFAULT_WAYPOINT_COUNT,
            log_base: config::LOG_BASE,
            used_scale: config::USED_SCALE,
        }
    }
}

impl SpawnSettings {
    /// Rejects scoring parameters that would turn every score into NaN or infinity.
    pub fn validate(&self) -> ArenaResult<()> {
        if !(self.used_scale > 0.0 && self.used_scale <= 1.0) {
            return Err(ArenaError::Config(format!(
                "used_scale must be in (0, 1], got {}",
                self.used_scale
            )));
        }
        if !(self.log_base > 1.0 && self.log_base.is_finite()) {
            return Err(ArenaError::Config(format!(
                "log_base must be a finite number greater than 1, got {}",
                self.log_base
            )));
        }
        Ok(())
    }
}

/// Complete description of a level style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub wrap_x: bool,
    #[serde(default)]
    pub wrap_y: bool,
    /// Candidate patterns, in registration order
    #[serde(default = "FillPattern::default_library")]
    pub patterns: Vec<FillPattern>,
    pub generator: GeneratorParams,
    #[serde(default)]
    pub spawns: SpawnSettings,
}

impl GeneratorSettings {
    /// A recursive-division maze with every pattern registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::GeneratorSettings;
    ///
    /// let settings = GeneratorSettings::recursive_division(41, 25);
    /// assert!(settings.validate().is_ok());
    /// assert!(!settings.patterns.is_empty());
    /// ```
    pub fn recursive_division(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            wrap_x: false,
            wrap_y: false,
            patterns: FillPattern::default_library(),
            generator: GeneratorParams::RecursiveDivision(RecursiveDivisionParams::default()),
            spawns: SpawnSettings::default(),
        }
    }

    /// A room graph on a grid sized to fit every node.
    pub fn room_graph(params: RoomGraphParams) -> Self {
        let size = params.required_size(false, false);
        Self {
            width: size.x,
            height: size.y,
            wrap_x: false,
            wrap_y: false,
            patterns: FillPattern::default_library(),
            generator: GeneratorParams::RoomGraph(params),
            spawns: SpawnSettings::default(),
        }
    }

    pub fn with_wrap(mut self, wrap_x: bool, wrap_y: bool) -> Self {
        self.wrap_x = wrap_x;
        self.wrap_y = wrap_y;
        self
    }

    pub fn with_patterns(mut self, patterns: Vec<FillPattern>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Parses and validates settings from JSON text.
    pub fn from_json(json: &str) -> ArenaResult<Self> {
        let settings: GeneratorSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ArenaResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded generator settings from {}", path.as_ref().display());
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> ArenaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects settings no generator can work with.
    pub fn validate(&self) -> ArenaResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ArenaError::Config(format!(
                "Grid size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.patterns.is_empty() {
            return Err(ArenaError::Config(
                "At least one fill pattern is required".to_string(),
            ));
        }
        self.spawns.validate()?;
        match &self.generator {
            GeneratorParams::RecursiveDivision(params) => {
                params.validate()?;
                let min_x = if self.wrap_x { 1 } else { 3 };
                let min_y = if self.wrap_y { 1 } else { 3 };
                if self.width < min_x || self.height < min_y {
                    return Err(ArenaError::Config(format!(
                        "A {}x{} grid leaves no interior inside its border walls",
                        self.width, self.height
                    )));
                }
            }
            GeneratorParams::RoomGraph(params) => params.validate()?,
        }
        Ok(())
    }

    /// Picks the most suitable pattern for a region, breaking ties uniformly at random.
    ///
    /// Returns `None` when no pattern is better than [`Suitability::Not`].
    pub fn most_suitable(&self, region: &Region, rng: &mut StdRng) -> Option<&FillPattern> {
        let mut best = Suitability::Not;
        let mut candidates: Vec<&FillPattern> = Vec::new();

        for pattern in &self.patterns {
            let suitability = pattern.suitability(region);
            if suitability > best {
                best = suitability;
                candidates.clear();
                candidates.push(pattern);
            } else if suitability == best && best != Suitability::Not {
                candidates.push(pattern);
            }
        }

        candidates.choose(rng).copied()
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::recursive_division(config::DEFAULT_LEVEL_WIDTH, config::DEFAULT_LEVEL_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::patterns::{BlankRegion, FillKind, LinePattern, PatternKind};
    use crate::Location;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::io::Write;

    fn blank_and_line() -> Vec<FillPattern> {
        vec![
            FillPattern::new(PatternKind::Blank(BlankRegion::default())),
            FillPattern::new(PatternKind::Line(LinePattern::default())),
        ]
    }

    #[test]
    fn test_most_suitable_prefers_higher_level() {
        let settings = GeneratorSettings::default().with_patterns(blank_and_line());
        let mut rng = StdRng::seed_from_u64(1);
        let corridor = Region::with_cells(Location::origin(), 12, 2);
        for _ in 0..10 {
            let pattern = settings.most_suitable(&corridor, &mut rng).unwrap();
            assert_eq!(pattern.kind(), FillKind::Line);
        }
    }

    #[test]
    fn test_most_suitable_breaks_ties_randomly() {
        let settings = GeneratorSettings::default().with_patterns(vec![
            FillPattern::new(PatternKind::Line(LinePattern::default())),
            FillPattern::new(PatternKind::Line(LinePattern {
                max_thickness: 2,
                end_gap: 2,
            })),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        let corridor = Region::with_cells(Location::origin(), 12, 1);
        let picked: HashSet<i32> = (0..50)
            .filter_map(|_| settings.most_suitable(&corridor, &mut rng))
            .map(|pattern| match &pattern.pattern {
                PatternKind::Line(line) => line.end_gap,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_most_suitable_none_when_nothing_fits() {
        let settings = GeneratorSettings::default().with_patterns(vec![FillPattern::new(
            PatternKind::Line(LinePattern::default()),
        )]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(settings
            .most_suitable(&Region::with_cells(Location::origin(), 20, 20), &mut rng)
            .is_none());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut settings = GeneratorSettings::default();
        settings.patterns.clear();
        assert!(matches!(settings.validate(), Err(ArenaError::Config(_))));

        let mut settings = GeneratorSettings::default();
        settings.width = 0;
        assert!(settings.validate().is_err());

        let mut settings = GeneratorSettings::default();
        settings.spawns.used_scale = 1.5;
        assert!(settings.validate().is_err());

        let mut params = RoomGraphParams::default();
        params.percent_rooms = 0.0;
        assert!(GeneratorSettings::room_graph(params).validate().is_err());
    }

    #[test]
    fn test_json_round_trip_and_defaults() {
        let settings = GeneratorSettings::room_graph(RoomGraphParams::default()).with_wrap(true, false);
        let json = settings.to_json().unwrap();
        assert_eq!(GeneratorSettings::from_json(&json).unwrap(), settings);

        let minimal = r#"{
            "width": 31,
            "height": 21,
            "generator": { "algorithm": "RecursiveDivision" }
        }"#;
        let parsed = GeneratorSettings::from_json(minimal).unwrap();
        assert_eq!(parsed.patterns.len(), FillPattern::default_library().len());
        assert_eq!(parsed.spawns, SpawnSettings::default());
    }

    #[test]
    fn test_unknown_pattern_type_is_rejected() {
        let json = r#"{
            "width": 31,
            "height": 21,
            "patterns": [ { "pattern": { "type": "Spiral" } } ],
            "generator": { "algorithm": "RecursiveDivision" }
        }"#;
        assert!(matches!(
            GeneratorSettings::from_json(json),
            Err(ArenaError::Serde(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let settings = GeneratorSettings::recursive_division(25, 17);
        file.write_all(settings.to_json().unwrap().as_bytes()).unwrap();

        let loaded = GeneratorSettings::load(file.path()).unwrap();
        assert_eq!(loaded, settings);
        assert!(matches!(
            GeneratorSettings::load("/nonexistent/arena.json"),
            Err(ArenaError::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn test_default_library_always_has_a_candidate(columns in 1i32..=50, rows in 1i32..=50, seed in 0u64..1000) {
            let settings = GeneratorSettings::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let region = Region::with_cells(Location::new(1, 1), columns, rows);
            prop_assert!(settings.most_suitable(&region, &mut rng).is_some());
        }
    }
}

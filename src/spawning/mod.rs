//! # Spawn Placement
//!
//! Turns the spawn candidates of a generated level into concrete spawn locations.
//!
//! Team bases are the only score-driven step: each team takes the unused candidate
//! region whose centre is most evenly far from the bases already chosen. Powerups and
//! waypoints are sampled uniformly from candidate cells that keep clear of every base.
//!
//! Enemy and special-wall candidates are left in the filled regions for the caller.

use crate::generation::patterns::{FilledRegion, SpawnCategory};
use crate::generation::settings::SpawnSettings;
use crate::{config, ArenaError, ArenaResult, LevelGrid, Location, Region};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Final spawn locations of one placement run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnLayout {
    /// Candidate region chosen for each team, in team order
    pub team_regions: Vec<Region>,
    /// Cells of each team's base, in team order
    pub team_spawns: Vec<Vec<Location>>,
    pub powerups: Vec<Location>,
    pub waypoints: Vec<Location>,
}

impl SpawnLayout {
    pub fn team_count(&self) -> usize {
        self.team_spawns.len()
    }
}

/// Places spawns on one level. Single-shot: call [`SpawnPlacer::reset`] before reuse.
#[derive(Debug, Clone)]
pub struct SpawnPlacer {
    grid: LevelGrid,
    settings: SpawnSettings,
    uses: HashMap<Location, u32>,
    team_regions: Vec<Region>,
    team_spawns: Vec<Vec<Location>>,
    other_spawns: BTreeMap<SpawnCategory, Vec<Location>>,
    generated: bool,
}

impl SpawnPlacer {
    pub fn new(grid: &LevelGrid, settings: SpawnSettings) -> Self {
        Self {
            grid: grid.clone(),
            settings,
            uses: HashMap::new(),
            team_regions: Vec::new(),
            team_spawns: Vec::new(),
            other_spawns: BTreeMap::new(),
            generated: false,
        }
    }

    pub fn settings(&self) -> &SpawnSettings {
        &self.settings
    }

    /// How many times a cell has been picked across all categories.
    pub fn uses(&self, loc: Location) -> u32 {
        self.uses.get(&loc).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.uses.clear();
        self.team_regions.clear();
        self.team_spawns.clear();
        self.other_spawns.clear();
        self.generated = false;
    }

    /// Scores a candidate against the spawns already placed in the same set.
    ///
    /// Distances are measured to the nearest wrapped image of the candidate and
    /// compressed with a logarithm; the score is the mean of those values minus their
    /// variance, scaled down for every earlier use of the cell.
    pub fn score_location(&self, candidate: Location, placed: &[Location]) -> f64 {
        let base = if placed.is_empty() {
            config::FIRST_PLACEMENT_SCORE
        } else {
            let distances: Vec<f64> = placed
                .iter()
                .map(|other| {
                    let d = self.min_distance_sqr(candidate, *other) as f64;
                    (d.sqrt() + 1.0).log(self.settings.log_base)
                })
                .collect();
            let n = distances.len() as f64;
            let mean = distances.iter().sum::<f64>() / n;
            let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
            mean - variance
        };
        base * self.settings.used_scale.powi(self.uses(candidate) as i32)
    }

    fn min_distance_sqr(&self, candidate: Location, other: Location) -> i64 {
        let x_shifts: &[i32] = if self.grid.wrap_x() {
            &[0, -1, 1]
        } else {
            &[0]
        };
        let y_shifts: &[i32] = if self.grid.wrap_y() {
            &[0, -1, 1]
        } else {
            &[0]
        };

        let mut best = i64::MAX;
        for &sx in x_shifts {
            for &sy in y_shifts {
                let image = candidate
                    + Location::new(sx * self.grid.width(), sy * self.grid.height());
                best = best.min(image.distance_sqr(other));
            }
        }
        best
    }

    /// Places team bases, then powerups, then waypoints.
    ///
    /// Fails with [`ArenaError::NotEnoughSpawns`] when any category runs out of
    /// candidates; the caller is expected to regenerate the level and try again.
    /// Scoring settings that cannot produce finite scores are an [`ArenaError::Config`].
    pub fn generate_spawns(
        &mut self,
        filled: &[FilledRegion],
        teams: usize,
        rng: &mut StdRng,
    ) -> ArenaResult<SpawnLayout> {
        if self.generated {
            return Err(ArenaError::InvalidState(
                "Spawns were already generated; reset the placer first".to_string(),
            ));
        }
        self.settings.validate()?;
        self.generated = true;

        self.place_team_bases(filled, teams, rng)?;
        let powerups = self.place_random(filled, SpawnCategory::Powerup, self.settings.powerups, rng)?;
        let waypoints =
            self.place_random(filled, SpawnCategory::Waypoint, self.settings.waypoints, rng)?;

        log::info!(
            "Placed {} team bases, {} powerups, {} waypoints",
            self.team_spawns.len(),
            powerups,
            waypoints
        );
        Ok(self.layout())
    }

    fn place_team_bases(
        &mut self,
        filled: &[FilledRegion],
        teams: usize,
        rng: &mut StdRng,
    ) -> ArenaResult<()> {
        let mut candidates = distinct_candidates(filled, SpawnCategory::TeamBase);
        if candidates.len() < teams {
            return Err(ArenaError::NotEnoughSpawns {
                category: SpawnCategory::TeamBase,
                requested: teams,
                available: candidates.len(),
            });
        }

        let mut centers: Vec<Location> = Vec::with_capacity(teams);
        for team in 0..teams {
            let scores: Vec<f64> = candidates
                .iter()
                .map(|region| self.score_location(region.center(), &centers))
                .collect();
            let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let tied: Vec<usize> = scores
                .iter()
                .enumerate()
                .filter(|(_, score)| (**score - best).abs() < 1e-9)
                .map(|(index, _)| index)
                .collect();
            let Some(&pick) = tied.choose(rng) else {
                return Err(ArenaError::GenerationFailed(
                    "No team base candidate could be scored".to_string(),
                ));
            };

            let region = candidates.remove(pick);
            log::debug!(
                "Team {} base at {:?} (score {:.3}, {} tied)",
                team,
                region,
                best,
                tied.len()
            );
            centers.push(region.center());
            *self.uses.entry(region.center()).or_insert(0) += 1;
            self.team_regions.push(region);
            self.team_spawns.push(region.cells().collect());
        }
        Ok(())
    }

    /// Samples `count` distinct open cells from candidate regions that keep clear of
    /// every team base. Returns how many were placed.
    fn place_random(
        &mut self,
        filled: &[FilledRegion],
        category: SpawnCategory,
        count: usize,
        rng: &mut StdRng,
    ) -> ArenaResult<usize> {
        if count == 0 {
            return Ok(0);
        }

        let cells: Vec<Location> = distinct_candidates(filled, category)
            .into_iter()
            .filter(|region| !self.touches_team(region))
            .flat_map(|region| region.cells().collect::<Vec<_>>())
            .filter(|loc| self.grid.is_open(*loc))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if cells.len() < count {
            return Err(ArenaError::NotEnoughSpawns {
                category,
                requested: count,
                available: cells.len(),
            });
        }

        let picked: Vec<Location> = cells.choose_multiple(rng, count).copied().collect();
        for loc in &picked {
            *self.uses.entry(*loc).or_insert(0) += 1;
        }
        log::debug!("{:?}: {} of {} cells picked", category, picked.len(), cells.len());
        self.other_spawns.entry(category).or_default().extend(picked);
        Ok(count)
    }

    fn touches_team(&self, region: &Region) -> bool {
        let reach = region.inflate(1, 1);
        self.team_spawns
            .iter()
            .flatten()
            .any(|cell| reach.contains(*cell))
    }

    /// Spawns placed so far.
    pub fn layout(&self) -> SpawnLayout {
        let category = |c: SpawnCategory| self.other_spawns.get(&c).cloned().unwrap_or_default();
        SpawnLayout {
            team_regions: self.team_regions.clone(),
            team_spawns: self.team_spawns.clone(),
            powerups: category(SpawnCategory::Powerup),
            waypoints: category(SpawnCategory::Waypoint),
        }
    }
}

/// Every candidate region of a category across the level, first occurrence kept.
fn distinct_candidates(filled: &[FilledRegion], category: SpawnCategory) -> Vec<Region> {
    let mut seen = BTreeSet::new();
    let mut regions = Vec::new();
    for region in filled.iter().flat_map(|f| f.spawns(category)) {
        if seen.insert(*region) {
            regions.push(*region);
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::patterns::FillKind;
    use rand::SeedableRng;

    fn open_grid(width: i32, height: i32, wrap: bool) -> LevelGrid {
        let mut grid = LevelGrid::new(width, height, wrap, wrap);
        grid.fill_all(false);
        grid
    }

    fn team_cells(cells: &[Location]) -> FilledRegion {
        let mut filled = FilledRegion::new(Region::new(0, 0, 30, 30), FillKind::Blank);
        for cell in cells {
            filled.add_spawn_cell(SpawnCategory::TeamBase, *cell);
        }
        filled
    }

    fn corners() -> Vec<Location> {
        vec![
            Location::new(2, 2),
            Location::new(22, 2),
            Location::new(2, 22),
            Location::new(22, 22),
        ]
    }

    fn no_extras() -> SpawnSettings {
        SpawnSettings {
            powerups: 0,
            waypoints: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_placement_scores_constant() {
        let grid = open_grid(30, 30, false);
        let placer = SpawnPlacer::new(&grid, SpawnSettings::default());
        assert_eq!(
            placer.score_location(Location::new(3, 4), &[]),
            config::FIRST_PLACEMENT_SCORE
        );
    }

    #[test]
    fn test_score_prefers_even_separation() {
        let grid = open_grid(40, 40, false);
        let placer = SpawnPlacer::new(&grid, SpawnSettings::default());
        let placed = [Location::new(0, 0), Location::new(20, 0)];
        let between = placer.score_location(Location::new(10, 0), &placed);
        let lopsided = placer.score_location(Location::new(1, 0), &placed);
        assert!(between > lopsided);
    }

    #[test]
    fn test_score_uses_wrapped_distance() {
        let flat = open_grid(20, 20, false);
        let wrapped = open_grid(20, 20, true);
        let placed = [Location::new(0, 0)];
        let candidate = Location::new(19, 0);
        let flat_score = SpawnPlacer::new(&flat, SpawnSettings::default()).score_location(candidate, &placed);
        let wrapped_score =
            SpawnPlacer::new(&wrapped, SpawnSettings::default()).score_location(candidate, &placed);
        assert!(wrapped_score < flat_score);
    }

    #[test]
    fn test_reused_cells_score_lower() {
        let grid = open_grid(30, 30, false);
        let mut placer = SpawnPlacer::new(&grid, SpawnSettings::default());
        let placed = [Location::new(0, 0)];
        let fresh = placer.score_location(Location::new(10, 10), &placed);
        placer.uses.insert(Location::new(10, 10), 2);
        let reused = placer.score_location(Location::new(10, 10), &placed);
        assert!((reused - fresh * 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_teams_up_to_candidates_succeed() {
        let grid = open_grid(30, 30, false);
        let filled = vec![team_cells(&corners())];
        for teams in 1..=4 {
            let mut placer = SpawnPlacer::new(&grid, no_extras());
            let mut rng = StdRng::seed_from_u64(teams as u64);
            let layout = placer.generate_spawns(&filled, teams, &mut rng).unwrap();
            assert_eq!(layout.team_count(), teams);
        }

        let mut placer = SpawnPlacer::new(&grid, no_extras());
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            placer.generate_spawns(&filled, 5, &mut rng),
            Err(ArenaError::NotEnoughSpawns {
                category: SpawnCategory::TeamBase,
                requested: 5,
                available: 4,
            })
        ));
    }

    #[test]
    fn test_second_base_is_opposite_corner() {
        let grid = open_grid(30, 30, false);
        let filled = vec![team_cells(&corners())];
        for seed in 0..20 {
            let mut placer = SpawnPlacer::new(&grid, no_extras());
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = placer.generate_spawns(&filled, 2, &mut rng).unwrap();
            let first = layout.team_regions[0].center();
            let second = layout.team_regions[1].center();
            assert_eq!(first.distance_sqr(second), 800);
        }
    }

    #[test]
    fn test_corner_choice_ignores_candidate_order() {
        let grid = open_grid(30, 30, false);
        let mut reversed = corners();
        reversed.reverse();
        for cells in [corners(), reversed] {
            let mut placer = SpawnPlacer::new(&grid, no_extras());
            let mut rng = StdRng::seed_from_u64(11);
            let layout = placer
                .generate_spawns(&[team_cells(&cells)], 4, &mut rng)
                .unwrap();
            let chosen: BTreeSet<Location> = layout.team_regions.iter().map(Region::center).collect();
            assert_eq!(chosen, corners().into_iter().collect());
        }
    }

    #[test]
    fn test_powerups_keep_clear_of_bases() {
        let grid = open_grid(30, 30, false);
        let mut filled = team_cells(&[Location::new(5, 5)]);
        filled.add_spawn(SpawnCategory::Powerup, Region::new(4, 4, 2, 2));
        filled.add_spawn(SpawnCategory::Powerup, Region::new(20, 20, 1, 1));

        let mut placer = SpawnPlacer::new(
            &grid,
            SpawnSettings {
                powerups: 4,
                waypoints: 0,
                ..Default::default()
            },
        );
        let mut rng = StdRng::seed_from_u64(2);
        let layout = placer.generate_spawns(&[filled], 1, &mut rng).unwrap();
        assert_eq!(layout.powerups.len(), 4);
        assert!(layout
            .powerups
            .iter()
            .all(|loc| Region::new(20, 20, 1, 1).contains(*loc)));
    }

    #[test]
    fn test_too_few_cells_fails() {
        let grid = open_grid(30, 30, false);
        let mut filled = team_cells(&[Location::new(5, 5)]);
        filled.add_spawn_cell(SpawnCategory::Waypoint, Location::new(20, 20));
        filled.add_spawn_cell(SpawnCategory::Waypoint, Location::new(21, 20));

        let mut placer = SpawnPlacer::new(
            &grid,
            SpawnSettings {
                powerups: 0,
                waypoints: 3,
                ..Default::default()
            },
        );
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            placer.generate_spawns(&[filled], 1, &mut rng),
            Err(ArenaError::NotEnoughSpawns {
                category: SpawnCategory::Waypoint,
                requested: 3,
                available: 2,
            })
        ));
    }

    #[test]
    fn test_generate_is_single_shot() {
        let grid = open_grid(30, 30, false);
        let filled = vec![team_cells(&corners())];
        let mut placer = SpawnPlacer::new(&grid, no_extras());
        let mut rng = StdRng::seed_from_u64(1);
        placer.generate_spawns(&filled, 2, &mut rng).unwrap();
        assert!(matches!(
            placer.generate_spawns(&filled, 2, &mut rng),
            Err(ArenaError::InvalidState(_))
        ));

        placer.reset();
        assert_eq!(placer.layout(), SpawnLayout::default());
        assert!(placer.generate_spawns(&filled, 2, &mut rng).is_ok());
    }

    #[test]
    fn test_team_count_is_bounded_only_by_candidates() {
        let grid = open_grid(100, 10, false);
        let cells: Vec<Location> = (0..10).map(|i| Location::new(5 + i * 10, 5)).collect();
        let filled = vec![team_cells(&cells)];

        let mut placer = SpawnPlacer::new(&grid, no_extras());
        let mut rng = StdRng::seed_from_u64(1);
        let layout = placer.generate_spawns(&filled, 9, &mut rng).unwrap();
        assert_eq!(layout.team_count(), 9);

        let mut placer = SpawnPlacer::new(&grid, no_extras());
        assert!(placer.generate_spawns(&filled, 10, &mut rng).is_ok());

        let mut placer = SpawnPlacer::new(&grid, no_extras());
        assert!(matches!(
            placer.generate_spawns(&filled, 11, &mut rng),
            Err(ArenaError::NotEnoughSpawns {
                category: SpawnCategory::TeamBase,
                requested: 11,
                available: 10,
            })
        ));
    }

    #[test]
    fn test_bad_scoring_settings_are_rejected() {
        let grid = open_grid(30, 30, false);
        let filled = vec![team_cells(&corners())];
        for settings in [
            SpawnSettings {
                log_base: 1.0,
                ..no_extras()
            },
            SpawnSettings {
                log_base: 0.5,
                ..no_extras()
            },
            SpawnSettings {
                used_scale: 0.0,
                ..no_extras()
            },
        ] {
            let mut placer = SpawnPlacer::new(&grid, settings);
            let mut rng = StdRng::seed_from_u64(1);
            assert!(matches!(
                placer.generate_spawns(&filled, 2, &mut rng),
                Err(ArenaError::Config(_))
            ));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let grid = open_grid(30, 30, false);
        let mut filled = team_cells(&corners());
        filled.add_spawn(SpawnCategory::Powerup, Region::new(10, 10, 6, 6));
        filled.add_spawn(SpawnCategory::Waypoint, Region::new(10, 10, 6, 6));
        let settings = SpawnSettings {
            powerups: 3,
            waypoints: 5,
            ..Default::default()
        };

        let run = |seed| {
            let mut placer = SpawnPlacer::new(&grid, settings.clone());
            let mut rng = StdRng::seed_from_u64(seed);
            placer.generate_spawns(&[filled.clone()], 2, &mut rng).unwrap()
        };
        assert_eq!(run(9), run(9));
    }
}

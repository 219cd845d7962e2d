//! End-to-end generation runs through the public API.

use arenagen::generation::utils::create_rng;
use arenagen::{
    ArenaResult, BlankRegion, FillKind, FillPattern, GeneratorSettings, LevelGenerator,
    LinePattern, Location, PatternKind, RoomGraphParams, SpawnPlacer, SpawnSettings,
};

fn blank_and_line() -> Vec<FillPattern> {
    vec![
        FillPattern::new(PatternKind::Blank(BlankRegion::default())),
        FillPattern::new(PatternKind::Line(LinePattern::default())),
    ]
}

#[test]
fn test_small_maze_has_solid_border() -> ArenaResult<()> {
    for seed in 0..10 {
        let settings = GeneratorSettings::recursive_division(21, 21).with_patterns(blank_and_line());
        let mut rng = create_rng(seed);
        let level = LevelGenerator::new(settings)?.full_generate(&mut rng)?;

        let bounds = level.grid.bounds();
        assert!(bounds.perimeter().iter().all(|loc| level.grid.is_wall(*loc)));
        assert!(level.grid.is_connected());
        LevelGenerator::validate(&level)?;
    }
    Ok(())
}

#[test]
fn test_two_by_two_room_graph() -> ArenaResult<()> {
    let params = RoomGraphParams {
        number_of_nodes: Location::new(2, 2),
        percent_rooms: 1.0,
        ..Default::default()
    };
    let settings = GeneratorSettings::room_graph(params);
    let mut rng = create_rng(3);
    let level = LevelGenerator::new(settings)?.full_generate(&mut rng)?;

    let tunnels = level
        .filled_regions
        .iter()
        .filter(|filled| filled.kind == FillKind::Tunnel)
        .count();
    assert_eq!(level.regions.len(), 8);
    assert_eq!(tunnels, 4);
    assert_eq!(level.filled_regions.len() - tunnels, 4);
    LevelGenerator::validate(&level)?;
    Ok(())
}

#[test]
fn test_default_library_levels_validate() -> ArenaResult<()> {
    let presets = [
        GeneratorSettings::recursive_division(41, 25),
        GeneratorSettings::recursive_division(31, 21).with_wrap(true, false),
        GeneratorSettings::room_graph(RoomGraphParams::default()),
    ];
    for settings in presets {
        for seed in 0..5 {
            let mut rng = create_rng(seed);
            let level = LevelGenerator::new(settings.clone())?.full_generate(&mut rng)?;
            LevelGenerator::validate(&level)?;
            assert_eq!(
                level.filled_regions.len(),
                level.regions.len(),
                "every region is filled exactly once"
            );
        }
    }
    Ok(())
}

#[test]
fn test_mirrored_level_stays_valid() -> ArenaResult<()> {
    let mut rng = create_rng(21);
    let level = LevelGenerator::new(GeneratorSettings::recursive_division(31, 21))?
        .full_generate(&mut rng)?;
    let mirrored = level.mirror_y();
    LevelGenerator::validate(&mirrored)?;
    assert_eq!(mirrored.grid.holes().len(), level.grid.holes().len());
    assert_eq!(mirrored.mirror_y(), level);
    Ok(())
}

#[test]
fn test_full_pipeline_places_spawns() {
    let spawns = SpawnSettings {
        powerups: 2,
        waypoints: 2,
        ..Default::default()
    };
    // A level without room for every spawn is regenerated with the next seed.
    let placed = (0..10).find_map(|seed| {
        let settings = GeneratorSettings::recursive_division(41, 25);
        let mut rng = create_rng(seed);
        let level = LevelGenerator::new(settings).ok()?.full_generate(&mut rng).ok()?;
        let mut placer = SpawnPlacer::new(&level.grid, spawns.clone());
        let layout = placer.generate_spawns(&level.filled_regions, 2, &mut rng).ok()?;
        Some((level, layout))
    });

    let (level, layout) = placed.expect("no seed produced a level with room for spawns");
    assert_eq!(layout.team_count(), 2);
    assert_eq!(layout.powerups.len(), 2);
    assert_eq!(layout.waypoints.len(), 2);
    let all = layout
        .team_spawns
        .iter()
        .flatten()
        .chain(&layout.powerups)
        .chain(&layout.waypoints);
    for loc in all {
        assert!(level.grid.is_open(*loc), "spawn {:?} is inside a wall", loc);
    }
}

//! # Arenagen Debug Viewer
//!
//! Generates one level, places spawns on it and prints the result as ASCII.

use arenagen::generation::utils::{create_rng, random_seed};
use arenagen::{
    ArenaResult, GeneratedLevel, GeneratorSettings, LevelGenerator, Location, RoomGraphParams,
    SpawnLayout, SpawnPlacer,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GeneratorChoice {
    /// Recursive-division maze
    Rd,
    /// Rooms joined by corridors
    Rooms,
}

/// Command line arguments for the arena generator.
#[derive(Parser, Debug)]
#[command(name = "arenagen")]
#[command(about = "Procedural arena levels with fair spawn placement")]
#[command(version)]
struct Args {
    /// Random seed for generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON settings file; overrides --generator, --width and --height
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Base-layout algorithm
    #[arg(short, long, value_enum, default_value = "rd")]
    generator: GeneratorChoice,

    #[arg(long, default_value_t = arenagen::config::DEFAULT_LEVEL_WIDTH)]
    width: i32,

    #[arg(long, default_value_t = arenagen::config::DEFAULT_LEVEL_HEIGHT)]
    height: i32,

    /// Number of team bases to place
    #[arg(short, long, default_value_t = 2)]
    teams: usize,

    /// Mark holes in the printed grid
    #[arg(long)]
    holes: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes `env_logger`, letting `RUST_LOG` override the flag.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();
}

fn build_settings(args: &Args) -> ArenaResult<GeneratorSettings> {
    if let Some(path) = &args.settings {
        return GeneratorSettings::load(path);
    }
    let settings = match args.generator {
        GeneratorChoice::Rd => GeneratorSettings::recursive_division(args.width, args.height),
        GeneratorChoice::Rooms => {
            let params = RoomGraphParams::default();
            // Fit as many nodes as the requested size allows.
            let stride = params.stride();
            let nodes = Location::new(
                ((args.width - 2 + params.tunnel_length) / stride.x).max(1),
                ((args.height - 2 + params.tunnel_length) / stride.y).max(1),
            );
            let mut settings = GeneratorSettings::room_graph(RoomGraphParams {
                number_of_nodes: nodes,
                ..params
            });
            settings.width = args.width;
            settings.height = args.height;
            settings
        }
    };
    settings.validate()?;
    Ok(settings)
}

fn run(args: &Args) -> ArenaResult<()> {
    let seed = args.seed.unwrap_or_else(random_seed);
    let settings = build_settings(args)?;
    log::info!(
        "arenagen v{}: {}x{} level with seed {}",
        arenagen::VERSION,
        settings.width,
        settings.height,
        seed
    );

    let mut rng = create_rng(seed);
    let mut generator = LevelGenerator::new(settings.clone())?;
    let level = generator.full_generate(&mut rng)?;
    LevelGenerator::validate(&level)?;

    let mut placer = SpawnPlacer::new(&level.grid, settings.spawns.clone());
    let layout = placer.generate_spawns(&level.filled_regions, args.teams, &mut rng)?;

    print!("{}", render(&level, &layout, args.holes));
    print_summary(generator.generator_type(), &level, &layout);
    Ok(())
}

/// Overlays spawns on the grid: digits for team bases, `P` powerups, `w` waypoints.
fn render(level: &GeneratedLevel, layout: &SpawnLayout, show_holes: bool) -> String {
    let mut rows: Vec<Vec<char>> = level
        .grid
        .render_ascii(show_holes)
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    let mut mark = |loc: &Location, glyph: char| {
        if let Some(cell) = rows
            .get_mut(loc.y as usize)
            .and_then(|row| row.get_mut(loc.x as usize))
        {
            *cell = glyph;
        }
    };
    for loc in &layout.waypoints {
        mark(loc, 'w');
    }
    for loc in &layout.powerups {
        mark(loc, 'P');
    }
    for (team, cells) in layout.team_spawns.iter().enumerate() {
        let glyph = std::char::from_digit((team % 10) as u32, 10).unwrap_or('T');
        for loc in cells {
            mark(loc, glyph);
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>() + "\n")
        .collect()
}

fn print_summary(generator: &str, level: &GeneratedLevel, layout: &SpawnLayout) {
    println!();
    println!(
        "{}: {} regions, {} holes",
        generator,
        level.regions.len(),
        level.grid.holes().len()
    );
    for filled in &level.filled_regions {
        println!("  {:?} {:?}", filled.kind, filled.covering);
    }
    for (team, region) in layout.team_regions.iter().enumerate() {
        println!("Team {}: {:?}", team, region);
    }
    println!("Powerups: {:?}", layout.powerups);
    println!("Waypoints: {:?}", layout.waypoints);
}

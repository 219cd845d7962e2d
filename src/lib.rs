//! # Arenagen
//!
//! Procedural level generation for 2D side-view arena games.
//!
//! ## Architecture Overview
//!
//! A level is built in two passes over a boolean occupancy grid:
//!
//! - **Base layout**: a recursive-division maze or a room/corridor graph carves the grid
//!   into rectangular regions joined by single-cell holes
//! - **Fill patterns**: every region is scored against a library of patterns and the most
//!   suitable one adds walls and spawn candidates to it
//!
//! A [`SpawnPlacer`] then turns the candidates into team bases, powerups and waypoints,
//! choosing team bases so that every team is about as far from the others.
//!
//! All randomness flows through an explicit `StdRng`, so a seed reproduces a level.

pub mod generation;
pub mod geometry;
pub mod spawning;

pub use generation::*;
pub use geometry::*;
pub use spawning::*;

/// Core error type for level generation.
#[derive(thiserror::Error, Debug)]
pub enum ArenaError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Settings are malformed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generator or placer used out of order
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A spawn category ran out of candidates
    #[error("Not enough {category:?} spawns: requested {requested}, {available} available")]
    NotEnoughSpawns {
        category: SpawnCategory,
        requested: usize,
        available: usize,
    },
}

/// Result type used throughout the arenagen codebase.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation configuration constants.
pub mod config {
    /// Default level width in cells
    pub const DEFAULT_LEVEL_WIDTH: i32 = 41;

    /// Default level height in cells
    pub const DEFAULT_LEVEL_HEIGHT: i32 = 25;

    /// Most teams a level provides bases for
    pub const MAX_TEAMS: usize = 8;

    /// Score multiplier applied per earlier use of a spawn cell
    pub const USED_SCALE: f64 = 0.8;

    /// Logarithm base used to compress spawn distances
    pub const LOG_BASE: f64 = 2.0;

    /// Score of any candidate when nothing has been placed yet
    pub const FIRST_PLACEMENT_SCORE: f64 = 1_000_000.0;

    pub const DEFAULT_POWERUP_COUNT: usize = 4;

    pub const DEFAULT_WAYPOINT_COUNT: usize = 6;

    /// Room-graph re-rolls before giving up on placing a single room
    pub const MAX_GRAPH_ATTEMPTS: u32 = 100;
}

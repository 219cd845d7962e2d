//! # Generation Module
//!
//! Procedural level generation: the occupancy grid, the fill-pattern library, the
//! settings that select between patterns, and the two base-layout algorithms.
//!
//! A run goes settings → [`LevelGenerator`] → [`GeneratedLevel`]; spawn placement in
//! [`crate::spawning`] consumes the filled regions of the result.

pub mod grid;
pub mod level;
pub mod patterns;
pub mod recursive_division;
pub mod room_graph;
pub mod settings;

pub use grid::*;
pub use level::*;
pub use patterns::*;
pub use recursive_division::*;
pub use room_graph::*;
pub use settings::*;

/// Helpers shared by generators and their callers.
pub mod utils {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use arenagen::generation::utils::create_rng;
    /// use rand::Rng;
    ///
    /// let a: u32 = create_rng(7).gen();
    /// let b: u32 = create_rng(7).gen();
    /// assert_eq!(a, b);
    /// ```
    pub fn create_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// A seed from the system entropy source, for runs that don't ask for one.
    pub fn random_seed() -> u64 {
        rand::random()
    }
}

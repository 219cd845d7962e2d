//! # Geometry Module
//!
//! Value types the generators work with: rounded numeric intervals, integer grid
//! locations, and rectangular regions of cells.

pub mod interval;
pub mod location;
pub mod region;

pub use interval::*;
pub use location::*;
pub use region::*;

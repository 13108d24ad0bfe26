//! # Utilities Module
//!
//! Utility functions for mathematics, pathfinding, and general game operations.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;

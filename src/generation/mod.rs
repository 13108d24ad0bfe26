//! # Generation Module
//!
//! Procedural content generation: room shapes, dungeon layout, monsters and items.
//!
//! A dungeon is built in one pass from a seeded [`StdRng`]. The same seed and
//! configuration always produce the same map, rooms and spawns.

pub mod dungeon;
pub mod encounters;
pub mod items;
pub mod shapes;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;
pub use shapes::*;

use crate::config::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_MAX_ITEMS_PER_ROOM,
    DEFAULT_MAX_MONSTERS_PER_ROOM, DEFAULT_MAX_ROOMS, DEFAULT_ROOM_MAX_SIZE,
    DEFAULT_ROOM_MIN_SIZE,
};
use crate::{CosmicError, CosmicResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Size of the room-kind roll; rolls are drawn from `0..ROOM_KIND_ROLL`.
pub const ROOM_KIND_ROLL: u32 = 100;

/// Configuration for procedural generation.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Map width in tiles
    pub map_width: i32,
    /// Map height in tiles
    pub map_height: i32,
    /// Room placement attempts; every attempt yields a room
    pub max_rooms: u32,
    /// Minimum room size (edge for rectangles, diameter for circles)
    pub room_min_size: i32,
    /// Maximum room size (edge for rectangles, diameter for circles)
    pub room_max_size: i32,
    /// Upper bound of the per-room monster roll
    pub max_monsters_per_room: u32,
    /// Upper bound of the per-room item roll
    pub max_items_per_room: u32,
    /// Share of the room-kind roll that yields rectangles
    pub rect_room_weight: u32,
    /// Share of the room-kind roll, after the rectangles, that yields circles
    pub circle_room_weight: u32,
    /// Probability that a wall tile starts out slimy
    pub slimy_wall_chance: f64,
}

impl GenerationConfig {
    /// Creates the default configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!((config.map_width, config.map_height), (60, 29));
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            max_rooms: DEFAULT_MAX_ROOMS,
            room_min_size: DEFAULT_ROOM_MIN_SIZE,
            room_max_size: DEFAULT_ROOM_MAX_SIZE,
            max_monsters_per_room: DEFAULT_MAX_MONSTERS_PER_ROOM,
            max_items_per_room: DEFAULT_MAX_ITEMS_PER_ROOM,
            rect_room_weight: 85,
            circle_room_weight: 15,
            slimy_wall_chance: 0.0,
        }
    }

    /// Creates a configuration for testing with smaller, sparser levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            map_width: 40,
            map_height: 24,
            max_rooms: 10,
            room_min_size: 4,
            room_max_size: 8,
            max_monsters_per_room: 2,
            max_items_per_room: 3,
            ..Self::new(seed)
        }
    }

    /// Checks that every room the configuration can roll fits on the map.
    pub fn validate(&self) -> CosmicResult<()> {
        let fail = |reason: String| Err(CosmicError::Configuration(reason));

        if self.max_rooms == 0 {
            return fail("max_rooms must allow at least one room".to_string());
        }
        if self.room_min_size < 2 {
            return fail(format!(
                "room_min_size {} leaves no interior",
                self.room_min_size
            ));
        }
        if self.room_min_size > self.room_max_size {
            return fail(format!(
                "room_min_size {} exceeds room_max_size {}",
                self.room_min_size, self.room_max_size
            ));
        }
        // Rectangles need `map - size - 1 >= 0` for the corner roll
        if self.room_max_size >= self.map_width || self.room_max_size >= self.map_height {
            return fail(format!(
                "rooms up to {} tiles do not fit a {}x{} map",
                self.room_max_size, self.map_width, self.map_height
            ));
        }
        // Circles need `radius + 1 <= map - radius - 1` for the center roll
        let max_radius = self.room_max_size / 2;
        if self.circle_room_weight > 0
            && (2 * max_radius + 2 > self.map_width || 2 * max_radius + 2 > self.map_height)
        {
            return fail(format!(
                "circle radius {} does not fit a {}x{} map",
                max_radius, self.map_width, self.map_height
            ));
        }
        if self.rect_room_weight + self.circle_room_weight > ROOM_KIND_ROLL {
            return fail(format!(
                "room weights {} + {} exceed {}",
                self.rect_room_weight, self.circle_room_weight, ROOM_KIND_ROLL
            ));
        }
        if !(0.0..=1.0).contains(&self.slimy_wall_chance) {
            return fail(format!(
                "slimy_wall_chance {} is not a probability",
                self.slimy_wall_chance
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CosmicResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CosmicResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

//! # Cosmic Chaos
//!
//! Simulation core of a turn-based, grid-based roguelike.
//!
//! ## Architecture Overview
//!
//! The crate owns the rules of the game and nothing else. Drawing, key decoding and
//! message wrapping live in whatever presentation layer sits on top; it talks to the
//! core through plain data:
//!
//! - **Game**: tiles, entities with optional capabilities, combat, AI and the turn engine
//! - **Generation**: rectangle/circle rooms, L-shaped tunnels and weighted spawn tables
//! - **Input**: the intents the turn engine accepts, plus a small text command parser
//! - **Utils**: A* pathfinding with a greedy fallback, weighted choice and step math
//!
//! A session is built once from a seed, then driven one intent at a time:
//!
//! ```
//! use cosmic_chaos::{GameConfig, GameSession, Intent, Message, TurnPhase};
//!
//! let mut session = GameSession::new(GameConfig::for_testing(7)).unwrap();
//! let mut log: Vec<Message> = Vec::new();
//! let report = session.process_intent(Intent::Pickup, &mut log).unwrap();
//! assert!(!report.exit);
//! assert_ne!(session.state().phase, TurnPhase::PlayerDead);
//! ```

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

pub use game::{
    // From entities and appearance
    Appearance,
    Capability,
    Combatant,
    Entity,
    EntityId,
    Inventory,
    RenderOrder,
    // From events
    GameEvent,
    Message,
    MessageLog,
    MessageTone,
    // From state and turn
    GameConfig,
    GameSession,
    GameState,
    TurnPhase,
    TurnReport,
    // From world
    Position,
    Tile,
    TileMap,
};

pub use generation::{Dungeon, DungeonGenerator, GenerationConfig, Generator, RoomShape};

/// Core error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum CosmicError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters are impossible to satisfy
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A tile query fell outside the map
    #[error("Position ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Result type used throughout the crate.
pub type CosmicResult<T> = Result<T, CosmicError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default map width in tiles
    pub const DEFAULT_MAP_WIDTH: i32 = 60;

    /// Default map height in tiles
    pub const DEFAULT_MAP_HEIGHT: i32 = 29;

    /// Room placement attempts per dungeon
    pub const DEFAULT_MAX_ROOMS: u32 = 30;

    /// Smallest room edge (rectangles) or diameter (circles)
    pub const DEFAULT_ROOM_MIN_SIZE: i32 = 6;

    /// Largest room edge (rectangles) or diameter (circles)
    pub const DEFAULT_ROOM_MAX_SIZE: i32 = 10;

    /// Upper bound of the per-room monster roll
    pub const DEFAULT_MAX_MONSTERS_PER_ROOM: u32 = 3;

    /// Upper bound of the per-room item roll
    pub const DEFAULT_MAX_ITEMS_PER_ROOM: u32 = 10;

    /// Field of view radius around the player
    pub const DEFAULT_FOV_RADIUS: i32 = 20;

    /// Player starting stats: hp, defense, power
    pub const DEFAULT_PLAYER_STATS: (i32, i32, i32) = (30, 2, 5);

    /// Player inventory slots
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 25;

    /// Paths this long or longer are ignored by monsters in favour of a straight step
    pub const MAX_PATH_STEPS: usize = 25;
}

//! # Input Module
//!
//! The intents the turn engine accepts and the presentation-side input that
//! produces them.

pub mod commands;

pub use commands::*;

use crate::{Direction, Position};
use serde::{Deserialize, Serialize};

/// One player decision handed to the turn engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Step (or attack) by a relative offset
    Move { dx: i32, dy: i32 },
    /// Pick up the item under the player
    Pickup,
    /// Open the inventory overlay
    ShowInventory,
    /// Use the inventory item in the given slot
    UseItem(usize),
    /// Close the overlay, or end the session
    Exit,
}

impl Intent {
    /// Movement intent for a compass direction.
    pub fn step(direction: Direction) -> Self {
        let delta = direction.to_delta();
        Intent::Move {
            dx: delta.x,
            dy: delta.y,
        }
    }
}

/// Player input types as decoded by a front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Move in a given direction (relative position)
    Move(Position),
    /// Pick up item at current position
    PickUp,
    /// Show inventory
    ShowInventory,
    /// Choose an inventory slot
    SelectItem(usize),
    /// Leave the current menu or quit
    Cancel,
    /// Window handling that never reaches the engine
    ToggleFullscreen,
}

impl PlayerInput {
    /// Translates the input into an engine intent.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{Intent, PlayerInput, Position};
    ///
    /// let intent = PlayerInput::Move(Position::new(1, -1)).into_intent();
    /// assert_eq!(intent, Some(Intent::Move { dx: 1, dy: -1 }));
    /// assert_eq!(PlayerInput::ToggleFullscreen.into_intent(), None);
    /// ```
    pub fn into_intent(self) -> Option<Intent> {
        match self {
            PlayerInput::Move(delta) => Some(Intent::Move {
                dx: delta.x,
                dy: delta.y,
            }),
            PlayerInput::PickUp => Some(Intent::Pickup),
            PlayerInput::ShowInventory => Some(Intent::ShowInventory),
            PlayerInput::SelectItem(slot) => Some(Intent::UseItem(slot)),
            PlayerInput::Cancel => Some(Intent::Exit),
            PlayerInput::ToggleFullscreen => None,
        }
    }
}

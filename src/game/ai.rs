//! # Monster AI
//!
//! Decision making for AI-controlled entities. Each behavior observes the world
//! and returns zero or more events; movement is applied in place.

use crate::{attack_in, move_astar, EntityId, Entity, GameEvent, Position, TileMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The available behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiBehavior {
    /// Closes in on the player when seen and attacks once adjacent
    BasicMelee,
}

/// Capability of an entity that acts on its own during the enemy phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiControlled {
    pub owner: EntityId,
    pub behavior: AiBehavior,
}

impl AiControlled {
    pub fn new(owner: EntityId, behavior: AiBehavior) -> Self {
        Self { owner, behavior }
    }

    /// Runs one turn for `entities[monster]` against `entities[player]`.
    ///
    /// `visible` is the player's current field of view; monsters outside it do
    /// nothing.
    pub fn take_turn(
        &self,
        monster: usize,
        player: usize,
        map: &TileMap,
        entities: &mut [Entity],
        visible: &HashSet<Position>,
    ) -> Vec<GameEvent> {
        match self.behavior {
            AiBehavior::BasicMelee => basic_melee(monster, player, map, entities, visible),
        }
    }
}

fn basic_melee(
    monster: usize,
    player: usize,
    map: &TileMap,
    entities: &mut [Entity],
    visible: &HashSet<Position>,
) -> Vec<GameEvent> {
    if monster == player || !visible.contains(&entities[monster].position) {
        return Vec::new();
    }

    if entities[monster].distance_to(&entities[player]) >= 2.0 {
        move_astar(map, entities, monster, player);
        Vec::new()
    } else if entities[player].is_alive() {
        attack_in(entities, monster, player)
    } else {
        Vec::new()
    }
}

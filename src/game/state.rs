//! # Game State Module
//!
//! Everything a running session knows about the world between two intents.
//!
//! The [`GameState`] owns the tile map and the entity list. List order is spawn
//! order, which is also the order monsters act in. The player is referenced by
//! id; its index is looked up whenever it is needed because picking up items
//! removes entities from the list.

use crate::{
    blocking_entity_at, Appearance, CosmicError, CosmicResult, Dungeon, Entity, EntityId,
    GameEvent, Message, MessageTone, Position, RenderOrder, TileMap,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which actor the engine is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for a player intent
    PlayersTurn,
    /// Monsters are acting
    EnemyTurn,
    /// The player has died; only the inventory overlay and exit remain
    PlayerDead,
    /// The inventory overlay is open
    ShowInventory,
}

/// Counters for the player's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Monsters turned into corpses
    pub monsters_slain: u32,
    /// Items picked up
    pub items_collected: u32,
    /// Items used up
    pub items_used: u32,
    /// Tiles walked by the player
    pub steps_taken: u64,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a drained game event.
    pub fn update_from_event(&mut self, event: &GameEvent, player_id: EntityId) {
        match event {
            GameEvent::Dead(id) if *id != player_id => self.monsters_slain += 1,
            GameEvent::ItemAdded(_) => self.items_collected += 1,
            GameEvent::ItemConsumed(_) => self.items_used += 1,
            _ => {}
        }
    }
}

/// What the presentation layer needs to draw one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderItem {
    pub position: Position,
    pub name: String,
    pub render_order: RenderOrder,
    pub token: &'static str,
    pub glyph: char,
}

/// Mutable world state of one session.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The dungeon floor
    pub map: TileMap,
    /// Every entity in the world, in spawn order
    pub entities: Vec<Entity>,
    /// The player entity ID
    pub player_id: EntityId,
    /// Current phase
    pub phase: TurnPhase,
    /// Phase to return to when the inventory overlay closes
    pub previous_phase: TurnPhase,
    /// Tiles the player currently sees
    pub visible: HashSet<Position>,
    /// Number of player turns that consumed time
    pub turn_number: u64,
    /// Progress counters
    pub statistics: GameStatistics,
}

impl GameState {
    /// Creates a state at the start of the player's turn.
    ///
    /// Fails when `player_id` is not in `entities`.
    pub fn new(map: TileMap, entities: Vec<Entity>, player_id: EntityId) -> CosmicResult<Self> {
        if !entities.iter().any(|entity| entity.id() == player_id) {
            return Err(CosmicError::InvalidState(
                "player is not part of the entity list".to_string(),
            ));
        }
        if let Some(stray) = entities.iter().find(|entity| !map.in_bounds(entity.position)) {
            return Err(CosmicError::OutOfBounds {
                x: stray.position.x,
                y: stray.position.y,
                width: map.width(),
                height: map.height(),
            });
        }

        Ok(Self {
            map,
            entities,
            player_id,
            phase: TurnPhase::PlayersTurn,
            previous_phase: TurnPhase::PlayersTurn,
            visible: HashSet::new(),
            turn_number: 0,
            statistics: GameStatistics::new(),
        })
    }

    /// Creates a state from a freshly generated dungeon.
    pub fn from_dungeon(dungeon: Dungeon) -> CosmicResult<Self> {
        Self::new(dungeon.map, dungeon.entities, dungeon.player_id)
    }

    /// Index of the entity with `id`.
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id() == id)
    }

    /// Index of the player in the entity list.
    pub fn player_index(&self) -> CosmicResult<usize> {
        self.index_of(self.player_id)
            .ok_or_else(|| CosmicError::InvalidState("No player found".to_string()))
    }

    pub fn player(&self) -> CosmicResult<&Entity> {
        let index = self.player_index()?;
        Ok(&self.entities[index])
    }

    pub fn player_mut(&mut self) -> CosmicResult<&mut Entity> {
        let index = self.player_index()?;
        Ok(&mut self.entities[index])
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    /// Whether the player currently sees `pos`.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }

    /// Index of the blocking entity on `pos`, if any.
    pub fn blocking_entity_at(&self, pos: Position) -> Option<usize> {
        blocking_entity_at(&self.entities, pos)
    }

    /// Takes an entity out of the world.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    /// Entities to draw, lowest render order first.
    ///
    /// The sort is stable, so entities of equal rank keep spawn order.
    pub fn render_list(&self) -> Vec<RenderItem> {
        let mut items: Vec<RenderItem> = self
            .entities
            .iter()
            .map(|entity| RenderItem {
                position: entity.position,
                name: entity.name.clone(),
                render_order: entity.render_order,
                token: entity.appearance.token,
                glyph: entity.appearance.glyph(),
            })
            .collect();
        items.sort_by_key(|item| item.render_order);
        items
    }

    /// Advances every entity and tile animation by one tick.
    pub fn tick_animations(&mut self) {
        for entity in &mut self.entities {
            entity.appearance.tick();
        }
        self.map.tick_animations();
    }

    /// Applies the consequences of a death and returns the message to log.
    ///
    /// The player keeps its place and render order but takes the corpse look,
    /// and the phase becomes [`TurnPhase::PlayerDead`]. A monster becomes a
    /// corpse. Entities that are already corpses or unknown yield nothing.
    pub fn handle_death(&mut self, id: EntityId) -> Option<Message> {
        if id == self.player_id {
            return self.kill_player();
        }
        self.kill_monster(id)
    }

    fn kill_player(&mut self) -> Option<Message> {
        let index = self.index_of(self.player_id)?;
        self.entities[index].appearance = Appearance::corpse();
        self.phase = TurnPhase::PlayerDead;
        log::info!("Player died on turn {}", self.turn_number);
        Some(Message::new("You died!", MessageTone::Danger))
    }

    fn kill_monster(&mut self, id: EntityId) -> Option<Message> {
        let index = self.index_of(id)?;
        let monster = &mut self.entities[index];
        let name = monster.name.clone();
        if !monster.become_corpse() {
            return None;
        }
        log::debug!("{} died at {:?}", name, monster.position);
        Some(Message::new(format!("{name} is dead!"), MessageTone::Warning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AiBehavior, Capability, Tile};

    fn small_state() -> GameState {
        let map = TileMap::new_with(8, 8, |_| Tile::ground());
        let player = Entity::new(
            Position::new(2, 2),
            "Player",
            true,
            RenderOrder::Actor,
            Appearance::fixed("player", &['@']),
        )
        .with_combatant(30, 2, 5)
        .with_inventory(25);
        let player_id = player.id();
        let pill = Entity::new(
            Position::new(2, 2),
            "Healing Pill",
            false,
            RenderOrder::Item,
            Appearance::fixed("heal_pills", &['!']),
        );
        let trooper = Entity::new(
            Position::new(4, 4),
            "Trooper",
            true,
            RenderOrder::Actor,
            Appearance::fixed("trooper", &['T']),
        )
        .with_combatant(10, 0, 3)
        .with_ai(AiBehavior::BasicMelee);
        GameState::new(map, vec![player, pill, trooper], player_id).unwrap()
    }

    #[test]
    fn test_game_state_creation() {
        let state = small_state();
        assert_eq!(state.turn_number, 0);
        assert_eq!(state.phase, TurnPhase::PlayersTurn);
        assert_eq!(state.player_index().unwrap(), 0);
        assert_eq!(state.player().unwrap().name, "Player");
    }

    #[test]
    fn test_missing_player_is_rejected() {
        let map = TileMap::new(4, 4);
        let result = GameState::new(map, Vec::new(), crate::new_entity_id());
        assert!(matches!(result, Err(CosmicError::InvalidState(_))));
    }

    #[test]
    fn test_entities_off_map_are_rejected() {
        let map = TileMap::new(4, 4);
        let player = Entity::new(
            Position::new(9, 9),
            "Player",
            true,
            RenderOrder::Actor,
            Appearance::fixed("player", &['@']),
        );
        let id = player.id();
        let result = GameState::new(map, vec![player], id);
        assert!(matches!(result, Err(CosmicError::OutOfBounds { x: 9, y: 9, .. })));
    }

    #[test]
    fn test_render_list_sorted_by_order() {
        let state = small_state();
        let orders: Vec<_> = state.render_list().iter().map(|item| item.render_order).collect();
        assert_eq!(orders, vec![RenderOrder::Item, RenderOrder::Actor, RenderOrder::Actor]);
        assert_eq!(state.render_list()[1].glyph, '@');
    }

    #[test]
    fn test_monster_death_is_reported_once() {
        let mut state = small_state();
        let trooper_id = state.entities[2].id();
        state.entities[2].combatant_mut().unwrap().hp = 0;

        let message = state.handle_death(trooper_id).unwrap();
        assert_eq!(message.text, "Trooper is dead!");
        assert!(!state.entities[2].has(Capability::AiControlled));
        assert_eq!(state.blocking_entity_at(Position::new(4, 4)), None);
        assert!(state.handle_death(trooper_id).is_none());
        assert_eq!(state.phase, TurnPhase::PlayersTurn);
    }

    #[test]
    fn test_player_death_changes_phase() {
        let mut state = small_state();
        let message = state.handle_death(state.player_id).unwrap();
        assert_eq!(message, Message::new("You died!", MessageTone::Danger));
        assert_eq!(state.phase, TurnPhase::PlayerDead);
        let player = state.player().unwrap();
        assert_eq!(player.render_order, RenderOrder::Actor);
        assert_eq!(player.appearance.glyph(), '%');
    }

    #[test]
    fn test_remove_entity() {
        let mut state = small_state();
        let pill_id = state.entities[1].id();
        assert!(state.remove_entity(pill_id).is_some());
        assert!(state.remove_entity(pill_id).is_none());
        assert_eq!(state.entities.len(), 2);
        assert_eq!(state.player_index().unwrap(), 0);
    }

    #[test]
    fn test_statistics_update() {
        let mut stats = GameStatistics::new();
        let player_id = crate::new_entity_id();
        stats.update_from_event(&GameEvent::Dead(crate::new_entity_id()), player_id);
        stats.update_from_event(&GameEvent::Dead(player_id), player_id);
        stats.update_from_event(&GameEvent::ItemAdded(crate::new_entity_id()), player_id);
        assert_eq!(stats.monsters_slain, 1);
        assert_eq!(stats.items_collected, 1);
        assert_eq!(stats.items_used, 0);
    }
}

//! # Turn Engine
//!
//! Sequences one player intent, its consequences, and the monsters' reply.
//!
//! Every call to [`GameSession::process_intent`] runs synchronously to
//! completion: the player's action produces an ordered list of events, those
//! are drained into the state and the message log, and if the turn passed to
//! the enemies every AI-controlled entity acts in list order before control
//! returns to the player.

use crate::config::DEFAULT_FOV_RADIUS;
use crate::{
    attack_in, create_rng, item_at, BasicFov, Components, CosmicError, CosmicResult,
    DungeonGenerator, FieldOfView, FovAlgorithm, GameEvent, GameState, GenerationConfig,
    Generator, Intent, MessageLog, MessageTone, PlayerTemplate, Position, TurnPhase,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to start a session.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Dungeon layout and spawn parameters
    pub generation: GenerationConfig,
    /// Sight radius around the player; zero or less is unlimited
    pub fov_radius: i32,
    /// Whether walls at the edge of sight are visible
    pub fov_light_walls: bool,
    /// Visibility algorithm
    pub fov_algorithm: FovAlgorithm,
    /// Player starting stats
    pub player: PlayerTemplate,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            fov_radius: DEFAULT_FOV_RADIUS,
            fov_light_walls: true,
            fov_algorithm: FovAlgorithm::LineOfSight,
            player: PlayerTemplate::default(),
        }
    }
}

impl GameConfig {
    /// Default configuration with the given dungeon seed.
    pub fn new(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::new(seed),
            ..Self::default()
        }
    }

    /// Small dungeon for tests.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            generation: GenerationConfig::for_testing(seed),
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> CosmicResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CosmicResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> CosmicResult<()> {
        self.generation.validate()?;
        if self.player.hp <= 0 {
            return Err(CosmicError::Configuration(format!(
                "player hp {} must be positive",
                self.player.hp
            )));
        }
        Ok(())
    }
}

/// What one intent produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    /// Every drained event in order, including engine messages
    pub events: Vec<GameEvent>,
    /// The player asked to end the session
    pub exit: bool,
}

/// A running game: state, configuration and the visibility collaborator.
pub struct GameSession {
    state: GameState,
    config: GameConfig,
    fov: Box<dyn FieldOfView>,
}

impl GameSession {
    /// Generates a dungeon and starts a session on it.
    pub fn new(config: GameConfig) -> CosmicResult<Self> {
        Self::with_fov(config, Box::new(BasicFov))
    }

    /// Like [`GameSession::new`] with a custom field-of-view implementation.
    pub fn with_fov(config: GameConfig, fov: Box<dyn FieldOfView>) -> CosmicResult<Self> {
        config.validate()?;
        let generator = DungeonGenerator::new(config.player.clone());
        let mut rng = create_rng(&config.generation);
        let dungeon = generator.generate(&config.generation, &mut rng)?;
        let state = GameState::from_dungeon(dungeon)?;

        log::info!(
            "Starting session with seed {} using {}",
            config.generation.seed,
            generator.generator_type()
        );
        Self::assemble(state, config, fov)
    }

    /// Starts a session on a prepared state.
    pub fn from_state(state: GameState, config: GameConfig) -> CosmicResult<Self> {
        Self::assemble(state, config, Box::new(BasicFov))
    }

    fn assemble(
        state: GameState,
        config: GameConfig,
        fov: Box<dyn FieldOfView>,
    ) -> CosmicResult<Self> {
        let mut session = Self { state, config, fov };
        session.recompute_fov()?;
        Ok(session)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Recomputes the visible set from the player's position and marks it explored.
    pub fn recompute_fov(&mut self) -> CosmicResult<()> {
        let origin = self.state.player()?.position;
        let visible = self.fov.compute_visibility(
            &self.state.map,
            origin,
            self.config.fov_radius,
            self.config.fov_light_walls,
            self.config.fov_algorithm,
        );
        self.state.map.mark_explored(&visible);
        self.state.visible = visible;
        Ok(())
    }

    /// Resolves one intent.
    ///
    /// Messages are forwarded to `log` in the order they happen and also
    /// recorded in the returned report. Recoverable failures (full inventory,
    /// useless item, wrong phase) never surface as errors; an `Err` means the
    /// state itself is broken.
    pub fn process_intent<L>(&mut self, intent: Intent, log: &mut L) -> CosmicResult<TurnReport>
    where
        L: MessageLog + ?Sized,
    {
        let mut report = TurnReport::default();

        let results = match intent {
            Intent::Move { dx, dy } => self.player_move(dx, dy)?,
            Intent::Pickup => self.pickup()?,
            Intent::ShowInventory => {
                self.show_inventory();
                Vec::new()
            }
            Intent::UseItem(index) => self.use_item(index)?,
            Intent::Exit => {
                if self.state.phase == TurnPhase::ShowInventory {
                    self.set_phase(self.state.previous_phase);
                } else {
                    log::info!("Exit requested on turn {}", self.state.turn_number);
                    report.exit = true;
                }
                return Ok(report);
            }
        };

        let player_died = self.drain(results, log, &mut report);
        if !player_died && self.state.phase == TurnPhase::EnemyTurn {
            self.enemy_phase(log, &mut report)?;
        }

        Ok(report)
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        if self.state.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.state.phase, phase);
            self.state.phase = phase;
        }
    }

    /// A zero offset spends the turn in place. Offsets beyond one tile per
    /// axis are rejected without costing the turn.
    fn player_move(&mut self, dx: i32, dy: i32) -> CosmicResult<Vec<GameEvent>> {
        if self.state.phase != TurnPhase::PlayersTurn {
            log::warn!("Ignoring move during {:?}", self.state.phase);
            return Ok(Vec::new());
        }
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) {
            log::warn!("Ignoring move by ({}, {}): more than one tile", dx, dy);
            return Ok(Vec::new());
        }

        let player = self.state.player_index()?;
        let destination = self.state.entities[player].position + Position::new(dx, dy);
        if self.state.map.is_blocked(destination) {
            log::debug!("Move into {:?} blocked by terrain", destination);
            return Ok(Vec::new());
        }

        let events = if dx == 0 && dy == 0 {
            Vec::new()
        } else if let Some(target) = self.state.blocking_entity_at(destination) {
            attack_in(&mut self.state.entities, player, target)
        } else {
            self.state.entities[player].position = destination;
            self.state.statistics.steps_taken += 1;
            // Monsters act on the view from the new tile
            self.recompute_fov()?;
            Vec::new()
        };

        self.set_phase(TurnPhase::EnemyTurn);
        self.state.tick_animations();
        Ok(events)
    }

    fn pickup(&mut self) -> CosmicResult<Vec<GameEvent>> {
        if self.state.phase != TurnPhase::PlayersTurn {
            log::warn!("Ignoring pickup during {:?}", self.state.phase);
            return Ok(Vec::new());
        }

        let player = self.state.player_index()?;
        let position = self.state.entities[player].position;
        let Some(item_index) = item_at(&self.state.entities, position) else {
            return Ok(vec![GameEvent::message(
                "There is nothing to pick up here.",
                MessageTone::Notice,
            )]);
        };

        let item = self.state.entities[item_index].clone();
        let inventory = self.state.entities[player]
            .inventory_mut()
            .ok_or_else(|| CosmicError::InvalidState("player has no inventory".to_string()))?;

        Ok(match inventory.add_item(&item) {
            Ok(events) => events,
            Err(err) => vec![GameEvent::message(err.to_string(), MessageTone::Warning)],
        })
    }

    fn show_inventory(&mut self) {
        if self.state.phase == TurnPhase::ShowInventory {
            return;
        }
        self.state.previous_phase = self.state.phase;
        self.set_phase(TurnPhase::ShowInventory);
    }

    fn use_item(&mut self, index: usize) -> CosmicResult<Vec<GameEvent>> {
        let acting = match self.state.phase {
            TurnPhase::ShowInventory => self.state.previous_phase,
            phase => phase,
        };
        if acting != TurnPhase::PlayersTurn {
            log::warn!("Ignoring item use during {:?}", acting);
            return Ok(Vec::new());
        }

        let player = self.state.player_mut()?;
        let Components {
            inventory,
            combatant,
            ..
        } = &mut player.components;
        let (Some(inventory), Some(fighter)) = (inventory.as_mut(), combatant.as_mut()) else {
            return Err(CosmicError::InvalidState(
                "player cannot carry or use items".to_string(),
            ));
        };

        if index >= inventory.len() {
            log::warn!("No item in inventory slot {}", index);
            return Ok(Vec::new());
        }

        Ok(match inventory.use_item(index, fighter) {
            Ok(events) => events,
            Err(err) => vec![GameEvent::message(err.to_string(), MessageTone::Warning)],
        })
    }

    /// Applies events in order. Returns `true` when the player died, in which
    /// case the remaining events are dropped.
    fn drain<L>(&mut self, events: Vec<GameEvent>, log: &mut L, report: &mut TurnReport) -> bool
    where
        L: MessageLog + ?Sized,
    {
        for event in events {
            self.state
                .statistics
                .update_from_event(&event, self.state.player_id);
            report.events.push(event.clone());

            match event {
                GameEvent::Message(message) => log.add_message(message),
                GameEvent::Dead(id) => {
                    if let Some(message) = self.state.handle_death(id) {
                        report.events.push(GameEvent::Message(message.clone()));
                        log.add_message(message);
                    }
                    if id == self.state.player_id {
                        return true;
                    }
                }
                GameEvent::ItemAdded(id) => {
                    self.state.remove_entity(id);
                    self.set_phase(TurnPhase::EnemyTurn);
                }
                GameEvent::ItemConsumed(_) => self.set_phase(TurnPhase::EnemyTurn),
            }
        }
        false
    }

    fn enemy_phase<L>(&mut self, log: &mut L, report: &mut TurnReport) -> CosmicResult<()>
    where
        L: MessageLog + ?Sized,
    {
        self.state.turn_number += 1;
        let player = self.state.player_index()?;
        let mut player_died = false;

        let mut index = 0;
        while index < self.state.entities.len() {
            if let Some(ai) = self.state.entities[index].components.ai.clone() {
                let events = ai.take_turn(
                    index,
                    player,
                    &self.state.map,
                    &mut self.state.entities,
                    &self.state.visible,
                );
                if self.drain(events, log, report) {
                    player_died = true;
                    break;
                }
            }
            index += 1;
        }

        if !player_died {
            self.set_phase(TurnPhase::PlayersTurn);
        }
        Ok(())
    }
}

//! # Encounter Generation
//!
//! Monster and player templates, and the room populator that scatters monsters
//! and items over freshly carved rooms.

use crate::config::{DEFAULT_INVENTORY_CAPACITY, DEFAULT_PLAYER_STATS};
use crate::{
    entity_at, AiBehavior, Appearance, CosmicResult, Entity, GenerationConfig, ItemTemplate,
    Position, RenderOrder, Shape, WeightedTable,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ticks per frame of an animated monster.
pub const MONSTER_ANIMATION_PERIOD: u32 = 5;

/// Compiled-in monster kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub token: &'static str,
    pub glyphs: &'static [char],
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub behavior: AiBehavior,
}

/// The common foot soldier.
pub const TROOPER: MonsterTemplate = MonsterTemplate {
    name: "Trooper",
    token: "trooper",
    glyphs: &['T', 'r', 'o', 'o', 'p', 'e', 'r'],
    hp: 10,
    defense: 0,
    power: 3,
    behavior: AiBehavior::BasicMelee,
};

/// The rare armoured brute.
pub const JUGGERNAUT: MonsterTemplate = MonsterTemplate {
    name: "Juggernaut",
    token: "juggernaut",
    glyphs: &['J', 'u', 'g', 'g', 'e', 'r', 'n', 'a', 'u', 't'],
    hp: 15,
    defense: 1,
    power: 4,
    behavior: AiBehavior::BasicMelee,
};

impl MonsterTemplate {
    /// Builds a blocking, animated monster at `position`.
    pub fn spawn<R: Rng + ?Sized>(&self, position: Position, rng: &mut R) -> Entity {
        Entity::new(
            position,
            self.name,
            true,
            RenderOrder::Actor,
            Appearance::animated(self.token, self.glyphs, MONSTER_ANIMATION_PERIOD, rng),
        )
        .with_combatant(self.hp, self.defense, self.power)
        .with_ai(self.behavior)
    }
}

/// Monster spawn table: troopers nine times out of ten.
pub fn default_monster_table() -> WeightedTable<MonsterTemplate> {
    WeightedTable::new().with(TROOPER, 0.9).with(JUGGERNAUT, 0.1)
}

/// Starting stats of the player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTemplate {
    pub name: String,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub inventory_capacity: usize,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        let (hp, defense, power) = DEFAULT_PLAYER_STATS;
        Self {
            name: "Player".to_string(),
            hp,
            defense,
            power,
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
        }
    }
}

impl PlayerTemplate {
    /// Builds the player entity at `position`.
    pub fn spawn(&self, position: Position) -> Entity {
        Entity::new(
            position,
            self.name.clone(),
            true,
            RenderOrder::Actor,
            Appearance::fixed("player", &['@']),
        )
        .with_combatant(self.hp, self.defense, self.power)
        .with_inventory(self.inventory_capacity)
    }
}

/// Scatters monsters and items over a room.
#[derive(Debug, Clone)]
pub struct RoomPopulator {
    pub monsters: WeightedTable<MonsterTemplate>,
    pub items: WeightedTable<ItemTemplate>,
}

impl Default for RoomPopulator {
    fn default() -> Self {
        Self {
            monsters: default_monster_table(),
            items: crate::default_item_table(),
        }
    }
}

impl RoomPopulator {
    /// Rolls monster and item counts and places each on a random interior tile.
    ///
    /// A candidate tile that already holds any entity is skipped, not retried.
    /// Returns the number of entities added.
    pub fn populate<R: Rng>(
        &self,
        room: &dyn Shape,
        entities: &mut Vec<Entity>,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> CosmicResult<usize> {
        let monster_count = rng.gen_range(0..=config.max_monsters_per_room);
        let item_count = rng.gen_range(0..=config.max_items_per_room);
        let before = entities.len();

        for _ in 0..monster_count {
            let position = room.random_location(&mut *rng)?;
            if entity_at(entities, position).is_some() {
                log::trace!("monster spot {:?} already taken", position);
                continue;
            }
            if let Some(template) = self.monsters.choose(rng) {
                entities.push(template.spawn(position, rng));
            }
        }

        for _ in 0..item_count {
            let position = room.random_location(&mut *rng)?;
            if entity_at(entities, position).is_some() {
                log::trace!("item spot {:?} already taken", position);
                continue;
            }
            if let Some(template) = self.items.choose(rng) {
                entities.push(template.spawn(position));
            }
        }

        let added = entities.len() - before;
        log::debug!(
            "populated room at {:?}: {} of {} monsters and items placed",
            room.center(),
            added,
            monster_count + item_count
        );
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Capability, Rectangle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_monster_templates() {
        let mut rng = StdRng::seed_from_u64(3);
        let trooper = TROOPER.spawn(Position::new(2, 3), &mut rng);
        assert!(trooper.blocks);
        assert!(trooper.has(Capability::AiControlled));
        assert_eq!(trooper.combatant().unwrap().max_hp, 10);
        assert!(trooper.appearance.is_animated());
        let clock = trooper.appearance.animation.as_ref().unwrap().clock;
        assert!(clock < MONSTER_ANIMATION_PERIOD);

        let juggernaut = JUGGERNAUT.spawn(Position::new(0, 0), &mut rng);
        let stats = juggernaut.combatant().unwrap();
        assert_eq!((stats.hp, stats.defense, stats.power), (15, 1, 4));
    }

    #[test]
    fn test_default_player() {
        let player = PlayerTemplate::default().spawn(Position::new(1, 1));
        let stats = player.combatant().unwrap();
        assert_eq!((stats.hp, stats.defense, stats.power), (30, 2, 5));
        assert_eq!(player.inventory().unwrap().capacity, 25);
        assert_eq!(player.appearance.glyph(), '@');
        assert_eq!(player.render_order, RenderOrder::Actor);
    }

    #[test]
    fn test_monster_table_weights() {
        let table = default_monster_table();
        let weights: Vec<_> = table.iter().map(|(m, w)| (m.name, w)).collect();
        assert_eq!(weights, vec![("Trooper", 0.9), ("Juggernaut", 0.1)]);
    }

    #[test]
    fn test_populate_never_stacks_entities() {
        let config = GenerationConfig {
            max_monsters_per_room: 6,
            max_items_per_room: 10,
            ..GenerationConfig::new(0)
        };
        let room = Rectangle::new(0, 0, 4, 4); // 3x3 interior
        let populator = RoomPopulator::default();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut entities = vec![PlayerTemplate::default().spawn(room.center())];
            populator
                .populate(&room, &mut entities, &config, &mut rng)
                .unwrap();

            assert!(entities.len() <= 9);
            for (i, a) in entities.iter().enumerate() {
                assert!(room.interior_tiles().contains(&a.position));
                for b in &entities[i + 1..] {
                    assert_ne!(a.position, b.position);
                }
            }
        }
    }
}

//! # Entity System
//!
//! Generic positioned actors composed of optional capabilities.
//!
//! An [`Entity`] owns its components. Each component remembers the id of the
//! entity that owns it, which is a plain relation and never an owning pointer.
//! What an entity *is* follows from what it carries:
//!
//! - no components: passive prop
//! - Combatant + AiControlled: monster
//! - Combatant + Inventory: player
//! - UsableItem: consumable

use crate::{new_entity_id, AiBehavior, AiControlled, Appearance, EntityId, Inventory, ItemEffect, Position, UsableItem};
use serde::{Deserialize, Serialize};

/// Drawing priority; higher ranks are drawn on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse = 1,
    Item = 2,
    Actor = 3,
}

/// Capability kinds an entity may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Combatant,
    AiControlled,
    Inventory,
    UsableItem,
}

/// Hit points and melee stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    /// Entity carrying this component
    pub owner: EntityId,
    pub hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    pub power: i32,
}

impl Combatant {
    /// Creates a combatant at full health.
    pub fn new(owner: EntityId, hp: i32, defense: i32, power: i32) -> Self {
        Self {
            owner,
            hp,
            max_hp: hp,
            defense,
            power,
        }
    }

    /// Whether hit points have run out.
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Subtracts `amount`, clamping at zero.
    ///
    /// Returns `true` only for the hit that takes hp from positive to zero, so a
    /// death is reported once.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.hp > 0;
        self.hp = (self.hp - amount.max(0)).max(0);
        was_alive && self.hp == 0
    }

    /// Restores up to `amount` hp without exceeding `max_hp`; returns the hp gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }
}

/// The optional capability set of an entity.
#[derive(Debug, Clone, Default)]
pub struct Components {
    pub combatant: Option<Combatant>,
    pub ai: Option<AiControlled>,
    pub inventory: Option<Inventory>,
    pub item: Option<UsableItem>,
}

/// A generic object: the player, monsters, items and corpses.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    /// Tile coordinate
    pub position: Position,
    /// Display name
    pub name: String,
    /// Whether this entity prevents others from entering its tile
    pub blocks: bool,
    /// Drawing priority
    pub render_order: RenderOrder,
    /// Visual descriptor
    pub appearance: Appearance,
    /// Capability set
    pub components: Components,
}

impl Entity {
    /// Creates an entity without capabilities.
    pub fn new(
        position: Position,
        name: impl Into<String>,
        blocks: bool,
        render_order: RenderOrder,
        appearance: Appearance,
    ) -> Self {
        Self {
            id: new_entity_id(),
            position,
            name: name.into(),
            blocks,
            render_order,
            appearance,
            components: Components::default(),
        }
    }

    /// Adds a combatant component.
    pub fn with_combatant(mut self, hp: i32, defense: i32, power: i32) -> Self {
        self.components.combatant = Some(Combatant::new(self.id, hp, defense, power));
        self
    }

    /// Adds an AI component.
    pub fn with_ai(mut self, behavior: AiBehavior) -> Self {
        self.components.ai = Some(AiControlled::new(self.id, behavior));
        self
    }

    /// Adds an inventory component.
    pub fn with_inventory(mut self, capacity: usize) -> Self {
        self.components.inventory = Some(Inventory::new(self.id, capacity));
        self
    }

    /// Adds a usable-item component.
    pub fn with_item(mut self, effect: ItemEffect, amount: i32) -> Self {
        self.components.item = Some(UsableItem::new(self.id, effect, amount));
        self
    }

    /// Unique identifier.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether this entity carries the given capability.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{AiBehavior, Appearance, Capability, Entity, Position, RenderOrder};
    ///
    /// let monster = Entity::new(
    ///     Position::new(1, 1),
    ///     "Trooper",
    ///     true,
    ///     RenderOrder::Actor,
    ///     Appearance::fixed("trooper", &['T']),
    /// )
    /// .with_combatant(10, 0, 3)
    /// .with_ai(AiBehavior::BasicMelee);
    ///
    /// assert!(monster.has(Capability::Combatant));
    /// assert!(monster.has(Capability::AiControlled));
    /// assert!(!monster.has(Capability::Inventory));
    /// ```
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Combatant => self.components.combatant.is_some(),
            Capability::AiControlled => self.components.ai.is_some(),
            Capability::Inventory => self.components.inventory.is_some(),
            Capability::UsableItem => self.components.item.is_some(),
        }
    }

    pub fn combatant(&self) -> Option<&Combatant> {
        self.components.combatant.as_ref()
    }

    pub fn combatant_mut(&mut self) -> Option<&mut Combatant> {
        self.components.combatant.as_mut()
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.components.inventory.as_ref()
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        self.components.inventory.as_mut()
    }

    /// Whether this entity has hit points left.
    pub fn is_alive(&self) -> bool {
        self.combatant().map_or(false, |fighter| !fighter.is_dead())
    }

    /// Whether this entity has already been turned into a corpse.
    pub fn is_corpse(&self) -> bool {
        self.render_order == RenderOrder::Corpse
            && !self.blocks
            && self.combatant().map_or(false, Combatant::is_dead)
    }

    /// Straight-line distance to another entity.
    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.position.euclidean_distance(other.position)
    }

    /// Turns a dead monster into inert remains.
    ///
    /// Blocking, AI and inventory are dropped, the render order falls to
    /// [`RenderOrder::Corpse`] and the name becomes "remains of X". Returns
    /// `false` when the entity was already a corpse.
    pub fn become_corpse(&mut self) -> bool {
        if self.is_corpse() {
            return false;
        }
        self.blocks = false;
        self.components.ai = None;
        self.components.inventory = None;
        self.render_order = RenderOrder::Corpse;
        self.appearance = Appearance::corpse();
        self.name = format!("remains of {}", self.name);
        true
    }
}

/// Index of the blocking entity standing on `pos`, if any.
pub fn blocking_entity_at(entities: &[Entity], pos: Position) -> Option<usize> {
    entities
        .iter()
        .position(|entity| entity.blocks && entity.position == pos)
}

/// Index of the first entity of any kind on `pos`.
pub fn entity_at(entities: &[Entity], pos: Position) -> Option<usize> {
    entities.iter().position(|entity| entity.position == pos)
}

/// Index of the first item lying on `pos`.
pub fn item_at(entities: &[Entity], pos: Position) -> Option<usize> {
    entities
        .iter()
        .position(|entity| entity.has(Capability::UsableItem) && entity.position == pos)
}

/// Two distinct mutable elements of a slice.
///
/// # Panics
///
/// Panics if `a == b` or either index is out of range.
pub fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "pair_mut needs two distinct indices");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trooper(x: i32, y: i32) -> Entity {
        Entity::new(
            Position::new(x, y),
            "Trooper",
            true,
            RenderOrder::Actor,
            Appearance::fixed("trooper", &['T']),
        )
        .with_combatant(10, 0, 3)
        .with_ai(AiBehavior::BasicMelee)
    }

    #[test]
    fn test_components_reference_their_owner() {
        let monster = trooper(1, 1).with_inventory(2).with_item(ItemEffect::Heal, 4);
        let id = monster.id();
        assert_eq!(monster.combatant().unwrap().owner, id);
        assert_eq!(monster.components.ai.as_ref().unwrap().owner, id);
        assert_eq!(monster.inventory().unwrap().owner, id);
        assert_eq!(monster.components.item.as_ref().unwrap().owner, id);
    }

    #[test]
    fn test_passive_prop_has_no_capabilities() {
        let prop = Entity::new(
            Position::new(0, 0),
            "Crate",
            false,
            RenderOrder::Corpse,
            Appearance::fixed("crate", &['=']),
        );
        for capability in [
            Capability::Combatant,
            Capability::AiControlled,
            Capability::Inventory,
            Capability::UsableItem,
        ] {
            assert!(!prop.has(capability));
        }
        assert!(!prop.is_alive());
        assert!(!prop.is_corpse());
    }

    #[test]
    fn test_damage_clamps_and_reports_death_once() {
        let mut fighter = Combatant::new(new_entity_id(), 5, 0, 1);
        assert!(!fighter.take_damage(3));
        assert_eq!(fighter.hp, 2);
        assert!(fighter.take_damage(10));
        assert_eq!(fighter.hp, 0);
        assert!(!fighter.take_damage(10));
        assert_eq!(fighter.hp, 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut fighter = Combatant::new(new_entity_id(), 30, 2, 5);
        fighter.hp = 28;
        assert_eq!(fighter.heal(4), 2);
        assert_eq!(fighter.hp, 30);
        assert_eq!(fighter.heal(4), 0);
    }

    #[test]
    fn test_become_corpse_is_idempotent() {
        let mut monster = trooper(3, 3);
        monster.combatant_mut().unwrap().take_damage(10);

        assert!(monster.become_corpse());
        assert!(!monster.blocks);
        assert!(!monster.has(Capability::AiControlled));
        assert_eq!(monster.render_order, RenderOrder::Corpse);
        assert_eq!(monster.name, "remains of Trooper");
        assert_eq!(monster.appearance.glyph(), '%');

        assert!(!monster.become_corpse());
        assert_eq!(monster.name, "remains of Trooper");
    }

    #[test]
    fn test_location_queries() {
        let pill = Entity::new(
            Position::new(2, 2),
            "Healing Pill",
            false,
            RenderOrder::Item,
            Appearance::fixed("heal_pills", &['!']),
        )
        .with_item(ItemEffect::Heal, 4);
        let entities = vec![trooper(1, 1), pill];

        assert_eq!(blocking_entity_at(&entities, Position::new(1, 1)), Some(0));
        assert_eq!(blocking_entity_at(&entities, Position::new(2, 2)), None);
        assert_eq!(item_at(&entities, Position::new(2, 2)), Some(1));
        assert_eq!(item_at(&entities, Position::new(1, 1)), None);
        assert_eq!(entity_at(&entities, Position::new(2, 2)), Some(1));
        assert_eq!(entity_at(&entities, Position::new(5, 5)), None);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut values = [1, 2, 3, 4];
        {
            let (a, b) = pair_mut(&mut values, 0, 3);
            std::mem::swap(a, b);
        }
        assert_eq!(values, [4, 2, 3, 1]);
        let (a, b) = pair_mut(&mut values, 2, 1);
        assert_eq!((*a, *b), (3, 2));
    }
}

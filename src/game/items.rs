//! # Items and Inventory
//!
//! Consumable effects and the bounded bag the player carries them in.

use crate::{Combatant, Entity, EntityId, GameEvent, Message, MessageTone};
use serde::{Deserialize, Serialize};

/// Picking up failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("You cannot carry any more, your inventory is full")]
    CapacityExceeded { capacity: usize },
}

/// Using an item failed; the item stays in the inventory.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemUseError {
    /// The effect would change nothing, e.g. healing at full health
    #[error("You are already at full health")]
    NoEffect,

    #[error("The {0} cannot be used")]
    NotUsable(String),

    #[error("There is no item in slot {0}")]
    InvalidSlot(usize),
}

/// What a consumable does when used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restores hit points up to the maximum
    Heal,
}

/// Capability of an entity that can be consumed for an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsableItem {
    pub owner: EntityId,
    pub effect: ItemEffect,
    pub amount: i32,
}

impl UsableItem {
    pub fn new(owner: EntityId, effect: ItemEffect, amount: i32) -> Self {
        Self {
            owner,
            effect,
            amount,
        }
    }

    /// Applies the effect to `target`.
    pub fn apply(&self, target: &mut Combatant) -> Result<Message, ItemUseError> {
        match self.effect {
            ItemEffect::Heal => {
                if target.hp >= target.max_hp {
                    return Err(ItemUseError::NoEffect);
                }
                target.heal(self.amount);
                Ok(Message::new(
                    "Your wounds start to feel better!",
                    MessageTone::Good,
                ))
            }
        }
    }
}

/// Bounded list of carried item entities.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub owner: EntityId,
    pub capacity: usize,
    pub items: Vec<Entity>,
}

impl Inventory {
    pub fn new(owner: EntityId, capacity: usize) -> Self {
        Self {
            owner,
            capacity,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Fails when there is no free slot.
    pub fn ensure_room(&self) -> Result<(), InventoryError> {
        if self.is_full() {
            Err(InventoryError::CapacityExceeded {
                capacity: self.capacity,
            })
        } else {
            Ok(())
        }
    }

    /// Stores `item` and reports the pickup.
    ///
    /// The world still holds the entity afterwards; whoever drains the
    /// returned [`GameEvent::ItemAdded`] removes it from there.
    pub fn add_item(&mut self, item: &Entity) -> Result<Vec<GameEvent>, InventoryError> {
        self.ensure_room()?;
        self.items.push(item.clone());
        Ok(vec![
            GameEvent::message(format!("You pick up the {}!", item.name), MessageTone::Notice),
            GameEvent::ItemAdded(item.id()),
        ])
    }

    /// Uses the item in slot `index` on `target`, removing it when consumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{
    ///     new_entity_id, Appearance, Combatant, Entity, GameEvent, Inventory, ItemEffect,
    ///     ItemUseError, Position, RenderOrder,
    /// };
    ///
    /// let pill = Entity::new(
    ///     Position::new(0, 0),
    ///     "Healing Pill",
    ///     false,
    ///     RenderOrder::Item,
    ///     Appearance::fixed("heal_pills", &['!']),
    /// )
    /// .with_item(ItemEffect::Heal, 4);
    ///
    /// let mut fighter = Combatant::new(new_entity_id(), 30, 2, 5);
    /// let mut bag = Inventory::new(fighter.owner, 25);
    /// bag.add_item(&pill).unwrap();
    ///
    /// assert_eq!(bag.use_item(0, &mut fighter), Err(ItemUseError::NoEffect));
    /// assert_eq!(bag.len(), 1);
    ///
    /// fighter.hp = 20;
    /// let events = bag.use_item(0, &mut fighter).unwrap();
    /// assert_eq!(fighter.hp, 24);
    /// assert!(bag.is_empty());
    /// assert_eq!(events.last(), Some(&GameEvent::ItemConsumed(pill.id())));
    /// ```
    pub fn use_item(
        &mut self,
        index: usize,
        target: &mut Combatant,
    ) -> Result<Vec<GameEvent>, ItemUseError> {
        let item = self
            .items
            .get(index)
            .ok_or(ItemUseError::InvalidSlot(index))?;
        let usable = item
            .components
            .item
            .as_ref()
            .ok_or_else(|| ItemUseError::NotUsable(item.name.clone()))?;

        let message = usable.apply(target)?;
        let consumed = self.items.remove(index);
        Ok(vec![
            GameEvent::Message(message),
            GameEvent::ItemConsumed(consumed.id()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{new_entity_id, Appearance, Position, RenderOrder};

    fn pill() -> Entity {
        Entity::new(
            Position::new(1, 1),
            "Healing Pill",
            false,
            RenderOrder::Item,
            Appearance::fixed("heal_pills", &['!']),
        )
        .with_item(ItemEffect::Heal, 4)
    }

    #[test]
    fn test_full_inventory_rejects() {
        let mut bag = Inventory::new(new_entity_id(), 1);
        assert!(bag.add_item(&pill()).is_ok());
        assert!(bag.is_full());

        let err = bag.add_item(&pill()).unwrap_err();
        assert_eq!(err, InventoryError::CapacityExceeded { capacity: 1 });
        assert_eq!(
            err.to_string(),
            "You cannot carry any more, your inventory is full"
        );
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_pickup_events() {
        let item = pill();
        let mut bag = Inventory::new(new_entity_id(), 25);
        let events = bag.add_item(&item).unwrap();
        assert_eq!(
            events,
            vec![
                GameEvent::message("You pick up the Healing Pill!", MessageTone::Notice),
                GameEvent::ItemAdded(item.id()),
            ]
        );
    }

    #[test]
    fn test_heal_at_full_health_keeps_item() {
        let mut fighter = Combatant::new(new_entity_id(), 30, 2, 5);
        let mut bag = Inventory::new(fighter.owner, 25);
        bag.add_item(&pill()).unwrap();

        assert_eq!(bag.use_item(0, &mut fighter), Err(ItemUseError::NoEffect));
        assert_eq!(bag.len(), 1);
        assert_eq!(fighter.hp, 30);
    }

    #[test]
    fn test_heal_below_max_caps_and_consumes_one() {
        let mut fighter = Combatant::new(new_entity_id(), 30, 2, 5);
        fighter.hp = 28;
        let mut bag = Inventory::new(fighter.owner, 25);
        bag.add_item(&pill()).unwrap();
        bag.add_item(&pill()).unwrap();

        let events = bag.use_item(1, &mut fighter).unwrap();
        assert_eq!(fighter.hp, 30);
        assert_eq!(bag.len(), 1);
        assert_eq!(
            events[0],
            GameEvent::message("Your wounds start to feel better!", MessageTone::Good)
        );
    }

    #[test]
    fn test_bad_slots() {
        let mut fighter = Combatant::new(new_entity_id(), 30, 2, 5);
        let mut bag = Inventory::new(fighter.owner, 25);
        assert_eq!(bag.use_item(3, &mut fighter), Err(ItemUseError::InvalidSlot(3)));

        let rock = Entity::new(
            Position::new(0, 0),
            "rock",
            false,
            RenderOrder::Item,
            Appearance::fixed("rock", &['*']),
        );
        bag.add_item(&rock).unwrap();
        assert_eq!(
            bag.use_item(0, &mut fighter),
            Err(ItemUseError::NotUsable("rock".to_string()))
        );
    }
}

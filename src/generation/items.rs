//! # Item Generation
//!
//! Compiled-in consumables and their spawn table.

use crate::{Appearance, Entity, ItemEffect, Position, RenderOrder, WeightedTable};

/// Compiled-in item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub token: &'static str,
    pub glyph: &'static [char],
    pub effect: ItemEffect,
    pub amount: i32,
}

/// Restores four hit points.
pub const HEALING_PILLS: ItemTemplate = ItemTemplate {
    name: "Healing Pill",
    token: "heal_pills",
    glyph: &['!'],
    effect: ItemEffect::Heal,
    amount: 4,
};

impl ItemTemplate {
    /// Builds a non-blocking item entity at `position`.
    pub fn spawn(&self, position: Position) -> Entity {
        Entity::new(
            position,
            self.name,
            false,
            RenderOrder::Item,
            Appearance::fixed(self.token, self.glyph),
        )
        .with_item(self.effect, self.amount)
    }
}

/// Item spawn table.
pub fn default_item_table() -> WeightedTable<ItemTemplate> {
    WeightedTable::new().with(HEALING_PILLS, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Capability;

    #[test]
    fn test_healing_pill() {
        let pill = HEALING_PILLS.spawn(Position::new(4, 4));
        assert!(!pill.blocks);
        assert!(pill.has(Capability::UsableItem));
        assert_eq!(pill.render_order, RenderOrder::Item);
        assert_eq!(pill.components.item.as_ref().unwrap().amount, 4);
        assert_eq!(pill.appearance.glyph(), '!');
    }

    #[test]
    fn test_item_table_only_has_pills() {
        let table = default_item_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.iter().next().map(|(item, _)| item.name), Some("Healing Pill"));
    }
}

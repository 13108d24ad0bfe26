//! # Combat
//!
//! Melee resolution between two combatants.

use crate::{pair_mut, Entity, GameEvent, MessageTone};

/// Damage dealt by `power` against `defense`, never negative.
pub fn melee_damage(power: i32, defense: i32) -> i32 {
    (power - defense).max(0)
}

/// `attacker` hits `defender` once.
///
/// Emits the attack message and, when this hit brings the defender to zero hit
/// points, a [`GameEvent::Dead`]. Entities without a combatant neither attack
/// nor get hurt.
///
/// # Examples
///
/// ```
/// use cosmic_chaos::{attack, Appearance, Entity, GameEvent, Position, RenderOrder};
///
/// let look = Appearance::fixed("test", &['x']);
/// let player = Entity::new(Position::new(0, 0), "Player", true, RenderOrder::Actor, look.clone())
///     .with_combatant(30, 2, 5);
/// let mut trooper = Entity::new(Position::new(1, 0), "Trooper", true, RenderOrder::Actor, look)
///     .with_combatant(10, 0, 3);
///
/// let events = attack(&player, &mut trooper);
/// assert_eq!(trooper.combatant().unwrap().hp, 5);
/// assert!(matches!(&events[0], GameEvent::Message(m) if m.text == "Player attacks Trooper for 5 hit points."));
/// ```
pub fn attack(attacker: &Entity, defender: &mut Entity) -> Vec<GameEvent> {
    let Some(power) = attacker.combatant().map(|fighter| fighter.power) else {
        return Vec::new();
    };
    let defender_id = defender.id();
    let defender_name = defender.name.clone();
    let Some(target) = defender.combatant_mut() else {
        return Vec::new();
    };

    let damage = melee_damage(power, target.defense);
    let attacker_name = capitalize(&attacker.name);
    let mut events = Vec::new();

    if damage > 0 {
        events.push(GameEvent::message(
            format!("{attacker_name} attacks {defender_name} for {damage} hit points."),
            MessageTone::Normal,
        ));
        if target.take_damage(damage) {
            events.push(GameEvent::Dead(defender_id));
        }
    } else {
        events.push(GameEvent::message(
            format!("{attacker_name} attacks {defender_name} but does no damage."),
            MessageTone::Normal,
        ));
    }

    events
}

/// [`attack`] between two members of the same entity list.
pub fn attack_in(entities: &mut [Entity], attacker: usize, defender: usize) -> Vec<GameEvent> {
    if attacker == defender {
        return Vec::new();
    }
    let (attacker, defender) = pair_mut(entities, attacker, defender);
    attack(attacker, defender)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Appearance, Position, RenderOrder};
    use proptest::prelude::*;

    fn fighter(name: &str, hp: i32, defense: i32, power: i32) -> Entity {
        Entity::new(
            Position::new(0, 0),
            name,
            true,
            RenderOrder::Actor,
            Appearance::fixed("test", &['x']),
        )
        .with_combatant(hp, defense, power)
    }

    #[test]
    fn test_no_damage_message() {
        let weakling = fighter("rat", 1, 0, 1);
        let mut tank = fighter("Juggernaut", 15, 1, 4);
        let events = attack(&weakling, &mut tank);
        assert_eq!(
            events,
            vec![GameEvent::message(
                "Rat attacks Juggernaut but does no damage.",
                MessageTone::Normal
            )]
        );
        assert_eq!(tank.combatant().unwrap().hp, 15);
    }

    #[test]
    fn test_killing_blow_emits_dead_once() {
        let player = fighter("Player", 30, 2, 5);
        let mut trooper = fighter("Trooper", 10, 0, 3);
        let trooper_id = trooper.id();

        assert_eq!(attack(&player, &mut trooper).len(), 1);
        let events = attack(&player, &mut trooper);
        assert_eq!(events.last(), Some(&GameEvent::Dead(trooper_id)));
        assert_eq!(trooper.combatant().unwrap().hp, 0);

        let events = attack(&player, &mut trooper);
        assert!(!events.contains(&GameEvent::Dead(trooper_id)));
        assert_eq!(trooper.combatant().unwrap().hp, 0);
    }

    #[test]
    fn test_attack_in_list() {
        let mut entities = vec![fighter("Player", 30, 2, 5), fighter("Trooper", 10, 0, 3)];
        let events = attack_in(&mut entities, 1, 0);
        assert_eq!(entities[0].combatant().unwrap().hp, 29);
        assert_eq!(events.len(), 1);
        assert!(attack_in(&mut entities, 0, 0).is_empty());
    }

    #[test]
    fn test_props_do_not_fight() {
        let mut prop = Entity::new(
            Position::new(0, 0),
            "barrel",
            true,
            RenderOrder::Actor,
            Appearance::fixed("barrel", &['0']),
        );
        let player = fighter("Player", 30, 2, 5);
        assert!(attack(&player, &mut prop).is_empty());
    }

    proptest! {
        #[test]
        fn prop_damage_formula_and_clamp(
            hp in 1i32..50, defense in 0i32..10, power in 0i32..20
        ) {
            let attacker = fighter("a", 10, 0, power);
            let mut defender = fighter("d", hp, defense, 0);
            let events = attack(&attacker, &mut defender);

            let expected = (power - defense).max(0);
            let remaining = defender.combatant().unwrap().hp;
            prop_assert_eq!(remaining, (hp - expected).max(0));
            prop_assert!(remaining >= 0);
            prop_assert_eq!(
                events.contains(&GameEvent::Dead(defender.id())),
                expected >= hp
            );
        }
    }
}

//! Property tests for dungeon generation.

use cosmic_chaos::{
    create_rng, is_reachable, Capability, Dungeon, DungeonGenerator, GenerationConfig, Generator,
    PlayerTemplate, Shape,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn generate(config: &GenerationConfig) -> Dungeon {
    DungeonGenerator::new(PlayerTemplate::default())
        .generate(config, &mut create_rng(config))
        .expect("valid config must generate")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_entities_stay_in_bounds_and_apart(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing(seed);
        let dungeon = generate(&config);

        let mut blocking = HashSet::new();
        for entity in &dungeon.entities {
            prop_assert!(dungeon.map.in_bounds(entity.position));
            prop_assert!(!dungeon.map.is_blocked(entity.position));
            if entity.blocks {
                prop_assert!(blocking.insert(entity.position), "two blockers on {:?}", entity.position);
            }
        }
    }

    #[test]
    fn prop_tunnels_connect_their_rooms(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing(seed);
        let dungeon = generate(&config);

        for tunnel in &dungeon.tunnels {
            prop_assert_eq!(tunnel.from, dungeon.rooms[tunnel.from_room].center());
            prop_assert_eq!(tunnel.to, dungeon.rooms[tunnel.to_room].center());
            prop_assert_eq!(tunnel.to_room, tunnel.from_room + 1);
            for pos in tunnel.tiles() {
                prop_assert!(!dungeon.map.is_blocked(pos));
            }
            prop_assert!(is_reachable(&dungeon.map, tunnel.from, tunnel.to));
        }
    }

    #[test]
    fn prop_same_seed_same_dungeon(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing(seed);
        let a = generate(&config);
        let b = generate(&config);

        prop_assert_eq!(a.player_start, b.player_start);
        prop_assert_eq!(&a.rooms, &b.rooms);
        prop_assert_eq!(&a.tunnels, &b.tunnels);
        let a_spawns: Vec<_> = a.entities.iter().map(|e| (e.position, e.name.clone())).collect();
        let b_spawns: Vec<_> = b.entities.iter().map(|e| (e.position, e.name.clone())).collect();
        prop_assert_eq!(a_spawns, b_spawns);
    }
}

#[test]
fn test_player_starts_in_first_room() {
    let config = GenerationConfig::new(2024);
    let dungeon = generate(&config);

    assert_eq!(dungeon.player_start, dungeon.rooms[0].center());
    assert_eq!(dungeon.entities[0].position, dungeon.player_start);
    assert!(dungeon.entities[0].has(Capability::Inventory));
    assert_eq!(dungeon.rooms.len(), 30);
    assert!(dungeon.tunnels.len() < dungeon.rooms.len());
}

#[test]
fn test_spawns_only_inside_rooms() {
    let config = GenerationConfig::for_testing(99);
    let dungeon = generate(&config);

    for entity in &dungeon.entities {
        assert!(
            dungeon.rooms.iter().any(|room| room.has_tile(entity.position)),
            "{} at {:?} is outside every room",
            entity.name,
            entity.position
        );
    }
}

#[test]
fn test_slimy_walls_cover_every_wall() {
    let plain = GenerationConfig::for_testing(5);
    let slimy = GenerationConfig {
        slimy_wall_chance: 1.0,
        ..plain.clone()
    };
    let a = generate(&plain);
    let b = generate(&slimy);

    assert!(a
        .map
        .positions()
        .all(|pos| a.map.tile(pos).map_or(false, |tile| !tile.appearance.is_animated())));
    assert!(b.map.ground_count() > 0);
    assert!(b
        .map
        .positions()
        .filter(|pos| b.map.is_blocked(*pos))
        .all(|pos| b.map.tile(pos).map_or(false, |tile| tile.appearance.is_animated())));
}

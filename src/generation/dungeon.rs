//! # Dungeon Generation
//!
//! Room-and-tunnel layout: randomized rectangle and circle rooms joined by
//! L-shaped tunnels, then populated from weighted spawn tables.
//!
//! Every attempt yields a room. Rooms may overlap; an overlapping room is
//! considered connected through the overlap and gets no tunnel. A room that
//! overlaps nothing is tunneled to the room accepted just before it, which is
//! the only connectivity the generator promises.

use crate::{
    Axis, Circle, CosmicError, CosmicResult, Entity, EntityId, GenerationConfig, Generator,
    PlayerTemplate, Position, Rectangle, RoomPopulator, RoomShape, Shape, Tile, TileMap,
    ROOM_KIND_ROLL,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// An L-shaped tunnel between two room centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunnelLink {
    /// Index of the earlier room in [`Dungeon::rooms`]
    pub from_room: usize,
    /// Index of the newly placed room
    pub to_room: usize,
    /// Center of the earlier room
    pub from: Position,
    /// Center of the new room
    pub to: Position,
    /// Horizontal leg first (along the earlier room's row), then vertical
    pub horizontal_first: bool,
}

impl TunnelLink {
    /// Where the two legs meet.
    pub fn corner(&self) -> Position {
        if self.horizontal_first {
            Position::new(self.to.x, self.from.y)
        } else {
            Position::new(self.from.x, self.to.y)
        }
    }

    /// Every tile the tunnel carves.
    pub fn tiles(&self) -> Vec<Position> {
        let corner = self.corner();
        let mut tiles = straight_run(self.from, corner);
        tiles.extend(straight_run(corner, self.to));
        tiles
    }

    fn carve(&self, map: &mut TileMap) {
        let corner = self.corner();
        if self.horizontal_first {
            map.carve_tunnel(Axis::Horizontal, self.from.y, self.from.x, corner.x);
            map.carve_tunnel(Axis::Vertical, corner.x, self.from.y, self.to.y);
        } else {
            map.carve_tunnel(Axis::Vertical, self.from.x, self.from.y, corner.y);
            map.carve_tunnel(Axis::Horizontal, corner.y, self.from.x, self.to.x);
        }
    }
}

fn straight_run(a: Position, b: Position) -> Vec<Position> {
    if a.y == b.y {
        (a.x.min(b.x)..=a.x.max(b.x))
            .map(|x| Position::new(x, a.y))
            .collect()
    } else {
        (a.y.min(b.y)..=a.y.max(b.y))
            .map(|y| Position::new(a.x, y))
            .collect()
    }
}

/// Output of one generation run.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub map: TileMap,
    /// Player first, then spawns in placement order
    pub entities: Vec<Entity>,
    pub player_id: EntityId,
    pub player_start: Position,
    /// Every accepted room, in placement order
    pub rooms: Vec<RoomShape>,
    /// Tunnels actually drawn
    pub tunnels: Vec<TunnelLink>,
}

/// Primary dungeon generator.
///
/// For each of `max_rooms` attempts it:
/// 1. Rolls the room kind and geometry
/// 2. Carves the room
/// 3. Places the player (first room) or tunnels to the previous room
/// 4. Populates the room with monsters and items
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    /// Stats of the player placed in the first room
    pub player: PlayerTemplate,
    /// Spawn tables
    pub populator: RoomPopulator,
}

impl DungeonGenerator {
    /// Creates a generator with the default spawn tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{create_rng, DungeonGenerator, GenerationConfig, Generator, PlayerTemplate};
    ///
    /// let config = GenerationConfig::for_testing(12345);
    /// let generator = DungeonGenerator::new(PlayerTemplate::default());
    /// let dungeon = generator.generate(&config, &mut create_rng(&config)).unwrap();
    ///
    /// assert_eq!(dungeon.rooms.len(), config.max_rooms as usize);
    /// assert_eq!(dungeon.entities[0].id(), dungeon.player_id);
    /// ```
    pub fn new(player: PlayerTemplate) -> Self {
        Self {
            player,
            populator: RoomPopulator::default(),
        }
    }

    /// Fresh all-wall map, with walls turned slimy at the configured rate.
    fn initial_map(&self, config: &GenerationConfig, rng: &mut StdRng) -> TileMap {
        let chance = config.slimy_wall_chance;
        TileMap::new_with(config.map_width, config.map_height, |_| {
            if chance > 0.0 && rng.gen_bool(chance) {
                Tile::slimy_wall(rng)
            } else {
                Tile::wall()
            }
        })
    }

    /// Rolls the kind and geometry of the next room.
    fn roll_room(&self, config: &GenerationConfig, rng: &mut StdRng) -> CosmicResult<RoomShape> {
        let kind_roll = rng.gen_range(0..ROOM_KIND_ROLL);

        if kind_roll < config.rect_room_weight {
            let width = rng.gen_range(config.room_min_size..=config.room_max_size);
            let height = rng.gen_range(config.room_min_size..=config.room_max_size);
            let corner_x = rng.gen_range(0..=config.map_width - width - 1);
            let corner_y = rng.gen_range(0..=config.map_height - height - 1);
            Ok(Rectangle::new(corner_x, corner_y, width, height).into())
        } else if kind_roll < config.rect_room_weight + config.circle_room_weight {
            let radius = rng.gen_range(config.room_min_size / 2..=config.room_max_size / 2);
            let center_x = rng.gen_range(radius + 1..=config.map_width - radius - 1);
            let center_y = rng.gen_range(radius + 1..=config.map_height - radius - 1);
            Ok(Circle::new(center_x, center_y, radius).into())
        } else {
            Err(CosmicError::Configuration(format!(
                "room kind roll {} matches no room kind (rect {}, circle {})",
                kind_roll, config.rect_room_weight, config.circle_room_weight
            )))
        }
    }
}

impl Generator<Dungeon> for DungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CosmicResult<Dungeon> {
        config.validate()?;

        let mut map = self.initial_map(config, rng);
        let player = self.player.spawn(Position::origin());
        let player_id = player.id();
        let mut entities = vec![player];
        let mut rooms: Vec<RoomShape> = Vec::new();
        let mut tunnels = Vec::new();
        let mut player_start = Position::origin();

        for attempt in 0..config.max_rooms {
            let room = self.roll_room(config, rng)?;
            map.carve_room(&room);

            let overlaps = rooms.iter().any(|other| room.intersect(other));
            let center = room.center();
            log::debug!(
                "attempt {}: {} room centered at {:?}{}",
                attempt,
                room.kind(),
                center,
                if overlaps { " (overlapping)" } else { "" }
            );

            if rooms.is_empty() {
                player_start = center;
                entities[0].position = center;
            } else if !overlaps {
                let previous = rooms.len() - 1;
                let link = TunnelLink {
                    from_room: previous,
                    to_room: rooms.len(),
                    from: rooms[previous].center(),
                    to: center,
                    horizontal_first: rng.gen_range(0..=1) == 1,
                };
                link.carve(&mut map);
                log::debug!("tunnel {:?} -> {:?} via {:?}", link.from, link.to, link.corner());
                tunnels.push(link);
            }

            self.populator.populate(&room, &mut entities, config, rng)?;
            rooms.push(room);
        }

        let dungeon = Dungeon {
            map,
            entities,
            player_id,
            player_start,
            rooms,
            tunnels,
        };
        self.validate(&dungeon, config)?;

        log::info!(
            "Generated {}x{} dungeon (seed {}): {} rooms, {} tunnels, {} entities, {} ground tiles",
            config.map_width,
            config.map_height,
            config.seed,
            dungeon.rooms.len(),
            dungeon.tunnels.len(),
            dungeon.entities.len(),
            dungeon.map.ground_count()
        );
        Ok(dungeon)
    }

    fn validate(&self, dungeon: &Dungeon, _config: &GenerationConfig) -> CosmicResult<()> {
        let map = &dungeon.map;

        if !dungeon.entities.iter().any(|e| e.id() == dungeon.player_id) {
            return Err(CosmicError::InvalidState("dungeon has no player".to_string()));
        }

        let mut blocking = HashSet::new();
        for entity in &dungeon.entities {
            map.try_tile(entity.position)?;
            if entity.blocks && !blocking.insert(entity.position) {
                return Err(CosmicError::InvalidState(format!(
                    "two blocking entities share {:?}",
                    entity.position
                )));
            }
        }

        if map.try_tile(dungeon.player_start)?.blocked {
            return Err(CosmicError::InvalidState(
                "player starts inside a wall".to_string(),
            ));
        }

        for link in &dungeon.tunnels {
            if !is_reachable(map, link.from, link.to) {
                return Err(CosmicError::InvalidState(format!(
                    "tunnel {:?} -> {:?} is not walkable",
                    link.from, link.to
                )));
            }
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

/// Whether `to` can be reached from `from` over unblocked tiles with
/// orthogonal steps.
pub fn is_reachable(map: &TileMap, from: Position, to: Position) -> bool {
    if map.is_blocked(from) || map.is_blocked(to) {
        return false;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            return true;
        }
        for next in pos.cardinal_adjacent_positions() {
            if !map.is_blocked(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    false
}

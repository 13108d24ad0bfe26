//! # Pathfinding Algorithms
//!
//! Monster movement: 8-way A* over a per-call walkability grid, falling back to
//! a single greedy step when no short path exists.

use crate::config::MAX_PATH_STEPS;
use crate::{unit_step, Entity, EntityId, Position, TileMap};
use ::pathfinding::prelude::astar;

/// Cost of an orthogonal step, scaled so costs stay integral.
pub const ORTHOGONAL_COST: u32 = 100;

/// Cost of a diagonal step (≈1.41 × orthogonal).
pub const DIAGONAL_COST: u32 = 141;

/// Snapshot of which cells a mover may step on this turn.
///
/// A cell is walkable when its tile is unblocked and no blocking entity other
/// than the mover or its target stands on it. The grid is rebuilt for every
/// move because everybody else moves between turns.
#[derive(Debug, Clone)]
pub struct WalkGrid {
    width: i32,
    height: i32,
    walkable: Vec<bool>,
}

impl WalkGrid {
    /// Builds the grid for `mover` heading toward `target`.
    pub fn build(map: &TileMap, entities: &[Entity], mover: EntityId, target: EntityId) -> Self {
        let (width, height) = (map.width(), map.height());
        let mut walkable: Vec<bool> = map.positions().map(|pos| !map.is_blocked(pos)).collect();

        for entity in entities {
            if entity.blocks
                && entity.id() != mover
                && entity.id() != target
                && map.in_bounds(entity.position)
            {
                walkable[(entity.position.y * width + entity.position.x) as usize] = false;
            }
        }

        Self {
            width,
            height,
            walkable,
        }
    }

    /// Whether `pos` can be stepped on.
    pub fn is_walkable(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width
            && pos.y < self.height
            && self.walkable[(pos.y * self.width + pos.x) as usize]
    }

    fn successors(&self, pos: Position) -> Vec<(Position, u32)> {
        pos.adjacent_positions()
            .into_iter()
            .filter(|next| self.is_walkable(*next))
            .map(|next| {
                let cost = if next.x != pos.x && next.y != pos.y {
                    DIAGONAL_COST
                } else {
                    ORTHOGONAL_COST
                };
                (next, cost)
            })
            .collect()
    }

    /// Shortest 8-way path from `start` to `goal`, both included.
    pub fn find_path(&self, start: Position, goal: Position) -> Option<Vec<Position>> {
        astar(
            &start,
            |pos| self.successors(*pos),
            |pos| octile_distance(*pos, goal),
            |pos| *pos == goal,
        )
        .map(|(path, _cost)| path)
    }
}

/// Admissible heuristic for the 8-way cost model.
fn octile_distance(from: Position, to: Position) -> u32 {
    let dx = (from.x - to.x).unsigned_abs();
    let dy = (from.y - to.y).unsigned_abs();
    let (low, high) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * low + ORTHOGONAL_COST * (high - low)
}

/// What a movement attempt ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Took the first step of an A* path with `path_steps` steps
    FollowedPath { to: Position, path_steps: usize },
    /// No usable path; took the straight-line step instead
    Greedy { to: Position },
    /// Nothing was possible this turn
    Stayed,
}

/// Moves `entities[mover]` one step toward `entities[target]`.
///
/// Uses A* when a path shorter than [`MAX_PATH_STEPS`] exists, otherwise the
/// greedy straight-line step of [`move_towards`].
pub fn move_astar(
    map: &TileMap,
    entities: &mut [Entity],
    mover: usize,
    target: usize,
) -> StepOutcome {
    let (mover_id, start) = (entities[mover].id(), entities[mover].position);
    let (target_id, goal) = (entities[target].id(), entities[target].position);

    let grid = WalkGrid::build(map, entities, mover_id, target_id);
    if let Some(path) = grid.find_path(start, goal) {
        let path_steps = path.len().saturating_sub(1);
        if path_steps > 0 && path_steps < MAX_PATH_STEPS {
            let next = path[1];
            if next != goal || !entities[target].blocks {
                log::trace!(
                    "{} follows a {}-step path to {:?}",
                    entities[mover].name,
                    path_steps,
                    next
                );
                entities[mover].position = next;
                return StepOutcome::FollowedPath {
                    to: next,
                    path_steps,
                };
            }
        }
    }

    move_towards(map, entities, mover, goal)
}

/// Takes one straight-line step toward `goal` if the destination is free.
pub fn move_towards(
    map: &TileMap,
    entities: &mut [Entity],
    mover: usize,
    goal: Position,
) -> StepOutcome {
    let start = entities[mover].position;
    let step = unit_step(start, goal);
    let destination = start + step;

    if step == Position::origin()
        || map.is_blocked(destination)
        || crate::blocking_entity_at(entities, destination).is_some()
    {
        log::trace!("{} cannot step toward {:?}", entities[mover].name, goal);
        return StepOutcome::Stayed;
    }

    entities[mover].position = destination;
    StepOutcome::Greedy { to: destination }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Appearance, RenderOrder, Tile};

    fn open_map(width: i32, height: i32) -> TileMap {
        TileMap::new_with(width, height, |_| Tile::ground())
    }

    fn actor(x: i32, y: i32, name: &str) -> Entity {
        Entity::new(
            Position::new(x, y),
            name,
            true,
            RenderOrder::Actor,
            Appearance::fixed("test", &['x']),
        )
    }

    #[test]
    fn test_open_grid_path_and_single_step() {
        let map = open_map(10, 10);
        let mut entities = vec![actor(0, 0, "mover"), actor(9, 9, "target")];

        let grid = WalkGrid::build(&map, &entities, entities[0].id(), entities[1].id());
        let path = grid.find_path(Position::new(0, 0), Position::new(9, 9)).unwrap();
        assert!(path.len() - 1 <= MAX_PATH_STEPS);
        assert_eq!(path.len() - 1, 9); // pure diagonal

        let outcome = move_astar(&map, &mut entities, 0, 1);
        assert_eq!(
            outcome,
            StepOutcome::FollowedPath {
                to: path[1],
                path_steps: 9
            }
        );
        assert_eq!(entities[0].position, path[1]);
        assert_eq!(entities[1].position, Position::new(9, 9));
    }

    #[test]
    fn test_path_routes_around_blocking_entity() {
        // Corridor of height 3 with a monster plugging the middle lane
        let map = TileMap::new_with(7, 3, |_| Tile::ground());
        let entities = vec![
            actor(0, 1, "mover"),
            actor(6, 1, "target"),
            actor(3, 1, "plug"),
        ];
        let grid = WalkGrid::build(&map, &entities, entities[0].id(), entities[1].id());
        assert!(!grid.is_walkable(Position::new(3, 1)));
        assert!(grid.is_walkable(Position::new(0, 1)));
        assert!(grid.is_walkable(Position::new(6, 1)));

        let path = grid.find_path(Position::new(0, 1), Position::new(6, 1)).unwrap();
        assert!(!path.contains(&Position::new(3, 1)));
    }

    #[test]
    fn test_enclosed_target_falls_back_to_greedy_step() {
        // Target sealed in a 1x1 pocket at (8, 5); the rest of the map is open
        let map = TileMap::new_with(12, 12, |pos| {
            let ring = (pos.x - 8).abs() <= 1 && (pos.y - 5).abs() <= 1;
            if ring && pos != Position::new(8, 5) {
                Tile::wall()
            } else {
                Tile::ground()
            }
        });
        let mut entities = vec![actor(2, 5, "mover"), actor(8, 5, "target")];

        let outcome = move_astar(&map, &mut entities, 0, 1);
        assert_eq!(
            outcome,
            StepOutcome::Greedy {
                to: Position::new(3, 5)
            }
        );
        assert_eq!(entities[0].position, Position::new(3, 5));
    }

    #[test]
    fn test_enclosed_target_with_blocked_greedy_step_stays_put() {
        let map = TileMap::new_with(12, 12, |pos| {
            let ring = (pos.x - 8).abs() <= 1 && (pos.y - 5).abs() <= 1;
            if ring && pos != Position::new(8, 5) {
                Tile::wall()
            } else {
                Tile::ground()
            }
        });
        let mut entities = vec![actor(6, 5, "mover"), actor(8, 5, "target")];

        assert_eq!(move_astar(&map, &mut entities, 0, 1), StepOutcome::Stayed);
        assert_eq!(entities[0].position, Position::new(6, 5));
    }

    #[test]
    fn test_long_path_uses_greedy_step() {
        // A serpentine forces a path far longer than the cap
        let map = TileMap::new_with(30, 30, |pos| {
            let wall_column = pos.x % 4 == 2;
            let gap_at_bottom = (pos.x / 4) % 2 == 0;
            let is_gap = if gap_at_bottom { pos.y == 29 } else { pos.y == 0 };
            if wall_column && !is_gap {
                Tile::wall()
            } else {
                Tile::ground()
            }
        });
        let mut entities = vec![actor(0, 0, "mover"), actor(29, 0, "target")];

        let outcome = move_astar(&map, &mut entities, 0, 1);
        assert_eq!(
            outcome,
            StepOutcome::Greedy {
                to: Position::new(1, 0)
            }
        );
    }

    #[test]
    fn test_octile_heuristic() {
        assert_eq!(octile_distance(Position::new(0, 0), Position::new(3, 3)), 423);
        assert_eq!(octile_distance(Position::new(0, 0), Position::new(4, 1)), 441);
    }
}

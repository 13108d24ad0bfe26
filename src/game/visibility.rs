//! # Field of View
//!
//! Which tiles the player can currently see.

use crate::{line, Position, TileMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Visibility algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FovAlgorithm {
    /// Every tile within the radius, walls or not
    Radius,
    /// Rays from the origin stop at the first sight-blocking tile
    #[default]
    LineOfSight,
}

/// Computes the set of visible tiles around an origin.
pub trait FieldOfView {
    /// Visible positions as seen from `origin`.
    ///
    /// A `radius` of zero or less means unlimited. Sight-blocking tiles are
    /// only included when `light_walls` is set.
    fn compute_visibility(
        &self,
        map: &TileMap,
        origin: Position,
        radius: i32,
        light_walls: bool,
        algorithm: FovAlgorithm,
    ) -> HashSet<Position>;
}

/// Straightforward ray-casting field of view.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFov;

impl BasicFov {
    fn candidates(map: &TileMap, origin: Position, radius: i32) -> Vec<Position> {
        if radius <= 0 {
            return map.positions().collect();
        }
        let limit = radius as f64;
        (origin.y - radius..=origin.y + radius)
            .flat_map(|y| (origin.x - radius..=origin.x + radius).map(move |x| Position::new(x, y)))
            .filter(|pos| map.in_bounds(*pos) && pos.euclidean_distance(origin) <= limit)
            .collect()
    }

    fn ray_is_clear(map: &TileMap, origin: Position, target: Position) -> bool {
        let points = line(origin, target);
        let inner = points.len().saturating_sub(1);
        points
            .iter()
            .take(inner)
            .skip(1)
            .all(|pos| !map.blocks_sight(*pos))
    }
}

impl FieldOfView for BasicFov {
    fn compute_visibility(
        &self,
        map: &TileMap,
        origin: Position,
        radius: i32,
        light_walls: bool,
        algorithm: FovAlgorithm,
    ) -> HashSet<Position> {
        let mut visible = HashSet::new();
        if !map.in_bounds(origin) {
            return visible;
        }

        for pos in Self::candidates(map, origin, radius) {
            if pos == origin {
                visible.insert(pos);
                continue;
            }
            if map.blocks_sight(pos) && !light_walls {
                continue;
            }
            let seen = match algorithm {
                FovAlgorithm::Radius => true,
                FovAlgorithm::LineOfSight => Self::ray_is_clear(map, origin, pos),
            };
            if seen {
                visible.insert(pos);
            }
        }

        visible
    }
}

//! # World Representation
//!
//! The tile grid the dungeon is carved into.
//!
//! A [`TileMap`] is created once with every cell set to wall and never changes
//! shape afterwards. Generation carves rooms and tunnels into it; the turn engine
//! only ever flips the `explored` flag.

use crate::generation::Shape;
use crate::{Appearance, CosmicError, CosmicResult, Position};
use rand::Rng;

const WALL_GLYPHS: &[char] = &['#'];
const SLIMY_WALL_GLYPHS: &[char] = &['#', '`'];
const GROUND_GLYPHS: &[char] = &['.'];

/// Ticks per frame of a slimy wall.
pub const SLIMY_WALL_PERIOD: u32 = 30;

/// A tile on a map. It may or may not be blocked, and may or may not block sight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Whether movement into this tile is impossible
    pub blocked: bool,
    /// Whether this tile stops line of sight
    pub blocks_sight: bool,
    /// Whether the player has ever seen this tile
    pub explored: bool,
    /// Visual descriptor
    pub appearance: Appearance,
}

impl Tile {
    /// Creates a tile. Sight blocking defaults to `blocked` unless overridden.
    pub fn new(blocked: bool, blocks_sight: Option<bool>, appearance: Appearance) -> Self {
        Self {
            blocked,
            blocks_sight: blocks_sight.unwrap_or(blocked),
            explored: false,
            appearance,
        }
    }

    /// Solid rock.
    pub fn wall() -> Self {
        Self::new(true, None, Appearance::fixed("wall", WALL_GLYPHS))
    }

    /// Solid rock with an animated coating.
    pub fn slimy_wall<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            true,
            None,
            Appearance::animated("wall", SLIMY_WALL_GLYPHS, SLIMY_WALL_PERIOD, rng),
        )
    }

    /// Walkable floor.
    pub fn ground() -> Self {
        Self::new(false, None, Appearance::fixed("ground", GROUND_GLYPHS))
    }
}

/// Direction of a straight tunnel run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Runs along x at a fixed row
    Horizontal,
    /// Runs along y at a fixed column
    Vertical,
}

/// Fixed-size 2D grid of tiles stored in row-major order.
#[derive(Debug, Clone)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Creates a map filled with wall tiles.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{Position, TileMap};
    ///
    /// let map = TileMap::new(10, 8);
    /// assert!(map.is_blocked(Position::new(3, 3)));
    /// assert_eq!(map.width(), 10);
    /// ```
    pub fn new(width: i32, height: i32) -> Self {
        Self::new_with(width, height, |_| Tile::wall())
    }

    /// Creates a map whose tiles come from `make_tile`, visited in row-major order.
    pub fn new_with<F>(width: i32, height: i32, mut make_tile: F) -> Self
    where
        F: FnMut(Position) -> Tile,
    {
        let width = width.max(0);
        let height = height.max(0);
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(make_tile(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Map width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Map height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `pos` lies in `[0, width) × [0, height)`.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Gets the tile at `pos`, if it is on the map.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    /// Gets the tile at `pos` mutably, if it is on the map.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        match self.index(pos) {
            Some(idx) => Some(&mut self.tiles[idx]),
            None => None,
        }
    }

    /// Strict tile access for callers that treat an off-map query as a bug.
    pub fn try_tile(&self, pos: Position) -> CosmicResult<&Tile> {
        self.tile(pos).ok_or(CosmicError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        })
    }

    /// Replaces the tile at `pos`.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> CosmicResult<()> {
        let (width, height) = (self.width, self.height);
        let slot = self.tile_mut(pos).ok_or(CosmicError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width,
            height,
        })?;
        *slot = tile;
        Ok(())
    }

    /// Whether movement into `pos` is impossible.
    ///
    /// Positions off the map count as blocked.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.tile(pos).map_or(true, |tile| tile.blocked)
    }

    /// Whether `pos` stops line of sight. Positions off the map do.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.tile(pos).map_or(true, |tile| tile.blocks_sight)
    }

    /// Whether the player has ever seen `pos`.
    pub fn is_explored(&self, pos: Position) -> bool {
        self.tile(pos).map_or(false, |tile| tile.explored)
    }

    /// Turns the tile at `pos` into ground. Off-map positions are ignored.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.tile_mut(pos) {
            *tile = Tile::ground();
        }
    }

    /// Carves the walkable interior of a room shape, clamped to the map.
    pub fn carve_room(&mut self, room: &dyn Shape) {
        for pos in room.interior_tiles() {
            self.carve(pos);
        }
    }

    /// Carves a straight run of ground, inclusive of both endpoints.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{Axis, Position, TileMap};
    ///
    /// let mut map = TileMap::new(10, 10);
    /// map.carve_tunnel(Axis::Horizontal, 4, 7, 2);
    /// assert!(!map.is_blocked(Position::new(2, 4)));
    /// assert!(!map.is_blocked(Position::new(7, 4)));
    /// assert!(map.is_blocked(Position::new(8, 4)));
    /// ```
    pub fn carve_tunnel(&mut self, axis: Axis, fixed: i32, from: i32, to: i32) {
        for along in from.min(to)..=from.max(to) {
            let pos = match axis {
                Axis::Horizontal => Position::new(along, fixed),
                Axis::Vertical => Position::new(fixed, along),
            };
            self.carve(pos);
        }
    }

    /// Flags every given position as explored.
    pub fn mark_explored<'a, I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = &'a Position>,
    {
        for pos in positions {
            if let Some(tile) = self.tile_mut(*pos) {
                tile.explored = true;
            }
        }
    }

    /// Advances every tile animation by one tick.
    pub fn tick_animations(&mut self) {
        for tile in &mut self.tiles {
            tile.appearance.tick();
        }
    }

    /// Iterates over every position on the map in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Number of walkable tiles.
    pub fn ground_count(&self) -> usize {
        self.tiles.iter().filter(|tile| !tile.blocked).count()
    }
}

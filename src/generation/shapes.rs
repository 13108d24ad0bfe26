//! # Room Shapes
//!
//! Primitive room footprints used while laying out a dungeon.
//!
//! Shapes only live as long as generation does. Intersection tests are plain
//! scans over integer points: room sizes are bounded, so an O(area) test is
//! cheap enough and behaves identically for every pair of shape kinds.

use crate::{CosmicError, CosmicResult, Position};
use rand::{Rng, RngCore};
use std::f64::consts::PI;

/// Capabilities shared by every room footprint.
pub trait Shape {
    /// Integer center point of the shape.
    fn center(&self) -> Position;

    /// Whether `pos` lies inside the shape.
    fn has_tile(&self, pos: Position) -> bool;

    /// Whether any integer point of this shape is also inside `other`.
    fn intersect(&self, other: &dyn Shape) -> bool;

    /// Samples a point that is walkable once the shape has been carved.
    fn random_location(&self, rng: &mut dyn RngCore) -> CosmicResult<Position>;

    /// Every tile that carving this shape turns into ground.
    fn interior_tiles(&self) -> Vec<Position>;
}

/// Axis-aligned rectangle stored as two inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rectangle {
    /// Creates a rectangle from its top-left corner and extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use cosmic_chaos::{Position, Rectangle, Shape};
    ///
    /// let room = Rectangle::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.has_tile(Position::new(15, 13)));
    /// assert!(!room.has_tile(Position::new(16, 13)));
    /// ```
    pub fn new(corner_x: i32, corner_y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: corner_x,
            y1: corner_y,
            x2: corner_x + width,
            y2: corner_y + height,
        }
    }

    /// Horizontal extent.
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Vertical extent.
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

impl Shape for Rectangle {
    fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    fn has_tile(&self, pos: Position) -> bool {
        self.x1 <= pos.x && pos.x <= self.x2 && self.y1 <= pos.y && pos.y <= self.y2
    }

    fn intersect(&self, other: &dyn Shape) -> bool {
        (self.x1..=self.x2)
            .any(|x| (self.y1..=self.y2).any(|y| other.has_tile(Position::new(x, y))))
    }

    fn random_location(&self, rng: &mut dyn RngCore) -> CosmicResult<Position> {
        if self.width() < 2 || self.height() < 2 {
            return Err(CosmicError::Configuration(format!(
                "rectangle {}x{} has no interior to sample",
                self.width(),
                self.height()
            )));
        }
        let x = rng.gen_range(self.x1 + 1..=self.x2 - 1);
        let y = rng.gen_range(self.y1 + 1..=self.y2 - 1);
        Ok(Position::new(x, y))
    }

    fn interior_tiles(&self) -> Vec<Position> {
        (self.y1 + 1..self.y2)
            .flat_map(|y| (self.x1 + 1..self.x2).map(move |x| Position::new(x, y)))
            .collect()
    }
}

/// Circle with an integer center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
}

impl Circle {
    /// Creates a circle.
    pub fn new(center_x: i32, center_y: i32, radius: i32) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    fn bounding_box(&self) -> impl Iterator<Item = Position> {
        let (cx, cy, r) = (self.center_x, self.center_y, self.radius);
        (cx - r..=cx + r).flat_map(move |x| (cy - r..=cy + r).map(move |y| Position::new(x, y)))
    }
}

impl Shape for Circle {
    fn center(&self) -> Position {
        Position::new(self.center_x, self.center_y)
    }

    fn has_tile(&self, pos: Position) -> bool {
        pos.euclidean_distance(self.center()) < self.radius as f64
    }

    fn intersect(&self, other: &dyn Shape) -> bool {
        self.bounding_box()
            .any(|pos| self.has_tile(pos) && other.has_tile(pos))
    }

    /// Polar sampling: uniform distance and angle, so points cluster toward the
    /// center rather than spreading evenly over the area.
    fn random_location(&self, rng: &mut dyn RngCore) -> CosmicResult<Position> {
        if self.radius < 1 {
            return Err(CosmicError::Configuration(format!(
                "circle radius {} has no interior to sample",
                self.radius
            )));
        }
        let distance = rng.gen_range(0..self.radius) as f64;
        let angle = 2.0 * PI * rng.gen::<f64>();

        // `as i32` truncates toward zero
        let dx = (distance * angle.cos()) as i32;
        let dy = (distance * angle.sin()) as i32;

        Ok(Position::new(self.center_x + dx, self.center_y + dy))
    }

    fn interior_tiles(&self) -> Vec<Position> {
        self.bounding_box().filter(|pos| self.has_tile(*pos)).collect()
    }
}

/// A room footprint of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomShape {
    Rectangle(Rectangle),
    Circle(Circle),
}

impl RoomShape {
    /// Short name of the shape kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RoomShape::Rectangle(_) => "rectangle",
            RoomShape::Circle(_) => "circle",
        }
    }

    fn as_shape(&self) -> &dyn Shape {
        match self {
            RoomShape::Rectangle(rect) => rect,
            RoomShape::Circle(circle) => circle,
        }
    }
}

impl Shape for RoomShape {
    fn center(&self) -> Position {
        self.as_shape().center()
    }

    fn has_tile(&self, pos: Position) -> bool {
        self.as_shape().has_tile(pos)
    }

    fn intersect(&self, other: &dyn Shape) -> bool {
        self.as_shape().intersect(other)
    }

    fn random_location(&self, rng: &mut dyn RngCore) -> CosmicResult<Position> {
        self.as_shape().random_location(rng)
    }

    fn interior_tiles(&self) -> Vec<Position> {
        self.as_shape().interior_tiles()
    }
}

impl From<Rectangle> for RoomShape {
    fn from(rect: Rectangle) -> Self {
        RoomShape::Rectangle(rect)
    }
}

impl From<Circle> for RoomShape {
    fn from(circle: Circle) -> Self {
        RoomShape::Circle(circle)
    }
}

//! # Game Mathematics
//!
//! Weighted choice, unit steps and grid lines.

use crate::Position;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Ordered list of `(entry, weight)` pairs sampled proportionally to weight.
///
/// # Examples
///
/// ```
/// use cosmic_chaos::WeightedTable;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let table = WeightedTable::new().with("common", 9.0).with("rare", 1.0);
/// let mut rng = StdRng::seed_from_u64(1);
/// let pick = table.choose(&mut rng).unwrap();
/// assert!(*pick == "common" || *pick == "rare");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    entries: Vec<(T, f64)>,
}

impl<T> Default for WeightedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeightedTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builder-style [`WeightedTable::push`].
    pub fn with(mut self, entry: T, weight: f64) -> Self {
        self.push(entry, weight);
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: T, weight: f64) {
        self.entries.push((entry, weight));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries and their weights in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
        self.entries.iter().map(|(entry, weight)| (entry, *weight))
    }

    /// Picks an entry. Returns `None` when the table is empty or has no positive weight.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        let distribution = WeightedIndex::new(self.entries.iter().map(|(_, weight)| *weight)).ok()?;
        self.entries
            .get(distribution.sample(rng))
            .map(|(entry, _)| entry)
    }
}

/// One-tile step from `from` toward `to`.
///
/// The vector is normalized and each axis rounded independently, so every
/// component ends up in `-1..=1`.
///
/// # Examples
///
/// ```
/// use cosmic_chaos::{unit_step, Position};
///
/// assert_eq!(unit_step(Position::new(0, 0), Position::new(5, 1)), Position::new(1, 0));
/// assert_eq!(unit_step(Position::new(0, 0), Position::new(-3, -3)), Position::new(-1, -1));
/// ```
pub fn unit_step(from: Position, to: Position) -> Position {
    let distance = from.euclidean_distance(to);
    if distance == 0.0 {
        return Position::origin();
    }
    let dx = ((to.x - from.x) as f64 / distance).round() as i32;
    let dy = ((to.y - from.y) as f64 / distance).round() as i32;
    Position::new(dx, dy)
}

/// Bresenham line from `from` to `to`, both endpoints included.
pub fn line(from: Position, to: Position) -> Vec<Position> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;
    let mut points = vec![current];

    while current != to {
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            current.x += sx;
        }
        if doubled <= dx {
            err += dx;
            current.y += sy;
        }
        points.push(current);
    }

    points
}

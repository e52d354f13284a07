use serde::{Deserialize, Serialize};

/// A position on the screen, in pixels.
///
/// Signed so that boards on a monitor left of or above the primary display can
/// be addressed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A cell on the board: column `x`, row `y`, both 0-indexed from the top-left.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct CellPos {
    pub x: usize,
    pub y: usize,
}

impl CellPos {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the cardinal neighbor in `direction`, or `None` when it would fall
    /// off a `size`×`size` board.
    #[must_use]
    pub const fn step(self, direction: Direction, size: usize) -> Option<Self> {
        match direction {
            Direction::Left if self.x > 0 => Some(Self::new(self.x - 1, self.y)),
            Direction::Right if self.x + 1 < size => Some(Self::new(self.x + 1, self.y)),
            Direction::Up if self.y > 0 => Some(Self::new(self.x, self.y - 1)),
            Direction::Down if self.y + 1 < size => Some(Self::new(self.x, self.y + 1)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

/// Swap direction, listed in search precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];
}

/// A swap of two cardinally adjacent cells.
///
/// The gem at `source` moves to `destination` and vice versa. Only the lines
/// through `destination` are checked for a run when the move is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[display("{source} -> {destination}")]
pub struct Move {
    source: CellPos,
    destination: CellPos,
}

impl Move {
    /// Builds the move from `source` one cell towards `direction`.
    #[must_use]
    pub const fn toward(source: CellPos, direction: Direction, size: usize) -> Option<Self> {
        match source.step(direction, size) {
            Some(destination) => Some(Self {
                source,
                destination,
            }),
            None => None,
        }
    }

    /// Builds a move between two cells, or `None` if they are not adjacent.
    #[must_use]
    pub const fn between(source: CellPos, destination: CellPos) -> Option<Self> {
        if source.is_adjacent(destination) {
            Some(Self {
                source,
                destination,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn source(self) -> CellPos {
        self.source
    }

    #[must_use]
    pub const fn destination(self) -> CellPos {
        self.destination
    }
}

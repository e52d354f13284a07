use arrayvec::ArrayVec;

use crate::{
    core::{CellPos, Direction, Grid, Move, Tolerance},
    engine::match_engine::MatchEngine,
};

/// Result of a full board scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SearchOutcome {
    Found(Move),
    Exhausted,
}

impl SearchOutcome {
    #[must_use]
    pub fn found(self) -> Option<Move> {
        match self {
            Self::Found(mv) => Some(mv),
            Self::Exhausted => None,
        }
    }
}

/// Scans the board for the first swap that creates a run.
///
/// Cells are visited row by row from the top-left; each cell tries its
/// neighbors in [`Direction::ALL`] order. The same grid and tolerance always
/// yield the same move.
///
/// # Example
///
/// ```
/// use gemsight_engine::{CellPos, Color, Grid, MoveSearch, Tolerance};
///
/// let r = Color::new(200, 0, 0);
/// let g = Color::new(0, 200, 0);
/// let b = Color::new(0, 0, 200);
/// let y = Color::new(200, 200, 0);
/// let grid = Grid::from_rows(&[[r, r, b], [g, y, r], [b, g, y]]).unwrap();
///
/// let mv = MoveSearch::new()
///     .find_move(&grid, Tolerance::new(15))
///     .found()
///     .unwrap();
/// assert_eq!(mv.destination(), CellPos::new(2, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MoveSearch {
    engine: MatchEngine,
}

impl MoveSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_move(&mut self, grid: &Grid, tolerance: Tolerance) -> SearchOutcome {
        candidate_moves(grid.size())
            .find(|&mv| self.engine.would_match(grid, mv, tolerance))
            .map_or(SearchOutcome::Exhausted, SearchOutcome::Found)
    }

    /// Every qualifying move, in the order [`find_move`](Self::find_move)
    /// would try them.
    pub fn qualifying_moves(&mut self, grid: &Grid, tolerance: Tolerance) -> Vec<Move> {
        candidate_moves(grid.size())
            .filter(|&mv| self.engine.would_match(grid, mv, tolerance))
            .collect()
    }
}

/// All in-bounds moves of a `size`×`size` board in search order.
fn candidate_moves(size: usize) -> impl Iterator<Item = Move> {
    (0..size)
        .flat_map(move |y| (0..size).map(move |x| CellPos::new(x, y)))
        .flat_map(move |cell| {
            Direction::ALL
                .into_iter()
                .filter_map(|direction| Move::toward(cell, direction, size))
                .collect::<ArrayVec<Move, 4>>()
        })
}

use crate::core::{Color, Grid, Move, ScratchGrid, Tolerance};

/// Minimum number of contiguous same-colored cells that clears.
pub const RUN_LENGTH: usize = 3;

/// Decides whether a swap creates a run.
///
/// The engine keeps one [`ScratchGrid`] and refreshes it from the live grid for
/// every trial; the live grid is only ever read.
///
/// Only the column and the row through the move's destination are scanned,
/// using the color that lands there. A run formed solely at the vacated source
/// cell is not detected.
///
/// A run only counts if it covers the destination cell and the live board did
/// not already have a run through that cell, in the same line, in the color
/// it held before the swap.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    scratch: ScratchGrid,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scratch: ScratchGrid::new(&Grid::filled(0, Color::BLACK)),
        }
    }

    /// Returns whether swapping `mv` on `grid` puts a run of at least
    /// [`RUN_LENGTH`] through the destination cell.
    ///
    /// # Panics
    ///
    /// Panics if either end of `mv` lies outside `grid`.
    pub fn would_match(&mut self, grid: &Grid, mv: Move, tolerance: Tolerance) -> bool {
        let (source, destination) = (mv.source(), mv.destination());
        let (before, after) = (grid.get(destination), grid.get(source));

        self.scratch.reset_from(grid);
        self.scratch.swap(source, destination);
        let swapped = self.scratch.grid();

        creates_run_through(
            grid.column(destination.x),
            swapped.column(destination.x),
            destination.y,
            (before, after),
            tolerance,
        ) || creates_run_through(
            grid.row(destination.y).iter().copied(),
            swapped.row(destination.y).iter().copied(),
            destination.x,
            (before, after),
            tolerance,
        )
    }
}

/// Returns whether `swapped` has a run through `through` in the `after` color
/// that `live` did not already have in the `before` color.
fn creates_run_through<L, S>(
    live: L,
    swapped: S,
    through: usize,
    (before, after): (Color, Color),
    tolerance: Tolerance,
) -> bool
where
    L: IntoIterator<Item = Color>,
    S: IntoIterator<Item = Color>,
{
    has_run_through(swapped, through, after, tolerance)
        && !has_run_through(live, through, before, tolerance)
}

/// Scans `line` for [`RUN_LENGTH`] or more consecutive cells matching `target`
/// that include index `through`.
fn has_run_through<I>(line: I, through: usize, target: Color, tolerance: Tolerance) -> bool
where
    I: IntoIterator<Item = Color>,
{
    let mut count = 0;
    for (i, color) in line.into_iter().enumerate() {
        if color.matches(target, tolerance) {
            count += 1;
            if count >= RUN_LENGTH && i + 1 - count <= through && through <= i {
                return true;
            }
        } else {
            if i > through {
                // The run covering `through`, if any, ended short.
                return false;
            }
            count = 0;
        }
    }
    false
}

use std::fmt;

use serde::Serialize;

use super::{color::Color, geometry::CellPos};

/// Last observed board state: one representative [`Color`] per cell.
///
/// Cells are stored row-major. The board is always square; its side length is
/// the configured board size.
///
/// A `Grid` is replaced wholesale on every sample and is never edited in place
/// by the search. Hypothetical swaps are tried on a [`ScratchGrid`].
///
/// # Example
///
/// ```
/// use gemsight_engine::{CellPos, Color, Grid};
///
/// let red = Color::new(220, 30, 30);
/// let blue = Color::new(30, 30, 220);
/// let grid = Grid::from_fn(3, |pos| if pos.y == 0 { red } else { blue });
///
/// assert_eq!(grid.size(), 3);
/// assert_eq!(grid.get(CellPos::new(2, 0)), red);
/// assert_eq!(grid.get(CellPos::new(0, 2)), blue);
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridShapeError {
    #[display("board must have at least one row")]
    Empty,
    #[display("row {row} has {len} cells, expected {size}")]
    Ragged { row: usize, len: usize, size: usize },
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            cells: self.cells.clone(),
        }
    }

    // Reuses the existing allocation; the match engine refreshes its scratch
    // copy once per trial.
    fn clone_from(&mut self, source: &Self) {
        self.size = source.size;
        self.cells.clone_from(&source.cells);
    }
}

impl Grid {
    /// Creates a `size`×`size` grid filled with `color`.
    #[must_use]
    pub fn filled(size: usize, color: Color) -> Self {
        Self {
            size,
            cells: vec![color; size * size],
        }
    }

    /// Creates a grid by evaluating `f` for every cell in row-major order.
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(CellPos) -> Color,
    {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(f(CellPos::new(x, y)));
            }
        }
        Self { size, cells }
    }

    /// Fallible version of [`Grid::from_fn`]; stops at the first error.
    pub fn try_from_fn<F, E>(size: usize, mut f: F) -> Result<Self, E>
    where
        F: FnMut(CellPos) -> Result<Color, E>,
    {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(f(CellPos::new(x, y))?);
            }
        }
        Ok(Self { size, cells })
    }

    /// Builds a grid from rows of colors. All rows must have as many cells as
    /// there are rows.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridShapeError>
    where
        R: AsRef<[Color]>,
    {
        let size = rows.len();
        if size == 0 {
            return Err(GridShapeError::Empty);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, cols) in rows.iter().enumerate() {
            let cols = cols.as_ref();
            if cols.len() != size {
                return Err(GridShapeError::Ragged {
                    row,
                    len: cols.len(),
                    size,
                });
            }
            cells.extend_from_slice(cols);
        }
        Ok(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// Returns the color at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    #[must_use]
    pub fn get(&self, pos: CellPos) -> Color {
        self.cells[self.index(pos)]
    }

    pub(crate) fn swap(&mut self, a: CellPos, b: CellPos) {
        let (ia, ib) = (self.index(a), self.index(b));
        self.cells.swap(ia, ib);
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        // `max(1)` keeps `chunks_exact` happy for a degenerate zero-sized grid.
        self.cells.chunks_exact(self.size.max(1))
    }

    /// Returns the colors of column `x`, top to bottom.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Color> + '_ {
        assert!(x < self.size, "column {x} out of range for size {}", self.size);
        (0..self.size).map(move |y| self.cells[y * self.size + x])
    }

    /// Returns the colors of row `y`, left to right.
    #[must_use]
    pub fn row(&self, y: usize) -> &[Color] {
        assert!(y < self.size, "row {y} out of range for size {}", self.size);
        &self.cells[y * self.size..][..self.size]
    }

    fn index(&self, pos: CellPos) -> usize {
        assert!(
            self.contains(pos),
            "cell {pos} out of range for size {}",
            self.size
        );
        pos.y * self.size + pos.x
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, color) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

/// Serialized as an array of rows, each an array of `#rrggbb` strings.
impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

/// Disposable copy of a [`Grid`] for trying one hypothetical swap.
///
/// The scratch grid owns its own buffer and is refreshed from the live grid
/// before every trial, so a rejected swap never leaks into the next one.
#[derive(Debug, Clone)]
pub struct ScratchGrid {
    grid: Grid,
}

impl ScratchGrid {
    #[must_use]
    pub fn new(source: &Grid) -> Self {
        Self {
            grid: source.clone(),
        }
    }

    /// Discards any previous swap and copies `source` again.
    pub fn reset_from(&mut self, source: &Grid) {
        self.grid.clone_from(source);
    }

    pub fn swap(&mut self, a: CellPos, b: CellPos) {
        self.grid.swap(a, b);
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

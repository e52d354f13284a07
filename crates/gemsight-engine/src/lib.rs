pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected round configuration.
///
/// Reported by [`RoundConfig::validate`] and [`Round::start`] before any pixel is
/// read; none of these can be recovered from by retrying.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board size must be at least 1")]
    ZeroBoardSize,
    #[display("cell size must be at least 1 pixel")]
    ZeroCellSize,
    #[display("sample box size must be at least 1 pixel")]
    ZeroSampleBox,
    #[display("sample box size ({sample_box_size}) must be smaller than cell size ({cell_size})")]
    SampleBoxTooLarge {
        sample_box_size: u16,
        cell_size: u16,
    },
    #[display(
        "sample box at offset {sample_offset} with size {sample_box_size} does not fit in a {cell_size} pixel cell"
    )]
    SampleOutsideCell {
        sample_offset: u16,
        sample_box_size: u16,
        cell_size: u16,
    },
    #[display("a {board_size}x{board_size} board of {cell_size} pixel cells does not fit on a screen")]
    BoardTooLarge { board_size: usize, cell_size: u16 },
    #[display("tolerance step must be at least 1")]
    ZeroToleranceStep,
    #[display("baseline tolerance ({baseline}) is above the ceiling ({ceiling})")]
    BaselineAboveCeiling {
        baseline: Tolerance,
        ceiling: Tolerance,
    },
}

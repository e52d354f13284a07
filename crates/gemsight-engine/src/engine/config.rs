use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{CellPos, Point, Tolerance},
    engine::tolerance::TolerancePolicy,
};

/// All tunables of a round.
///
/// Every field has a default, so a configuration file only needs to list the
/// values it changes. The defaults fit an 8×8 board of 40 pixel cells.
///
/// # Example
///
/// ```
/// use gemsight_engine::RoundConfig;
///
/// let config: RoundConfig = serde_json::from_str(r#"{ "board_size": 9 }"#).unwrap();
/// assert_eq!(config.board_size, 9);
/// assert_eq!(config.cell_size, RoundConfig::default().cell_size);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoundConfig {
    /// Number of cells along each side of the board.
    pub board_size: usize,
    /// Side of one cell, in pixels.
    pub cell_size: u16,
    /// Side of the square block of pixels averaged per cell.
    pub sample_box_size: u16,
    /// Offset of the sample block from the cell's top-left corner, in pixels.
    ///
    /// Centered in the cell when absent.
    pub sample_offset: Option<u16>,
    pub baseline_tolerance: Tolerance,
    pub tolerance_step: Tolerance,
    pub tolerance_ceiling: Tolerance,
    /// Pause between cycles, in milliseconds.
    pub throttle_millis: u64,
    /// Length of a round, in seconds.
    pub round_secs: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            board_size: 8,
            cell_size: 40,
            sample_box_size: 2,
            sample_offset: None,
            baseline_tolerance: Tolerance::new(15),
            tolerance_step: Tolerance::new(5),
            tolerance_ceiling: Tolerance::new(255),
            throttle_millis: 100,
            round_secs: 60,
        }
    }
}

impl RoundConfig {
    #[must_use]
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_millis)
    }

    #[must_use]
    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.round_secs)
    }

    /// Sample offset actually used: the configured one, or the one that centers
    /// the sample block in the cell.
    #[must_use]
    pub fn effective_sample_offset(&self) -> u16 {
        self.sample_offset
            .unwrap_or_else(|| (self.cell_size / 2).saturating_sub(self.sample_box_size / 2))
    }

    /// Checks every geometry and tolerance constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry()?;
        self.tolerance_policy()?;
        Ok(())
    }

    pub fn geometry(&self) -> Result<BoardGeometry, ConfigError> {
        BoardGeometry::new(
            self.board_size,
            self.cell_size,
            self.sample_box_size,
            self.effective_sample_offset(),
        )
    }

    pub fn tolerance_policy(&self) -> Result<TolerancePolicy, ConfigError> {
        TolerancePolicy::new(
            self.baseline_tolerance,
            self.tolerance_step,
            self.tolerance_ceiling,
        )
    }
}

/// Validated mapping between board cells and screen pixels.
///
/// Pure grid logic never sees pixels; everything that turns a [`CellPos`] into a
/// screen [`Point`] goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    board_size: usize,
    cell_size: u16,
    sample_box_size: u16,
    sample_offset: u16,
}

impl BoardGeometry {
    pub fn new(
        board_size: usize,
        cell_size: u16,
        sample_box_size: u16,
        sample_offset: u16,
    ) -> Result<Self, ConfigError> {
        if board_size == 0 {
            return Err(ConfigError::ZeroBoardSize);
        }
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if sample_box_size == 0 {
            return Err(ConfigError::ZeroSampleBox);
        }
        if sample_box_size >= cell_size {
            return Err(ConfigError::SampleBoxTooLarge {
                sample_box_size,
                cell_size,
            });
        }
        if u32::from(sample_offset) + u32::from(sample_box_size) > u32::from(cell_size) {
            return Err(ConfigError::SampleOutsideCell {
                sample_offset,
                sample_box_size,
                cell_size,
            });
        }
        let span = u64::try_from(board_size)
            .ok()
            .and_then(|n| n.checked_mul(u64::from(cell_size)));
        if !span.is_some_and(|span| span <= u64::from(i32::MAX.unsigned_abs())) {
            return Err(ConfigError::BoardTooLarge {
                board_size,
                cell_size,
            });
        }
        Ok(Self {
            board_size,
            cell_size,
            sample_box_size,
            sample_offset,
        })
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    #[must_use]
    pub fn cell_size(&self) -> u16 {
        self.cell_size
    }

    #[must_use]
    pub fn sample_box_size(&self) -> u16 {
        self.sample_box_size
    }

    #[must_use]
    pub fn sample_offset(&self) -> u16 {
        self.sample_offset
    }

    /// Top-left pixel of `cell` for a board whose top-left corner is `origin`.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cell_origin(&self, origin: Point, cell: CellPos) -> Point {
        assert!(
            cell.x < self.board_size && cell.y < self.board_size,
            "cell {cell} out of range for size {}",
            self.board_size
        );
        // `new` guarantees board_size * cell_size fits in i32.
        let size = i32::from(self.cell_size);
        origin.offset(cell.x as i32 * size, cell.y as i32 * size)
    }

    /// Top-left pixel of the sample block of `cell`.
    #[must_use]
    pub fn sample_origin(&self, origin: Point, cell: CellPos) -> Point {
        let offset = i32::from(self.sample_offset);
        self.cell_origin(origin, cell).offset(offset, offset)
    }

    /// Pixel clicked to select `cell`.
    #[must_use]
    pub fn cell_center(&self, origin: Point, cell: CellPos) -> Point {
        let half = i32::from(self.cell_size / 2);
        self.cell_origin(origin, cell).offset(half, half)
    }
}

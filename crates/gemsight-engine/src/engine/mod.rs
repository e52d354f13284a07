//! Board inference, match search and the round loop.
//!
//! Everything here builds on the plain data types of [`crate::core`]:
//!
//! - [`RoundConfig`] / [`BoardGeometry`] - Tunables and the cell-to-pixel mapping
//! - [`PixelSampler`] / [`BoardSampler`] - Pixel source and its reduction to a [`Grid`]
//! - [`MatchEngine`] - Decides whether one swap creates a run
//! - [`MoveSearch`] - Finds the first qualifying swap on a board
//! - [`ToleranceState`] - Adaptive color tolerance
//! - [`Actuator`] - Input sink that performs the chosen swap
//! - [`Round`] - One timed session tying it all together
//!
//! # Cycle
//!
//! Each cycle of a [`Round`]:
//!
//! 1. Capture a frame and sample a fresh [`Grid`]
//! 2. Search it at the current tolerance
//! 3. On a move: click source then destination, drop tolerance to the baseline
//! 4. Otherwise: raise tolerance by one step, or report
//!    [`CycleOutcome::Degraded`] when it is already at the ceiling
//!
//! [`Grid`]: crate::core::Grid

pub use self::{
    actuator::*, config::*, match_engine::*, move_search::*, round::*, sampler::*, tolerance::*,
};

mod actuator;
mod config;
mod match_engine;
mod move_search;
mod round;
mod sampler;
mod tolerance;

#[cfg(test)]
pub(crate) mod testing;

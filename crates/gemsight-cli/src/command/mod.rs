use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gemsight_engine::{Point, RoundConfig};

use crate::util;

use self::{generate_board::GenerateBoardArg, play::PlayArg, solve::SolveArg};

mod generate_board;
mod play;
mod solve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Find a move on a single screenshot
    Solve(#[clap(flatten)] SolveArg),
    /// Run a timed round against a screenshot file, without sending input
    Play(#[clap(flatten)] PlayArg),
    /// Render a synthetic board screenshot
    GenerateBoard(#[clap(flatten)] GenerateBoardArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
        Mode::GenerateBoard(arg) => generate_board::run(&arg)?,
    }
    Ok(())
}

/// Where the board is and how it is laid out.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BoardArg {
    /// X coordinate of the board's top-left corner, in pixels
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    origin_x: i32,
    /// Y coordinate of the board's top-left corner, in pixels
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    origin_y: i32,
    /// Round configuration file (JSON); missing fields keep their defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of cells along each side of the board
    #[clap(long)]
    board_size: Option<usize>,
    /// Side of one cell, in pixels
    #[clap(long)]
    cell_size: Option<u16>,
}

impl BoardArg {
    pub(crate) fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    /// Loads the configuration file, if any, then applies the command line
    /// overrides.
    pub(crate) fn load_config(&self) -> anyhow::Result<RoundConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => RoundConfig::default(),
        };
        if let Some(board_size) = self.board_size {
            config.board_size = board_size;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        config.validate()?;
        Ok(config)
    }
}

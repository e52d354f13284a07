use std::path::PathBuf;

use gemsight_engine::Round;
use tracing::info;

use crate::{
    capture::ScreenshotSampler, command::BoardArg, input::DryRunActuator, util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Screenshot file (PNG), read again before every cycle
    image: PathBuf,
    #[clap(flatten)]
    board: BoardArg,
    /// Length of the round in seconds
    #[clap(long)]
    round_secs: Option<u64>,
    /// Pause between cycles in milliseconds
    #[clap(long)]
    throttle_millis: Option<u64>,
    /// Output file path for the round statistics
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        image,
        board,
        round_secs,
        throttle_millis,
        output,
    } = arg;

    let mut config = board.load_config()?;
    if let Some(round_secs) = round_secs {
        config.round_secs = *round_secs;
    }
    if let Some(throttle_millis) = throttle_millis {
        config.throttle_millis = *throttle_millis;
    }

    let mut actuator = DryRunActuator::default();
    let mut round = Round::start(
        board.origin(),
        &config,
        ScreenshotSampler::from_file(image),
        &mut actuator,
    )?;
    let stats = round.run()?;
    drop(round);
    info!(
        "Round over: {} moves in {} cycles, {} clicks sent",
        stats.moves(),
        stats.cycles(),
        actuator.clicks()
    );

    Output::save_json(&stats, output.clone())?;
    Ok(())
}

use std::path::PathBuf;

use anyhow::Context as _;
use gemsight_engine::{BoardGeometry, CellPos, Color, Grid, Point};
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::command::BoardArg;

/// Gem colors. Channels stay below 128 so that the doubled sample values of
/// a 2×2 sample box keep the gems apart.
const PALETTE: [Color; 7] = [
    Color::new(110, 20, 20),
    Color::new(20, 110, 20),
    Color::new(20, 20, 110),
    Color::new(110, 110, 20),
    Color::new(110, 20, 110),
    Color::new(110, 60, 20),
    Color::new(110, 110, 110),
];

const BACKGROUND: Rgba<u8> = Rgba([16, 16, 24, 255]);

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GenerateBoardArg {
    /// Seed for the gem layout and pixel noise (random if omitted)
    #[clap(long)]
    seed: Option<u64>,
    /// Maximum noise added to each channel of each pixel
    #[clap(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(0..=64))]
    noise: u8,
    /// Blank space right of and below the board, in pixels
    #[clap(long, default_value_t = 20)]
    margin: u32,
    #[clap(flatten)]
    board: BoardArg,
    /// Output PNG path
    #[clap(long)]
    output: PathBuf,
}

pub(crate) fn run(arg: &GenerateBoardArg) -> anyhow::Result<()> {
    let GenerateBoardArg {
        seed,
        noise,
        margin,
        board,
        output,
    } = arg;

    let config = board.load_config()?;
    let geometry = config.geometry()?;
    let origin = board.origin();

    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "Generating board");
    let mut rng = Pcg32::seed_from_u64(seed);

    let gems = random_gems(&mut rng, geometry.board_size());
    debug!("Gems:\n{gems}");
    let noise = i8::try_from(*noise).context("Noise out of range")?;
    let image = render(&geometry, origin, &gems, noise, *margin, &mut rng)?;

    image
        .save(output)
        .with_context(|| format!("Failed to write screenshot: {}", output.display()))?;
    info!(
        "Wrote {}x{} screenshot to {}",
        image.width(),
        image.height(),
        output.display()
    );

    Ok(())
}

/// Picks a gem for every cell, never lining up three of a kind.
fn random_gems<R>(rng: &mut R, size: usize) -> Grid
where
    R: Rng,
{
    let mut rows: Vec<Vec<Color>> = vec![Vec::with_capacity(size); size];
    for y in 0..size {
        for x in 0..size {
            let gem = loop {
                let candidate = PALETTE[rng.random_range(0..PALETTE.len())];
                let left = x >= 2 && rows[y][x - 1] == candidate && rows[y][x - 2] == candidate;
                let above = y >= 2 && rows[y - 1][x] == candidate && rows[y - 2][x] == candidate;
                if !left && !above {
                    break candidate;
                }
            };
            rows[y].push(gem);
        }
    }
    Grid::from_fn(size, |pos| rows[pos.y][pos.x])
}

/// Paints `gems` with the board's top-left corner at `origin`.
///
/// Each cell gets a one pixel background border; every gem pixel is jittered
/// by up to `noise` per channel.
fn render<R>(
    geometry: &BoardGeometry,
    origin: Point,
    gems: &Grid,
    noise: i8,
    margin: u32,
    rng: &mut R,
) -> anyhow::Result<RgbaImage>
where
    R: Rng,
{
    let left = u32::try_from(origin.x).context("Board origin must not be negative")?;
    let top = u32::try_from(origin.y).context("Board origin must not be negative")?;
    let cell = u32::from(geometry.cell_size());
    let span = u32::try_from(geometry.board_size())
        .ok()
        .and_then(|n| n.checked_mul(cell))
        .context("Board too large to render")?;
    let width = left
        .checked_add(span)
        .and_then(|w| w.checked_add(margin))
        .context("Screenshot too large")?;
    let height = top
        .checked_add(span)
        .and_then(|h| h.checked_add(margin))
        .context("Screenshot too large")?;

    let image = RgbaImage::from_fn(width, height, |x, y| {
        if !(left..left + span).contains(&x) || !(top..top + span).contains(&y) {
            return BACKGROUND;
        }
        let (dx, dy) = (x - left, y - top);
        let (lx, ly) = (dx % cell, dy % cell);
        if lx == 0 || ly == 0 || lx == cell - 1 || ly == cell - 1 {
            return BACKGROUND;
        }
        let pos = CellPos::new((dx / cell) as usize, (dy / cell) as usize);
        let [r, g, b] = gems
            .get(pos)
            .channels()
            .map(|c| c.saturating_add_signed(rng.random_range(-noise..=noise)));
        Rgba([r, g, b, 255])
    });
    Ok(image)
}

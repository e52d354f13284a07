use crate::{
    core::{CellPos, Color, Grid, Point},
    engine::config::BoardGeometry,
};

/// Source of screen pixels.
///
/// Implementations own the captured frame. [`refresh`](Self::refresh) captures a
/// new one and must be called before [`color_at`](Self::color_at) reads from it.
/// Failures are the implementation's own error type and are passed through
/// untouched.
pub trait PixelSampler {
    type Error;

    /// Captures a fresh frame.
    fn refresh(&mut self) -> Result<(), Self::Error>;

    /// Returns the color of the pixel at `at` in the last captured frame.
    fn color_at(&self, at: Point) -> Result<Color, Self::Error>;

    /// Releases the captured frame. Called once when a round ends.
    fn release(&mut self) {}
}

impl<S> PixelSampler for &mut S
where
    S: PixelSampler + ?Sized,
{
    type Error = S::Error;

    fn refresh(&mut self) -> Result<(), Self::Error> {
        (**self).refresh()
    }

    fn color_at(&self, at: Point) -> Result<Color, Self::Error> {
        (**self).color_at(at)
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// Turns a captured frame into a [`Grid`].
///
/// Each cell is represented by a `box`×`box` block of pixels taken at the
/// configured offset inside the cell. Per channel, the block's sum is divided by
/// the box size and then bucketed down to a multiple of the box size. The
/// bucketing is part of the color model: tolerances are tuned against it.
#[derive(Debug, Clone, Copy)]
pub struct BoardSampler {
    geometry: BoardGeometry,
}

impl BoardSampler {
    #[must_use]
    pub fn new(geometry: BoardGeometry) -> Self {
        Self { geometry }
    }

    #[must_use]
    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Captures a frame and samples every cell of the board at `origin`.
    ///
    /// The returned grid is complete; on error no grid is produced.
    pub fn sample<P>(&self, pixels: &mut P, origin: Point) -> Result<Grid, P::Error>
    where
        P: PixelSampler + ?Sized,
    {
        pixels.refresh()?;
        let pixels = &*pixels;
        Grid::try_from_fn(self.geometry.board_size(), |cell| {
            self.sample_cell(pixels, origin, cell)
        })
    }

    fn sample_cell<P>(&self, pixels: &P, origin: Point, cell: CellPos) -> Result<Color, P::Error>
    where
        P: PixelSampler + ?Sized,
    {
        let start = self.geometry.sample_origin(origin, cell);
        let box_size = self.geometry.sample_box_size();
        let mut sums = [0_u32; 3];
        for dy in 0..i32::from(box_size) {
            for dx in 0..i32::from(box_size) {
                let color = pixels.color_at(start.offset(dx, dy))?;
                for (sum, channel) in sums.iter_mut().zip(color.channels()) {
                    *sum += u32::from(channel);
                }
            }
        }
        let [r, g, b] = sums.map(|sum| representative_channel(sum, box_size));
        Ok(Color::new(r, g, b))
    }
}

/// `sum / box`, bucketed down to a multiple of `box`, saturating at 255.
fn representative_channel(sum: u32, box_size: u16) -> u8 {
    let box_size = u32::from(box_size);
    let value = sum / box_size / box_size * box_size;
    u8::try_from(value).unwrap_or(u8::MAX)
}

use std::path::{Path, PathBuf};

use gemsight_engine::{Color, PixelSampler, Point};
use image::RgbaImage;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub(crate) enum CaptureError {
    #[display("failed to read screenshot {}", path.display())]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[display("no screenshot captured yet")]
    NotCaptured,
    #[display("pixel {at} is outside the {width}x{height} screenshot")]
    OutOfFrame { at: Point, width: u32, height: u32 },
}

/// Pixel source backed by a screenshot.
///
/// A file-backed sampler decodes the file again on every refresh, so a tool
/// that keeps overwriting the screenshot looks like a live screen.
#[derive(Debug)]
pub(crate) struct ScreenshotSampler {
    path: Option<PathBuf>,
    frame: Option<RgbaImage>,
}

impl ScreenshotSampler {
    pub(crate) fn from_file<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: Some(path.into()),
            frame: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_image(frame: RgbaImage) -> Self {
        Self {
            path: None,
            frame: Some(frame),
        }
    }

    fn decode(path: &Path) -> Result<RgbaImage, CaptureError> {
        let image = image::open(path).map_err(|source| CaptureError::Decode {
            path: path.to_owned(),
            source,
        })?;
        Ok(image.to_rgba8())
    }
}

impl PixelSampler for ScreenshotSampler {
    type Error = CaptureError;

    fn refresh(&mut self) -> Result<(), Self::Error> {
        if let Some(path) = &self.path {
            self.frame = Some(Self::decode(path)?);
        }
        Ok(())
    }

    fn color_at(&self, at: Point) -> Result<Color, Self::Error> {
        let frame = self.frame.as_ref().ok_or(CaptureError::NotCaptured)?;
        let (width, height) = frame.dimensions();
        let pixel = u32::try_from(at.x)
            .ok()
            .zip(u32::try_from(at.y).ok())
            .and_then(|(x, y)| frame.get_pixel_checked(x, y))
            .ok_or(CaptureError::OutOfFrame { at, width, height })?;
        let [r, g, b, _a] = pixel.0;
        Ok(Color::new(r, g, b))
    }

    fn release(&mut self) {
        if self.path.is_some() {
            self.frame = None;
        }
    }
}

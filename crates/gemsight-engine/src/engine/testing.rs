//! In-memory screen and input doubles for engine tests.

use crate::{
    core::{CellPos, Color, Grid, Point},
    engine::{actuator::Actuator, config::BoardGeometry, sampler::PixelSampler},
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub(crate) enum FakeScreenError {
    #[display("refresh failed")]
    Refresh,
    #[display("no frame captured yet")]
    NotRefreshed,
    #[display("pixel {at} is outside the frame")]
    OutOfFrame { at: Point },
}

/// A screen made of pre-rendered frames.
///
/// Each `refresh` advances to the next frame; the last frame repeats forever.
pub(crate) struct FakeScreen<'a> {
    width: i32,
    height: i32,
    frames: Vec<Vec<Color>>,
    refreshes: usize,
    fail_refresh: bool,
    released: bool,
    probe: Option<Box<dyn Fn(Point) + 'a>>,
}

impl<'a> FakeScreen<'a> {
    pub(crate) fn from_fn<F>(width: i32, height: i32, mut f: F) -> Self
    where
        F: FnMut(Point) -> Color,
    {
        let mut frame = Vec::new();
        for y in 0..height {
            for x in 0..width {
                frame.push(f(Point::new(x, y)));
            }
        }
        Self {
            width,
            height,
            frames: vec![frame],
            refreshes: 0,
            fail_refresh: false,
            released: false,
            probe: None,
        }
    }

    /// Paints `grids` as consecutive frames, each cell filled with its color.
    pub(crate) fn from_grids(geometry: &BoardGeometry, origin: Point, grids: &[Grid]) -> Self {
        let cell = i32::from(geometry.cell_size());
        let span = i32::try_from(geometry.board_size()).unwrap() * cell;
        let width = origin.x + span;
        let height = origin.y + span;
        let mut screen = Self::from_fn(width, height, |_| Color::BLACK);
        screen.frames = grids
            .iter()
            .map(|grid| {
                let mut frame = vec![Color::BLACK; usize::try_from(width * height).unwrap()];
                for y in origin.y..height {
                    for x in origin.x..width {
                        let pos = CellPos::new(
                            usize::try_from((x - origin.x) / cell).unwrap(),
                            usize::try_from((y - origin.y) / cell).unwrap(),
                        );
                        frame[usize::try_from(y * width + x).unwrap()] = grid.get(pos);
                    }
                }
                frame
            })
            .collect();
        screen
    }

    pub(crate) fn with_probe<F>(mut self, probe: F) -> Self
    where
        F: Fn(Point) + 'a,
    {
        self.probe = Some(Box::new(probe));
        self
    }

    pub(crate) fn failing_refresh(mut self) -> Self {
        self.fail_refresh = true;
        self
    }

    pub(crate) fn refresh_count(&self) -> usize {
        self.refreshes
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released
    }
}

impl PixelSampler for FakeScreen<'_> {
    type Error = FakeScreenError;

    fn refresh(&mut self) -> Result<(), Self::Error> {
        if self.fail_refresh {
            return Err(FakeScreenError::Refresh);
        }
        self.refreshes += 1;
        Ok(())
    }

    fn color_at(&self, at: Point) -> Result<Color, Self::Error> {
        if let Some(probe) = &self.probe {
            probe(at);
        }
        if self.refreshes == 0 {
            return Err(FakeScreenError::NotRefreshed);
        }
        if !(0..self.width).contains(&at.x) || !(0..self.height).contains(&at.y) {
            return Err(FakeScreenError::OutOfFrame { at });
        }
        let frame = &self.frames[(self.refreshes - 1).min(self.frames.len() - 1)];
        Ok(frame[usize::try_from(at.y * self.width + at.x).unwrap()])
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Click(Point),
    MovePointer(Point),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingActuator {
    pub(crate) events: Vec<InputEvent>,
}

impl Actuator for RecordingActuator {
    fn click(&mut self, at: Point) {
        self.events.push(InputEvent::Click(at));
    }

    fn move_pointer(&mut self, to: Point) {
        self.events.push(InputEvent::MovePointer(to));
    }
}

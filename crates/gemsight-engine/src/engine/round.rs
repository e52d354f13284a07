use std::{
    mem, thread,
    time::{Duration, Instant},
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    ConfigError,
    core::{Grid, Move, Point, Tolerance},
    engine::{
        actuator::{self, Actuator},
        config::RoundConfig,
        move_search::{MoveSearch, SearchOutcome},
        sampler::{BoardSampler, PixelSampler},
        tolerance::{Escalation, ToleranceState},
    },
};

/// What a single decision cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    /// A swap was found and performed.
    MoveFound(Move),
    /// Nothing qualified; the tolerance was raised for the next cycle.
    Exhausted,
    /// Nothing qualified even at the tolerance ceiling.
    ///
    /// Not an error: the board may still be animating, so the round goes on.
    Degraded,
}

/// Counters of a round.
///
/// # Example
///
/// ```
/// use gemsight_engine::{RoundStats, Tolerance};
///
/// let stats = RoundStats::new(Tolerance::new(15));
/// assert_eq!(stats.cycles(), 0);
/// assert_eq!(stats.final_tolerance(), Tolerance::new(15));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundStats {
    cycles: usize,
    moves: usize,
    exhausted: usize,
    degraded: usize,
    final_tolerance: Tolerance,
}

impl RoundStats {
    #[must_use]
    pub const fn new(tolerance: Tolerance) -> Self {
        Self {
            cycles: 0,
            moves: 0,
            exhausted: 0,
            degraded: 0,
            final_tolerance: tolerance,
        }
    }

    /// Cycles that sampled a full board.
    #[must_use]
    pub const fn cycles(&self) -> usize {
        self.cycles
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn exhausted(&self) -> usize {
        self.exhausted
    }

    #[must_use]
    pub const fn degraded(&self) -> usize {
        self.degraded
    }

    /// Tolerance in effect after the last cycle.
    #[must_use]
    pub const fn final_tolerance(&self) -> Tolerance {
        self.final_tolerance
    }

    fn record(&mut self, outcome: CycleOutcome, tolerance: Tolerance) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::MoveFound(_) => self.moves += 1,
            CycleOutcome::Exhausted => self.exhausted += 1,
            CycleOutcome::Degraded => self.degraded += 1,
        }
        self.final_tolerance = tolerance;
    }
}

/// One timed session against a single board.
///
/// A round owns the pixel source, the input sink, the live [`Grid`] and the
/// tolerance state. Each [`run_cycle`](Self::run_cycle) samples the board,
/// searches it, and either performs the first qualifying swap or loosens the
/// tolerance. [`run`](Self::run) repeats cycles until the round's time budget
/// is spent.
///
/// The pixel source is released when the round is dropped, whichever way it
/// ends.
///
/// # Example
///
/// ```
/// use gemsight_engine::{Actuator, Color, CycleOutcome, PixelSampler, Point, Round, RoundConfig};
///
/// struct Solid(Color);
///
/// impl PixelSampler for Solid {
///     type Error = std::convert::Infallible;
///
///     fn refresh(&mut self) -> Result<(), Self::Error> {
///         Ok(())
///     }
///
///     fn color_at(&self, _at: Point) -> Result<Color, Self::Error> {
///         Ok(self.0)
///     }
/// }
///
/// struct NoInput;
///
/// impl Actuator for NoInput {
///     fn click(&mut self, _at: Point) {}
/// }
///
/// let config = RoundConfig::default();
/// let mut round =
///     Round::start(Point::new(0, 0), &config, Solid(Color::BLACK), NoInput).unwrap();
///
/// // A single-colored board offers no swap that changes anything.
/// assert_eq!(round.run_cycle().unwrap(), CycleOutcome::Exhausted);
/// assert_eq!(round.tolerance().get(), 20);
///
/// let stats = round.end();
/// assert_eq!(stats.cycles(), 1);
/// ```
#[derive(Debug)]
pub struct Round<S, A>
where
    S: PixelSampler,
    A: Actuator,
{
    origin: Point,
    board_sampler: BoardSampler,
    throttle: Duration,
    duration: Duration,
    pixels: S,
    actuator: A,
    grid: Option<Grid>,
    search: MoveSearch,
    tolerance: ToleranceState,
    stats: RoundStats,
}

impl<S, A> Round<S, A>
where
    S: PixelSampler,
    A: Actuator,
{
    /// Validates `config` and sets up a round for the board whose top-left
    /// corner is at `origin`.
    ///
    /// Nothing is sampled until the first cycle.
    pub fn start(
        origin: Point,
        config: &RoundConfig,
        pixels: S,
        actuator: A,
    ) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        let tolerance = ToleranceState::new(config.tolerance_policy()?);
        debug!(%origin, ?config, "round started");
        Ok(Self {
            origin,
            board_sampler: BoardSampler::new(geometry),
            throttle: config.throttle(),
            duration: config.round_duration(),
            pixels,
            actuator,
            grid: None,
            search: MoveSearch::new(),
            stats: RoundStats::new(tolerance.current()),
            tolerance,
        })
    }

    /// Last sampled board, if any cycle has sampled one.
    #[must_use]
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Tolerance the next cycle will search with.
    #[must_use]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance.current()
    }

    #[must_use]
    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Samples the board once and acts on it.
    ///
    /// On a sampling error the previous grid is kept and no input is sent.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, S::Error> {
        let grid = self.board_sampler.sample(&mut self.pixels, self.origin)?;
        let grid = self.grid.insert(grid);

        let tolerance = self.tolerance.current();
        let outcome = match self.search.find_move(grid, tolerance) {
            SearchOutcome::Found(mv) => {
                info!(%mv, %tolerance, "swapping");
                actuator::perform_swap(
                    &mut self.actuator,
                    self.board_sampler.geometry(),
                    self.origin,
                    mv,
                );
                self.tolerance.record_match();
                CycleOutcome::MoveFound(mv)
            }
            SearchOutcome::Exhausted => {
                // Keep the pointer off the board so hover effects do not
                // disturb the next sample.
                self.actuator.move_pointer(self.origin);
                match self.tolerance.escalate() {
                    Escalation::Raised { from, to } => {
                        debug!(%from, %to, "no move found, raising tolerance");
                        if self.tolerance.is_at_ceiling() {
                            info!(tolerance = %to, "tolerance reached ceiling");
                        }
                        CycleOutcome::Exhausted
                    }
                    Escalation::AtCeiling => {
                        warn!(%tolerance, "no move found at tolerance ceiling");
                        CycleOutcome::Degraded
                    }
                }
            }
        };

        self.stats.record(outcome, self.tolerance.current());
        Ok(outcome)
    }

    /// Runs cycles until the round's duration has elapsed.
    ///
    /// The budget is checked before each cycle; a cycle that has started always
    /// completes. Between cycles the round sleeps for the throttle, cut short
    /// by the end of the budget.
    pub fn run(&mut self) -> Result<RoundStats, S::Error> {
        let started = Instant::now();
        info!(duration = ?self.duration, throttle = ?self.throttle, "round running");
        while started.elapsed() < self.duration {
            self.run_cycle()?;
            let remaining = self.duration.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            thread::sleep(self.throttle.min(remaining));
        }
        info!(
            cycles = self.stats.cycles,
            moves = self.stats.moves,
            degraded = self.stats.degraded,
            "round finished"
        );
        Ok(self.stats.clone())
    }

    /// Ends the round, releasing the pixel source.
    #[must_use]
    pub fn end(mut self) -> RoundStats {
        mem::take(&mut self.stats)
    }
}

impl<S, A> Drop for Round<S, A>
where
    S: PixelSampler,
    A: Actuator,
{
    fn drop(&mut self) {
        self.pixels.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{CellPos, Color},
        engine::testing::{FakeScreen, FakeScreenError, InputEvent, RecordingActuator},
    };

    const R: Color = Color::new(220, 30, 30);
    const G: Color = Color::new(30, 220, 30);
    const B: Color = Color::new(30, 30, 220);
    const Y: Color = Color::new(220, 220, 30);

    const ORIGIN: Point = Point::new(10, 20);

    /// 3×3 board of 4 pixel cells sampled one pixel per cell, so painted colors
    /// come back unchanged.
    fn config() -> RoundConfig {
        RoundConfig {
            board_size: 3,
            cell_size: 4,
            sample_box_size: 1,
            sample_offset: Some(1),
            throttle_millis: 0,
            round_secs: 0,
            ..RoundConfig::default()
        }
    }

    fn with_move() -> Grid {
        Grid::from_rows(&[[R, R, B], [G, Y, R], [B, G, Y]]).unwrap()
    }

    fn stalemate() -> Grid {
        let palette = [R, G, B, Y];
        Grid::from_fn(3, |pos| palette[(pos.x + 2 * pos.y) % 4])
    }

    fn painted<'a>(config: &RoundConfig, frames: &[Grid]) -> FakeScreen<'a> {
        FakeScreen::from_grids(&config.geometry().unwrap(), ORIGIN, frames)
    }

    #[test]
    fn test_start_rejects_invalid_config() {
        let config = RoundConfig {
            sample_box_size: 4,
            ..config()
        };
        let result = Round::start(
            ORIGIN,
            &config,
            FakeScreen::from_fn(1, 1, |_| R),
            RecordingActuator::default(),
        );
        assert!(matches!(result, Err(ConfigError::SampleBoxTooLarge { .. })));
    }

    #[test]
    fn test_move_found_clicks_source_then_destination() {
        let config = config();
        let mut actuator = RecordingActuator::default();
        let mut round =
            Round::start(ORIGIN, &config, painted(&config, &[with_move()]), &mut actuator).unwrap();

        let outcome = round.run_cycle().unwrap();
        let expected = Move::between(CellPos::new(2, 1), CellPos::new(2, 0)).unwrap();
        assert_eq!(outcome, CycleOutcome::MoveFound(expected));
        assert_eq!(round.grid(), Some(&with_move()));
        drop(round);

        // Cell (2,1) starts at 10 + 8, 20 + 4; centers are 2 pixels in.
        assert_eq!(
            actuator.events,
            vec![
                InputEvent::Click(Point::new(20, 26)),
                InputEvent::Click(Point::new(20, 22)),
            ]
        );
    }

    #[test]
    fn test_exhausted_raises_tolerance_by_one_step() {
        let config = config();
        let mut actuator = RecordingActuator::default();
        let mut round =
            Round::start(ORIGIN, &config, painted(&config, &[stalemate()]), &mut actuator).unwrap();

        assert_eq!(round.tolerance(), Tolerance::new(15));
        assert_eq!(round.run_cycle().unwrap(), CycleOutcome::Exhausted);
        assert_eq!(round.tolerance(), Tolerance::new(20));
        drop(round);

        assert_eq!(actuator.events, vec![InputEvent::MovePointer(ORIGIN)]);
    }

    #[test]
    fn test_degraded_at_ceiling_keeps_ceiling() {
        let config = RoundConfig {
            baseline_tolerance: Tolerance::new(40),
            tolerance_step: Tolerance::new(5),
            tolerance_ceiling: Tolerance::new(50),
            ..config()
        };
        let mut round = Round::start(
            ORIGIN,
            &config,
            painted(&config, &[stalemate()]),
            RecordingActuator::default(),
        )
        .unwrap();

        assert!(round.run_cycle().unwrap().is_exhausted());
        assert!(round.run_cycle().unwrap().is_exhausted());
        assert_eq!(round.tolerance(), Tolerance::new(50));
        for _ in 0..3 {
            assert_eq!(round.run_cycle().unwrap(), CycleOutcome::Degraded);
            assert_eq!(round.tolerance(), Tolerance::new(50));
        }

        let stats = round.end();
        assert_eq!(stats.cycles(), 5);
        assert_eq!(stats.exhausted(), 2);
        assert_eq!(stats.degraded(), 3);
        assert_eq!(stats.final_tolerance(), Tolerance::new(50));
    }

    #[test]
    fn test_degraded_at_max_tolerance() {
        // Every pair of these differs by 255 in some channel, so nothing
        // matches even at the widest tolerance.
        let palette = [
            Color::BLACK,
            Color::new(255, 0, 0),
            Color::new(0, 255, 0),
            Color::new(0, 0, 255),
        ];
        let saturated = Grid::from_fn(3, |pos| palette[(pos.x + 2 * pos.y) % 4]);
        let config = RoundConfig {
            baseline_tolerance: Tolerance::new(255),
            ..config()
        };
        let mut round = Round::start(
            ORIGIN,
            &config,
            painted(&config, &[saturated]),
            RecordingActuator::default(),
        )
        .unwrap();
        assert_eq!(round.run_cycle().unwrap(), CycleOutcome::Degraded);
        assert_eq!(round.tolerance(), Tolerance::new(255));
    }

    #[test]
    fn test_tolerance_resets_after_move() {
        let config = config();
        let frames = [stalemate(), stalemate(), with_move(), stalemate()];
        let mut round = Round::start(
            ORIGIN,
            &config,
            painted(&config, &frames),
            RecordingActuator::default(),
        )
        .unwrap();

        assert!(round.run_cycle().unwrap().is_exhausted());
        assert!(round.run_cycle().unwrap().is_exhausted());
        assert_eq!(round.tolerance(), Tolerance::new(25));
        assert!(round.run_cycle().unwrap().is_move_found());
        assert_eq!(round.tolerance(), Tolerance::new(15));
        assert!(round.run_cycle().unwrap().is_exhausted());
        assert_eq!(round.tolerance(), Tolerance::new(20));

        assert_eq!(round.stats().moves(), 1);
        assert_eq!(round.stats().exhausted(), 3);
    }

    #[test]
    fn test_each_cycle_samples_a_new_grid() {
        let config = config();
        let mut screen = painted(&config, &[stalemate(), with_move()]);
        let mut round =
            Round::start(ORIGIN, &config, &mut screen, RecordingActuator::default()).unwrap();

        assert_eq!(round.grid(), None);
        round.run_cycle().unwrap();
        assert_eq!(round.grid(), Some(&stalemate()));
        round.run_cycle().unwrap();
        assert_eq!(round.grid(), Some(&with_move()));
        drop(round);

        assert_eq!(screen.refresh_count(), 2);
    }

    #[test]
    fn test_sampling_error_is_propagated() {
        let config = config();
        let mut screen = painted(&config, &[stalemate()]).failing_refresh();
        let mut actuator = RecordingActuator::default();
        let mut round = Round::start(ORIGIN, &config, &mut screen, &mut actuator).unwrap();

        assert_eq!(round.run_cycle(), Err(FakeScreenError::Refresh));
        assert_eq!(round.grid(), None);
        assert_eq!(round.stats().cycles(), 0);
        drop(round);

        assert!(actuator.events.is_empty());
    }

    #[test]
    fn test_pixels_released_on_end_and_drop() {
        let config = config();

        let mut screen = painted(&config, &[stalemate()]);
        let round =
            Round::start(ORIGIN, &config, &mut screen, RecordingActuator::default()).unwrap();
        let _ = round.end();
        assert!(screen.is_released());

        let mut screen = painted(&config, &[stalemate()]).failing_refresh();
        {
            let mut round =
                Round::start(ORIGIN, &config, &mut screen, RecordingActuator::default()).unwrap();
            assert!(round.run_cycle().is_err());
        }
        assert!(screen.is_released());
    }

    #[test]
    fn test_run_with_zero_duration_runs_no_cycle() {
        let config = config();
        let mut screen = painted(&config, &[with_move()]);
        let mut round =
            Round::start(ORIGIN, &config, &mut screen, RecordingActuator::default()).unwrap();
        let stats = round.run().unwrap();
        drop(round);

        assert_eq!(stats.cycles(), 0);
        assert_eq!(screen.refresh_count(), 0);
    }

    #[test]
    fn test_run_stops_when_budget_is_spent() {
        let config = RoundConfig {
            throttle_millis: 200,
            round_secs: 1,
            ..config()
        };
        let mut round = Round::start(
            ORIGIN,
            &config,
            painted(&config, &[stalemate()]),
            RecordingActuator::default(),
        )
        .unwrap();
        let started = Instant::now();
        let stats = round.run().unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!((1..=6).contains(&stats.cycles()), "{stats:?}");
        assert_eq!(stats.cycles(), stats.exhausted() + stats.degraded());
    }
}

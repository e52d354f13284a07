use std::path::PathBuf;

use gemsight_engine::{
    BoardGeometry, BoardSampler, Grid, Move, MoveSearch, Point, SearchOutcome, Tolerance,
    TolerancePolicy, ToleranceState,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{capture::ScreenshotSampler, command::BoardArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    /// Screenshot containing the board (PNG)
    image: PathBuf,
    #[clap(flatten)]
    pub(super) board: BoardArg,
    /// Also list every qualifying move at the tolerance that found one
    #[clap(long)]
    all: bool,
    /// Output file path
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    origin: Point,
    tolerance: Tolerance,
    degraded: bool,
    #[serde(rename = "move")]
    mv: Option<MoveReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qualifying_moves: Option<Vec<Move>>,
    grid: &'a Grid,
}

#[derive(Debug, Serialize)]
struct MoveReport {
    #[serde(flatten)]
    mv: Move,
    clicks: [Point; 2],
}

impl MoveReport {
    fn new(geometry: &BoardGeometry, origin: Point, mv: Move) -> Self {
        Self {
            mv,
            clicks: [
                geometry.cell_center(origin, mv.source()),
                geometry.cell_center(origin, mv.destination()),
            ],
        }
    }
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let SolveArg {
        image,
        board,
        all,
        output,
    } = arg;

    let config = board.load_config()?;
    let geometry = config.geometry()?;
    let origin = board.origin();

    let mut sampler = ScreenshotSampler::from_file(image);
    let grid = BoardSampler::new(geometry).sample(&mut sampler, origin)?;
    let size = grid.size();
    info!("Sampled {size}x{size} board from {}", image.display());
    debug!("Board:\n{grid}");

    let mut search = MoveSearch::new();
    let (tolerance, found) = search_escalating(&mut search, &grid, config.tolerance_policy()?);
    match found {
        Some(mv) => info!(%mv, %tolerance, "Move found"),
        None => warn!(%tolerance, "No move found at the tolerance ceiling"),
    }

    let qualifying_moves = all.then(|| search.qualifying_moves(&grid, tolerance));
    let report = SolveReport {
        origin,
        tolerance,
        degraded: found.is_none(),
        mv: found.map(|mv| MoveReport::new(&geometry, origin, mv)),
        qualifying_moves,
        grid: &grid,
    };
    Output::save_json(&report, output.clone())?;

    Ok(())
}

/// Searches `grid`, raising the tolerance after every fruitless scan, until a
/// move turns up or a scan at the ceiling fails too.
///
/// Returns the tolerance of the last scan.
fn search_escalating(
    search: &mut MoveSearch,
    grid: &Grid,
    policy: TolerancePolicy,
) -> (Tolerance, Option<Move>) {
    let mut state = ToleranceState::new(policy);
    loop {
        let tolerance = state.current();
        if let SearchOutcome::Found(mv) = search.find_move(grid, tolerance) {
            return (tolerance, Some(mv));
        }
        if state.escalate().is_at_ceiling() {
            return (tolerance, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use gemsight_engine::{CellPos, Color};

    use super::*;

    fn policy(baseline: u16, step: u16, ceiling: u16) -> TolerancePolicy {
        TolerancePolicy::new(
            Tolerance::new(baseline),
            Tolerance::new(step),
            Tolerance::new(ceiling),
        )
        .unwrap()
    }

    #[test]
    fn test_search_escalating_stops_at_first_tolerance_with_a_move() {
        let red = Color::new(220, 30, 30);
        let dark = Color::new(200, 30, 30);
        let green = Color::new(30, 220, 30);
        let blue = Color::new(30, 30, 220);
        let yellow = Color::new(220, 220, 30);
        // The two reds differ by 20, so the move needs a tolerance above 20.
        let grid = Grid::from_rows(&[
            [red, dark, blue],
            [green, green, red],
            [blue, green, yellow],
        ])
        .unwrap();

        let mut search = MoveSearch::new();
        let (tolerance, found) = search_escalating(&mut search, &grid, policy(15, 5, 255));
        assert_eq!(tolerance, Tolerance::new(25));
        assert_eq!(
            found,
            Move::between(CellPos::new(2, 1), CellPos::new(2, 0))
        );
    }

    #[test]
    fn test_search_escalating_gives_up_at_ceiling() {
        let grid = Grid::filled(4, Color::new(10, 20, 30));
        let mut search = MoveSearch::new();
        let (tolerance, found) = search_escalating(&mut search, &grid, policy(15, 10, 40));
        assert_eq!(tolerance, Tolerance::new(40));
        assert_eq!(found, None);
    }

    #[test]
    fn test_move_report_clicks_cell_centers() {
        let geometry = BoardGeometry::new(8, 40, 2, 19).unwrap();
        let mv = Move::between(CellPos::new(0, 0), CellPos::new(1, 0)).unwrap();
        let report = MoveReport::new(&geometry, Point::new(100, 50), mv);
        assert_eq!(report.clicks, [Point::new(120, 70), Point::new(160, 70)]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], serde_json::json!({ "x": 0, "y": 0 }));
        assert_eq!(json["clicks"][1], serde_json::json!({ "x": 160, "y": 70 }));
    }
}

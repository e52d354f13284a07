use gemsight_engine::{Actuator, Point};
use tracing::info;

/// Actuator that only logs what it would do.
#[derive(Debug, Default)]
pub(crate) struct DryRunActuator {
    clicks: usize,
}

impl DryRunActuator {
    pub(crate) fn clicks(&self) -> usize {
        self.clicks
    }
}

impl Actuator for DryRunActuator {
    fn click(&mut self, at: Point) {
        self.clicks += 1;
        info!(%at, "click");
    }

    fn move_pointer(&mut self, to: Point) {
        info!(%to, "move pointer");
    }
}

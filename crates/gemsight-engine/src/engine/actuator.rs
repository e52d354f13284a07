use crate::{
    core::{Move, Point},
    engine::config::BoardGeometry,
};

/// Pointer input sink.
///
/// Input is fire-and-forget: implementations are expected to always succeed.
pub trait Actuator {
    /// Presses and releases the primary button at `at`.
    fn click(&mut self, at: Point);

    /// Moves the pointer to `to` without clicking.
    fn move_pointer(&mut self, to: Point) {
        let _ = to;
    }
}

impl<A> Actuator for &mut A
where
    A: Actuator + ?Sized,
{
    fn click(&mut self, at: Point) {
        (**self).click(at);
    }

    fn move_pointer(&mut self, to: Point) {
        (**self).move_pointer(to);
    }
}

/// Performs `mv` on the board at `origin` by clicking the center of the source
/// cell and then the center of the destination cell.
pub fn perform_swap<A>(actuator: &mut A, geometry: &BoardGeometry, origin: Point, mv: Move)
where
    A: Actuator + ?Sized,
{
    actuator.click(geometry.cell_center(origin, mv.source()));
    actuator.click(geometry.cell_center(origin, mv.destination()));
}
